use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::FeedbackStatus;
use crate::db::models::api::Pagination;
use crate::db::models::feedback::{
    AdminFeedbackQuery, CreateFeedbackRequest, Feedback, FeedbackChanges, FeedbackFilters,
    FeedbackPage, FeedbackView, NewFeedback, UpdateFeedbackRequest,
};
use crate::db::repositories::feedback::FeedbackFilter;
use crate::db::repositories::{
    ChangelogRepo, CommentRepo, FeedbackRepo, ProfileRepo, RoadmapRepo, VoteRepo, WorkspaceRepo,
};
use crate::error::{AppError, AppResult};
use crate::notifications::{NotificationDispatcher, NotificationKind};
use crate::services::authorization::Requirement;
use crate::services::context::RequestContext;
use crate::services::paging;
use crate::validation::ensure_valid;

const ADMIN_PAGE_SIZE: i64 = 20;
const ADMIN_MAX_PAGE_SIZE: i64 = 100;
const TOP_VOTED_DEFAULT: i64 = 10;
const TOP_VOTED_MAX: i64 = 50;

pub struct FeedbackService;

impl FeedbackService {
    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id))]
    pub fn create(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        request: &CreateFeedbackRequest,
    ) -> AppResult<FeedbackView> {
        ensure_valid(request)?;
        let workspace_id = ctx.member_workspace()?;

        let feedback = FeedbackRepo::insert(
            conn,
            &NewFeedback {
                title: request.title.trim(),
                description: request.description.trim(),
                category: request.category,
                status: FeedbackStatus::Open,
                author_id: ctx.user_id,
                workspace_id,
            },
        )?;

        tracing::info!(feedback_id = %feedback.id, "Feedback created");
        Ok(FeedbackView {
            feedback,
            author_name: ctx.display_name().to_string(),
            user_has_voted: false,
        })
    }

    pub fn list(
        conn: &mut PgConnection,
        workspace_id: Uuid,
        filters: &FeedbackFilters,
        viewer: Option<&RequestContext>,
    ) -> AppResult<Vec<FeedbackView>> {
        let filter = FeedbackFilter {
            status: filters.status,
            category: filters.category,
            search: None,
        };
        let rows = FeedbackRepo::list(conn, workspace_id, &filter, filters.sort)?;
        Self::views(conn, rows, viewer.map(|v| v.user_id))
    }

    pub fn get(
        conn: &mut PgConnection,
        workspace_id: Uuid,
        feedback_id: Uuid,
        viewer: Option<&RequestContext>,
    ) -> AppResult<FeedbackView> {
        let feedback = Self::find(conn, workspace_id, feedback_id)?;
        Self::views(conn, vec![feedback], viewer.map(|v| v.user_id))?
            .pop()
            .ok_or_else(|| AppError::not_found("Feedback"))
    }

    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, feedback_id = %feedback_id))]
    pub fn update(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        feedback_id: Uuid,
        request: &UpdateFeedbackRequest,
    ) -> AppResult<Feedback> {
        if request.is_empty() {
            return Err(AppError::validation("At least one field must be provided"));
        }
        ensure_valid(request)?;

        let workspace_id = ctx.member_workspace()?;
        let existing = Self::find(conn, workspace_id, feedback_id)?;
        ctx.check(
            Requirement::AuthorOrAdmin {
                workspace_id,
                owner_id: existing.author_id,
            },
            "You can only edit your own feedback",
        )?;

        let changes = FeedbackChanges {
            title: request.title.as_deref().map(|t| t.trim().to_string()),
            description: request.description.as_deref().map(|d| d.trim().to_string()),
            category: request.category,
            updated_at: Some(Utc::now()),
        };

        Ok(FeedbackRepo::update_fields(conn, feedback_id, &changes)?)
    }

    /// Changes the status and notifies the author when it actually moved.
    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, feedback_id = %feedback_id))]
    pub fn update_status(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        feedback_id: Uuid,
        new_status: FeedbackStatus,
        notifier: &NotificationDispatcher,
    ) -> AppResult<Feedback> {
        let workspace_id = ctx.admin_workspace("Only admins can change feedback status")?;

        let (feedback, change) = conn.transaction::<_, AppError, _>(|conn| {
            let locked = FeedbackRepo::lock_in_workspace(conn, workspace_id, feedback_id)?
                .ok_or_else(|| AppError::not_found("Feedback"))?;

            if locked.status == new_status {
                return Ok((locked, None));
            }

            let previous = locked.status;
            let updated = FeedbackRepo::set_status(conn, feedback_id, new_status)?;
            let workspace_slug = WorkspaceRepo::find_by_id(conn, workspace_id)?
                .map(|w| w.slug)
                .unwrap_or_default();
            Ok((updated, Some((previous, workspace_slug))))
        })?;

        if let Some((old_status, workspace_slug)) = change {
            tracing::info!(%old_status, %new_status, "Feedback status changed");
            notifier.dispatch(
                feedback.author_id,
                NotificationKind::StatusChange {
                    feedback_id: feedback.id,
                    feedback_title: feedback.title.clone(),
                    old_status,
                    new_status,
                    workspace_slug,
                },
            );
        }

        Ok(feedback)
    }

    /// Removes the feedback with its votes, comments and changelog links.
    /// Roadmap items keep existing without the link.
    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, feedback_id = %feedback_id))]
    pub fn delete(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        feedback_id: Uuid,
    ) -> AppResult<()> {
        let workspace_id = ctx.member_workspace()?;
        let existing = Self::find(conn, workspace_id, feedback_id)?;
        ctx.check(
            Requirement::AuthorOrAdmin {
                workspace_id,
                owner_id: existing.author_id,
            },
            "You can only delete your own feedback",
        )?;

        conn.transaction::<_, AppError, _>(|conn| {
            ChangelogRepo::delete_links_for_feedback(conn, feedback_id)?;
            RoadmapRepo::unlink_feedback(conn, feedback_id)?;
            CommentRepo::delete_for_feedback(conn, feedback_id)?;
            VoteRepo::delete_for_feedback(conn, feedback_id)?;
            FeedbackRepo::delete(conn, feedback_id)?;
            Ok(())
        })?;

        tracing::info!("Feedback deleted");
        Ok(())
    }

    pub fn admin_list(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        query: &AdminFeedbackQuery,
    ) -> AppResult<(FeedbackPage, Pagination)> {
        let workspace_id = ctx.admin_workspace("Only admins can browse all feedback")?;
        let (page, per_page, offset) =
            paging(query.page, query.per_page, ADMIN_PAGE_SIZE, ADMIN_MAX_PAGE_SIZE);

        let filter = FeedbackFilter {
            status: query.status,
            category: query.category,
            search: query.search.as_deref(),
        };
        let (rows, total_count) =
            FeedbackRepo::search_page(conn, workspace_id, &filter, offset, per_page)?;
        let items = Self::views(conn, rows, Some(ctx.user_id))?;

        Ok((
            FeedbackPage { items, total_count },
            Pagination::new(page, per_page, total_count),
        ))
    }

    pub fn top_voted(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        limit: Option<i64>,
    ) -> AppResult<Vec<FeedbackView>> {
        let workspace_id = ctx.admin_workspace("Only admins can view top feedback")?;
        let limit = limit.unwrap_or(TOP_VOTED_DEFAULT).clamp(1, TOP_VOTED_MAX);
        let rows = FeedbackRepo::top_voted(conn, workspace_id, limit)?;
        Self::views(conn, rows, Some(ctx.user_id))
    }

    fn find(conn: &mut PgConnection, workspace_id: Uuid, feedback_id: Uuid) -> AppResult<Feedback> {
        FeedbackRepo::find_in_workspace(conn, workspace_id, feedback_id)?
            .ok_or_else(|| AppError::not_found("Feedback"))
    }

    /// Attaches author names and the viewer's vote flag, keeping row order.
    fn views(
        conn: &mut PgConnection,
        rows: Vec<Feedback>,
        viewer_id: Option<Uuid>,
    ) -> AppResult<Vec<FeedbackView>> {
        let author_ids: Vec<Uuid> = rows.iter().map(|f| f.author_id).collect();
        let names = ProfileRepo::display_names(conn, &author_ids)?;

        let voted = match viewer_id {
            Some(user_id) => {
                let ids: Vec<Uuid> = rows.iter().map(|f| f.id).collect();
                VoteRepo::voted_among(conn, user_id, &ids)?
            }
            None => Default::default(),
        };

        Ok(rows
            .into_iter()
            .map(|feedback| FeedbackView {
                author_name: names
                    .get(&feedback.author_id)
                    .cloned()
                    .unwrap_or_else(|| "Anonymous".to_string()),
                user_has_voted: voted.contains(&feedback.id),
                feedback,
            })
            .collect())
    }
}
