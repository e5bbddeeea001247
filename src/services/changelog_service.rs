use chrono::Utc;
use diesel::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::models::api::error_codes;
use crate::db::models::changelog::{
    ChangelogChanges, ChangelogEntry, ChangelogEntryView, ChangelogLink, ChangelogPage,
    ChangelogQuery, CreateChangelogRequest, NewChangelogEntry, NewChangelogLink,
    UpdateChangelogRequest,
};
use crate::db::models::feedback::FeedbackSummary;
use crate::db::repositories::{ChangelogRepo, FeedbackRepo, ProfileRepo};
use crate::error::{AppError, AppResult};
use crate::services::context::RequestContext;
use crate::services::{on_unique_violation, paging};
use crate::validation::ensure_valid;

const ADMIN_ONLY: &str = "Only admins can manage the changelog";
const PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 50;
const FEED_SIZE: i64 = 20;

pub struct ChangelogService;

impl ChangelogService {
    /// New entries are always drafts.
    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, links = request.feedback_ids.len()))]
    pub fn create(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        request: &CreateChangelogRequest,
    ) -> AppResult<ChangelogEntryView> {
        ensure_valid(request)?;
        let workspace_id = ctx.admin_workspace(ADMIN_ONLY)?;

        let mut feedback_ids = request.feedback_ids.clone();
        feedback_ids.sort_unstable();
        feedback_ids.dedup();

        let entry = conn.transaction::<_, AppError, _>(|conn| {
            let entry = ChangelogRepo::insert(
                conn,
                &NewChangelogEntry {
                    title: request.title.trim(),
                    content: request.content.trim(),
                    category: request.category,
                    author_id: ctx.user_id,
                    workspace_id,
                    published: false,
                    published_at: None,
                },
            )?;

            let known = FeedbackRepo::ids_in_workspace(conn, workspace_id, &feedback_ids)?;
            if known.len() != feedback_ids.len() {
                return Err(AppError::not_found("Feedback"));
            }

            let links: Vec<NewChangelogLink> = feedback_ids
                .iter()
                .map(|&feedback_id| NewChangelogLink {
                    changelog_id: entry.id,
                    feedback_id,
                })
                .collect();
            ChangelogRepo::insert_links_if_absent(conn, &links)?;
            Ok(entry)
        })?;

        tracing::info!(entry_id = %entry.id, "Changelog draft created");
        Self::view(conn, entry)
    }

    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, entry_id = %entry_id))]
    pub fn update(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        entry_id: Uuid,
        request: &UpdateChangelogRequest,
    ) -> AppResult<ChangelogEntry> {
        if request.is_empty() {
            return Err(AppError::validation("At least one field must be provided"));
        }
        ensure_valid(request)?;
        let workspace_id = ctx.admin_workspace(ADMIN_ONLY)?;
        Self::find(conn, workspace_id, entry_id)?;

        let changes = ChangelogChanges {
            title: request.title.as_deref().map(|t| t.trim().to_string()),
            content: request.content.as_deref().map(|c| c.trim().to_string()),
            category: request.category,
            updated_at: Some(Utc::now()),
        };
        Ok(ChangelogRepo::update_fields(conn, entry_id, &changes)?)
    }

    /// Publishing an entry that is already live keeps its original date.
    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, entry_id = %entry_id))]
    pub fn publish(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        entry_id: Uuid,
    ) -> AppResult<ChangelogEntry> {
        let workspace_id = ctx.admin_workspace(ADMIN_ONLY)?;
        let entry = Self::find(conn, workspace_id, entry_id)?;
        if entry.published {
            return Ok(entry);
        }
        let entry = ChangelogRepo::set_published(conn, entry_id, Some(Utc::now()))?;
        tracing::info!("Changelog entry published");
        Ok(entry)
    }

    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, entry_id = %entry_id))]
    pub fn unpublish(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        entry_id: Uuid,
    ) -> AppResult<ChangelogEntry> {
        let workspace_id = ctx.admin_workspace(ADMIN_ONLY)?;
        Self::find(conn, workspace_id, entry_id)?;
        Ok(ChangelogRepo::set_published(conn, entry_id, None)?)
    }

    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, entry_id = %entry_id))]
    pub fn delete(conn: &mut PgConnection, ctx: &RequestContext, entry_id: Uuid) -> AppResult<()> {
        let workspace_id = ctx.admin_workspace(ADMIN_ONLY)?;
        Self::find(conn, workspace_id, entry_id)?;

        conn.transaction::<_, AppError, _>(|conn| {
            ChangelogRepo::delete_links_for_entry(conn, entry_id)?;
            ChangelogRepo::delete(conn, entry_id)?;
            Ok(())
        })?;

        tracing::info!("Changelog entry deleted");
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, entry_id = %entry_id, feedback_id = %feedback_id))]
    pub fn link(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        entry_id: Uuid,
        feedback_id: Uuid,
    ) -> AppResult<ChangelogLink> {
        let workspace_id = ctx.admin_workspace(ADMIN_ONLY)?;
        Self::find(conn, workspace_id, entry_id)?;
        FeedbackRepo::find_in_workspace(conn, workspace_id, feedback_id)?
            .ok_or_else(|| AppError::not_found("Feedback"))?;

        ChangelogRepo::insert_link(
            conn,
            &NewChangelogLink {
                changelog_id: entry_id,
                feedback_id,
            },
        )
        .map_err(|e| {
            on_unique_violation(e.into(), || {
                AppError::conflict_with_code(
                    "This feedback is already linked to the entry",
                    Some("feedback_id".to_string()),
                    error_codes::CHANGELOG_LINK_EXISTS,
                )
            })
        })
    }

    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, entry_id = %entry_id, feedback_id = %feedback_id))]
    pub fn unlink(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        entry_id: Uuid,
        feedback_id: Uuid,
    ) -> AppResult<()> {
        let workspace_id = ctx.admin_workspace(ADMIN_ONLY)?;
        Self::find(conn, workspace_id, entry_id)?;
        if ChangelogRepo::delete_link(conn, entry_id, feedback_id)? == 0 {
            return Err(AppError::not_found("Changelog link"));
        }
        Ok(())
    }

    /// Drafts are listed only for an admin of the workspace who asks for them.
    pub fn list(
        conn: &mut PgConnection,
        workspace_id: Uuid,
        query: &ChangelogQuery,
        viewer: Option<&RequestContext>,
    ) -> AppResult<ChangelogPage> {
        let include_drafts =
            query.include_unpublished && viewer.is_some_and(|v| v.is_admin_of(workspace_id));
        let (_, limit, offset) = paging(query.page, query.limit, PAGE_SIZE, MAX_PAGE_SIZE);

        let (entries, total_count) =
            ChangelogRepo::page(conn, workspace_id, include_drafts, offset, limit)?;
        let has_more = offset + (entries.len() as i64) < total_count;

        Ok(ChangelogPage {
            entries: Self::views(conn, entries)?,
            total_count,
            has_more,
        })
    }

    pub fn get(
        conn: &mut PgConnection,
        workspace_id: Uuid,
        entry_id: Uuid,
        viewer: Option<&RequestContext>,
    ) -> AppResult<ChangelogEntryView> {
        let entry = Self::find(conn, workspace_id, entry_id)?;
        if !entry.published && !viewer.is_some_and(|v| v.is_admin_of(workspace_id)) {
            return Err(AppError::not_found("Changelog entry"));
        }
        Self::view(conn, entry)
    }

    /// Most recent published entries, for syndication.
    pub fn feed(conn: &mut PgConnection, workspace_id: Uuid) -> AppResult<Vec<ChangelogEntryView>> {
        let entries = ChangelogRepo::latest_published(conn, workspace_id, FEED_SIZE)?;
        Self::views(conn, entries)
    }

    fn find(
        conn: &mut PgConnection,
        workspace_id: Uuid,
        entry_id: Uuid,
    ) -> AppResult<ChangelogEntry> {
        ChangelogRepo::find_in_workspace(conn, workspace_id, entry_id)?
            .ok_or_else(|| AppError::not_found("Changelog entry"))
    }

    fn view(conn: &mut PgConnection, entry: ChangelogEntry) -> AppResult<ChangelogEntryView> {
        Self::views(conn, vec![entry])?
            .pop()
            .ok_or_else(|| AppError::not_found("Changelog entry"))
    }

    fn views(
        conn: &mut PgConnection,
        entries: Vec<ChangelogEntry>,
    ) -> AppResult<Vec<ChangelogEntryView>> {
        let ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
        let author_ids: Vec<Uuid> = entries.iter().map(|e| e.author_id).collect();
        let names = ProfileRepo::display_names(conn, &author_ids)?;

        let mut linked: HashMap<Uuid, Vec<FeedbackSummary>> = HashMap::new();
        for (entry_id, summary) in ChangelogRepo::linked_feedback(conn, &ids)? {
            linked.entry(entry_id).or_default().push(summary);
        }

        Ok(entries
            .into_iter()
            .map(|entry| ChangelogEntryView {
                author_name: names
                    .get(&entry.author_id)
                    .cloned()
                    .unwrap_or_else(|| "Anonymous".to_string()),
                linked_feedback: linked.remove(&entry.id).unwrap_or_default(),
                entry,
            })
            .collect())
    }
}
