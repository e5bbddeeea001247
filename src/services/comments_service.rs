use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::comment::{Comment, CommentView, NewComment};
use crate::db::models::profile::display_name;
use crate::db::repositories::{CommentRepo, FeedbackRepo, WorkspaceRepo};
use crate::error::{AppError, AppResult};
use crate::notifications::{NotificationDispatcher, NotificationKind, comment_preview};
use crate::services::authorization::Requirement;
use crate::services::context::RequestContext;

pub struct CommentsService;

impl CommentsService {
    /// Oldest first.
    pub fn list(
        conn: &mut PgConnection,
        workspace_id: Uuid,
        feedback_id: Uuid,
    ) -> AppResult<Vec<CommentView>> {
        FeedbackRepo::find_in_workspace(conn, workspace_id, feedback_id)?
            .ok_or_else(|| AppError::not_found("Feedback"))?;

        Ok(CommentRepo::list_for_feedback(conn, feedback_id)?
            .into_iter()
            .map(|(comment, full_name, email)| CommentView {
                author_name: display_name(&full_name, &email).to_string(),
                comment,
            })
            .collect())
    }

    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, feedback_id = %feedback_id))]
    pub fn create(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        feedback_id: Uuid,
        content: &str,
        notifier: &NotificationDispatcher,
    ) -> AppResult<CommentView> {
        let workspace_id = ctx.member_workspace()?;
        let content = content.trim();

        let (comment, feedback, notify_slug) = conn.transaction::<_, AppError, _>(|conn| {
            let feedback = FeedbackRepo::lock_in_workspace(conn, workspace_id, feedback_id)?
                .ok_or_else(|| AppError::not_found("Feedback"))?;

            let comment = CommentRepo::insert(
                conn,
                &NewComment {
                    feedback_id,
                    author_id: ctx.user_id,
                    content,
                },
            )?;
            FeedbackRepo::adjust_comment_count(conn, feedback_id, 1)?;

            let notify_slug = if feedback.author_id != ctx.user_id {
                Some(
                    WorkspaceRepo::find_by_id(conn, workspace_id)?
                        .map(|w| w.slug)
                        .unwrap_or_default(),
                )
            } else {
                None
            };
            Ok((comment, feedback, notify_slug))
        })?;

        tracing::info!(comment_id = %comment.id, "Comment added");

        if let Some(workspace_slug) = notify_slug {
            notifier.dispatch(
                feedback.author_id,
                NotificationKind::NewComment {
                    feedback_id,
                    feedback_title: feedback.title,
                    commenter_name: ctx.display_name().to_string(),
                    comment_preview: comment_preview(&comment.content),
                    workspace_slug,
                },
            );
        }

        Ok(CommentView {
            comment,
            author_name: ctx.display_name().to_string(),
        })
    }

    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, comment_id = %comment_id))]
    pub fn update(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        comment_id: Uuid,
        content: &str,
    ) -> AppResult<Comment> {
        let (comment, workspace_id) = Self::find(conn, comment_id)?;
        ctx.check(
            Requirement::Author {
                workspace_id,
                owner_id: comment.author_id,
            },
            "You can only edit your own comments",
        )?;

        Ok(CommentRepo::update_content(conn, comment_id, content.trim())?)
    }

    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, comment_id = %comment_id))]
    pub fn delete(conn: &mut PgConnection, ctx: &RequestContext, comment_id: Uuid) -> AppResult<()> {
        let (comment, workspace_id) = Self::find(conn, comment_id)?;
        ctx.check(
            Requirement::AuthorOrAdmin {
                workspace_id,
                owner_id: comment.author_id,
            },
            "You can only delete your own comments",
        )?;

        conn.transaction::<_, AppError, _>(|conn| {
            FeedbackRepo::lock_in_workspace(conn, workspace_id, comment.feedback_id)?;
            if CommentRepo::delete(conn, comment_id)? > 0 {
                FeedbackRepo::adjust_comment_count(conn, comment.feedback_id, -1)?;
            }
            Ok(())
        })?;

        tracing::info!("Comment deleted");
        Ok(())
    }

    fn find(conn: &mut PgConnection, comment_id: Uuid) -> AppResult<(Comment, Uuid)> {
        CommentRepo::find_with_workspace(conn, comment_id)?
            .ok_or_else(|| AppError::not_found("Comment"))
    }
}
