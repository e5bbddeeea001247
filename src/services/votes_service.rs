use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::vote::{NewVote, VoteToggle};
use crate::db::repositories::{FeedbackRepo, VoteRepo};
use crate::error::{AppError, AppResult};
use crate::services::context::RequestContext;

pub struct VotesService;

impl VotesService {
    /// Adds the caller's vote or takes it back. The count returned is read
    /// under the feedback row lock, so it always matches the ledger.
    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, feedback_id = %feedback_id))]
    pub fn toggle(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        feedback_id: Uuid,
    ) -> AppResult<VoteToggle> {
        let workspace_id = ctx.member_workspace()?;

        let toggle = conn.transaction::<_, AppError, _>(|conn| {
            let feedback = FeedbackRepo::lock_in_workspace(conn, workspace_id, feedback_id)?
                .ok_or_else(|| AppError::not_found("Feedback"))?;

            if VoteRepo::find(conn, feedback_id, ctx.user_id)?.is_some() {
                let removed = VoteRepo::delete(conn, feedback_id, ctx.user_id)?;
                let vote_count = if removed > 0 {
                    FeedbackRepo::adjust_vote_count(conn, feedback_id, -1)?
                } else {
                    feedback.vote_count
                };
                return Ok(VoteToggle {
                    feedback_id,
                    vote_count,
                    has_voted: false,
                });
            }

            let inserted = VoteRepo::insert_if_absent(
                conn,
                &NewVote {
                    feedback_id,
                    user_id: ctx.user_id,
                },
            )?;
            let vote_count = if inserted > 0 {
                FeedbackRepo::adjust_vote_count(conn, feedback_id, 1)?
            } else {
                tracing::debug!("Concurrent vote already recorded");
                feedback.vote_count
            };

            Ok(VoteToggle {
                feedback_id,
                vote_count,
                has_voted: true,
            })
        })?;

        tracing::info!(has_voted = toggle.has_voted, vote_count = toggle.vote_count, "Vote toggled");
        Ok(toggle)
    }
}
