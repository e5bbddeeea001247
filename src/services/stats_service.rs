use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::stats::{
    ActivityItem, ActivityKind, CategoryCount, StatusCount, WorkspaceStats,
};
use crate::db::repositories::{CommentRepo, FeedbackRepo, ProfileRepo, VoteRepo};
use crate::error::AppResult;
use crate::services::context::RequestContext;

const RECENT_ACTIVITY: usize = 10;

pub struct StatsService;

impl StatsService {
    pub fn workspace_stats(conn: &mut PgConnection, ctx: &RequestContext) -> AppResult<WorkspaceStats> {
        let workspace_id = ctx.admin_workspace("Only admins can view workspace statistics")?;

        let by_status: Vec<StatusCount> = FeedbackRepo::count_by_status(conn, workspace_id)?
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect();
        let by_category = FeedbackRepo::count_by_category(conn, workspace_id)?
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();

        Ok(WorkspaceStats {
            total_feedback: by_status.iter().map(|s| s.count).sum(),
            total_votes: VoteRepo::count_for_workspace(conn, workspace_id)?,
            total_comments: CommentRepo::count_for_workspace(conn, workspace_id)?,
            total_members: ProfileRepo::count_members(conn, workspace_id)?,
            by_status,
            by_category,
            recent_activity: Self::recent_activity(conn, workspace_id)?,
        })
    }

    /// Newest feedback and comments merged, newest first.
    fn recent_activity(conn: &mut PgConnection, workspace_id: Uuid) -> AppResult<Vec<ActivityItem>> {
        let limit = RECENT_ACTIVITY as i64;
        let feedback = FeedbackRepo::recent(conn, workspace_id, limit)?;
        let comments = CommentRepo::recent_for_workspace(conn, workspace_id, limit)?;

        let actor_ids: Vec<Uuid> = feedback
            .iter()
            .map(|f| f.author_id)
            .chain(comments.iter().map(|c| c.2))
            .collect();
        let names = ProfileRepo::display_names(conn, &actor_ids)?;
        let name_of = |id: &Uuid| names.get(id).cloned().unwrap_or_else(|| "Anonymous".to_string());

        let mut activity: Vec<ActivityItem> = feedback
            .into_iter()
            .map(|f| ActivityItem {
                kind: ActivityKind::Feedback,
                feedback_id: f.id,
                actor_name: name_of(&f.author_id),
                title: f.title,
                created_at: f.created_at,
            })
            .chain(
                comments
                    .into_iter()
                    .map(|(feedback_id, title, author_id, created_at)| ActivityItem {
                        kind: ActivityKind::Comment,
                        feedback_id,
                        title,
                        actor_name: name_of(&author_id),
                        created_at,
                    }),
            )
            .collect();

        activity.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        activity.truncate(RECENT_ACTIVITY);
        Ok(activity)
    }
}
