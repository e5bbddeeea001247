pub mod authorization;
pub mod changelog_service;
pub mod comments_service;
pub mod context;
pub mod feedback_service;
pub mod profiles_service;
pub mod roadmap_service;
pub mod stats_service;
pub mod votes_service;
pub mod workspaces_service;

pub use changelog_service::ChangelogService;
pub use comments_service::CommentsService;
pub use feedback_service::FeedbackService;
pub use profiles_service::ProfilesService;
pub use roadmap_service::RoadmapService;
pub use stats_service::StatsService;
pub use votes_service::VotesService;
pub use workspaces_service::WorkspacesService;

use crate::db::is_unique_violation;
use crate::error::AppError;

/// Rewrites a unique-key violation into the given conflict.
pub(crate) fn on_unique_violation(err: AppError, conflict: impl FnOnce() -> AppError) -> AppError {
    match err {
        AppError::Database(ref e) if is_unique_violation(e) => conflict(),
        other => other,
    }
}

/// Clamps `page`/`per_page` query values and returns `(page, per_page, offset)`.
pub(crate) fn paging(page: Option<i64>, per_page: Option<i64>, default: i64, max: i64) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(default).clamp(1, max);
    (page, per_page, (page - 1) * per_page)
}
