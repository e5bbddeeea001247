pub mod admin;
pub mod changelog;
pub mod comments;
pub mod feedback;
pub mod health;
pub mod profile;
pub mod roadmap;
pub mod workspaces;

use crate::AppState;
use crate::error::{AppError, AppResult};
use axum::{
    Router,
    routing::{get, post, put},
};
use diesel::PgConnection;
use std::sync::Arc;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Readable without a session; a session only personalizes the result
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/workspaces/slug-availability",
            get(workspaces::check_slug),
        )
        .route("/w/:slug", get(workspaces::get_workspace))
        .route("/w/:slug/feedback", get(feedback::list_feedback))
        .route("/w/:slug/feedback/:feedback_id", get(feedback::get_feedback))
        .route(
            "/w/:slug/feedback/:feedback_id/comments",
            get(comments::list_comments),
        )
        .route("/w/:slug/roadmap", get(roadmap::get_board))
        .route("/w/:slug/roadmap/:item_id", get(roadmap::get_item))
        .route("/w/:slug/changelog", get(changelog::list_entries))
        .route("/w/:slug/changelog/feed", get(changelog::get_feed))
        .route("/w/:slug/changelog/:entry_id", get(changelog::get_entry));

    let session_routes = Router::new()
        .route("/me", get(profile::get_me).put(profile::update_me))
        .route("/workspaces", post(workspaces::create_workspace))
        .route("/w/:slug/join", post(workspaces::join_workspace))
        .route("/feedback", post(feedback::create_feedback))
        .route(
            "/feedback/:feedback_id",
            put(feedback::update_feedback).delete(feedback::delete_feedback),
        )
        .route(
            "/feedback/:feedback_id/status",
            put(feedback::update_feedback_status),
        )
        .route("/feedback/:feedback_id/vote", post(feedback::toggle_vote))
        .route(
            "/feedback/:feedback_id/comments",
            post(comments::create_comment),
        )
        .route(
            "/comments/:comment_id",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/roadmap", post(roadmap::create_item))
        .route("/roadmap/order", put(roadmap::reorder_items))
        .route(
            "/roadmap/:item_id",
            put(roadmap::update_item).delete(roadmap::delete_item),
        )
        .route("/roadmap/:item_id/status", put(roadmap::move_item))
        .route("/changelog", post(changelog::create_entry))
        .route(
            "/changelog/:entry_id",
            put(changelog::update_entry).delete(changelog::delete_entry),
        )
        .route("/changelog/:entry_id/publish", post(changelog::publish_entry))
        .route(
            "/changelog/:entry_id/unpublish",
            post(changelog::unpublish_entry),
        )
        .route(
            "/changelog/:entry_id/feedback/:feedback_id",
            post(changelog::link_feedback).delete(changelog::unlink_feedback),
        )
        .route("/admin/stats", get(admin::get_stats))
        .route("/admin/feedback", get(admin::list_feedback))
        .route("/admin/feedback/top", get(admin::top_voted));

    public_routes.merge(session_routes).with_state(state)
}

/// Runs blocking database work on a pooled connection off the async runtime.
pub(crate) async fn with_conn<T, F>(state: &AppState, work: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> AppResult<T> + Send + 'static,
{
    let pool = state.db.clone();
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        let mut conn = pool.get()?;
        work(&mut conn)
    })
    .await
    .map_err(|e| AppError::internal(format!("Database task failed: {}", e)))?
}
