use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;
use crate::db::models::comment::CommentRequest;
use crate::db::models::{ApiResponse, ResponseMeta};
use crate::error::AppResult;
use crate::middleware::SessionUser;
use crate::routes::with_conn;
use crate::services::context::RequestContext;
use crate::services::{CommentsService, WorkspacesService};
use crate::validation::ValidatedJson;

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path((slug, feedback_id)): Path<(String, Uuid)>,
) -> AppResult<impl IntoResponse> {
    let comments = with_conn(&state, move |conn| {
        let workspace = WorkspacesService::get_by_slug(conn, &slug)?;
        CommentsService::list(conn, workspace.id, feedback_id)
    })
    .await?;

    let meta = ResponseMeta {
        total_count: Some(comments.len() as i64),
        ..Default::default()
    };
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(
            comments,
            "Comments retrieved successfully",
            meta,
        )),
    ))
}

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(feedback_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CommentRequest>,
) -> AppResult<impl IntoResponse> {
    let notifier = state.notifier.clone();
    let comment = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        CommentsService::create(conn, &ctx, feedback_id, &payload.content, &notifier)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(comment, "Comment added successfully")),
    ))
}

pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(comment_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CommentRequest>,
) -> AppResult<impl IntoResponse> {
    let comment = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        CommentsService::update(conn, &ctx, comment_id, &payload.content)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(comment, "Comment updated successfully")),
    ))
}

pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(comment_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        CommentsService::delete(conn, &ctx, comment_id)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::<()>::ok("Comment deleted successfully")),
    ))
}
