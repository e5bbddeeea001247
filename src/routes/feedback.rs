use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;
use crate::db::models::feedback::{
    CreateFeedbackRequest, FeedbackFilters, UpdateFeedbackRequest, UpdateFeedbackStatusRequest,
};
use crate::db::models::{ApiResponse, ResponseMeta};
use crate::error::AppResult;
use crate::middleware::{MaybeUser, SessionUser};
use crate::routes::with_conn;
use crate::services::context::RequestContext;
use crate::services::{FeedbackService, VotesService, WorkspacesService};
use crate::validation::ValidatedJson;

pub async fn list_feedback(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(slug): Path<String>,
    Query(filters): Query<FeedbackFilters>,
) -> AppResult<impl IntoResponse> {
    let items = with_conn(&state, move |conn| {
        let workspace = WorkspacesService::get_by_slug(conn, &slug)?;
        let viewer = RequestContext::viewer(conn, user.as_ref())?;
        FeedbackService::list(conn, workspace.id, &filters, viewer.as_ref())
    })
    .await?;

    let meta = ResponseMeta {
        total_count: Some(items.len() as i64),
        ..Default::default()
    };
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(
            items,
            "Feedback retrieved successfully",
            meta,
        )),
    ))
}

pub async fn get_feedback(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path((slug, feedback_id)): Path<(String, Uuid)>,
) -> AppResult<impl IntoResponse> {
    let item = with_conn(&state, move |conn| {
        let workspace = WorkspacesService::get_by_slug(conn, &slug)?;
        let viewer = RequestContext::viewer(conn, user.as_ref())?;
        FeedbackService::get(conn, workspace.id, feedback_id, viewer.as_ref())
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(item, "Feedback retrieved successfully")),
    ))
}

pub async fn create_feedback(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    ValidatedJson(payload): ValidatedJson<CreateFeedbackRequest>,
) -> AppResult<impl IntoResponse> {
    let item = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        FeedbackService::create(conn, &ctx, &payload)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(item, "Feedback submitted successfully")),
    ))
}

pub async fn update_feedback(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(feedback_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateFeedbackRequest>,
) -> AppResult<impl IntoResponse> {
    let item = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        FeedbackService::update(conn, &ctx, feedback_id, &payload)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(item, "Feedback updated successfully")),
    ))
}

pub async fn update_feedback_status(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(feedback_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateFeedbackStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let notifier = state.notifier.clone();
    let item = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        FeedbackService::update_status(conn, &ctx, feedback_id, payload.status, &notifier)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(item, "Feedback status updated successfully")),
    ))
}

pub async fn delete_feedback(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(feedback_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        FeedbackService::delete(conn, &ctx, feedback_id)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::<()>::ok("Feedback deleted successfully")),
    ))
}

pub async fn toggle_vote(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(feedback_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let toggle = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        VotesService::toggle(conn, &ctx, feedback_id)
    })
    .await?;

    let message = if toggle.has_voted {
        "Vote added"
    } else {
        "Vote removed"
    };
    Ok((StatusCode::OK, Json(ApiResponse::success(toggle, message))))
}
