use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::AppState;
use crate::db::models::feedback::{AdminFeedbackQuery, TopVotedQuery};
use crate::db::models::{ApiResponse, ResponseMeta};
use crate::error::AppResult;
use crate::middleware::{SessionUser, extract_request_id};
use crate::routes::with_conn;
use crate::services::context::RequestContext;
use crate::services::{FeedbackService, StatsService};

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
) -> AppResult<impl IntoResponse> {
    let stats = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        StatsService::workspace_stats(conn, &ctx)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(stats, "Statistics retrieved successfully")),
    ))
}

pub async fn list_feedback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    user: SessionUser,
    Query(query): Query<AdminFeedbackQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, pagination) = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        FeedbackService::admin_list(conn, &ctx, &query)
    })
    .await?;

    let meta = ResponseMeta {
        request_id: extract_request_id(&headers),
        total_count: Some(page.total_count),
        pagination: Some(pagination),
    };
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(
            page,
            "Feedback retrieved successfully",
            meta,
        )),
    ))
}

pub async fn top_voted(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Query(query): Query<TopVotedQuery>,
) -> AppResult<impl IntoResponse> {
    let items = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        FeedbackService::top_voted(conn, &ctx, query.limit)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(items, "Top feedback retrieved successfully")),
    ))
}
