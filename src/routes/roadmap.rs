use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;
use crate::db::models::ApiResponse;
use crate::db::models::roadmap::{
    CreateRoadmapItemRequest, ReorderRequest, UpdateRoadmapItemRequest, UpdateRoadmapStatusRequest,
};
use crate::error::AppResult;
use crate::middleware::SessionUser;
use crate::routes::with_conn;
use crate::services::context::RequestContext;
use crate::services::{RoadmapService, WorkspacesService};
use crate::validation::ValidatedJson;

pub async fn get_board(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let board = with_conn(&state, move |conn| {
        let workspace = WorkspacesService::get_by_slug(conn, &slug)?;
        RoadmapService::board(conn, workspace.id)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(board, "Roadmap retrieved successfully")),
    ))
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path((slug, item_id)): Path<(String, Uuid)>,
) -> AppResult<impl IntoResponse> {
    let item = with_conn(&state, move |conn| {
        let workspace = WorkspacesService::get_by_slug(conn, &slug)?;
        RoadmapService::get(conn, workspace.id, item_id)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(item, "Roadmap item retrieved successfully")),
    ))
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    ValidatedJson(payload): ValidatedJson<CreateRoadmapItemRequest>,
) -> AppResult<impl IntoResponse> {
    let item = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        RoadmapService::create(conn, &ctx, &payload)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(item, "Roadmap item created successfully")),
    ))
}

pub async fn update_item(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(item_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRoadmapItemRequest>,
) -> AppResult<impl IntoResponse> {
    let item = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        RoadmapService::update(conn, &ctx, item_id, &payload)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(item, "Roadmap item updated successfully")),
    ))
}

pub async fn move_item(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(item_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRoadmapStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let item = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        RoadmapService::update_status(conn, &ctx, item_id, payload.status, payload.display_order)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(item, "Roadmap item moved successfully")),
    ))
}

pub async fn reorder_items(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    ValidatedJson(payload): ValidatedJson<ReorderRequest>,
) -> AppResult<impl IntoResponse> {
    let board = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        RoadmapService::reorder(conn, &ctx, &payload.items)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(board, "Roadmap reordered successfully")),
    ))
}

pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        RoadmapService::delete(conn, &ctx, item_id)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::<()>::ok("Roadmap item deleted successfully")),
    ))
}
