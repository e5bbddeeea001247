use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::AppState;
use crate::db::models::ApiResponse;
use crate::db::models::workspace::{CreateWorkspaceRequest, SlugQuery};
use crate::error::AppResult;
use crate::middleware::SessionUser;
use crate::routes::with_conn;
use crate::services::WorkspacesService;
use crate::validation::ValidatedJson;

pub async fn create_workspace(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    ValidatedJson(payload): ValidatedJson<CreateWorkspaceRequest>,
) -> AppResult<impl IntoResponse> {
    let notifier = state.notifier.clone();
    let result = with_conn(&state, move |conn| {
        WorkspacesService::create(conn, &user, &payload, &notifier)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(result, "Workspace created successfully")),
    ))
}

pub async fn check_slug(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlugQuery>,
) -> AppResult<impl IntoResponse> {
    let availability =
        with_conn(&state, move |conn| WorkspacesService::check_slug(conn, &query.slug)).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(availability, "Slug availability checked")),
    ))
}

pub async fn get_workspace(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let workspace =
        with_conn(&state, move |conn| WorkspacesService::get_by_slug(conn, &slug)).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(workspace, "Workspace retrieved successfully")),
    ))
}

pub async fn join_workspace(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let notifier = state.notifier.clone();
    let profile = with_conn(&state, move |conn| {
        WorkspacesService::join(conn, &user, &slug, &notifier)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(profile, "Joined workspace successfully")),
    ))
}
