use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;
use crate::db::models::changelog::{
    ChangelogQuery, CreateChangelogRequest, UpdateChangelogRequest,
};
use crate::db::models::{ApiResponse, ResponseMeta};
use crate::error::AppResult;
use crate::middleware::{MaybeUser, SessionUser};
use crate::routes::with_conn;
use crate::services::context::RequestContext;
use crate::services::{ChangelogService, WorkspacesService};
use crate::validation::ValidatedJson;

pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(slug): Path<String>,
    Query(query): Query<ChangelogQuery>,
) -> AppResult<impl IntoResponse> {
    let page = with_conn(&state, move |conn| {
        let workspace = WorkspacesService::get_by_slug(conn, &slug)?;
        let viewer = RequestContext::viewer(conn, user.as_ref())?;
        ChangelogService::list(conn, workspace.id, &query, viewer.as_ref())
    })
    .await?;

    let meta = ResponseMeta {
        total_count: Some(page.total_count),
        ..Default::default()
    };
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(
            page,
            "Changelog retrieved successfully",
            meta,
        )),
    ))
}

pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let entries = with_conn(&state, move |conn| {
        let workspace = WorkspacesService::get_by_slug(conn, &slug)?;
        ChangelogService::feed(conn, workspace.id)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(entries, "Changelog feed retrieved successfully")),
    ))
}

pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path((slug, entry_id)): Path<(String, Uuid)>,
) -> AppResult<impl IntoResponse> {
    let entry = with_conn(&state, move |conn| {
        let workspace = WorkspacesService::get_by_slug(conn, &slug)?;
        let viewer = RequestContext::viewer(conn, user.as_ref())?;
        ChangelogService::get(conn, workspace.id, entry_id, viewer.as_ref())
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(entry, "Changelog entry retrieved successfully")),
    ))
}

pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    ValidatedJson(payload): ValidatedJson<CreateChangelogRequest>,
) -> AppResult<impl IntoResponse> {
    let entry = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        ChangelogService::create(conn, &ctx, &payload)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(entry, "Changelog draft created successfully")),
    ))
}

pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(entry_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateChangelogRequest>,
) -> AppResult<impl IntoResponse> {
    let entry = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        ChangelogService::update(conn, &ctx, entry_id, &payload)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(entry, "Changelog entry updated successfully")),
    ))
}

pub async fn publish_entry(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(entry_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let entry = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        ChangelogService::publish(conn, &ctx, entry_id)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(entry, "Changelog entry published")),
    ))
}

pub async fn unpublish_entry(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(entry_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let entry = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        ChangelogService::unpublish(conn, &ctx, entry_id)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(entry, "Changelog entry reverted to draft")),
    ))
}

pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path(entry_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        ChangelogService::delete(conn, &ctx, entry_id)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::<()>::ok("Changelog entry deleted successfully")),
    ))
}

pub async fn link_feedback(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path((entry_id, feedback_id)): Path<(Uuid, Uuid)>,
) -> AppResult<impl IntoResponse> {
    let link = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        ChangelogService::link(conn, &ctx, entry_id, feedback_id)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(link, "Feedback linked successfully")),
    ))
}

pub async fn unlink_feedback(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    Path((entry_id, feedback_id)): Path<(Uuid, Uuid)>,
) -> AppResult<impl IntoResponse> {
    with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        ChangelogService::unlink(conn, &ctx, entry_id, feedback_id)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::<()>::ok("Feedback unlinked successfully")),
    ))
}
