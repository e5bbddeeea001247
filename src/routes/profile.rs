use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::AppState;
use crate::db::models::ApiResponse;
use crate::db::models::profile::UpdateProfileRequest;
use crate::error::AppResult;
use crate::middleware::SessionUser;
use crate::routes::with_conn;
use crate::services::ProfilesService;
use crate::services::context::RequestContext;
use crate::validation::ValidatedJson;

pub async fn get_me(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
) -> AppResult<impl IntoResponse> {
    let me = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        ProfilesService::get_me(conn, &ctx)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(me, "Profile retrieved successfully")),
    ))
}

pub async fn update_me(
    State(state): State<Arc<AppState>>,
    user: SessionUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    let profile = with_conn(&state, move |conn| {
        let ctx = RequestContext::load(conn, &user)?;
        ProfilesService::update_me(conn, &ctx, &payload)
    })
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(profile, "Profile updated successfully")),
    ))
}
