use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use diesel::{RunQueryDsl, sql_query};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::AppState;
use crate::db::models::ApiResponse;
use crate::routes::with_conn;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
    pub response_time_ms: u128,
    pub version: &'static str,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let started = Instant::now();
    let ping = with_conn(&state, |conn| {
        sql_query("SELECT 1").execute(conn)?;
        Ok(())
    })
    .await;

    let healthy = match ping {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            false
        }
    };

    let body = HealthStatus {
        status: if healthy { "healthy" } else { "unhealthy" },
        database: if healthy { "connected" } else { "disconnected" },
        response_time_ms: started.elapsed().as_millis(),
        version: env!("CARGO_PKG_VERSION"),
    };

    if healthy {
        (StatusCode::OK, Json(ApiResponse::success(body, "Service is healthy")))
    } else {
        let mut response = ApiResponse::service_unavailable("Service is unhealthy");
        response.data = Some(body);
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
