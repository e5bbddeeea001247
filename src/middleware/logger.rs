use axum::{http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

const SLOW_REQUEST_MS: u128 = 1000;

/// One access-log line per request.
pub async fn logger<B>(req: Request<B>, next: Next<B>) -> Response {
    let method = req.method().clone();
    let uri = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status().as_u16();
    let elapsed_ms = start.elapsed().as_millis();

    if elapsed_ms > SLOW_REQUEST_MS {
        warn!(method = %method, uri = %uri, status, elapsed_ms = elapsed_ms as u64, "Slow request");
    } else if response.status().is_server_error() {
        warn!(method = %method, uri = %uri, status, elapsed_ms = elapsed_ms as u64, "Request failed");
    } else {
        info!(method = %method, uri = %uri, status, elapsed_ms = elapsed_ms as u64, "Request");
    }

    response
}
