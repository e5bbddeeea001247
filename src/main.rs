use axum::{
    Server,
    http::{HeaderValue, Method, header},
    middleware::{from_fn, from_fn_with_state},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use urpeer_backend::{
    AppState, config::Config, db, init_tracing, middleware, notification_worker,
    notifications::{NotificationDispatcher, spawn_pump},
    open_queue, routes,
};

const INLINE_WORKER_POLL: Duration = Duration::from_millis(500);

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let pool = db::build_pool(&config.database())?;
    let queue = open_queue(&config)?;

    let (notifier, receiver) = NotificationDispatcher::channel();
    spawn_pump(receiver, queue.clone());

    if config.notifications().inline_worker {
        let worker = notification_worker(&config, queue, pool.clone());
        tokio::spawn(worker.run(INLINE_WORKER_POLL));
    }

    let server = config.server();
    let addr: SocketAddr = config.server_address().parse()?;
    let state = Arc::new(AppState::new(pool, config, notifier));

    let app = routes::create_router(state.clone())
        .layer(from_fn_with_state(
            state.session.clone(),
            middleware::session_middleware,
        ))
        .layer(cors_layer(&server.cors_origins))
        .layer(from_fn(middleware::logger::logger))
        .layer(from_fn(middleware::request_tracking_middleware));

    tracing::info!(%addr, "Server listening");
    Server::bind(&addr).serve(app.into_make_service()).await?;
    Ok(())
}
