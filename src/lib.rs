pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod notifications;
pub mod routes;
pub mod schema;
pub mod services;
pub mod utils;
pub mod validation;

use crate::config::Config;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::middleware::SessionVerifier;
use crate::notifications::{
    MemoryQueue, NotificationDispatcher, NotificationQueue, NotificationWorker, ProfileDirectory,
    RedisQueue, RetryPolicy, mailer_from_config,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub session: Arc<SessionVerifier>,
    pub notifier: NotificationDispatcher,
}

impl AppState {
    pub fn new(db: DbPool, config: Config, notifier: NotificationDispatcher) -> Self {
        let session = Arc::new(SessionVerifier::new(&config.session()));
        Self {
            db,
            config: Arc::new(config),
            session,
            notifier,
        }
    }
}

/// Redis when `REDIS_URL` is set, otherwise an in-process queue.
pub fn open_queue(config: &Config) -> AppResult<Arc<dyn NotificationQueue>> {
    match config.redis_url.as_deref() {
        Some(url) => Ok(Arc::new(RedisQueue::open(url)?)),
        None => {
            tracing::warn!("REDIS_URL not set, notifications are kept in memory");
            Ok(Arc::new(MemoryQueue::new()))
        }
    }
}

pub fn notification_worker(
    config: &Config,
    queue: Arc<dyn NotificationQueue>,
    db: DbPool,
) -> NotificationWorker {
    let notifications = config.notifications();
    NotificationWorker::new(
        queue,
        mailer_from_config(&notifications),
        Arc::new(ProfileDirectory::new(db)),
        RetryPolicy::from_config(&notifications),
        notifications.app_base_url,
    )
}

pub fn init_tracing(config: &Config) {
    let logging = config.logging();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", logging.level)));

    match logging.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_current_span(true)
                .init();
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}
