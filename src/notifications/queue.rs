use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::Mutex;

use super::Notification;
use crate::error::{AppError, AppResult};

pub const PENDING_KEY: &str = "notifications:pending";
pub const DEAD_LETTER_KEY: &str = "notifications:dead";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DeadLetter {
    pub notification: Notification,
    pub reason: String,
    pub failed_at: DateTime<Utc>,
}

/// FIFO of pending notifications plus a dead-letter sink.
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    async fn push(&self, notification: &Notification) -> AppResult<()>;
    async fn pop(&self) -> AppResult<Option<Notification>>;
    async fn dead_letter(&self, notification: &Notification, reason: &str) -> AppResult<()>;
}

pub struct RedisQueue {
    client: redis::Client,
}

impl RedisQueue {
    pub fn open(url: &str) -> AppResult<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

fn encode<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string(value)
        .map_err(|e| AppError::internal(format!("Failed to encode notification: {}", e)))
}

#[async_trait]
impl NotificationQueue for RedisQueue {
    async fn push(&self, notification: &Notification) -> AppResult<()> {
        let payload = encode(notification)?;
        let mut conn = self.connection().await?;
        conn.rpush::<_, _, ()>(PENDING_KEY, payload).await?;
        Ok(())
    }

    async fn pop(&self) -> AppResult<Option<Notification>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.lpop(PENDING_KEY, None).await?;

        match raw {
            None => Ok(None),
            Some(raw) => match serde_json::from_str::<Notification>(&raw) {
                Ok(notification) => Ok(Some(notification)),
                Err(e) => {
                    tracing::error!(error = %e, "Discarding malformed notification payload");
                    conn.rpush::<_, _, ()>(DEAD_LETTER_KEY, raw).await?;
                    Ok(None)
                }
            },
        }
    }

    async fn dead_letter(&self, notification: &Notification, reason: &str) -> AppResult<()> {
        let payload = encode(&DeadLetter {
            notification: notification.clone(),
            reason: reason.to_string(),
            failed_at: Utc::now(),
        })?;
        let mut conn = self.connection().await?;
        conn.rpush::<_, _, ()>(DEAD_LETTER_KEY, payload).await?;
        Ok(())
    }
}

/// Process-local queue used when no Redis URL is configured, and in tests.
#[derive(Default)]
pub struct MemoryQueue {
    pending: Mutex<VecDeque<Notification>>,
    dead: Mutex<Vec<DeadLetter>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.pending.lock().await.len()
    }

    pub async fn dead_letters(&self) -> Vec<DeadLetter> {
        self.dead.lock().await.clone()
    }
}

#[async_trait]
impl NotificationQueue for MemoryQueue {
    async fn push(&self, notification: &Notification) -> AppResult<()> {
        self.pending.lock().await.push_back(notification.clone());
        Ok(())
    }

    async fn pop(&self) -> AppResult<Option<Notification>> {
        Ok(self.pending.lock().await.pop_front())
    }

    async fn dead_letter(&self, notification: &Notification, reason: &str) -> AppResult<()> {
        self.dead.lock().await.push(DeadLetter {
            notification: notification.clone(),
            reason: reason.to_string(),
            failed_at: Utc::now(),
        });
        Ok(())
    }
}
