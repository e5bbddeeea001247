use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use super::mailer::{Mailer, compose};
use super::{Notification, NotificationKind};
use super::queue::NotificationQueue;
use super::retry::RetryPolicy;
use crate::db::DbPool;
use crate::db::repositories::ProfileRepo;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    pub email: String,
    pub full_name: String,
}

/// Resolves a recipient id to an address at delivery time.
#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    async fn lookup(&self, recipient_id: Uuid) -> AppResult<Option<Recipient>>;

    /// Whether the recipient accepts this kind of email. On unless overridden.
    async fn wants(&self, _recipient_id: Uuid, _kind: &NotificationKind) -> AppResult<bool> {
        Ok(true)
    }
}

pub struct ProfileDirectory {
    pool: DbPool,
}

impl ProfileDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipientDirectory for ProfileDirectory {
    async fn lookup(&self, recipient_id: Uuid) -> AppResult<Option<Recipient>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> AppResult<Option<Recipient>> {
            let mut conn = pool.get()?;
            let profile = ProfileRepo::find_by_id(&mut conn, recipient_id)?;
            Ok(profile.map(|p| Recipient {
                email: p.email,
                full_name: p.full_name,
            }))
        })
        .await
        .map_err(|e| AppError::internal(format!("Recipient lookup task failed: {}", e)))?
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkOutcome {
    Idle,
    Delivered,
    Skipped,
    DeadLettered,
}

pub struct NotificationWorker {
    queue: Arc<dyn NotificationQueue>,
    mailer: Arc<dyn Mailer>,
    directory: Arc<dyn RecipientDirectory>,
    retry: RetryPolicy,
    app_base_url: String,
}

impl NotificationWorker {
    pub fn new(
        queue: Arc<dyn NotificationQueue>,
        mailer: Arc<dyn Mailer>,
        directory: Arc<dyn RecipientDirectory>,
        retry: RetryPolicy,
        app_base_url: impl Into<String>,
    ) -> Self {
        Self {
            queue,
            mailer,
            directory,
            retry,
            app_base_url: app_base_url.into(),
        }
    }

    /// Takes one notification off the queue and sees it through to delivery,
    /// skip, or dead letter.
    pub async fn process_next(&self) -> AppResult<WorkOutcome> {
        let Some(notification) = self.queue.pop().await? else {
            return Ok(WorkOutcome::Idle);
        };

        let span = tracing::info_span!(
            "notification",
            notification_id = %notification.id,
            recipient_id = %notification.recipient_id,
            kind = notification.payload.name()
        );
        self.deliver(notification).instrument(span).await
    }

    async fn deliver(&self, notification: Notification) -> AppResult<WorkOutcome> {
        if !self.mailer.is_enabled() {
            tracing::debug!("Email is disabled, skipping notification");
            return Ok(WorkOutcome::Skipped);
        }

        let recipient = match self.directory.lookup(notification.recipient_id).await {
            Ok(Some(recipient)) => recipient,
            Ok(None) => {
                tracing::warn!("Recipient not found, dropping notification");
                return Ok(WorkOutcome::Skipped);
            }
            Err(e) => {
                tracing::error!(error = %e, "Recipient lookup failed");
                self.queue
                    .dead_letter(&notification, &format!("recipient lookup failed: {}", e))
                    .await?;
                return Ok(WorkOutcome::DeadLettered);
            }
        };

        if notification.payload.respects_preferences() {
            match self
                .directory
                .wants(notification.recipient_id, &notification.payload)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!("Recipient opted out of this notification kind");
                    return Ok(WorkOutcome::Skipped);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Preference lookup failed, delivering anyway");
                }
            }
        }

        let message = compose(&notification, &recipient, &self.app_base_url);

        match self
            .retry
            .run("send_email", || {
                let mailer = self.mailer.clone();
                let message = message.clone();
                async move { mailer.send(&message).await }
            })
            .await
        {
            Ok(()) => {
                tracing::info!("Notification delivered");
                Ok(WorkOutcome::Delivered)
            }
            Err(reason) => {
                tracing::error!(error = %reason, "Notification delivery failed, dead-lettering");
                self.queue.dead_letter(&notification, &reason).await?;
                Ok(WorkOutcome::DeadLettered)
            }
        }
    }

    /// Drains the queue forever, sleeping `poll_interval` whenever it is empty.
    pub async fn run(self, poll_interval: Duration) {
        tracing::info!(poll_interval_ms = poll_interval.as_millis() as u64, "Notification worker started");
        loop {
            match self.process_next().await {
                Ok(WorkOutcome::Idle) => tokio::time::sleep(poll_interval).await,
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = %e, "Notification worker error");
                    tokio::time::sleep(poll_interval).await;
                }
            }
        }
    }
}
