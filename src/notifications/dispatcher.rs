use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::queue::NotificationQueue;
use super::{Notification, NotificationKind};

/// Request-path handle for notifications. Dispatch never blocks and never
/// fails the caller; delivery happens on the queue side.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::UnboundedSender<Notification>,
}

impl NotificationDispatcher {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn dispatch(&self, recipient_id: Uuid, payload: NotificationKind) {
        let notification = Notification::new(recipient_id, payload);
        let id = notification.id;
        let kind = notification.payload.name();

        match self.sender.send(notification) {
            Ok(()) => tracing::debug!(notification_id = %id, %recipient_id, kind, "Notification dispatched"),
            Err(_) => tracing::error!(
                notification_id = %id,
                %recipient_id,
                kind,
                "Notification channel closed, dropping notification"
            ),
        }
    }
}

/// Moves dispatched notifications onto the durable queue until every
/// dispatcher handle is dropped.
pub fn spawn_pump(
    mut receiver: mpsc::UnboundedReceiver<Notification>,
    queue: Arc<dyn NotificationQueue>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(notification) = receiver.recv().await {
            if let Err(e) = queue.push(&notification).await {
                tracing::error!(
                    notification_id = %notification.id,
                    recipient_id = %notification.recipient_id,
                    error = %e,
                    "Failed to enqueue notification"
                );
            }
        }
        tracing::info!("Notification pump stopped");
    })
}
