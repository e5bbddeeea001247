use async_trait::async_trait;
use std::sync::Arc;
use urpeer_backend::error::AppResult;
use urpeer_backend::notifications::{
    LogMailer, MemoryQueue, Notification, NotificationDispatcher, NotificationKind, NotificationQueue,
    NotificationWorker, Recipient, RecipientDirectory, RetryPolicy, WorkOutcome, spawn_pump,
};
use uuid::Uuid;

struct NobodyHome;

#[async_trait]
impl RecipientDirectory for NobodyHome {
    async fn lookup(&self, _recipient_id: Uuid) -> AppResult<Option<Recipient>> {
        Ok(None)
    }
}

#[tokio::test]
async fn dispatched_notifications_reach_the_queue() {
    let queue = Arc::new(MemoryQueue::new());
    let (notifier, receiver) = NotificationDispatcher::channel();
    let pump = spawn_pump(receiver, queue.clone());

    notifier.dispatch(
        Uuid::new_v4(),
        NotificationKind::Welcome {
            workspace_name: "Acme".into(),
            workspace_slug: "acme".into(),
        },
    );
    drop(notifier);
    pump.await.unwrap();

    assert_eq!(queue.len().await, 1);
}

#[tokio::test]
async fn disabled_email_skips_delivery() {
    let queue = Arc::new(MemoryQueue::new());
    let (notifier, receiver) = NotificationDispatcher::channel();
    let pump = spawn_pump(receiver, queue.clone());
    notifier.dispatch(
        Uuid::new_v4(),
        NotificationKind::Welcome {
            workspace_name: "Acme".into(),
            workspace_slug: "acme".into(),
        },
    );
    drop(notifier);
    pump.await.unwrap();

    let worker = NotificationWorker::new(
        queue.clone() as Arc<dyn NotificationQueue>,
        Arc::new(LogMailer),
        Arc::new(NobodyHome),
        RetryPolicy::default(),
        "http://localhost:3000",
    );

    assert_eq!(worker.process_next().await.unwrap(), WorkOutcome::Skipped);
    assert_eq!(worker.process_next().await.unwrap(), WorkOutcome::Idle);
    assert!(queue.dead_letters().await.is_empty());
}

#[test]
fn memory_queue_is_first_in_first_out() {
    let queue = MemoryQueue::new();
    let first = Notification::new(
        Uuid::new_v4(),
        NotificationKind::Welcome {
            workspace_name: "Acme".into(),
            workspace_slug: "acme".into(),
        },
    );
    let second = Notification::new(
        Uuid::new_v4(),
        NotificationKind::Welcome {
            workspace_name: "Globex".into(),
            workspace_slug: "globex".into(),
        },
    );

    tokio_test::block_on(async {
        queue.push(&first).await.unwrap();
        queue.push(&second).await.unwrap();
        assert_eq!(queue.pop().await.unwrap().map(|n| n.id), Some(first.id));
        assert_eq!(queue.pop().await.unwrap().map(|n| n.id), Some(second.id));
        assert!(queue.pop().await.unwrap().is_none());
    });
}
