pub mod dispatcher;
pub mod mailer;
pub mod queue;
pub mod retry;
pub mod worker;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::enums::FeedbackStatus;

pub use dispatcher::{NotificationDispatcher, spawn_pump};
pub use mailer::{EmailMessage, LogMailer, MailError, Mailer, ResendMailer, mailer_from_config};
pub use queue::{MemoryQueue, NotificationQueue, RedisQueue};
pub use retry::RetryPolicy;
pub use worker::{NotificationWorker, ProfileDirectory, Recipient, RecipientDirectory, WorkOutcome};

const COMMENT_PREVIEW_CHARS: usize = 200;

/// A unit of notification work addressed to one profile.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub payload: NotificationKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum NotificationKind {
    Welcome {
        workspace_name: String,
        workspace_slug: String,
    },
    NewComment {
        feedback_id: Uuid,
        feedback_title: String,
        commenter_name: String,
        comment_preview: String,
        workspace_slug: String,
    },
    StatusChange {
        feedback_id: Uuid,
        feedback_title: String,
        old_status: FeedbackStatus,
        new_status: FeedbackStatus,
        workspace_slug: String,
    },
}

impl NotificationKind {
    pub fn name(&self) -> &'static str {
        match self {
            NotificationKind::Welcome { .. } => "welcome",
            NotificationKind::NewComment { .. } => "new_comment",
            NotificationKind::StatusChange { .. } => "status_change",
        }
    }

    /// Activity emails can be turned off per recipient; welcome mail cannot.
    pub fn respects_preferences(&self) -> bool {
        matches!(
            self,
            NotificationKind::NewComment { .. } | NotificationKind::StatusChange { .. }
        )
    }
}

impl Notification {
    pub fn new(recipient_id: Uuid, payload: NotificationKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_id,
            payload,
            created_at: Utc::now(),
        }
    }
}

/// First 200 characters of a comment, with an ellipsis when cut.
pub fn comment_preview(content: &str) -> String {
    if content.chars().count() <= COMMENT_PREVIEW_CHARS {
        return content.to_string();
    }
    let mut preview: String = content.chars().take(COMMENT_PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}
