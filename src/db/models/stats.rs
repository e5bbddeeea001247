use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::enums::{FeedbackCategory, FeedbackStatus};

#[derive(Serialize, Debug)]
pub struct WorkspaceStats {
    pub total_feedback: i64,
    pub total_votes: i64,
    pub total_comments: i64,
    pub total_members: i64,
    pub by_status: Vec<StatusCount>,
    pub by_category: Vec<CategoryCount>,
    pub recent_activity: Vec<ActivityItem>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct StatusCount {
    pub status: FeedbackStatus,
    pub count: i64,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct CategoryCount {
    pub category: FeedbackCategory,
    pub count: i64,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Feedback,
    Comment,
}

#[derive(Serialize, Debug, Clone)]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub feedback_id: Uuid,
    pub title: String,
    pub actor_name: String,
    pub created_at: DateTime<Utc>,
}
