use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::enums::{FeedbackCategory, FeedbackStatus};

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = crate::schema::feedback)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Feedback {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: FeedbackCategory,
    pub status: FeedbackStatus,
    pub author_id: Uuid,
    pub workspace_id: Uuid,
    pub vote_count: i32,
    pub comment_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::feedback)]
pub struct NewFeedback<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: FeedbackCategory,
    pub status: FeedbackStatus,
    pub author_id: Uuid,
    pub workspace_id: Uuid,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::feedback)]
pub struct FeedbackChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<FeedbackCategory>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Validate, Debug, Clone)]
pub struct CreateFeedbackRequest {
    #[validate(custom(function = "crate::validation::text::validate_title"))]
    pub title: String,
    #[validate(custom(function = "crate::validation::text::validate_feedback_description"))]
    pub description: String,
    pub category: FeedbackCategory,
}

#[derive(Deserialize, Validate, Debug, Clone, Default)]
pub struct UpdateFeedbackRequest {
    #[validate(custom(function = "crate::validation::text::validate_title"))]
    pub title: Option<String>,
    #[validate(custom(function = "crate::validation::text::validate_feedback_description"))]
    pub description: Option<String>,
    pub category: Option<FeedbackCategory>,
}

impl UpdateFeedbackRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.category.is_none()
    }
}

#[derive(Deserialize, Validate, Debug, Clone, Copy)]
pub struct UpdateFeedbackStatusRequest {
    pub status: FeedbackStatus,
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSort {
    Votes,
    #[default]
    Recent,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct FeedbackFilters {
    pub status: Option<FeedbackStatus>,
    pub category: Option<FeedbackCategory>,
    #[serde(default)]
    pub sort: FeedbackSort,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AdminFeedbackQuery {
    pub status: Option<FeedbackStatus>,
    pub category: Option<FeedbackCategory>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Deserialize, Debug, Clone, Copy, Default)]
pub struct TopVotedQuery {
    pub limit: Option<i64>,
}

/// Feedback as shown to a viewer.
#[derive(Serialize, Debug, Clone)]
pub struct FeedbackView {
    #[serde(flatten)]
    pub feedback: Feedback,
    pub author_name: String,
    pub user_has_voted: bool,
}

#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct FeedbackSummary {
    pub id: Uuid,
    pub title: String,
    pub vote_count: i32,
    pub category: FeedbackCategory,
}

#[derive(Serialize, Debug)]
pub struct FeedbackPage {
    pub items: Vec<FeedbackView>,
    pub total_count: i64,
}
