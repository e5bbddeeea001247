use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::feedback::FeedbackSummary;
use crate::db::enums::ChangelogCategory;

/// `published` and `published_at` move together: both set or both cleared.
#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = crate::schema::changelog_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChangelogEntry {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: ChangelogCategory,
    pub author_id: Uuid,
    pub workspace_id: Uuid,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::changelog_entries)]
pub struct NewChangelogEntry<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub category: ChangelogCategory,
    pub author_id: Uuid,
    pub workspace_id: Uuid,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::changelog_entries)]
pub struct ChangelogChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<ChangelogCategory>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Clone, Debug)]
#[diesel(table_name = crate::schema::changelog_feedback_links)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChangelogLink {
    pub id: Uuid,
    pub changelog_id: Uuid,
    pub feedback_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::changelog_feedback_links)]
pub struct NewChangelogLink {
    pub changelog_id: Uuid,
    pub feedback_id: Uuid,
}

#[derive(Deserialize, Validate, Debug, Clone)]
pub struct CreateChangelogRequest {
    #[validate(custom(function = "crate::validation::text::validate_title"))]
    pub title: String,
    #[validate(custom(function = "crate::validation::text::validate_changelog_content"))]
    pub content: String,
    pub category: ChangelogCategory,
    #[serde(default)]
    pub feedback_ids: Vec<Uuid>,
}

#[derive(Deserialize, Validate, Debug, Clone, Default)]
pub struct UpdateChangelogRequest {
    #[validate(custom(function = "crate::validation::text::validate_title"))]
    pub title: Option<String>,
    #[validate(custom(function = "crate::validation::text::validate_changelog_content"))]
    pub content: Option<String>,
    pub category: Option<ChangelogCategory>,
}

impl UpdateChangelogRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.category.is_none()
    }
}

#[derive(Deserialize, Debug, Clone, Copy, Default)]
pub struct ChangelogQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub include_unpublished: bool,
}

#[derive(Serialize, Debug, Clone)]
pub struct ChangelogEntryView {
    #[serde(flatten)]
    pub entry: ChangelogEntry,
    pub author_name: String,
    pub linked_feedback: Vec<FeedbackSummary>,
}

#[derive(Serialize, Debug)]
pub struct ChangelogPage {
    pub entries: Vec<ChangelogEntryView>,
    pub total_count: i64,
    pub has_more: bool,
}
