use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::feedback::FeedbackSummary;
use crate::db::enums::RoadmapStatus;

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = crate::schema::roadmap_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoadmapItem {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: RoadmapStatus,
    pub eta: Option<String>,
    pub feedback_id: Option<Uuid>,
    pub workspace_id: Uuid,
    pub display_order: i32,
    pub priority_score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::roadmap_items)]
pub struct NewRoadmapItem<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub status: RoadmapStatus,
    pub eta: Option<&'a str>,
    pub feedback_id: Option<Uuid>,
    pub workspace_id: Uuid,
    pub display_order: i32,
    pub priority_score: i32,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::roadmap_items)]
pub struct RoadmapChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub eta: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Validate, Debug, Clone)]
pub struct CreateRoadmapItemRequest {
    #[validate(custom(function = "crate::validation::text::validate_title"))]
    pub title: String,
    #[validate(length(max = 2000, message = "Description must be less than 2000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub status: RoadmapStatus,
    #[validate(length(max = 100, message = "ETA must be less than 100 characters"))]
    pub eta: Option<String>,
    pub feedback_id: Option<Uuid>,
}

#[derive(Deserialize, Validate, Debug, Clone, Default)]
pub struct UpdateRoadmapItemRequest {
    #[validate(custom(function = "crate::validation::text::validate_title"))]
    pub title: Option<String>,
    #[validate(length(max = 2000, message = "Description must be less than 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 100, message = "ETA must be less than 100 characters"))]
    pub eta: Option<String>,
}

impl UpdateRoadmapItemRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.eta.is_none()
    }
}

#[derive(Deserialize, Validate, Debug, Clone, Copy)]
pub struct UpdateRoadmapStatusRequest {
    pub status: RoadmapStatus,
    #[validate(range(min = 0, message = "Display order must be zero or greater"))]
    pub display_order: i32,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPlacement {
    pub id: Uuid,
    pub display_order: i32,
}

#[derive(Deserialize, Validate, Debug, Clone)]
pub struct ReorderRequest {
    #[validate(length(min = 1, message = "At least one item is required"))]
    pub items: Vec<OrderPlacement>,
}

#[derive(Serialize, Debug, Clone)]
pub struct RoadmapItemView {
    #[serde(flatten)]
    pub item: RoadmapItem,
    pub feedback: Option<FeedbackSummary>,
}

#[derive(Serialize, Debug, Default)]
pub struct RoadmapBoard {
    pub planned: Vec<RoadmapItemView>,
    pub in_progress: Vec<RoadmapItemView>,
    pub completed: Vec<RoadmapItemView>,
}

impl RoadmapBoard {
    pub fn column_mut(&mut self, status: RoadmapStatus) -> &mut Vec<RoadmapItemView> {
        match status {
            RoadmapStatus::Planned => &mut self.planned,
            RoadmapStatus::InProgress => &mut self.in_progress,
            RoadmapStatus::Completed => &mut self.completed,
        }
    }
}
