use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::enums::UserRole;

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = crate::schema::profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub workspace_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        display_name(&self.full_name, &self.email)
    }

    pub fn is_admin_of(&self, workspace_id: Uuid) -> bool {
        self.role == UserRole::Admin && self.workspace_id == Some(workspace_id)
    }
}

/// Full name when present, email otherwise.
pub fn display_name<'a>(full_name: &'a str, email: &'a str) -> &'a str {
    if full_name.trim().is_empty() {
        email
    } else {
        full_name
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::profiles)]
pub struct NewProfile<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub full_name: &'a str,
    pub role: UserRole,
    pub workspace_id: Option<Uuid>,
}

#[derive(Deserialize, Validate, Debug)]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "crate::validation::profile::validate_full_name"))]
    pub full_name: String,
}
