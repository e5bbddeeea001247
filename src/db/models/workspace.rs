use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::profile::Profile;

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = crate::schema::workspaces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub website: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::workspaces)]
pub struct NewWorkspace<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub website: Option<&'a str>,
    pub owner_id: Uuid,
}

#[derive(Deserialize, Validate, Debug, Clone)]
pub struct CreateWorkspaceRequest {
    #[validate(custom(function = "crate::validation::workspace::validate_workspace_name"))]
    pub name: String,
    #[validate(custom(function = "crate::validation::workspace::validate_slug"))]
    pub slug: String,
    #[validate(custom(function = "crate::validation::workspace::validate_website"))]
    pub website: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SlugQuery {
    pub slug: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct SlugAvailability {
    pub slug: String,
    pub available: bool,
}

#[derive(Serialize, Debug)]
pub struct CurrentUserResponse {
    pub profile: Profile,
    pub workspace: Option<Workspace>,
}

#[derive(Serialize, Debug)]
pub struct OnboardingResult {
    pub workspace: Workspace,
    pub profile: Profile,
}
