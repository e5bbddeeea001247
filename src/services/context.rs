use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::UserRole;
use crate::db::models::profile::Profile;
use crate::db::models::api::error_codes;
use crate::db::repositories::ProfileRepo;
use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionUser;
use crate::services::authorization::{Caller, Requirement, authorize};
use crate::services::profiles_service::ProfilesService;

pub const ONBOARDING_MESSAGE: &str = "Create or join a workspace first";

/// Per-request view of the caller, built after the profile is ensured.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub workspace_id: Option<Uuid>,
}

impl RequestContext {
    pub fn load(conn: &mut PgConnection, user: &SessionUser) -> AppResult<Self> {
        let profile = ProfilesService::ensure_exists(conn, user)?;
        Ok(Self::from_profile(&profile))
    }

    /// Read-only variant for public reads; never creates a profile.
    pub fn viewer(conn: &mut PgConnection, user: Option<&SessionUser>) -> AppResult<Option<Self>> {
        let Some(user) = user else {
            return Ok(None);
        };

        Ok(Some(match ProfileRepo::find_by_id(conn, user.id)? {
            Some(profile) => Self::from_profile(&profile),
            None => Self {
                user_id: user.id,
                email: user.email.clone(),
                full_name: user.full_name.clone().unwrap_or_default(),
                role: UserRole::Voter,
                workspace_id: None,
            },
        }))
    }

    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            user_id: profile.id,
            email: profile.email.clone(),
            full_name: profile.full_name.clone(),
            role: profile.role,
            workspace_id: profile.workspace_id,
        }
    }

    pub fn caller(&self) -> Caller {
        Caller {
            user_id: self.user_id,
            role: self.role,
            workspace_id: self.workspace_id,
        }
    }

    pub fn workspace(&self) -> AppResult<Uuid> {
        self.workspace_id.ok_or_else(|| {
            AppError::forbidden_with_code(ONBOARDING_MESSAGE, error_codes::ONBOARDING_REQUIRED)
        })
    }

    /// The caller's workspace, checked through the guard as a member.
    pub fn member_workspace(&self) -> AppResult<Uuid> {
        let workspace_id = self.workspace()?;
        self.check(Requirement::Member { workspace_id }, ONBOARDING_MESSAGE)?;
        Ok(workspace_id)
    }

    /// The caller's workspace, provided they administer it.
    pub fn admin_workspace(&self, message: &str) -> AppResult<Uuid> {
        let workspace_id = self.workspace()?;
        self.check(Requirement::Admin { workspace_id }, message)?;
        Ok(workspace_id)
    }

    pub fn check(&self, requirement: Requirement, message: &str) -> AppResult<()> {
        authorize(Some(&self.caller()), requirement).into_result(message)
    }

    pub fn display_name(&self) -> &str {
        crate::db::models::profile::display_name(&self.full_name, &self.email)
    }

    pub fn is_admin_of(&self, workspace_id: Uuid) -> bool {
        self.role == UserRole::Admin && self.workspace_id == Some(workspace_id)
    }
}
