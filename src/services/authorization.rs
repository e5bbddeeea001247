use uuid::Uuid;

use crate::db::enums::UserRole;
use crate::db::models::api::error_codes;
use crate::error::AppError;
use crate::services::context::ONBOARDING_MESSAGE;

/// Who is asking, as far as authorization cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: UserRole,
    pub workspace_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any profile that belongs to the workspace.
    Member { workspace_id: Uuid },
    /// The workspace's admin.
    Admin { workspace_id: Uuid },
    /// The owner of the resource, who must still belong to the workspace.
    Author { workspace_id: Uuid, owner_id: Uuid },
    AuthorOrAdmin { workspace_id: Uuid, owner_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    OnboardingRequired,
    OtherWorkspace,
    AdminRequired,
    NotAuthor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Authorized,
    Forbidden(Denial),
    Unauthenticated,
}

pub fn authorize(caller: Option<&Caller>, requirement: Requirement) -> Decision {
    let Some(caller) = caller else {
        return Decision::Unauthenticated;
    };

    let workspace_id = match requirement {
        Requirement::Member { workspace_id }
        | Requirement::Admin { workspace_id }
        | Requirement::Author { workspace_id, .. }
        | Requirement::AuthorOrAdmin { workspace_id, .. } => workspace_id,
    };

    match caller.workspace_id {
        None => return Decision::Forbidden(Denial::OnboardingRequired),
        Some(own) if own != workspace_id => return Decision::Forbidden(Denial::OtherWorkspace),
        Some(_) => {}
    }

    let is_admin = caller.role == UserRole::Admin;

    let allowed = match requirement {
        Requirement::Member { .. } => Ok(()),
        Requirement::Admin { .. } => is_admin.then_some(()).ok_or(Denial::AdminRequired),
        Requirement::Author { owner_id, .. } => {
            (owner_id == caller.user_id).then_some(()).ok_or(Denial::NotAuthor)
        }
        Requirement::AuthorOrAdmin { owner_id, .. } => (owner_id == caller.user_id || is_admin)
            .then_some(())
            .ok_or(Denial::NotAuthor),
    };

    match allowed {
        Ok(()) => Decision::Authorized,
        Err(denial) => Decision::Forbidden(denial),
    }
}

impl Decision {
    /// `message` is shown for ownership and role denials.
    pub fn into_result(self, message: &str) -> Result<(), AppError> {
        match self {
            Decision::Authorized => Ok(()),
            Decision::Unauthenticated => Err(AppError::unauthenticated()),
            Decision::Forbidden(Denial::OnboardingRequired) => Err(AppError::forbidden_with_code(
                ONBOARDING_MESSAGE,
                error_codes::ONBOARDING_REQUIRED,
            )),
            Decision::Forbidden(Denial::OtherWorkspace) => Err(AppError::forbidden(
                "You do not have access to this workspace",
            )),
            Decision::Forbidden(Denial::AdminRequired) => Err(AppError::forbidden_with_code(
                message,
                error_codes::ADMIN_REQUIRED,
            )),
            Decision::Forbidden(Denial::NotAuthor) => {
                Err(AppError::forbidden_with_code(message, error_codes::NOT_AUTHOR))
            }
        }
    }
}
