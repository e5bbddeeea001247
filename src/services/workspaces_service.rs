use diesel::prelude::*;

use crate::db::enums::UserRole;
use crate::db::models::api::error_codes;
use crate::db::models::profile::{NewProfile, Profile};
use crate::db::models::workspace::{
    CreateWorkspaceRequest, NewWorkspace, OnboardingResult, SlugAvailability, Workspace,
};
use crate::db::repositories::{ProfileRepo, WorkspaceRepo};
use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionUser;
use crate::notifications::{NotificationDispatcher, NotificationKind};
use crate::services::on_unique_violation;
use crate::services::profiles_service::ProfilesService;
use crate::validation::workspace::{sanitize_slug, validate_slug};

pub struct WorkspacesService;

fn slug_taken() -> AppError {
    AppError::conflict_with_code(
        "This slug is already taken",
        Some("slug".to_string()),
        error_codes::WORKSPACE_SLUG_TAKEN,
    )
}

fn already_joined() -> AppError {
    AppError::conflict_with_code(
        "You already belong to a workspace",
        None,
        error_codes::WORKSPACE_ALREADY_JOINED,
    )
}

impl WorkspacesService {
    /// Creates a workspace and makes the caller its admin.
    #[tracing::instrument(skip_all, fields(user_id = %user.id, slug = %request.slug))]
    pub fn create(
        conn: &mut PgConnection,
        user: &SessionUser,
        request: &CreateWorkspaceRequest,
        notifier: &NotificationDispatcher,
    ) -> AppResult<OnboardingResult> {
        let profile = ProfilesService::ensure_exists(conn, user)?;
        if profile.workspace_id.is_some() {
            return Err(already_joined());
        }

        if WorkspaceRepo::exists_by_slug(conn, &request.slug)? {
            return Err(slug_taken());
        }

        let name = request.name.trim();
        let website = request
            .website
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty());

        let result = conn
            .transaction::<_, AppError, _>(|conn| {
                let locked = ProfileRepo::lock_by_id(conn, user.id)?;
                if locked.as_ref().and_then(|p| p.workspace_id).is_some() {
                    return Err(already_joined());
                }

                let workspace = WorkspaceRepo::insert(
                    conn,
                    &NewWorkspace {
                        name,
                        slug: &request.slug,
                        website,
                        owner_id: user.id,
                    },
                )?;

                let profile = Self::promote_owner(conn, &profile, &workspace)?;
                Ok(OnboardingResult { workspace, profile })
            })
            .map_err(|e| on_unique_violation(e, slug_taken))?;

        tracing::info!(workspace_id = %result.workspace.id, "Workspace created");
        notifier.dispatch(
            user.id,
            NotificationKind::Welcome {
                workspace_name: result.workspace.name.clone(),
                workspace_slug: result.workspace.slug.clone(),
            },
        );

        Ok(result)
    }

    /// Updates the owner's profile in a savepoint, falling back to an upsert
    /// when the update fails or finds no row.
    fn promote_owner(
        conn: &mut PgConnection,
        profile: &Profile,
        workspace: &Workspace,
    ) -> AppResult<Profile> {
        let updated = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            ProfileRepo::promote_to_admin(conn, profile.id, workspace.id)
        });

        match updated {
            Ok(1) => ProfileRepo::find_by_id(conn, profile.id)?
                .ok_or_else(|| AppError::not_found("Profile")),
            outcome => {
                if let Err(e) = outcome {
                    tracing::warn!(error = %e, "Profile promotion failed, upserting instead");
                } else {
                    tracing::warn!("Profile row vanished during promotion, upserting instead");
                }
                Ok(ProfileRepo::upsert_membership(
                    conn,
                    &NewProfile {
                        id: profile.id,
                        email: &profile.email,
                        full_name: &profile.full_name,
                        role: UserRole::Admin,
                        workspace_id: Some(workspace.id),
                    },
                )?)
            }
        }
    }

    pub fn check_slug(conn: &mut PgConnection, raw: &str) -> AppResult<SlugAvailability> {
        let slug = sanitize_slug(raw);
        let available = validate_slug(&slug).is_ok() && !WorkspaceRepo::exists_by_slug(conn, &slug)?;
        Ok(SlugAvailability { slug, available })
    }

    pub fn get_by_slug(conn: &mut PgConnection, slug: &str) -> AppResult<Workspace> {
        WorkspaceRepo::find_by_slug(conn, slug)?.ok_or_else(|| AppError::not_found("Workspace"))
    }

    /// Adds a profile without workspace to `slug` as a voter. Joining the
    /// workspace one already belongs to is a no-op.
    #[tracing::instrument(skip_all, fields(user_id = %user.id, slug = %slug))]
    pub fn join(
        conn: &mut PgConnection,
        user: &SessionUser,
        slug: &str,
        notifier: &NotificationDispatcher,
    ) -> AppResult<Profile> {
        let profile = ProfilesService::ensure_exists(conn, user)?;
        let workspace = Self::get_by_slug(conn, slug)?;

        match profile.workspace_id {
            Some(id) if id == workspace.id => return Ok(profile),
            Some(_) => return Err(already_joined()),
            None => {}
        }

        let joined = ProfileRepo::join_as_voter(conn, user.id, workspace.id)?
            .ok_or_else(already_joined)?;

        tracing::info!(workspace_id = %workspace.id, "Joined workspace");
        notifier.dispatch(
            user.id,
            NotificationKind::Welcome {
                workspace_name: workspace.name,
                workspace_slug: workspace.slug,
            },
        );

        Ok(joined)
    }
}
