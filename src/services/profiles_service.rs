use diesel::prelude::*;

use crate::db::enums::UserRole;
use crate::db::is_unique_violation;
use crate::db::models::profile::{NewProfile, Profile, UpdateProfileRequest};
use crate::db::models::workspace::CurrentUserResponse;
use crate::db::repositories::{ProfileRepo, WorkspaceRepo};
use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionUser;
use crate::services::context::RequestContext;

pub struct ProfilesService;

impl ProfilesService {
    /// Idempotent: returns the caller's profile, creating a voter profile
    /// without workspace when the row is missing. A concurrent insert of the
    /// same row counts as success.
    #[tracing::instrument(skip_all, fields(user_id = %user.id))]
    pub fn ensure_exists(conn: &mut PgConnection, user: &SessionUser) -> AppResult<Profile> {
        if let Some(profile) = ProfileRepo::find_by_id(conn, user.id)? {
            return Ok(profile);
        }

        let full_name = user.full_name.as_deref().unwrap_or(&user.email);
        let new_profile = NewProfile {
            id: user.id,
            email: &user.email,
            full_name,
            role: UserRole::Voter,
            workspace_id: None,
        };

        match ProfileRepo::insert_if_absent(conn, &new_profile) {
            Ok(1) => tracing::info!("Created missing profile"),
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {}
            Err(e) => return Err(e.into()),
        }

        ProfileRepo::find_by_id(conn, user.id)?
            .ok_or_else(|| AppError::internal("Profile missing right after insert"))
    }

    pub fn get_me(conn: &mut PgConnection, ctx: &RequestContext) -> AppResult<CurrentUserResponse> {
        let profile = ProfileRepo::find_by_id(conn, ctx.user_id)?
            .ok_or_else(|| AppError::not_found("Profile"))?;
        let workspace = match profile.workspace_id {
            Some(id) => WorkspaceRepo::find_by_id(conn, id)?,
            None => None,
        };
        Ok(CurrentUserResponse { profile, workspace })
    }

    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id))]
    pub fn update_me(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        request: &UpdateProfileRequest,
    ) -> AppResult<Profile> {
        Ok(ProfileRepo::update_full_name(
            conn,
            ctx.user_id,
            request.full_name.trim(),
        )?)
    }
}
