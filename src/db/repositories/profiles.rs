use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::enums::UserRole;
use crate::db::models::profile::{NewProfile, Profile, display_name};

pub struct ProfileRepo;

impl ProfileRepo {
    pub fn find_by_id(
        conn: &mut PgConnection,
        profile_id: Uuid,
    ) -> Result<Option<Profile>, diesel::result::Error> {
        use crate::schema::profiles::dsl::*;
        profiles
            .filter(id.eq(profile_id))
            .select(Profile::as_select())
            .first(conn)
            .optional()
    }

    pub fn lock_by_id(
        conn: &mut PgConnection,
        profile_id: Uuid,
    ) -> Result<Option<Profile>, diesel::result::Error> {
        use crate::schema::profiles::dsl::*;
        profiles
            .filter(id.eq(profile_id))
            .select(Profile::as_select())
            .for_update()
            .first(conn)
            .optional()
    }

    /// Returns the number of rows inserted; an existing row is left untouched.
    pub fn insert_if_absent(
        conn: &mut PgConnection,
        new_profile: &NewProfile,
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::profiles::dsl::*;
        diesel::insert_into(profiles)
            .values(new_profile)
            .on_conflict(id)
            .do_nothing()
            .execute(conn)
    }

    pub fn update_full_name(
        conn: &mut PgConnection,
        profile_id: Uuid,
        new_name: &str,
    ) -> Result<Profile, diesel::result::Error> {
        use crate::schema::profiles::dsl::*;
        diesel::update(profiles.filter(id.eq(profile_id)))
            .set((full_name.eq(new_name), updated_at.eq(Utc::now())))
            .returning(Profile::as_returning())
            .get_result(conn)
    }

    pub fn promote_to_admin(
        conn: &mut PgConnection,
        profile_id: Uuid,
        target_workspace_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::profiles::dsl::*;
        diesel::update(profiles.filter(id.eq(profile_id)))
            .set((
                role.eq(UserRole::Admin),
                workspace_id.eq(Some(target_workspace_id)),
                updated_at.eq(Utc::now()),
            ))
            .execute(conn)
    }

    /// Inserts the profile, or overwrites role and workspace of an existing one.
    pub fn upsert_membership(
        conn: &mut PgConnection,
        new_profile: &NewProfile,
    ) -> Result<Profile, diesel::result::Error> {
        use crate::schema::profiles::dsl::*;
        diesel::insert_into(profiles)
            .values(new_profile)
            .on_conflict(id)
            .do_update()
            .set((
                role.eq(excluded(role)),
                workspace_id.eq(excluded(workspace_id)),
                updated_at.eq(Utc::now()),
            ))
            .returning(Profile::as_returning())
            .get_result(conn)
    }

    /// Attaches a profile that has no workspace yet as a voter.
    pub fn join_as_voter(
        conn: &mut PgConnection,
        profile_id: Uuid,
        target_workspace_id: Uuid,
    ) -> Result<Option<Profile>, diesel::result::Error> {
        use crate::schema::profiles::dsl::*;
        diesel::update(
            profiles
                .filter(id.eq(profile_id))
                .filter(workspace_id.is_null()),
        )
        .set((
            role.eq(UserRole::Voter),
            workspace_id.eq(Some(target_workspace_id)),
            updated_at.eq(Utc::now()),
        ))
        .returning(Profile::as_returning())
        .get_result(conn)
        .optional()
    }

    pub fn count_members(
        conn: &mut PgConnection,
        target_workspace_id: Uuid,
    ) -> Result<i64, diesel::result::Error> {
        use crate::schema::profiles::dsl::*;
        profiles
            .filter(workspace_id.eq(target_workspace_id))
            .count()
            .get_result(conn)
    }

    pub fn display_names(
        conn: &mut PgConnection,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, String>, diesel::result::Error> {
        use crate::schema::profiles::dsl::*;
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = profiles
            .filter(id.eq_any(ids))
            .select((id, full_name, email))
            .load::<(Uuid, String, String)>(conn)?;

        Ok(rows
            .into_iter()
            .map(|(pid, name, mail)| (pid, display_name(&name, &mail).to_string()))
            .collect())
    }
}
