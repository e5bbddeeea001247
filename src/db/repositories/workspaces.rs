use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::workspace::{NewWorkspace, Workspace};

pub struct WorkspaceRepo;

impl WorkspaceRepo {
    pub fn find_by_id(
        conn: &mut PgConnection,
        workspace_id: Uuid,
    ) -> Result<Option<Workspace>, diesel::result::Error> {
        use crate::schema::workspaces::dsl::*;
        workspaces
            .filter(id.eq(workspace_id))
            .select(Workspace::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_by_slug(
        conn: &mut PgConnection,
        target_slug: &str,
    ) -> Result<Option<Workspace>, diesel::result::Error> {
        use crate::schema::workspaces::dsl::*;
        workspaces
            .filter(slug.eq(target_slug))
            .select(Workspace::as_select())
            .first(conn)
            .optional()
    }

    pub fn exists_by_slug(
        conn: &mut PgConnection,
        target_slug: &str,
    ) -> Result<bool, diesel::result::Error> {
        use crate::schema::workspaces::dsl::*;
        diesel::select(diesel::dsl::exists(workspaces.filter(slug.eq(target_slug))))
            .get_result(conn)
    }

    pub fn insert(
        conn: &mut PgConnection,
        new_workspace: &NewWorkspace,
    ) -> Result<Workspace, diesel::result::Error> {
        diesel::insert_into(crate::schema::workspaces::table)
            .values(new_workspace)
            .returning(Workspace::as_returning())
            .get_result(conn)
    }
}
