use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::RoadmapStatus;
use crate::db::models::roadmap::{NewRoadmapItem, RoadmapChanges, RoadmapItem};
use crate::schema::roadmap_items;

pub struct RoadmapRepo;

impl RoadmapRepo {
    pub fn find_in_workspace(
        conn: &mut PgConnection,
        workspace_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<RoadmapItem>, diesel::result::Error> {
        roadmap_items::table
            .filter(roadmap_items::id.eq(item_id))
            .filter(roadmap_items::workspace_id.eq(workspace_id))
            .select(RoadmapItem::as_select())
            .first(conn)
            .optional()
    }

    /// Every item of the workspace, locked for the rest of the transaction.
    pub fn lock_all_in_workspace(
        conn: &mut PgConnection,
        workspace_id: Uuid,
    ) -> Result<Vec<RoadmapItem>, diesel::result::Error> {
        roadmap_items::table
            .filter(roadmap_items::workspace_id.eq(workspace_id))
            .select(RoadmapItem::as_select())
            .for_update()
            .load(conn)
    }

    pub fn list_for_workspace(
        conn: &mut PgConnection,
        workspace_id: Uuid,
    ) -> Result<Vec<RoadmapItem>, diesel::result::Error> {
        roadmap_items::table
            .filter(roadmap_items::workspace_id.eq(workspace_id))
            .order((
                roadmap_items::status.asc(),
                roadmap_items::display_order.asc(),
                roadmap_items::created_at.asc(),
            ))
            .select(RoadmapItem::as_select())
            .load(conn)
    }

    pub fn max_order(
        conn: &mut PgConnection,
        workspace_id: Uuid,
        column: RoadmapStatus,
    ) -> Result<Option<i32>, diesel::result::Error> {
        roadmap_items::table
            .filter(roadmap_items::workspace_id.eq(workspace_id))
            .filter(roadmap_items::status.eq(column))
            .select(diesel::dsl::max(roadmap_items::display_order))
            .first(conn)
    }

    pub fn insert(
        conn: &mut PgConnection,
        new_item: &NewRoadmapItem,
    ) -> Result<RoadmapItem, diesel::result::Error> {
        diesel::insert_into(roadmap_items::table)
            .values(new_item)
            .returning(RoadmapItem::as_returning())
            .get_result(conn)
    }

    pub fn update_fields(
        conn: &mut PgConnection,
        item_id: Uuid,
        changes: &RoadmapChanges,
    ) -> Result<RoadmapItem, diesel::result::Error> {
        diesel::update(roadmap_items::table.filter(roadmap_items::id.eq(item_id)))
            .set(changes)
            .returning(RoadmapItem::as_returning())
            .get_result(conn)
    }

    /// Pushes every other item at or below `from_order` in the column down by one.
    pub fn shift_column_down(
        conn: &mut PgConnection,
        workspace_id: Uuid,
        column: RoadmapStatus,
        from_order: i32,
        moving_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::update(
            roadmap_items::table
                .filter(roadmap_items::workspace_id.eq(workspace_id))
                .filter(roadmap_items::status.eq(column))
                .filter(roadmap_items::display_order.ge(from_order))
                .filter(roadmap_items::id.ne(moving_id)),
        )
        .set(roadmap_items::display_order.eq(roadmap_items::display_order + 1))
        .execute(conn)
    }

    pub fn place(
        conn: &mut PgConnection,
        item_id: Uuid,
        column: RoadmapStatus,
        order: i32,
    ) -> Result<RoadmapItem, diesel::result::Error> {
        diesel::update(roadmap_items::table.filter(roadmap_items::id.eq(item_id)))
            .set((
                roadmap_items::status.eq(column),
                roadmap_items::display_order.eq(order),
                roadmap_items::updated_at.eq(Utc::now()),
            ))
            .returning(RoadmapItem::as_returning())
            .get_result(conn)
    }

    pub fn set_order(
        conn: &mut PgConnection,
        item_id: Uuid,
        order: i32,
    ) -> Result<usize, diesel::result::Error> {
        diesel::update(roadmap_items::table.filter(roadmap_items::id.eq(item_id)))
            .set((
                roadmap_items::display_order.eq(order),
                roadmap_items::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
    }

    pub fn delete(conn: &mut PgConnection, item_id: Uuid) -> Result<usize, diesel::result::Error> {
        diesel::delete(roadmap_items::table.filter(roadmap_items::id.eq(item_id))).execute(conn)
    }

    pub fn unlink_feedback(
        conn: &mut PgConnection,
        feedback_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::update(roadmap_items::table.filter(roadmap_items::feedback_id.eq(feedback_id)))
            .set(roadmap_items::feedback_id.eq(None::<Uuid>))
            .execute(conn)
    }
}
