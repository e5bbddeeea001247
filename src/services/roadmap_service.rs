use chrono::Utc;
use diesel::prelude::*;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::db::enums::RoadmapStatus;
use crate::db::models::api::error_codes;
use crate::db::models::roadmap::{
    CreateRoadmapItemRequest, NewRoadmapItem, OrderPlacement, RoadmapBoard, RoadmapChanges,
    RoadmapItem, RoadmapItemView, UpdateRoadmapItemRequest,
};
use crate::db::repositories::{FeedbackRepo, RoadmapRepo};
use crate::error::{AppError, AppResult};
use crate::services::context::RequestContext;
use crate::services::on_unique_violation;
use crate::utils::priority_score;
use crate::validation::ensure_valid;

const ADMIN_ONLY: &str = "Only admins can manage the roadmap";

fn order_conflict() -> AppError {
    AppError::conflict_with_code(
        "Two roadmap items would share the same position",
        None,
        error_codes::ROADMAP_ORDER_CONFLICT,
    )
}

/// Checks a reorder batch against the current board and returns the
/// placements that actually change. Nothing is written when this fails.
pub fn plan_reorder(
    current: &[RoadmapItem],
    requested: &[OrderPlacement],
) -> AppResult<Vec<OrderPlacement>> {
    let mut seen = HashSet::with_capacity(requested.len());
    for placement in requested {
        if placement.display_order < 0 {
            return Err(AppError::field_validation(
                "display_order",
                "Display order must be zero or greater",
            ));
        }
        if !seen.insert(placement.id) {
            return Err(AppError::field_validation(
                "items",
                "Each item may only appear once",
            ));
        }
    }

    let mut slots: HashMap<Uuid, (RoadmapStatus, i32)> = current
        .iter()
        .map(|item| (item.id, (item.status, item.display_order)))
        .collect();

    let mut changed = Vec::new();
    for placement in requested {
        let slot = slots
            .get_mut(&placement.id)
            .ok_or_else(|| AppError::not_found("Roadmap item"))?;
        if slot.1 != placement.display_order {
            slot.1 = placement.display_order;
            changed.push(*placement);
        }
    }

    let mut taken = HashSet::with_capacity(slots.len());
    if !slots.values().all(|slot| taken.insert(*slot)) {
        return Err(order_conflict());
    }

    Ok(changed)
}

pub struct RoadmapService;

impl RoadmapService {
    pub fn board(conn: &mut PgConnection, workspace_id: Uuid) -> AppResult<RoadmapBoard> {
        let items = RoadmapRepo::list_for_workspace(conn, workspace_id)?;
        let mut board = RoadmapBoard::default();
        for view in Self::views(conn, items)? {
            board.column_mut(view.item.status).push(view);
        }
        for column in [
            &mut board.planned,
            &mut board.in_progress,
            &mut board.completed,
        ] {
            column.sort_by_key(|v| (v.item.display_order, v.item.created_at));
        }
        Ok(board)
    }

    pub fn get(
        conn: &mut PgConnection,
        workspace_id: Uuid,
        item_id: Uuid,
    ) -> AppResult<RoadmapItemView> {
        let item = Self::find(conn, workspace_id, item_id)?;
        Self::views(conn, vec![item])?
            .pop()
            .ok_or_else(|| AppError::not_found("Roadmap item"))
    }

    /// Appends the item to the bottom of its column.
    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id))]
    pub fn create(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        request: &CreateRoadmapItemRequest,
    ) -> AppResult<RoadmapItemView> {
        ensure_valid(request)?;
        let workspace_id = ctx.admin_workspace(ADMIN_ONLY)?;

        let score = match request.feedback_id {
            Some(feedback_id) => {
                let feedback = FeedbackRepo::find_in_workspace(conn, workspace_id, feedback_id)?
                    .ok_or_else(|| AppError::not_found("Feedback"))?;
                priority_score(feedback.vote_count, feedback.created_at, Utc::now())
            }
            None => 0,
        };

        let item = conn
            .transaction::<_, AppError, _>(|conn| {
                RoadmapRepo::lock_all_in_workspace(conn, workspace_id)?;
                let display_order = RoadmapRepo::max_order(conn, workspace_id, request.status)?
                    .map_or(1, |max| max + 1);

                Ok(RoadmapRepo::insert(
                    conn,
                    &NewRoadmapItem {
                        title: request.title.trim(),
                        description: request.description.as_deref().map(str::trim),
                        status: request.status,
                        eta: request.eta.as_deref().map(str::trim),
                        feedback_id: request.feedback_id,
                        workspace_id,
                        display_order,
                        priority_score: score,
                    },
                )?)
            })
            .map_err(|e| on_unique_violation(e, order_conflict))?;

        tracing::info!(item_id = %item.id, priority_score = score, "Roadmap item created");
        Self::views(conn, vec![item])?
            .pop()
            .ok_or_else(|| AppError::not_found("Roadmap item"))
    }

    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, item_id = %item_id))]
    pub fn update(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        item_id: Uuid,
        request: &UpdateRoadmapItemRequest,
    ) -> AppResult<RoadmapItem> {
        if request.is_empty() {
            return Err(AppError::validation("At least one field must be provided"));
        }
        ensure_valid(request)?;
        let workspace_id = ctx.admin_workspace(ADMIN_ONLY)?;
        Self::find(conn, workspace_id, item_id)?;

        let changes = RoadmapChanges {
            title: request.title.as_deref().map(|t| t.trim().to_string()),
            description: request.description.as_deref().map(|d| d.trim().to_string()),
            eta: request.eta.as_deref().map(|e| e.trim().to_string()),
            updated_at: Some(Utc::now()),
        };
        Ok(RoadmapRepo::update_fields(conn, item_id, &changes)?)
    }

    /// Moves the item into `status` at `display_order`, pushing the items
    /// at or after that slot down by one.
    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, item_id = %item_id, status = %status))]
    pub fn update_status(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        item_id: Uuid,
        status: RoadmapStatus,
        display_order: i32,
    ) -> AppResult<RoadmapItem> {
        if display_order < 0 {
            return Err(AppError::field_validation(
                "display_order",
                "Display order must be zero or greater",
            ));
        }
        let workspace_id = ctx.admin_workspace(ADMIN_ONLY)?;

        conn.transaction::<_, AppError, _>(|conn| {
            let items = RoadmapRepo::lock_all_in_workspace(conn, workspace_id)?;
            let current = items
                .iter()
                .find(|item| item.id == item_id)
                .ok_or_else(|| AppError::not_found("Roadmap item"))?;

            if current.status == status && current.display_order == display_order {
                return Ok(current.clone());
            }

            RoadmapRepo::shift_column_down(conn, workspace_id, status, display_order, item_id)?;
            Ok(RoadmapRepo::place(conn, item_id, status, display_order)?)
        })
        .map_err(|e| on_unique_violation(e, order_conflict))
    }

    /// Applies a batch of position changes within columns; statuses stay put.
    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, items = placements.len()))]
    pub fn reorder(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        placements: &[OrderPlacement],
    ) -> AppResult<RoadmapBoard> {
        let workspace_id = ctx.admin_workspace(ADMIN_ONLY)?;

        conn.transaction::<_, AppError, _>(|conn| {
            let current = RoadmapRepo::lock_all_in_workspace(conn, workspace_id)?;
            let changed = plan_reorder(&current, placements)?;
            for placement in &changed {
                RoadmapRepo::set_order(conn, placement.id, placement.display_order)?;
            }
            tracing::info!(changed = changed.len(), "Roadmap reordered");
            Ok(())
        })
        .map_err(|e| on_unique_violation(e, order_conflict))?;

        Self::board(conn, workspace_id)
    }

    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, item_id = %item_id))]
    pub fn delete(conn: &mut PgConnection, ctx: &RequestContext, item_id: Uuid) -> AppResult<()> {
        let workspace_id = ctx.admin_workspace(ADMIN_ONLY)?;
        Self::find(conn, workspace_id, item_id)?;
        RoadmapRepo::delete(conn, item_id)?;
        tracing::info!("Roadmap item deleted");
        Ok(())
    }

    fn find(conn: &mut PgConnection, workspace_id: Uuid, item_id: Uuid) -> AppResult<RoadmapItem> {
        RoadmapRepo::find_in_workspace(conn, workspace_id, item_id)?
            .ok_or_else(|| AppError::not_found("Roadmap item"))
    }

    fn views(conn: &mut PgConnection, items: Vec<RoadmapItem>) -> AppResult<Vec<RoadmapItemView>> {
        let linked: Vec<Uuid> = items.iter().filter_map(|i| i.feedback_id).collect();
        let summaries: HashMap<Uuid, _> = FeedbackRepo::summaries(conn, &linked)?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(items
            .into_iter()
            .map(|item| RoadmapItemView {
                feedback: item.feedback_id.and_then(|id| summaries.get(&id).cloned()),
                item,
            })
            .collect())
    }
}
