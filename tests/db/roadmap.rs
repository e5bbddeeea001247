use super::{connect, tenant};
use urpeer_backend::db::enums::{FeedbackCategory, RoadmapStatus};
use urpeer_backend::db::models::{
    CreateFeedbackRequest, CreateRoadmapItemRequest, OrderPlacement, UpdateRoadmapItemRequest,
    error_codes,
};
use urpeer_backend::error::AppError;
use urpeer_backend::services::context::RequestContext;
use urpeer_backend::services::{FeedbackService, RoadmapService, VotesService};
use diesel::PgConnection;
use uuid::Uuid;

fn item(conn: &mut PgConnection, ctx: &RequestContext, title: &str, status: RoadmapStatus) -> Uuid {
    RoadmapService::create(
        conn,
        ctx,
        &CreateRoadmapItemRequest {
            title: title.into(),
            description: None,
            status,
            eta: Some("Q3".into()),
            feedback_id: None,
        },
    )
    .unwrap()
    .item
    .id
}

fn column(conn: &mut PgConnection, workspace_id: Uuid, status: RoadmapStatus) -> Vec<(Uuid, i32)> {
    let mut board = RoadmapService::board(conn, workspace_id).unwrap();
    board
        .column_mut(status)
        .iter()
        .map(|view| (view.item.id, view.item.display_order))
        .collect()
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn new_items_go_to_the_bottom_of_their_column() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);

    let first = item(&mut conn, &admin, "SSO", RoadmapStatus::Planned);
    let second = item(&mut conn, &admin, "Audit log", RoadmapStatus::Planned);
    let shipping = item(&mut conn, &admin, "Webhooks", RoadmapStatus::InProgress);

    assert_eq!(
        column(&mut conn, acme.workspace_id(), RoadmapStatus::Planned),
        vec![(first, 1), (second, 2)]
    );
    assert_eq!(
        column(&mut conn, acme.workspace_id(), RoadmapStatus::InProgress),
        vec![(shipping, 1)]
    );
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn linked_feedback_sets_priority_and_summary() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);
    let (_, ada) = acme.voter(&mut conn, "Ada");

    let feedback = FeedbackService::create(
        &mut conn,
        &ada,
        &CreateFeedbackRequest {
            title: "Dark mode".into(),
            description: "Easier on the eyes at night".into(),
            category: FeedbackCategory::Feature,
        },
    )
    .unwrap()
    .feedback;
    VotesService::toggle(&mut conn, &ada, feedback.id).unwrap();
    VotesService::toggle(&mut conn, &admin, feedback.id).unwrap();

    let view = RoadmapService::create(
        &mut conn,
        &admin,
        &CreateRoadmapItemRequest {
            title: "Dark mode".into(),
            description: Some("Theme switcher".into()),
            status: RoadmapStatus::Planned,
            eta: None,
            feedback_id: Some(feedback.id),
        },
    )
    .unwrap();

    // Two votes plus the fresh-item boost
    assert_eq!(view.item.priority_score, 30);
    let summary = view.feedback.unwrap();
    assert_eq!(summary.id, feedback.id);
    assert_eq!(summary.vote_count, 2);

    let err = RoadmapService::create(
        &mut conn,
        &admin,
        &CreateRoadmapItemRequest {
            title: "Ghost".into(),
            description: None,
            status: RoadmapStatus::Planned,
            eta: None,
            feedback_id: Some(Uuid::new_v4()),
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn voters_cannot_touch_the_roadmap() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);
    let (_, ada) = acme.voter(&mut conn, "Ada");
    let id = item(&mut conn, &admin, "SSO", RoadmapStatus::Planned);

    let err = RoadmapService::update(
        &mut conn,
        &ada,
        id,
        &UpdateRoadmapItemRequest {
            eta: Some("Q4".into()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Forbidden { code: Some(ref c), .. } if c == error_codes::ADMIN_REQUIRED
    ));
    assert!(RoadmapService::delete(&mut conn, &ada, id).is_err());

    // Reads stay public
    assert_eq!(
        RoadmapService::get(&mut conn, acme.workspace_id(), id)
            .unwrap()
            .item
            .eta
            .as_deref(),
        Some("Q3")
    );
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn moving_an_item_shifts_the_target_column() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);

    let a = item(&mut conn, &admin, "Alpha", RoadmapStatus::InProgress);
    let b = item(&mut conn, &admin, "Bravo", RoadmapStatus::InProgress);
    let moving = item(&mut conn, &admin, "Charlie", RoadmapStatus::Planned);

    let moved =
        RoadmapService::update_status(&mut conn, &admin, moving, RoadmapStatus::InProgress, 1)
            .unwrap();
    assert_eq!(moved.status, RoadmapStatus::InProgress);
    assert_eq!(moved.display_order, 1);

    assert_eq!(
        column(&mut conn, acme.workspace_id(), RoadmapStatus::InProgress),
        vec![(moving, 1), (a, 2), (b, 3)]
    );
    assert!(column(&mut conn, acme.workspace_id(), RoadmapStatus::Planned).is_empty());

    let err = RoadmapService::update_status(&mut conn, &admin, a, RoadmapStatus::Completed, -1)
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn reorder_swaps_positions() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);

    let a = item(&mut conn, &admin, "Alpha", RoadmapStatus::Planned);
    let b = item(&mut conn, &admin, "Bravo", RoadmapStatus::Planned);

    let board = RoadmapService::reorder(
        &mut conn,
        &admin,
        &[
            OrderPlacement { id: a, display_order: 2 },
            OrderPlacement { id: b, display_order: 1 },
        ],
    )
    .unwrap();
    let ids: Vec<Uuid> = board.planned.iter().map(|view| view.item.id).collect();
    assert_eq!(ids, vec![b, a]);
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn rejected_reorder_leaves_the_board_alone() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);

    let a = item(&mut conn, &admin, "Alpha", RoadmapStatus::Planned);
    let b = item(&mut conn, &admin, "Bravo", RoadmapStatus::Planned);
    let before = column(&mut conn, acme.workspace_id(), RoadmapStatus::Planned);

    let err = RoadmapService::reorder(
        &mut conn,
        &admin,
        &[OrderPlacement { id: a, display_order: 2 }],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Conflict { code: Some(ref c), .. } if c == error_codes::ROADMAP_ORDER_CONFLICT
    ));

    let err = RoadmapService::reorder(
        &mut conn,
        &admin,
        &[
            OrderPlacement { id: b, display_order: 5 },
            OrderPlacement { id: Uuid::new_v4(), display_order: 1 },
        ],
    )
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    assert_eq!(column(&mut conn, acme.workspace_id(), RoadmapStatus::Planned), before);
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn items_from_another_workspace_are_invisible() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let globex = tenant(&mut conn);
    let acme_admin = acme.admin_ctx(&mut conn);
    let globex_admin = globex.admin_ctx(&mut conn);

    let id = item(&mut conn, &acme_admin, "SSO", RoadmapStatus::Planned);

    assert!(matches!(
        RoadmapService::get(&mut conn, globex.workspace_id(), id).unwrap_err(),
        AppError::NotFound { .. }
    ));
    assert!(matches!(
        RoadmapService::update_status(&mut conn, &globex_admin, id, RoadmapStatus::Completed, 1)
            .unwrap_err(),
        AppError::NotFound { .. }
    ));
}
