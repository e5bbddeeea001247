use super::{connect, tenant};
use urpeer_backend::db::enums::{FeedbackCategory, FeedbackStatus};
use urpeer_backend::db::models::{
    AdminFeedbackQuery, CreateFeedbackRequest, FeedbackFilters, FeedbackSort, UpdateFeedbackRequest,
    error_codes,
};
use urpeer_backend::db::repositories::{CommentRepo, FeedbackRepo, VoteRepo};
use urpeer_backend::error::AppError;
use urpeer_backend::notifications::NotificationKind;
use urpeer_backend::services::context::RequestContext;
use urpeer_backend::services::{
    CommentsService, FeedbackService, StatsService, VotesService,
};
use diesel::PgConnection;
use uuid::Uuid;

fn submit(conn: &mut PgConnection, ctx: &RequestContext, title: &str) -> Uuid {
    FeedbackService::create(
        conn,
        ctx,
        &CreateFeedbackRequest {
            title: title.into(),
            description: "A longer description of the idea".into(),
            category: FeedbackCategory::Feature,
        },
    )
    .unwrap()
    .feedback
    .id
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn vote_toggle_keeps_counter_in_step() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);
    let (_, ada) = acme.voter(&mut conn, "Ada");
    let (_, grace) = acme.voter(&mut conn, "Grace");

    let id = submit(&mut conn, &admin, "Dark mode");

    let first = VotesService::toggle(&mut conn, &ada, id).unwrap();
    assert!(first.has_voted);
    assert_eq!(first.vote_count, 1);

    let second = VotesService::toggle(&mut conn, &grace, id).unwrap();
    assert_eq!(second.vote_count, 2);

    let undo = VotesService::toggle(&mut conn, &ada, id).unwrap();
    assert!(!undo.has_voted);
    assert_eq!(undo.vote_count, 1);

    let stored = FeedbackRepo::find_in_workspace(&mut conn, acme.workspace_id(), id)
        .unwrap()
        .unwrap();
    assert_eq!(
        i64::from(stored.vote_count),
        VoteRepo::count_for_feedback(&mut conn, id).unwrap()
    );

    let seen_by_grace =
        FeedbackService::get(&mut conn, acme.workspace_id(), id, Some(&grace)).unwrap();
    assert!(seen_by_grace.user_has_voted);
    let seen_by_ada = FeedbackService::get(&mut conn, acme.workspace_id(), id, Some(&ada)).unwrap();
    assert!(!seen_by_ada.user_has_voted);
    let anonymous = FeedbackService::get(&mut conn, acme.workspace_id(), id, None).unwrap();
    assert!(!anonymous.user_has_voted);
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn voting_on_another_workspace_is_not_found() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let globex = tenant(&mut conn);
    let acme_admin = acme.admin_ctx(&mut conn);
    let globex_admin = globex.admin_ctx(&mut conn);

    let id = submit(&mut conn, &acme_admin, "Dark mode");
    let err = VotesService::toggle(&mut conn, &globex_admin, id).unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn list_sorts_by_votes() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);
    let (_, ada) = acme.voter(&mut conn, "Ada");

    let quiet = submit(&mut conn, &admin, "Quiet idea");
    let popular = submit(&mut conn, &admin, "Popular idea");
    VotesService::toggle(&mut conn, &ada, popular).unwrap();
    VotesService::toggle(&mut conn, &admin, popular).unwrap();
    VotesService::toggle(&mut conn, &ada, quiet).unwrap();

    let filters = FeedbackFilters {
        sort: FeedbackSort::Votes,
        ..Default::default()
    };
    let listed = FeedbackService::list(&mut conn, acme.workspace_id(), &filters, Some(&ada)).unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|v| v.feedback.id).collect();
    assert_eq!(ids, vec![popular, quiet]);
    assert!(listed.iter().all(|v| v.user_has_voted));
    assert_eq!(listed[0].author_name, "Owner");
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn only_author_or_admin_may_edit() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let (_, ada) = acme.voter(&mut conn, "Ada");
    let (_, grace) = acme.voter(&mut conn, "Grace");
    let admin = acme.admin_ctx(&mut conn);

    let id = submit(&mut conn, &ada, "Dark mode");
    let change = UpdateFeedbackRequest {
        title: Some("Dark theme".into()),
        ..Default::default()
    };

    let err = FeedbackService::update(&mut conn, &grace, id, &change).unwrap_err();
    assert!(matches!(
        err,
        AppError::Forbidden { code: Some(ref c), .. } if c == error_codes::NOT_AUTHOR
    ));

    assert_eq!(
        FeedbackService::update(&mut conn, &ada, id, &change).unwrap().title,
        "Dark theme"
    );
    assert!(FeedbackService::update(&mut conn, &admin, id, &change).is_ok());

    let err = FeedbackService::update(&mut conn, &ada, id, &UpdateFeedbackRequest::default())
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn status_change_notifies_author_once() {
    let mut conn = connect();
    let mut acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);
    let (ada_user, ada) = acme.voter(&mut conn, "Ada");
    acme.drain_outbox();

    let id = submit(&mut conn, &ada, "Dark mode");

    let err = FeedbackService::update_status(
        &mut conn,
        &ada,
        id,
        FeedbackStatus::Planned,
        &acme.notifier,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    let updated = FeedbackService::update_status(
        &mut conn,
        &admin,
        id,
        FeedbackStatus::Planned,
        &acme.notifier,
    )
    .unwrap();
    assert_eq!(updated.status, FeedbackStatus::Planned);

    // Same status again: nothing to announce
    FeedbackService::update_status(&mut conn, &admin, id, FeedbackStatus::Planned, &acme.notifier)
        .unwrap();

    let sent = acme.drain_outbox();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient_id, ada_user.id);
    match &sent[0].payload {
        NotificationKind::StatusChange {
            old_status,
            new_status,
            workspace_slug,
            ..
        } => {
            assert_eq!(*old_status, FeedbackStatus::Open);
            assert_eq!(*new_status, FeedbackStatus::Planned);
            assert_eq!(workspace_slug, acme.slug());
        }
        other => panic!("unexpected notification {:?}", other),
    }
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn comments_count_and_notify_the_author() {
    let mut conn = connect();
    let mut acme = tenant(&mut conn);
    let (ada_user, ada) = acme.voter(&mut conn, "Ada");
    let (_, grace) = acme.voter(&mut conn, "Grace");
    acme.drain_outbox();

    let id = submit(&mut conn, &ada, "Dark mode");

    CommentsService::create(&mut conn, &ada, id, "Adding context", &acme.notifier).unwrap();
    assert!(acme.drain_outbox().is_empty());

    let reply =
        CommentsService::create(&mut conn, &grace, id, "  Me too  ", &acme.notifier).unwrap();
    assert_eq!(reply.comment.content, "Me too");
    assert_eq!(reply.author_name, "Grace");

    let sent = acme.drain_outbox();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient_id, ada_user.id);
    match &sent[0].payload {
        NotificationKind::NewComment {
            feedback_id,
            commenter_name,
            workspace_slug,
            ..
        } => {
            assert_eq!(*feedback_id, id);
            assert_eq!(commenter_name, "Grace");
            assert_eq!(workspace_slug, acme.slug());
        }
        other => panic!("unexpected notification {:?}", other),
    }

    let thread = CommentsService::list(&mut conn, acme.workspace_id(), id).unwrap();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].author_name, "Ada");

    let err = CommentsService::update(&mut conn, &ada, reply.comment.id, "Edited").unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    CommentsService::delete(&mut conn, &grace, reply.comment.id).unwrap();
    let stored = FeedbackRepo::find_in_workspace(&mut conn, acme.workspace_id(), id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.comment_count, 1);
    assert_eq!(
        i64::from(stored.comment_count),
        CommentRepo::count_for_feedback(&mut conn, id).unwrap()
    );
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn delete_removes_votes_and_comments() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let (_, ada) = acme.voter(&mut conn, "Ada");
    let admin = acme.admin_ctx(&mut conn);

    let id = submit(&mut conn, &ada, "Dark mode");
    VotesService::toggle(&mut conn, &admin, id).unwrap();
    CommentsService::create(&mut conn, &admin, id, "Noted", &acme.notifier).unwrap();

    FeedbackService::delete(&mut conn, &admin, id).unwrap();

    assert!(
        FeedbackRepo::find_in_workspace(&mut conn, acme.workspace_id(), id)
            .unwrap()
            .is_none()
    );
    assert_eq!(VoteRepo::count_for_feedback(&mut conn, id).unwrap(), 0);
    assert_eq!(CommentRepo::count_for_feedback(&mut conn, id).unwrap(), 0);
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn admin_search_and_stats() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);
    let (_, ada) = acme.voter(&mut conn, "Ada");

    submit(&mut conn, &ada, "Dark mode");
    let export = submit(&mut conn, &ada, "CSV export");
    VotesService::toggle(&mut conn, &ada, export).unwrap();
    CommentsService::create(&mut conn, &admin, export, "On it", &acme.notifier).unwrap();

    let (page, pagination) = FeedbackService::admin_list(
        &mut conn,
        &admin,
        &AdminFeedbackQuery {
            search: Some("csv".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].feedback.id, export);
    assert_eq!(pagination.total_pages, 1);

    assert!(FeedbackService::admin_list(&mut conn, &ada, &AdminFeedbackQuery::default()).is_err());

    let top = FeedbackService::top_voted(&mut conn, &admin, Some(1)).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].feedback.id, export);

    let stats = StatsService::workspace_stats(&mut conn, &admin).unwrap();
    assert_eq!(stats.total_feedback, 2);
    assert_eq!(stats.total_votes, 1);
    assert_eq!(stats.total_comments, 1);
    assert_eq!(stats.total_members, 2);
    assert_eq!(stats.recent_activity.len(), 3);
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn padded_short_feedback_is_rejected() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let (_, ada) = acme.voter(&mut conn, "Ada");

    let err = FeedbackService::create(
        &mut conn,
        &ada,
        &CreateFeedbackRequest {
            title: "   x   ".into(),
            description: "  short   ".into(),
            category: FeedbackCategory::Bug,
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref details, .. } if details.len() == 2));

    let id = submit(&mut conn, &ada, "Dark mode");
    let err = FeedbackService::update(
        &mut conn,
        &ada,
        id,
        &UpdateFeedbackRequest {
            title: Some("  ab  ".into()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    let listed =
        FeedbackService::list(&mut conn, acme.workspace_id(), &FeedbackFilters::default(), None)
            .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].feedback.title, "Dark mode");
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn thread_keeps_insertion_order() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);
    let (_, ada) = acme.voter(&mut conn, "Ada");
    let (_, grace) = acme.voter(&mut conn, "Grace");
    let id = submit(&mut conn, &ada, "Dark mode");

    // All of these share one surrounding transaction
    let posted: Vec<Uuid> = (0..6)
        .map(|round| {
            let ctx = match round % 3 {
                0 => &ada,
                1 => &grace,
                _ => &admin,
            };
            CommentsService::create(&mut conn, ctx, id, &format!("Reply {}", round), &acme.notifier)
                .unwrap()
                .comment
                .id
        })
        .collect();

    let thread = CommentsService::list(&mut conn, acme.workspace_id(), id).unwrap();
    let listed: Vec<Uuid> = thread.iter().map(|view| view.comment.id).collect();
    assert_eq!(listed, posted);
    assert_eq!(thread[1].author_name, "Grace");
}
