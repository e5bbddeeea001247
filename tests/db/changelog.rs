use super::{connect, tenant};
use urpeer_backend::db::enums::{ChangelogCategory, FeedbackCategory};
use urpeer_backend::db::models::{
    ChangelogQuery, CreateChangelogRequest, CreateFeedbackRequest, UpdateChangelogRequest,
    error_codes,
};
use urpeer_backend::error::AppError;
use urpeer_backend::services::context::RequestContext;
use urpeer_backend::services::{ChangelogService, FeedbackService};
use diesel::PgConnection;
use uuid::Uuid;

fn feedback(conn: &mut PgConnection, ctx: &RequestContext, title: &str) -> Uuid {
    FeedbackService::create(
        conn,
        ctx,
        &CreateFeedbackRequest {
            title: title.into(),
            description: "Requested by several customers".into(),
            category: FeedbackCategory::Improvement,
        },
    )
    .unwrap()
    .feedback
    .id
}

fn draft(conn: &mut PgConnection, ctx: &RequestContext, title: &str, links: Vec<Uuid>) -> Uuid {
    ChangelogService::create(
        conn,
        ctx,
        &CreateChangelogRequest {
            title: title.into(),
            content: "We shipped something new this week.".into(),
            category: ChangelogCategory::Feature,
            feedback_ids: links,
        },
    )
    .unwrap()
    .entry
    .id
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn drafts_stay_hidden_until_published() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);
    let (_, ada) = acme.voter(&mut conn, "Ada");
    let ws = acme.workspace_id();

    let id = draft(&mut conn, &admin, "Dark mode is here", Vec::new());

    let everything = ChangelogQuery {
        include_unpublished: true,
        ..Default::default()
    };
    assert_eq!(ChangelogService::list(&mut conn, ws, &everything, Some(&admin)).unwrap().total_count, 1);
    assert_eq!(ChangelogService::list(&mut conn, ws, &everything, Some(&ada)).unwrap().total_count, 0);
    assert_eq!(ChangelogService::list(&mut conn, ws, &everything, None).unwrap().total_count, 0);
    assert!(matches!(
        ChangelogService::get(&mut conn, ws, id, Some(&ada)).unwrap_err(),
        AppError::NotFound { .. }
    ));
    assert!(ChangelogService::feed(&mut conn, ws).unwrap().is_empty());

    let published = ChangelogService::publish(&mut conn, &admin, id).unwrap();
    assert!(published.published);
    let first_date = published.published_at;
    assert!(first_date.is_some());

    // Publishing twice keeps the original date
    let again = ChangelogService::publish(&mut conn, &admin, id).unwrap();
    assert_eq!(again.published_at, first_date);

    let page = ChangelogService::list(&mut conn, ws, &ChangelogQuery::default(), None).unwrap();
    assert_eq!(page.total_count, 1);
    assert!(!page.has_more);
    assert_eq!(page.entries[0].author_name, "Owner");
    assert_eq!(ChangelogService::feed(&mut conn, ws).unwrap().len(), 1);
    assert!(ChangelogService::get(&mut conn, ws, id, None).is_ok());

    let hidden = ChangelogService::unpublish(&mut conn, &admin, id).unwrap();
    assert!(!hidden.published);
    assert!(hidden.published_at.is_none());
    assert!(ChangelogService::get(&mut conn, ws, id, None).is_err());
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn pages_report_whether_more_remain() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);
    let ws = acme.workspace_id();

    for title in ["Release one", "Release two", "Release three"] {
        let id = draft(&mut conn, &admin, title, Vec::new());
        ChangelogService::publish(&mut conn, &admin, id).unwrap();
    }

    let first = ChangelogQuery {
        page: Some(1),
        limit: Some(2),
        include_unpublished: false,
    };
    let page = ChangelogService::list(&mut conn, ws, &first, None).unwrap();
    assert_eq!(page.entries.len(), 2);
    assert_eq!(page.total_count, 3);
    assert!(page.has_more);

    let second = ChangelogQuery {
        page: Some(2),
        ..first
    };
    let page = ChangelogService::list(&mut conn, ws, &second, None).unwrap();
    assert_eq!(page.entries.len(), 1);
    assert!(!page.has_more);
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn create_links_feedback_and_rejects_strangers() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let globex = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);
    let globex_admin = globex.admin_ctx(&mut conn);

    let ours = feedback(&mut conn, &admin, "Faster search");
    let theirs = feedback(&mut conn, &globex_admin, "Bulk import");

    let view = ChangelogService::create(
        &mut conn,
        &admin,
        &CreateChangelogRequest {
            title: "Search got faster".into(),
            content: "Results now load in under a second.".into(),
            category: ChangelogCategory::Improvement,
            feedback_ids: vec![ours, ours],
        },
    )
    .unwrap();
    assert!(!view.entry.published);
    assert_eq!(view.linked_feedback.len(), 1);
    assert_eq!(view.linked_feedback[0].id, ours);

    let err = ChangelogService::create(
        &mut conn,
        &admin,
        &CreateChangelogRequest {
            title: "Imports".into(),
            content: "Bulk import is now available.".into(),
            category: ChangelogCategory::Feature,
            feedback_ids: vec![theirs],
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    let (_, ada) = acme.voter(&mut conn, "Ada");
    let err = ChangelogService::update(
        &mut conn,
        &ada,
        view.entry.id,
        &UpdateChangelogRequest {
            title: Some("Hijacked".into()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn link_and_unlink() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);
    let ws = acme.workspace_id();

    let target = feedback(&mut conn, &admin, "Faster search");
    let id = draft(&mut conn, &admin, "Search got faster", Vec::new());

    let link = ChangelogService::link(&mut conn, &admin, id, target).unwrap();
    assert_eq!(link.changelog_id, id);
    let view = ChangelogService::get(&mut conn, ws, id, Some(&admin)).unwrap();
    assert_eq!(view.linked_feedback.len(), 1);

    ChangelogService::unlink(&mut conn, &admin, id, target).unwrap();
    assert!(matches!(
        ChangelogService::unlink(&mut conn, &admin, id, target).unwrap_err(),
        AppError::NotFound { .. }
    ));

    // Deleting feedback drops its links
    ChangelogService::link(&mut conn, &admin, id, target).unwrap();
    FeedbackService::delete(&mut conn, &admin, target).unwrap();
    let view = ChangelogService::get(&mut conn, ws, id, Some(&admin)).unwrap();
    assert!(view.linked_feedback.is_empty());

    ChangelogService::delete(&mut conn, &admin, id).unwrap();
    assert!(ChangelogService::get(&mut conn, ws, id, Some(&admin)).is_err());
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn duplicate_link_is_a_conflict() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);

    let target = feedback(&mut conn, &admin, "Faster search");
    let id = draft(&mut conn, &admin, "Search got faster", vec![target]);

    // The failed insert aborts the surrounding test transaction, so this
    // has to be the last statement.
    let err = ChangelogService::link(&mut conn, &admin, id, target).unwrap_err();
    assert!(matches!(
        err,
        AppError::Conflict { code: Some(ref c), .. } if c == error_codes::CHANGELOG_LINK_EXISTS
    ));
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn padded_short_text_is_rejected() {
    let mut conn = connect();
    let acme = tenant(&mut conn);
    let admin = acme.admin_ctx(&mut conn);
    let ws = acme.workspace_id();

    let err = ChangelogService::create(
        &mut conn,
        &admin,
        &CreateChangelogRequest {
            title: "   x   ".into(),
            content: "   hi       ".into(),
            category: ChangelogCategory::Bugfix,
            feedback_ids: Vec::new(),
        },
    )
    .unwrap_err();
    match err {
        AppError::Validation { details, .. } => {
            let fields: Vec<_> = details.iter().filter_map(|d| d.field.as_deref()).collect();
            assert_eq!(fields, vec!["content", "title"]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    let id = draft(&mut conn, &admin, "Search got faster", Vec::new());
    let err = ChangelogService::update(
        &mut conn,
        &admin,
        id,
        &UpdateChangelogRequest {
            content: Some(format!("  {}  ", "a".repeat(9))),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    let everything = ChangelogQuery {
        include_unpublished: true,
        ..Default::default()
    };
    let page = ChangelogService::list(&mut conn, ws, &everything, Some(&admin)).unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.entries[0].entry.content, "We shipped something new this week.");
}
