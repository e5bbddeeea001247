use super::{connect, session_user, tenant, unique_slug};
use urpeer_backend::db::enums::UserRole;
use urpeer_backend::db::models::{CreateWorkspaceRequest, error_codes};
use urpeer_backend::error::AppError;
use urpeer_backend::notifications::{NotificationDispatcher, NotificationKind};
use urpeer_backend::services::context::RequestContext;
use urpeer_backend::services::{ProfilesService, WorkspacesService};

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn ensure_profile_is_idempotent() {
    let mut conn = connect();
    let user = session_user("Ada");

    let first = ProfilesService::ensure_exists(&mut conn, &user).unwrap();
    let second = ProfilesService::ensure_exists(&mut conn, &user).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.role, UserRole::Voter);
    assert_eq!(first.workspace_id, None);
    assert_eq!(first.full_name, "Ada");
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn creating_a_workspace_promotes_the_owner() {
    let mut conn = connect();
    let (notifier, mut outbox) = NotificationDispatcher::channel();
    let user = session_user("Owner");
    let slug = unique_slug();

    let result = WorkspacesService::create(
        &mut conn,
        &user,
        &CreateWorkspaceRequest {
            name: "  Acme  ".into(),
            slug: slug.clone(),
            website: None,
        },
        &notifier,
    )
    .unwrap();

    assert_eq!(result.workspace.name, "Acme");
    assert_eq!(result.profile.role, UserRole::Admin);
    assert_eq!(result.profile.workspace_id, Some(result.workspace.id));

    let welcome = outbox.try_recv().unwrap();
    assert_eq!(welcome.recipient_id, user.id);
    assert!(matches!(welcome.payload, NotificationKind::Welcome { .. }));

    let availability = WorkspacesService::check_slug(&mut conn, &slug.to_uppercase()).unwrap();
    assert_eq!(availability.slug, slug);
    assert!(!availability.available);
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn taken_slug_and_second_workspace_conflict() {
    let mut conn = connect();
    let acme = tenant(&mut conn);

    let newcomer = session_user("Newcomer");
    let err = WorkspacesService::create(
        &mut conn,
        &newcomer,
        &CreateWorkspaceRequest {
            name: "Other".into(),
            slug: acme.slug().to_string(),
            website: None,
        },
        &acme.notifier,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Conflict { code: Some(ref c), .. } if c == error_codes::WORKSPACE_SLUG_TAKEN
    ));

    let err = WorkspacesService::create(
        &mut conn,
        &acme.admin,
        &CreateWorkspaceRequest {
            name: "Second".into(),
            slug: unique_slug(),
            website: None,
        },
        &acme.notifier,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Conflict { code: Some(ref c), .. } if c == error_codes::WORKSPACE_ALREADY_JOINED
    ));
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn joining_makes_a_voter() {
    let mut conn = connect();
    let mut acme = tenant(&mut conn);

    let (user, ctx) = acme.voter(&mut conn, "Grace");
    assert_eq!(ctx.role, UserRole::Voter);
    assert_eq!(ctx.workspace_id, Some(acme.workspace_id()));
    assert_eq!(acme.drain_outbox().len(), 1);

    // Joining again is a no-op and sends nothing
    WorkspacesService::join(&mut conn, &user, acme.slug(), &acme.notifier).unwrap();
    assert!(acme.drain_outbox().is_empty());

    let me = ProfilesService::get_me(&mut conn, &ctx).unwrap();
    assert_eq!(me.workspace.map(|w| w.id), Some(acme.workspace_id()));
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn profile_name_is_trimmed_on_update() {
    let mut conn = connect();
    let user = session_user("Ada");
    let ctx = RequestContext::load(&mut conn, &user).unwrap();

    let updated = ProfilesService::update_me(
        &mut conn,
        &ctx,
        &urpeer_backend::db::models::UpdateProfileRequest {
            full_name: "  Ada Lovelace ".into(),
        },
    )
    .unwrap();
    assert_eq!(updated.full_name, "Ada Lovelace");
}
