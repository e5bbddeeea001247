use urpeer_backend::db::enums::UserRole;
use urpeer_backend::db::models::error_codes;
use urpeer_backend::error::AppError;
use urpeer_backend::services::authorization::Requirement;
use urpeer_backend::services::context::RequestContext;
use uuid::Uuid;

fn context(role: UserRole, workspace_id: Option<Uuid>) -> RequestContext {
    RequestContext {
        user_id: Uuid::new_v4(),
        email: "ada@example.com".into(),
        full_name: String::new(),
        role,
        workspace_id,
    }
}

fn forbidden_code(result: Result<Uuid, AppError>) -> Option<String> {
    match result {
        Err(AppError::Forbidden { code, .. }) => code,
        _ => None,
    }
}

#[test]
fn onboarding_is_required_before_membership() {
    let ctx = context(UserRole::Voter, None);
    assert_eq!(
        forbidden_code(ctx.member_workspace()).as_deref(),
        Some(error_codes::ONBOARDING_REQUIRED)
    );
}

#[test]
fn voters_are_not_admins() {
    let ctx = context(UserRole::Voter, Some(Uuid::new_v4()));
    assert!(ctx.member_workspace().is_ok());
    assert_eq!(
        forbidden_code(ctx.admin_workspace("Only admins")).as_deref(),
        Some(error_codes::ADMIN_REQUIRED)
    );
}

#[test]
fn admins_may_act_on_others_content_but_not_as_author() {
    let ws = Uuid::new_v4();
    let ctx = context(UserRole::Admin, Some(ws));
    let someone_else = Uuid::new_v4();

    assert!(
        ctx.check(
            Requirement::AuthorOrAdmin {
                workspace_id: ws,
                owner_id: someone_else
            },
            "nope"
        )
        .is_ok()
    );
    assert!(
        ctx.check(
            Requirement::Author {
                workspace_id: ws,
                owner_id: someone_else
            },
            "nope"
        )
        .is_err()
    );
}

#[test]
fn display_name_falls_back_to_email() {
    let ctx = context(UserRole::Voter, None);
    assert_eq!(ctx.display_name(), "ada@example.com");
    assert!(!ctx.is_admin_of(Uuid::new_v4()));
}
