use serde_json::json;
use urpeer_backend::db::models::{
    CommentRequest, CreateChangelogRequest, CreateFeedbackRequest, CreateRoadmapItemRequest,
    CreateWorkspaceRequest, ReorderRequest, UpdateProfileRequest, UpdateRoadmapStatusRequest,
};
use urpeer_backend::db::enums::RoadmapStatus;
use urpeer_backend::error::AppError;
use urpeer_backend::validation::ensure_valid;
use validator::Validate;

#[test]
fn feedback_request_length_rules() {
    let ok: CreateFeedbackRequest = serde_json::from_value(json!({
        "title": "Dark mode",
        "description": "Please add a dark theme to the app",
        "category": "feature"
    }))
    .unwrap();
    assert!(ok.validate().is_ok());

    let short: CreateFeedbackRequest = serde_json::from_value(json!({
        "title": "Hi",
        "description": "too short",
        "category": "bug"
    }))
    .unwrap();
    match ensure_valid(&short) {
        Err(AppError::Validation { message, details }) => {
            assert_eq!(details.len(), 2);
            assert_eq!(details[0].field.as_deref(), Some("description"));
            assert_eq!(message, details[0].message);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn unknown_category_fails_to_deserialize() {
    let parsed = serde_json::from_value::<CreateFeedbackRequest>(json!({
        "title": "Dark mode",
        "description": "Please add a dark theme",
        "category": "question"
    }));
    assert!(parsed.is_err());
}

#[test]
fn workspace_request_rejects_reserved_slug_and_bad_website() {
    let reserved = CreateWorkspaceRequest {
        name: "Acme".into(),
        slug: "admin".into(),
        website: None,
    };
    assert!(reserved.validate().is_err());

    let bad_site = CreateWorkspaceRequest {
        name: "Acme".into(),
        slug: "acme".into(),
        website: Some("not a url".into()),
    };
    assert!(bad_site.validate().is_err());

    let ok = CreateWorkspaceRequest {
        name: "Acme".into(),
        slug: "acme".into(),
        website: Some("https://acme.example".into()),
    };
    assert!(ok.validate().is_ok());
}

#[test]
fn comment_content_must_not_be_blank() {
    assert!(CommentRequest { content: "  ".into() }.validate().is_err());
    assert!(CommentRequest { content: "Agreed".into() }.validate().is_ok());
    assert!(CommentRequest { content: "x".repeat(2001) }.validate().is_err());
}

#[test]
fn profile_name_bounds() {
    assert!(UpdateProfileRequest { full_name: "A".into() }.validate().is_err());
    assert!(UpdateProfileRequest { full_name: "Ada".into() }.validate().is_ok());
}

#[test]
fn roadmap_requests() {
    let item: CreateRoadmapItemRequest = serde_json::from_value(json!({
        "title": "Dark mode",
        "status": "in-progress"
    }))
    .unwrap();
    assert_eq!(item.status, RoadmapStatus::InProgress);
    assert!(item.validate().is_ok());

    let defaulted: CreateRoadmapItemRequest =
        serde_json::from_value(json!({ "title": "Dark mode" })).unwrap();
    assert_eq!(defaulted.status, RoadmapStatus::Planned);

    let negative = UpdateRoadmapStatusRequest {
        status: RoadmapStatus::Planned,
        display_order: -1,
    };
    assert!(negative.validate().is_err());

    let empty = ReorderRequest { items: Vec::new() };
    assert!(empty.validate().is_err());
}

#[test]
fn changelog_links_default_to_empty() {
    let entry: CreateChangelogRequest = serde_json::from_value(json!({
        "title": "March release",
        "content": "Dark mode is here for everyone.",
        "category": "feature"
    }))
    .unwrap();
    assert!(entry.feedback_ids.is_empty());
    assert!(entry.validate().is_ok());
}

#[test]
fn whitespace_padding_does_not_satisfy_minimums() {
    let padded: CreateChangelogRequest = serde_json::from_value(json!({
        "title": "   x   ",
        "content": "   hi       ",
        "category": "bugfix"
    }))
    .unwrap();
    match ensure_valid(&padded) {
        Err(AppError::Validation { details, .. }) => assert_eq!(details.len(), 2),
        other => panic!("expected validation error, got {:?}", other),
    }

    let padded: CreateFeedbackRequest = serde_json::from_value(json!({
        "title": "  a  ",
        "description": "     five      ",
        "category": "bug"
    }))
    .unwrap();
    assert!(ensure_valid(&padded).is_err());

    let padded: CreateRoadmapItemRequest = serde_json::from_value(json!({
        "title": "  ab  "
    }))
    .unwrap();
    assert!(padded.validate().is_err());
}
