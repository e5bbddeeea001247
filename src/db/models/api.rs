use serde::Serialize;

// Uniform API response envelope
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorDetail>>,
    pub timestamp: String,
}

#[derive(Serialize, Default)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let per_page = per_page.max(1);
        let total_pages = (total + per_page - 1) / per_page;
        Self {
            page,
            per_page,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    fn build(success: bool, code: u16, message: &str) -> Self {
        Self {
            success,
            code,
            message: message.to_string(),
            data: None,
            meta: None,
            errors: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn failure(code: u16, message: &str, error_code: &str, field: Option<String>) -> Self {
        let mut response = Self::build(false, code, message);
        response.errors = Some(vec![ErrorDetail {
            field,
            code: error_code.to_string(),
            message: message.to_string(),
        }]);
        response
    }

    pub fn success(data: T, message: &str) -> Self {
        let mut response = Self::build(true, 200, message);
        response.data = Some(data);
        response
    }

    pub fn success_with_meta(data: T, message: &str, meta: ResponseMeta) -> Self {
        let mut response = Self::success(data, message);
        response.meta = Some(meta);
        response
    }

    pub fn created(data: T, message: &str) -> Self {
        let mut response = Self::build(true, 201, message);
        response.data = Some(data);
        response
    }

    pub fn ok(message: &str) -> Self {
        Self::build(true, 200, message)
    }

    /// `message` carries the first violation; `errors` carries all of them.
    pub fn validation_error(message: &str, errors: Vec<ErrorDetail>) -> Self {
        let mut response = Self::build(false, 400, message);
        response.errors = Some(errors);
        response
    }

    pub fn bad_request(message: &str) -> Self {
        Self::failure(400, message, "BAD_REQUEST", None)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::failure(401, message, "UNAUTHORIZED", None)
    }

    pub fn forbidden_with_code(message: &str, error_code: &str) -> Self {
        Self::failure(403, message, error_code, None)
    }

    pub fn not_found(message: &str) -> Self {
        Self::failure(404, message, "NOT_FOUND", None)
    }

    pub fn conflict(message: &str, field: Option<String>, error_code: &str) -> Self {
        Self::failure(409, message, error_code, field)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::failure(500, message, "INTERNAL_ERROR", None)
    }

    pub fn service_unavailable(message: &str) -> Self {
        Self::failure(503, message, "SERVICE_UNAVAILABLE", None)
    }
}

// Business error codes
pub mod error_codes {
    pub const ONBOARDING_REQUIRED: &str = "ONBOARDING_REQUIRED";
    pub const ADMIN_REQUIRED: &str = "ADMIN_REQUIRED";
    pub const NOT_AUTHOR: &str = "NOT_AUTHOR";

    pub const WORKSPACE_SLUG_TAKEN: &str = "WORKSPACE_SLUG_TAKEN";
    pub const WORKSPACE_ALREADY_JOINED: &str = "WORKSPACE_ALREADY_JOINED";

    pub const CHANGELOG_LINK_EXISTS: &str = "CHANGELOG_LINK_EXISTS";
    pub const ROADMAP_ORDER_CONFLICT: &str = "ROADMAP_ORDER_CONFLICT";
}
