pub mod logger;
pub mod request_tracking;
pub mod session;

pub use request_tracking::{REQUEST_ID_HEADER, extract_request_id, request_tracking_middleware};
pub use session::{MaybeUser, SessionUser, SessionVerifier, session_middleware};
