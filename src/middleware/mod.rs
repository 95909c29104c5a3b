pub mod admin;
pub mod request_id;

pub use admin::{admin_session, require_admin, AdminAuth, AdminSession, ADMIN_COOKIE};
pub use request_id::{make_span_with_request_id, request_id_middleware, RequestId};
