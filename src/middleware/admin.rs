//! Shared-secret admin session.
//!
//! A successful login hands out a per-process session token in the
//! `admin_token` cookie; the password itself never leaves the server.
//! Restarting the process invalidates every session.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::AppState;

/// Cookie carrying the admin session token
pub const ADMIN_COOKIE: &str = "admin_token";

/// Admin credential and the session token issued on login
#[derive(Clone)]
pub struct AdminAuth {
    password: Option<String>,
    session_token: String,
}

impl std::fmt::Debug for AdminAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuth")
            .field("configured", &self.password.is_some())
            .finish()
    }
}

impl AdminAuth {
    pub fn new(password: Option<String>) -> Self {
        Self {
            password,
            session_token: Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.password.is_some()
    }

    /// Checks a login attempt; returns the session token on success
    pub fn login(&self, password: &str) -> Result<&str, AppError> {
        let expected = self.password.as_deref().ok_or_else(|| {
            AppError::NotConfigured("ADMIN_PASSWORD is not set".to_string())
        })?;

        if password == expected {
            Ok(&self.session_token)
        } else {
            Err(AppError::Unauthorized("Incorrect password".to_string()))
        }
    }

    /// Whether the request carries the current session token
    pub fn is_admin(&self, headers: &HeaderMap) -> bool {
        self.is_configured()
            && cookie_value(headers, ADMIN_COOKIE).is_some_and(|v| v == self.session_token)
    }

    pub fn session_cookie(&self) -> String {
        format!(
            "{}={}; HttpOnly; Path=/; SameSite=Lax",
            ADMIN_COOKIE, self.session_token
        )
    }

    pub fn clear_cookie() -> String {
        format!("{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0", ADMIN_COOKIE)
    }
}

/// Finds a cookie by name across all `Cookie` headers
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// Request extension telling handlers whether the caller is the admin
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdminSession {
    pub is_admin: bool,
}

/// Marks every request with an [`AdminSession`]
pub async fn admin_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let is_admin = state.admin.is_admin(request.headers());
    request.extensions_mut().insert(AdminSession { is_admin });
    next.run(request).await
}

/// Rejects anonymous callers with 403
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.admin.is_admin(request.headers()) {
        tracing::debug!(uri = %request.uri(), "Rejected non-admin request");
        return AppError::Forbidden("Admin access required".to_string()).into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_login_issues_token_not_password() {
        let auth = AdminAuth::new(Some("hunter2".to_string()));

        let token = auth.login("hunter2").unwrap().to_string();

        assert_ne!(token, "hunter2");
        assert!(auth.session_cookie().contains(&token));
        assert!(auth.session_cookie().contains("HttpOnly"));
    }

    #[test]
    fn test_wrong_password_is_unauthorized() {
        let auth = AdminAuth::new(Some("hunter2".to_string()));
        assert!(matches!(auth.login("hunter3"), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_login_without_password_is_not_configured() {
        let auth = AdminAuth::new(None);
        assert!(matches!(auth.login(""), Err(AppError::NotConfigured(_))));
    }

    #[test]
    fn test_is_admin_reads_cookie_among_others() {
        let auth = AdminAuth::new(Some("hunter2".to_string()));
        let token = auth.login("hunter2").unwrap().to_string();

        let headers = headers_with_cookie(&format!("theme=dark; admin_token={}; lang=ko", token));
        assert!(auth.is_admin(&headers));

        let headers = headers_with_cookie("admin_token=hunter2");
        assert!(!auth.is_admin(&headers));

        assert!(!auth.is_admin(&HeaderMap::new()));
    }

    #[test]
    fn test_tokens_differ_between_processes() {
        let a = AdminAuth::new(Some("pw".to_string()));
        let b = AdminAuth::new(Some("pw".to_string()));
        assert_ne!(a.session_token, b.session_token);
    }
}
