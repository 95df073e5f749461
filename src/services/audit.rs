//! Audit hooks: one structured log line per authentication attempt, plus an
//! `x-auth-status` response header for clients and proxies.
use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName, HeaderValue, request::Parts};

use crate::security::{
    AuthenticationFailure, AuthenticationFailureHandler, AuthenticationSuccessHandler,
    RejectReason, VerifiedIdentity,
};
use crate::services::AccountUser;

pub const AUTH_STATUS_HEADER: HeaderName = HeaderName::from_static("x-auth-status");

#[derive(Debug, Clone, Copy, Default)]
pub struct AuditHandler;

fn status_for(failure: &AuthenticationFailure) -> &'static str {
    match failure {
        AuthenticationFailure::BackendUnavailable(_) => "unavailable",
        AuthenticationFailure::Rejected(RejectReason::Expired) => "expired",
        AuthenticationFailure::Rejected(_) => "rejected",
    }
}

#[async_trait]
impl AuthenticationSuccessHandler<AccountUser> for AuditHandler {
    async fn on_authentication_success(
        &self,
        request: &Parts,
        response_headers: &mut HeaderMap,
        identity: &VerifiedIdentity<AccountUser>,
    ) {
        tracing::info!(
            target: "audit",
            method = %request.method,
            path = %request.uri.path(),
            account_id = identity.principal().id,
            "authenticated"
        );
        response_headers.insert(AUTH_STATUS_HEADER, HeaderValue::from_static("authenticated"));
    }
}

#[async_trait]
impl AuthenticationFailureHandler for AuditHandler {
    async fn on_authentication_failure(
        &self,
        request: &Parts,
        response_headers: &mut HeaderMap,
        failure: &AuthenticationFailure,
    ) {
        let status = status_for(failure);
        tracing::info!(
            target: "audit",
            method = %request.method,
            path = %request.uri.path(),
            status,
            "authentication failed"
        );
        response_headers.insert(AUTH_STATUS_HEADER, HeaderValue::from_static(status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn failure_sets_status_header() {
        let (parts, _) = Request::builder().uri("/api/v1/me").body(()).unwrap().into_parts();
        let mut headers = HeaderMap::new();

        AuditHandler
            .on_authentication_failure(
                &parts,
                &mut headers,
                &AuthenticationFailure::Rejected(RejectReason::Expired),
            )
            .await;
        assert_eq!(headers[AUTH_STATUS_HEADER], "expired");

        AuditHandler
            .on_authentication_failure(
                &parts,
                &mut headers,
                &AuthenticationFailure::unavailable("down"),
            )
            .await;
        assert_eq!(headers[AUTH_STATUS_HEADER], "unavailable");
    }

    #[tokio::test]
    async fn success_sets_status_header() {
        let (parts, _) = Request::builder().uri("/api/v1/me").body(()).unwrap().into_parts();
        let mut headers = HeaderMap::new();
        let identity = VerifiedIdentity::new(AccountUser::new(42, "alice"));

        AuditHandler
            .on_authentication_success(&parts, &mut headers, &identity)
            .await;
        assert_eq!(headers[AUTH_STATUS_HEADER], "authenticated");
    }
}
