//! Outcome hooks run after authentication resolves.
//!
//! Handlers see the request head and a map of pending response headers; the
//! filter merges those headers into whatever response the rest of the chain
//! produces. Handlers cannot stop the chain.

use async_trait::async_trait;
use axum::http::{HeaderMap, request::Parts};

use crate::security::{AuthenticationFailure, Principal, VerifiedIdentity};

#[async_trait]
pub trait AuthenticationSuccessHandler<U: Principal>: Send + Sync {
    async fn on_authentication_success(
        &self,
        request: &Parts,
        response_headers: &mut HeaderMap,
        identity: &VerifiedIdentity<U>,
    );
}

#[async_trait]
pub trait AuthenticationFailureHandler: Send + Sync {
    async fn on_authentication_failure(
        &self,
        request: &Parts,
        response_headers: &mut HeaderMap,
        failure: &AuthenticationFailure,
    );
}
