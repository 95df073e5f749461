use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::security::{Principal, SecurityContext, VerifiedIdentity};

/// Handler-side access to the verified identity.
///
/// The authentication filter always stores a `SecurityContext` in the request
/// extensions; this extractor answers 401 when that context is empty (or when
/// the filter is not mounted on the route).
pub struct CurrentUser<U: Principal>(pub VerifiedIdentity<U>);

impl<S, U> FromRequestParts<S> for CurrentUser<U>
where
    S: Send + Sync,
    U: Principal,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext<U>>()
            .and_then(SecurityContext::current)
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}
