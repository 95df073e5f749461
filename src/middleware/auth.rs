//! Bearer authentication middleware: runs `JwtAuthFilter` in front of a router.
//!
//! The filter never rejects; handlers that need a principal use the
//! `CurrentUser` extractor (401 when the request is anonymous).

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::security::{JwtAuthFilter, Principal};

/// Apply the authentication filter to every route of `router`.
///
/// Example:
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::apply(v1, state.auth.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply<U, S>(router: Router<S>, filter: Arc<JwtAuthFilter<U>>) -> Router<S>
where
    U: Principal,
    S: Clone + Send + Sync + 'static,
{
    // from_fn cannot take a State extractor in axum 0.8, hence from_fn_with_state
    router.layer(middleware::from_fn_with_state(filter, authenticate::<U>))
}

async fn authenticate<U: Principal>(
    State(filter): State<Arc<JwtAuthFilter<U>>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    filter.process(req, move |req| next.run(req)).await
}
