/*
 * Responsibility
 * - v1 URL layout
 * - The authentication filter wraps every v1 route; handlers decide whether
 *   they need a principal
 */
use axum::{Router, routing::get};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{
    admin::ping,
    health::health,
    me::{me, session},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
        .route("/session", get(session))
        .route("/admin/ping", get(ping));

    middleware::auth::apply(router, state.auth)
}
