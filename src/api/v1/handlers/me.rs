/*
 * Responsibility
 * - GET /me: the authenticated account (401 when anonymous)
 * - GET /session: authentication state of this request (anonymous allowed)
 */
use axum::{Extension, Json, extract::State};

use crate::api::v1::dto::{MeResponse, SessionResponse};
use crate::api::v1::extractors::CurrentUser;
use crate::security::SecurityContext;
use crate::services::AccountUser;
use crate::state::AppState;

pub async fn me(CurrentUser(identity): CurrentUser<AccountUser>) -> Json<MeResponse> {
    Json(MeResponse::from(&identity))
}

pub async fn session(
    State(state): State<AppState>,
    Extension(ctx): Extension<SecurityContext<AccountUser>>,
) -> Json<SessionResponse> {
    Json(SessionResponse {
        service: state.auth.settings().service_name().to_string(),
        authenticated: ctx.is_authenticated(),
        account_id: ctx.principal().map(|user| user.id),
    })
}
