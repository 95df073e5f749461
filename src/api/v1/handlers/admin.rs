use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::api::v1::extractors::CurrentUser;
use crate::error::AppError;
use crate::services::AccountUser;

pub const ADMIN_AUTHORITY: &str = "admin";

/// GET /admin/ping: requires the `admin` role claim.
pub async fn ping(
    CurrentUser(identity): CurrentUser<AccountUser>,
) -> Result<impl IntoResponse, AppError> {
    if !identity.has_authority(ADMIN_AUTHORITY) {
        tracing::debug!(account_id = identity.principal().id, "admin role missing");
        return Err(AppError::Forbidden);
    }

    Ok((StatusCode::OK, Json(json!({"pong": true}))))
}
