use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::security::VerifiedIdentity;
use crate::services::AccountUser;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub authorities: Vec<String>,
    pub authenticated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&VerifiedIdentity<AccountUser>> for MeResponse {
    fn from(identity: &VerifiedIdentity<AccountUser>) -> Self {
        let user = identity.principal();
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            authorities: identity.authorities().to_vec(),
            authenticated_at: identity.authenticated_at(),
            expires_at: identity.expires_at(),
        }
    }
}

/// Never 401: reports what the filter concluded for this request.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub service: String,
    pub authenticated: bool,
    pub account_id: Option<u64>,
}
