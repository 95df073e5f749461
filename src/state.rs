/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cheap to clone (Arc inside)
 */
use std::sync::Arc;

use crate::security::JwtAuthFilter;
use crate::services::AccountUser;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<JwtAuthFilter<AccountUser>>,
}

impl AppState {
    pub fn new(auth: Arc<JwtAuthFilter<AccountUser>>) -> Self {
        Self { auth }
    }
}
