/*
 * Responsibility
 * - Per-request security context (at most one verified identity)
 * - The principal attribute published to downstream handlers on success
 *
 * Notes
 * - A fresh context is created for every request and travels inside that
 *   request's extensions. There is no process-wide holder.
 */
use std::fmt;
use std::sync::Arc;

use crate::security::{Principal, VerifiedIdentity};

#[derive(Clone)]
pub struct SecurityContext<U: Principal> {
    identity: Option<Arc<VerifiedIdentity<U>>>,
}

impl<U: Principal> SecurityContext<U> {
    /// Empty (anonymous) context.
    pub fn new() -> Self {
        Self { identity: None }
    }

    pub fn set(&mut self, identity: VerifiedIdentity<U>) {
        self.identity = Some(Arc::new(identity));
    }

    pub fn clear(&mut self) {
        self.identity = None;
    }

    pub fn current(&self) -> Option<&VerifiedIdentity<U>> {
        self.identity.as_deref()
    }

    pub fn principal(&self) -> Option<&U> {
        self.current().map(VerifiedIdentity::principal)
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

impl<U: Principal> Default for SecurityContext<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: Principal> fmt::Debug for SecurityContext<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityContext")
            .field("subject", &self.current().map(VerifiedIdentity::id))
            .finish()
    }
}

/// The verified principal, published as a request extension on success.
///
/// The extension type is the well-known attribute key: downstream code reads it
/// with `Extension<AuthenticatedPrincipal<U>>` or `extensions().get::<...>()`.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal<U: Principal>(pub U);

impl<U: Principal> AuthenticatedPrincipal<U> {
    pub fn into_inner(self) -> U {
        self.0
    }
}
