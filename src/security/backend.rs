//! Authentication backend trait.

use async_trait::async_trait;

use crate::security::{AuthenticationFailure, PreAuthenticationRequest, Principal, VerifiedIdentity};

/// Verifies a credential and produces the identity behind it.
///
/// Implementations must not touch the request's security context; the filter
/// owns that. They must report service-level faults (including their own
/// timeouts) as [`AuthenticationFailure::BackendUnavailable`] and everything
/// the client got wrong as [`AuthenticationFailure::Rejected`].
#[async_trait]
pub trait AuthenticationBackend<U: Principal>: Send + Sync {
    async fn authenticate(
        &self,
        request: PreAuthenticationRequest,
    ) -> Result<VerifiedIdentity<U>, AuthenticationFailure>;

    /// Returns the name of this backend for logging.
    fn name(&self) -> &'static str;
}
