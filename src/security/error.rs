//! Per-request authentication error types.
//!
//! None of these ever reach the transport layer: the filter absorbs them and
//! only reflects them through context state, handlers and logs.

use thiserror::Error;

/// The expected carrier was present but could not be parsed.
/// The filter treats this exactly like "no credential".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed credential carrier ({carrier}): {reason}")]
pub struct MalformedSource {
    pub carrier: &'static str,
    pub reason: String,
}

impl MalformedSource {
    pub fn new(carrier: &'static str, reason: impl Into<String>) -> Self {
        Self {
            carrier,
            reason: reason.into(),
        }
    }
}

/// Why a backend refused a credential.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RejectReason {
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("unknown identity")]
    UnknownIdentity,
}

/// Classified authentication failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthenticationFailure {
    /// Service-level fault (backend down, timeout, key misconfiguration).
    #[error("authentication backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The credential itself was refused.
    #[error("authentication rejected: {0}")]
    Rejected(RejectReason),
}

impl AuthenticationFailure {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::BackendUnavailable(reason.into())
    }

    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Self::Rejected(reason) => Some(*reason),
            Self::BackendUnavailable(_) => None,
        }
    }
}

impl From<RejectReason> for AuthenticationFailure {
    fn from(reason: RejectReason) -> Self {
        Self::Rejected(reason)
    }
}
