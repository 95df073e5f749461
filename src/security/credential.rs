//! Credential and identity types flowing through the pipeline.

use std::fmt;

use chrono::{DateTime, Utc};

/// A user representation the backend can hand to downstream handlers.
///
/// `Id` is the identity key type (numeric id, UUID, ...).
pub trait Principal: Clone + Send + Sync + 'static {
    type Id: Clone + fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;
}

/// Token string as found in the request. Not validated.
#[derive(Clone, PartialEq, Eq)]
pub struct RawCredential(String);

impl RawCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RawCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the token itself
        write!(f, "RawCredential(<{} bytes>)", self.0.len())
    }
}

/// "Authentication requested, not yet verified".
#[derive(Debug, Clone)]
pub struct PreAuthenticationRequest {
    credential: RawCredential,
}

impl PreAuthenticationRequest {
    pub fn new(credential: RawCredential) -> Self {
        Self { credential }
    }

    pub fn credential(&self) -> &RawCredential {
        &self.credential
    }

    pub fn token(&self) -> &str {
        self.credential.as_str()
    }
}

/// Result of a successful authentication. Only backends construct these.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity<U: Principal> {
    principal: U,
    authorities: Vec<String>,
    authenticated_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl<U: Principal> VerifiedIdentity<U> {
    pub fn new(principal: U) -> Self {
        Self {
            principal,
            authorities: Vec::new(),
            authenticated_at: Utc::now(),
            expires_at: None,
        }
    }

    pub fn with_authorities(mut self, authorities: Vec<String>) -> Self {
        self.authorities = authorities;
        self
    }

    pub fn with_expires_at(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub fn principal(&self) -> &U {
        &self.principal
    }

    pub fn id(&self) -> &U::Id {
        self.principal.id()
    }

    pub fn authorities(&self) -> &[String] {
        &self.authorities
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn into_principal(self) -> U {
        self.principal
    }
}
