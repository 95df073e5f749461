use std::{marker::PhantomData, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::security::{
    AuthenticationBackend, AuthenticationFailure, FilterSettings, PreAuthenticationRequest,
    Principal, RejectReason, VerifiedIdentity,
};

/// Claims carried by access tokens.
///
/// NOTE:
/// - `aud` names the service(s) the token was issued for; a single string or an array.
/// - `roles` become the identity's authorities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub aud: Audience,
    pub exp: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// `aud` claim in either of its registered shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for Audience {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for Audience {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for Audience {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

#[derive(Debug, Error)]
#[error("principal store unavailable: {0}")]
pub struct LoaderError(pub String);

/// Resolves the token subject into a principal.
///
/// Returns:
/// - `Ok(Some(_))` => known subject
/// - `Ok(None)`    => no such subject (token is rejected)
/// - `Err(_)`      => store failure (reported as backend unavailable)
#[async_trait]
pub trait PrincipalLoader<U: Principal>: Send + Sync {
    async fn load(&self, subject: &str) -> Result<Option<U>, LoaderError>;
}

/// HS256 access-token backend.
#[derive(Clone)]
pub struct JwtBackend<U: Principal> {
    decoding_key: DecodingKey,
    validation: Validation,
    loader: Arc<dyn PrincipalLoader<U>>,
    loader_timeout: Option<Duration>,
    _principal: PhantomData<fn() -> U>,
}

impl<U: Principal> std::fmt::Debug for JwtBackend<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtBackend")
            .field("validation", &self.validation)
            .field("loader_timeout", &self.loader_timeout)
            .finish()
    }
}

impl<U: Principal> JwtBackend<U> {
    pub fn new(
        settings: &FilterSettings,
        loader: Arc<dyn PrincipalLoader<U>>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;

        let decoding_key = DecodingKey::from_secret(settings.signing_key().as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[settings.service_name()]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);
        validation.validate_nbf = true;
        validation.leeway = settings.leeway_seconds();

        Ok(Self {
            decoding_key,
            validation,
            loader,
            loader_timeout: None,
            _principal: PhantomData,
        })
    }

    /// Bound the time spent resolving the subject. Elapsed => backend unavailable.
    pub fn with_loader_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.loader_timeout = timeout;
        self
    }

    /// Verify signature + `exp`/`nbf`/`aud` and decode the claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthenticationFailure> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(&e))?;

        if data.claims.sub.trim().is_empty() {
            return Err(RejectReason::InvalidToken.into());
        }

        Ok(data.claims)
    }

    async fn load(&self, subject: &str) -> Result<Option<U>, AuthenticationFailure> {
        let load = self.loader.load(subject);

        let loaded = match self.loader_timeout {
            Some(limit) => tokio::time::timeout(limit, load).await.map_err(|_| {
                AuthenticationFailure::unavailable(format!(
                    "principal lookup timed out after {}ms",
                    limit.as_millis()
                ))
            })?,
            None => load.await,
        };

        loaded.map_err(|e| AuthenticationFailure::unavailable(e.to_string()))
    }
}

#[async_trait]
impl<U: Principal> AuthenticationBackend<U> for JwtBackend<U> {
    async fn authenticate(
        &self,
        request: PreAuthenticationRequest,
    ) -> Result<VerifiedIdentity<U>, AuthenticationFailure> {
        let claims = self.verify(request.token())?;

        let principal = self
            .load(&claims.sub)
            .await?
            .ok_or(AuthenticationFailure::Rejected(RejectReason::UnknownIdentity))?;

        let expires_at = i64::try_from(claims.exp)
            .ok()
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0));

        Ok(VerifiedIdentity::new(principal)
            .with_authorities(claims.roles)
            .with_expires_at(expires_at))
    }

    fn name(&self) -> &'static str {
        "jwt-hs256"
    }
}

fn classify(err: &jsonwebtoken::errors::Error) -> AuthenticationFailure {
    match err.kind() {
        ErrorKind::ExpiredSignature => RejectReason::Expired.into(),
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => RejectReason::Malformed.into(),
        // Our own key could not be used: that is a service fault, not the client's.
        ErrorKind::InvalidKeyFormat | ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidEcdsaKey => {
            AuthenticationFailure::unavailable(err.to_string())
        }
        _ => RejectReason::InvalidToken.into(),
    }
}
