//! Credential extractors: locate the raw token in a request, never verify it.
//!
//! - `Ok(Some(_))`: a token was found
//! - `Ok(None)`: the request carries no credential
//! - `Err(MalformedSource)`: the carrier exists but is unusable

use axum::http::{header, request::Parts};
use cookie::Cookie;

use crate::security::{MalformedSource, RawCredential};

pub trait CredentialExtractor: Send + Sync {
    fn extract(&self, parts: &Parts) -> Result<Option<RawCredential>, MalformedSource>;
}

impl<T: CredentialExtractor + ?Sized> CredentialExtractor for Box<T> {
    fn extract(&self, parts: &Parts) -> Result<Option<RawCredential>, MalformedSource> {
        (**self).extract(parts)
    }
}

/// `Authorization: Bearer <token>`
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerHeaderExtractor;

impl CredentialExtractor for BearerHeaderExtractor {
    fn extract(&self, parts: &Parts) -> Result<Option<RawCredential>, MalformedSource> {
        let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(None);
        };

        let value = value
            .to_str()
            .map_err(|_| MalformedSource::new("authorization", "header is not visible ASCII"))?;

        // RFC 7235: the auth-scheme is case-insensitive
        let (scheme, token) = value
            .split_once(' ')
            .ok_or_else(|| MalformedSource::new("authorization", "missing auth scheme"))?;

        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(MalformedSource::new(
                "authorization",
                format!("unsupported scheme '{scheme}'"),
            ));
        }

        let token = token.trim();
        if token.is_empty() {
            return Err(MalformedSource::new("authorization", "empty bearer token"));
        }

        Ok(Some(RawCredential::new(token)))
    }
}

/// Token stored in a named cookie.
#[derive(Debug, Clone)]
pub struct CookieExtractor {
    name: String,
}

impl CookieExtractor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl CredentialExtractor for CookieExtractor {
    fn extract(&self, parts: &Parts) -> Result<Option<RawCredential>, MalformedSource> {
        // Several Cookie headers may be present (HTTP/2 splits them).
        for value in parts.headers.get_all(header::COOKIE) {
            let value = value
                .to_str()
                .map_err(|_| MalformedSource::new("cookie", "header is not visible ASCII"))?;

            for piece in value.split(';') {
                let cookie = match Cookie::parse(piece) {
                    Ok(cookie) => cookie,
                    // Unrelated garbage does not spoil the token cookie.
                    Err(e) if piece_name(piece) == self.name => {
                        return Err(MalformedSource::new("cookie", e.to_string()));
                    }
                    Err(_) => continue,
                };
                if cookie.name() != self.name {
                    continue;
                }
                if cookie.value().trim().is_empty() {
                    return Err(MalformedSource::new("cookie", "empty token cookie"));
                }
                return Ok(Some(RawCredential::new(cookie.value())));
            }
        }

        Ok(None)
    }
}

fn piece_name(piece: &str) -> &str {
    piece.split_once('=').map_or(piece, |(name, _)| name).trim()
}

/// Token passed as a query parameter (e.g. `?access_token=...`).
#[derive(Debug, Clone)]
pub struct QueryExtractor {
    param: String,
}

impl QueryExtractor {
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
        }
    }
}

impl CredentialExtractor for QueryExtractor {
    fn extract(&self, parts: &Parts) -> Result<Option<RawCredential>, MalformedSource> {
        let Some(query) = parts.uri.query() else {
            return Ok(None);
        };

        match url::form_urlencoded::parse(query.as_bytes()).find(|(k, _)| *k == self.param) {
            None => Ok(None),
            Some((_, v)) if v.trim().is_empty() => {
                Err(MalformedSource::new("query", "empty token parameter"))
            }
            Some((_, v)) => Ok(Some(RawCredential::new(v.into_owned()))),
        }
    }
}

/// Tries each extractor in order; the first credential found wins.
///
/// A malformed carrier is only reported when no later extractor finds a token.
pub struct ChainExtractor {
    links: Vec<Box<dyn CredentialExtractor>>,
}

impl ChainExtractor {
    pub fn new() -> Self {
        Self { links: Vec::new() }
    }

    pub fn with(mut self, extractor: impl CredentialExtractor + 'static) -> Self {
        self.links.push(Box::new(extractor));
        self
    }
}

impl Default for ChainExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialExtractor for ChainExtractor {
    fn extract(&self, parts: &Parts) -> Result<Option<RawCredential>, MalformedSource> {
        let mut malformed = None;

        for link in &self.links {
            match link.extract(parts) {
                Ok(Some(credential)) => return Ok(Some(credential)),
                Ok(None) => {}
                Err(err) => {
                    malformed.get_or_insert(err);
                }
            }
        }

        match malformed {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }
}
