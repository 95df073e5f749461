use std::fmt;

use crate::config::ConfigError;

/// Shared-secret key material used to verify token signatures.
///
/// Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct SigningKey(String);

impl SigningKey {
    pub fn new(material: impl Into<String>) -> Self {
        Self(material.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Identifying configuration of one filter instance.
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct FilterSettings {
    service_name: String,
    signing_key: SigningKey,
    leeway_seconds: u64,
}

impl FilterSettings {
    pub fn new(service_name: impl Into<String>, signing_key: SigningKey) -> Self {
        Self {
            service_name: service_name.into(),
            signing_key,
            leeway_seconds: 60,
        }
    }

    pub fn with_leeway_seconds(mut self, leeway_seconds: u64) -> Self {
        self.leeway_seconds = leeway_seconds;
        self
    }

    /// Service (realm) the tokens must be issued for. Used as the expected `aud`.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn leeway_seconds(&self) -> u64 {
        self.leeway_seconds
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::Missing("service_name"));
        }
        if self.signing_key.is_blank() {
            return Err(ConfigError::Missing("signing_key"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_does_not_leak_key_material() {
        let settings = FilterSettings::new("orders", SigningKey::new("super-secret"));
        let rendered = format!("{settings:?}");
        assert!(rendered.contains("orders"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn validate_requires_both_values() {
        assert_eq!(
            FilterSettings::new("", SigningKey::new("k")).validate(),
            Err(ConfigError::Missing("service_name"))
        );
        assert_eq!(
            FilterSettings::new("orders", SigningKey::new("")).validate(),
            Err(ConfigError::Missing("signing_key"))
        );
        assert!(FilterSettings::new("orders", SigningKey::new("k"))
            .validate()
            .is_ok());
    }
}
