//! Secret-bearing values: the durable admin credential and one-time reveals.
//!
//! Neither type implements `Serialize` or a revealing `Debug`.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("API key is required")]
    Empty,
    #[error("API key contains characters that cannot be sent in a header")]
    InvalidCharacters,
}

/// Admin API key. The only piece of session state that is persisted.
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    /// Accept a key typed or pasted by an operator. Surrounding whitespace is
    /// dropped; the remainder must be visible ASCII so it fits a header value.
    pub fn new(key: impl AsRef<str>) -> Result<Self, CredentialError> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            return Err(CredentialError::Empty);
        }
        if !key.bytes().all(|b| (0x21..=0x7e).contains(&b)) {
            return Err(CredentialError::InvalidCharacters);
        }
        Ok(Self(SecretString::new(key.into())))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Short non-secret hint for display, e.g. `rdv_a…`.
    pub fn hint(&self) -> String {
        let prefix: String = self.expose().chars().take(5).collect();
        format!("{prefix}…")
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// A secret the backend shows exactly once (new bootstrap token, new admin
/// key, rotated key). Held only by the reveal dialog and dropped with it.
pub struct RevealedSecret(SecretString);

impl RevealedSecret {
    pub fn new(value: impl Into<String>) -> Self {
        let value: String = value.into();
        Self(SecretString::new(value.into_boxed_str()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for RevealedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RevealedSecret([REDACTED])")
    }
}

impl<'de> Deserialize<'de> for RevealedSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_trims_and_validates() {
        let credential = Credential::new("  rdv_admin_123  ").unwrap();
        assert_eq!(credential.expose(), "rdv_admin_123");
        assert_eq!(Credential::new("   ").unwrap_err(), CredentialError::Empty);
        assert_eq!(
            Credential::new("has space").unwrap_err(),
            CredentialError::InvalidCharacters
        );
        assert_eq!(
            Credential::new("ключ").unwrap_err(),
            CredentialError::InvalidCharacters
        );
    }

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::new("rdv_admin_123").unwrap();
        let secret = RevealedSecret::new("rdv_bt_full_value");
        assert!(!format!("{credential:?}").contains("rdv_admin_123"));
        assert!(!format!("{secret:?}").contains("rdv_bt_full_value"));
    }

    #[test]
    fn test_revealed_secret_deserializes_from_string() {
        #[derive(Deserialize)]
        struct Body {
            token: RevealedSecret,
        }
        let body: Body = serde_json::from_str(r#"{"token":"rdv_bt_xyz"}"#).unwrap();
        assert_eq!(body.token.expose(), "rdv_bt_xyz");
    }

    #[test]
    fn test_hint_never_shows_full_key() {
        let credential = Credential::new("rdv_admin_secret_value").unwrap();
        assert_eq!(credential.hint(), "rdv_a…");
    }
}
