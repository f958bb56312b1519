//! Credential handling with secure memory.
//!
//! Uses the `secrecy` crate to prevent accidental logging of sensitive values.

use std::fmt;

use secrecy::{ExposeSecret, SecretBox};

use crate::error::ValidationError;
use crate::validate;

/// A secret string that won't be logged or displayed.
///
/// Wraps `secrecy::SecretBox` so the OpenAI key and Airtable PAT never
/// show up in logs, debug output, or error messages.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value for use.
    ///
    /// Only call this when actually using the secret (e.g., in an API request).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The three user-supplied credentials the pipeline needs.
///
/// Only checked for *format*, never for correctness against the remote
/// services; a well-formed but revoked key still fails at fetch time.
#[derive(Clone)]
pub struct Credentials {
    /// OpenAI API key (secret, `sk-` prefix)
    pub api_key: SecretString,

    /// Airtable personal access token (secret, `pat` prefix)
    pub pat: SecretString,

    /// Airtable base URL (`https://airtable.com/app…/tbl…`)
    pub base_url: String,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        pat: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            pat: SecretString::new(pat),
            base_url: base_url.into(),
        }
    }

    /// Run all three format checks, reporting every failing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::check_all(
            self.api_key.expose(),
            self.pat.expose(),
            &self.base_url,
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("pat", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}
