//! Format checks for the three user-supplied credentials.
//!
//! These gate configuration only; nothing here talks to the network.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// The base URL must carry an `app…` base segment followed by a
/// non-empty `tbl…` table segment.
static BASE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://airtable\.com/app[^/]+/tbl[^/]").unwrap());

/// Names of the credential fields, for validation reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    ApiKey,
    Pat,
    BaseUrl,
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CredentialField::ApiKey => "OpenAI API key",
            CredentialField::Pat => "Airtable personal access token",
            CredentialField::BaseUrl => "Airtable base URL",
        };
        f.write_str(name)
    }
}

/// An OpenAI API key is well-formed iff it starts with `sk-`.
pub fn api_key_valid(api_key: &str) -> bool {
    api_key.starts_with("sk-")
}

/// An Airtable personal access token is well-formed iff it starts with `pat`.
pub fn pat_valid(pat: &str) -> bool {
    pat.starts_with("pat")
}

/// A base URL is well-formed iff its base segment starts with `app` and
/// its table segment starts with `tbl`.
pub fn base_url_valid(base_url: &str) -> bool {
    BASE_URL_RE.is_match(base_url)
}

/// Run all three checks, collecting every field that failed.
pub fn check_all(api_key: &str, pat: &str, base_url: &str) -> Result<(), ValidationError> {
    let mut failed = Vec::new();
    if !api_key_valid(api_key) {
        failed.push(CredentialField::ApiKey);
    }
    if !pat_valid(pat) {
        failed.push(CredentialField::Pat);
    }
    if !base_url_valid(base_url) {
        failed.push(CredentialField::BaseUrl);
    }
    if failed.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { failed })
    }
}
