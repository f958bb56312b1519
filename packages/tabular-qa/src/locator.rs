//! Base URL to identifier parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PipelineError, Result};

/// First path segment is the base id, second is the table id or name;
/// anything after a further `/` is ignored (view ids, query fragments).
static LOCATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://airtable\.com/(\w+)/([^/]+)").unwrap());

/// The pair of identifiers a base URL resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseLocator {
    pub base_id: String,
    pub table_id: String,
}

/// Extract base and table identifiers from a base URL.
///
/// Fails with [`PipelineError::InvalidLocator`] carrying the offending
/// input when the URL does not have the expected shape. Pure; no
/// network access.
pub fn parse_base_url(base_url: &str) -> Result<BaseLocator> {
    let caps = LOCATOR_RE
        .captures(base_url)
        .ok_or_else(|| PipelineError::InvalidLocator {
            input: base_url.to_string(),
        })?;
    Ok(BaseLocator {
        base_id: caps[1].to_string(),
        table_id: caps[2].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(url: &str) -> BaseLocator {
        parse_base_url(url).unwrap()
    }

    #[test]
    fn two_segment_url_parses() {
        let loc = parse("https://airtable.com/appABC123/tblXYZ789");
        assert_eq!(loc.base_id, "appABC123");
        assert_eq!(loc.table_id, "tblXYZ789");
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        let loc = parse("https://airtable.com/appABC123/tblXYZ789/");
        assert_eq!(loc.table_id, "tblXYZ789");
    }

    #[test]
    fn extra_segments_are_ignored() {
        let loc = parse("https://airtable.com/appABC123/tblXYZ789/viwQQQ/recRRR");
        assert_eq!(loc.base_id, "appABC123");
        assert_eq!(loc.table_id, "tblXYZ789");
    }

    #[test]
    fn missing_scheme_fails() {
        let err = parse_base_url("airtable.com/appABC/tblXYZ").unwrap_err();
        match err {
            PipelineError::InvalidLocator { input } => {
                assert_eq!(input, "airtable.com/appABC/tblXYZ");
            }
            other => panic!("expected InvalidLocator, got {other:?}"),
        }
    }

    #[test]
    fn empty_string_fails() {
        assert!(parse_base_url("").is_err());
    }

    #[test]
    fn single_segment_fails() {
        assert!(parse_base_url("https://airtable.com/appABC").is_err());
        assert!(parse_base_url("https://airtable.com/appABC/").is_err());
    }
}
