// src/core/url_check.rs

use crate::core::error::ValidationError;
use tracing::{info, warn};
use url::{ParseError, Url};

/// Query parameter names that commonly end up in SQL statements.
const INJECTABLE_PARAMS: &[&str] = &[
    "id", "page", "query", "search", "category", "item", "pid", "cat", "product",
];

/// A target URL that passed validation and may be handed to sqlmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    /// The normalized URL text, scheme included.
    pub url: String,
    /// Set when the URL is usable but unlikely to yield anything to test.
    pub warning: Option<String>,
    /// Whether the URL carries a non-empty query string.
    pub has_query: bool,
}

/// Prefixes `default_scheme://` unless the text already starts with an http(s) scheme.
pub fn ensure_scheme(raw: &str, default_scheme: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("{}://{}", default_scheme, raw)
    }
}

/// Collapses an accidentally doubled `http://http://` or `https://https://` prefix.
pub fn collapse_doubled_scheme(raw: &str) -> String {
    raw.replace("https://https://", "https://")
        .replace("http://http://", "http://")
}

/// Validates and normalizes a sqlmap target.
///
/// A missing scheme defaults to `http://`. Empty input, unparseable text and URLs
/// without a host are rejected. A URL with neither a path nor a query is accepted
/// with a warning, since sqlmap will have no parameters to work with.
///
/// Validation is idempotent: feeding `ValidatedUrl::url` back in yields the same URL.
pub fn validate_sqlmap_url(raw: &str) -> Result<ValidatedUrl, ValidationError> {
    info!(url = raw, "Validating URL for SQLMap.");

    if raw.trim().is_empty() {
        return Err(ValidationError::Empty);
    }

    let url = collapse_doubled_scheme(&ensure_scheme(raw, "http"));

    let parsed = Url::parse(&url).map_err(|e| match e {
        ParseError::EmptyHost => ValidationError::MissingHost,
        other => ValidationError::Parse(other.to_string()),
    })?;

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::MissingHost);
    }

    let query = parsed.query().filter(|q| !q.is_empty());
    let path = parsed.path();

    if (path.is_empty() || path == "/") && query.is_none() {
        warn!(url = %url, "URL has no path or query parameters. SQLMap needs parameters to test.");
        return Ok(ValidatedUrl {
            url,
            warning: Some("Warning: URL has no parameters to test".to_string()),
            has_query: false,
        });
    }

    if let Some(q) = query {
        if !has_injectable_param(q) {
            info!(url = %url, "URL has query parameters but none are common SQL injection targets.");
        }
    }

    info!(url = %url, "Validated URL for SQLMap.");
    Ok(ValidatedUrl { url, warning: None, has_query: query.is_some() })
}

/// Whether any `key=value` pair in `query` uses a commonly injectable key.
pub fn has_injectable_param(query: &str) -> bool {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, _)| {
            let key = key.to_ascii_lowercase();
            INJECTABLE_PARAMS.contains(&key.as_str())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_input_is_rejected() {
        assert_eq!(validate_sqlmap_url(""), Err(ValidationError::Empty));
        assert_eq!(validate_sqlmap_url("   "), Err(ValidationError::Empty));
        assert!(!ValidationError::Empty.to_string().is_empty());
    }

    #[test]
    fn missing_scheme_defaults_to_http() {
        let v = validate_sqlmap_url("example.com/item.php?id=4").unwrap();
        assert_eq!(v.url, "http://example.com/item.php?id=4");
        assert_eq!(v.warning, None);
        assert!(v.has_query);
    }

    #[test]
    fn doubled_schemes_collapse() {
        let v = validate_sqlmap_url("https://https://example.com/a?id=1").unwrap();
        assert_eq!(v.url, "https://example.com/a?id=1");
        let v = validate_sqlmap_url("http://http://example.com/a?id=1").unwrap();
        assert_eq!(v.url, "http://example.com/a?id=1");
    }

    #[test]
    fn bare_host_is_accepted_with_warning() {
        let v = validate_sqlmap_url("example.com").unwrap();
        assert_eq!(v.url, "http://example.com");
        assert!(v.warning.is_some());
        assert!(!v.has_query);

        let v = validate_sqlmap_url("https://example.com/").unwrap();
        assert!(v.warning.is_some());
    }

    #[test]
    fn path_without_query_is_accepted_silently() {
        let v = validate_sqlmap_url("http://example.com/login").unwrap();
        assert_eq!(v.warning, None);
        assert!(!v.has_query);
    }

    #[test]
    fn missing_host_is_rejected() {
        assert_eq!(validate_sqlmap_url("http://"), Err(ValidationError::MissingHost));
    }

    #[test]
    fn unparseable_url_is_rejected() {
        let err = validate_sqlmap_url("http://exa mple.com/?id=1").unwrap_err();
        assert!(matches!(err, ValidationError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn validation_is_idempotent() {
        for raw in [
            "example.com",
            "https://https://example.com/shop?cat=2",
            "http://http://example.com/",
            "example.com/search?q=a&Search=b",
        ] {
            let once = validate_sqlmap_url(raw).unwrap();
            let twice = validate_sqlmap_url(&once.url).unwrap();
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn injectable_params_match_case_insensitively() {
        assert!(has_injectable_param("ID=3"));
        assert!(has_injectable_param("foo=1&Product=2"));
        assert!(!has_injectable_param("foo=1&bar=2"));
        assert!(!has_injectable_param("id"));
    }

    #[test]
    fn unrecognized_params_do_not_produce_a_warning() {
        let v = validate_sqlmap_url("example.com/x?foo=bar").unwrap();
        assert_eq!(v.warning, None);
        assert!(v.has_query);
    }
}
