//! URL Normalizer (spec §4.1): coerce caller input to an origin URL.

use url::Url;

use crate::error::ScanError;

/// Parse `raw`, coercing it to an `http(s)` origin URL with path `/` and no
/// query or fragment. Schemes other than `http`/`https` are rejected.
pub fn normalize_to_origin(raw: &str) -> Result<Url, ScanError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScanError::InvalidUrl("URL is empty".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let mut parsed = Url::parse(&candidate)
        .map_err(|e| ScanError::InvalidUrl(format!("could not parse '{trimmed}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ScanError::InvalidUrl(format!(
                "unsupported scheme '{other}' — only http and https are accepted"
            )))
        }
    }

    parsed.set_path("/");
    parsed.set_query(None);
    parsed.set_fragment(None);

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_scheme_when_missing() {
        let url = normalize_to_origin("example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn strips_path_query_and_fragment() {
        let url = normalize_to_origin("https://example.com/a/b?x=1#frag").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = normalize_to_origin("ftp://example.com").unwrap_err();
        assert!(matches!(err, ScanError::InvalidUrl(_)));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(normalize_to_origin("   ").is_err());
    }

    #[test]
    fn rejects_garbage_input() {
        assert!(normalize_to_origin("::::not a url::::").is_err());
    }

    #[test]
    fn preserves_explicit_http() {
        let url = normalize_to_origin("http://example.com").unwrap();
        assert_eq!(url.scheme(), "http");
    }
}
