//! Fetcher (spec §4.3): a single bounded GET with deterministic degradation
//! on failure. Sub-fetch failures are never fatal — they come back as an
//! artifact with an empty body plus a constraint, never an `Err`.

use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use url::Url;

use crate::core::types::{Constraint, HtmlArtifact, TextArtifact};

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(12);
pub const MAX_REDIRECTS: usize = 5;
pub const MAX_BODY_CHARS: usize = 120_000;
pub const USER_AGENT: &str = "ShadowScreenBot/1.0 (+https://shadowscreen.example/bot)";
const ACCEPT_HEADER: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,text/plain;q=0.8,*/*;q=0.5";

async fn send(client: &reqwest::Client, url: &Url) -> Result<reqwest::Response, reqwest::Error> {
    client
        .get(url.clone())
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
}

fn lower_case_headers(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for (name, value) in headers.iter() {
        if let Ok(text) = value.to_str() {
            map.insert(name.as_str().to_ascii_lowercase(), text.to_string());
        }
    }
    map
}

fn is_content_available(status: u16) -> bool {
    (200..400).contains(&status)
}

fn is_html_content_type(content_type: &str) -> bool {
    let lowered = content_type.to_ascii_lowercase();
    lowered.contains("text/html") || lowered.contains("application/xhtml+xml")
}

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").unwrap())
}

fn script_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap())
}

fn style_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").unwrap())
}

/// Strip comments, `<script>` and `<style>` blocks (regex-level, per spec §4.3/§9).
pub fn sanitize_html(body: &str) -> String {
    let no_comments = comment_re().replace_all(body, "");
    let no_scripts = script_re().replace_all(&no_comments, "");
    style_re().replace_all(&no_scripts, "").into_owned()
}

/// Truncate to at most `max_chars` characters total, appending `...` when
/// truncation occurred (spec §3 invariant: never exceed the cap in memory).
pub fn truncate(body: &str, max_chars: usize) -> (String, bool) {
    if body.chars().count() <= max_chars {
        return (body.to_string(), false);
    }
    let keep = max_chars.saturating_sub(3);
    let mut truncated: String = body.chars().take(keep).collect();
    truncated.push_str("...");
    (truncated, true)
}

/// Fetch an HTML artifact (homepage or extra page).
pub async fn fetch_html(client: &reqwest::Client, url: &Url) -> (HtmlArtifact, Vec<Constraint>) {
    let requested_url = url.to_string();
    let mut constraints = Vec::new();

    let response = match send(client, url).await {
        Ok(r) => r,
        Err(e) => {
            tracing::info!(url = %requested_url, error = %e, "fetch failed");
            constraints.push(Constraint::FetchFailed);
            return (
                HtmlArtifact {
                    requested_url: requested_url.clone(),
                    final_url: requested_url,
                    status: 0,
                    headers: BTreeMap::new(),
                    html: None,
                },
                constraints,
            );
        }
    };

    let final_url = response.url().to_string();
    let status = response.status().as_u16();
    let headers = lower_case_headers(response.headers());

    if !is_content_available(status) {
        tracing::info!(url = %requested_url, status, "non-2xx/3xx response");
        return (
            HtmlArtifact {
                requested_url,
                final_url,
                status,
                headers,
                html: None,
            },
            constraints,
        );
    }

    let content_type = headers.get("content-type").cloned().unwrap_or_default();
    if !is_html_content_type(&content_type) {
        constraints.push(Constraint::NonHtmlPage);
        return (
            HtmlArtifact {
                requested_url,
                final_url,
                status,
                headers,
                html: None,
            },
            constraints,
        );
    }

    let body = match response.text().await {
        Ok(b) => b,
        Err(e) => {
            tracing::info!(url = %requested_url, error = %e, "failed reading body");
            constraints.push(Constraint::FetchFailed);
            return (
                HtmlArtifact {
                    requested_url,
                    final_url,
                    status: 0,
                    headers: BTreeMap::new(),
                    html: None,
                },
                constraints,
            );
        }
    };

    let sanitized = sanitize_html(&body);
    let (truncated_body, was_truncated) = truncate(&sanitized, MAX_BODY_CHARS);
    if was_truncated {
        constraints.push(Constraint::TruncatedDueToLimits);
    }

    tracing::info!(url = %requested_url, status, "fetched html");
    (
        HtmlArtifact {
            requested_url,
            final_url,
            status,
            headers,
            html: Some(truncated_body),
        },
        constraints,
    )
}

/// Fetch a text artifact (robots.txt or sitemap.xml). No content-type gating.
pub async fn fetch_text(client: &reqwest::Client, url: &Url) -> (TextArtifact, Vec<Constraint>) {
    let requested_url = url.to_string();
    let mut constraints = Vec::new();

    let response = match send(client, url).await {
        Ok(r) => r,
        Err(e) => {
            tracing::info!(url = %requested_url, error = %e, "fetch failed");
            constraints.push(Constraint::FetchFailed);
            return (
                TextArtifact {
                    requested_url: requested_url.clone(),
                    final_url: requested_url,
                    status: 0,
                    headers: BTreeMap::new(),
                    text: None,
                },
                constraints,
            );
        }
    };

    let final_url = response.url().to_string();
    let status = response.status().as_u16();
    let headers = lower_case_headers(response.headers());

    if !is_content_available(status) {
        tracing::info!(url = %requested_url, status, "non-2xx/3xx response");
        return (
            TextArtifact {
                requested_url,
                final_url,
                status,
                headers,
                text: None,
            },
            constraints,
        );
    }

    let body = match response.text().await {
        Ok(b) => b,
        Err(e) => {
            tracing::info!(url = %requested_url, error = %e, "failed reading body");
            constraints.push(Constraint::FetchFailed);
            return (
                TextArtifact {
                    requested_url,
                    final_url,
                    status: 0,
                    headers: BTreeMap::new(),
                    text: None,
                },
                constraints,
            );
        }
    };

    let (truncated_body, was_truncated) = truncate(&body, MAX_BODY_CHARS);
    if was_truncated {
        constraints.push(Constraint::TruncatedDueToLimits);
    }

    tracing::info!(url = %requested_url, status, "fetched text");
    (
        TextArtifact {
            requested_url,
            final_url,
            status,
            headers,
            text: Some(truncated_body),
        },
        constraints,
    )
}
