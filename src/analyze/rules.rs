//! Analyzer (spec §4.6): rule set over a `ScanInput`, each rule keyed by a
//! fixed root cause so re-runs over the same artifacts collapse identically.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::core::types::{Finding, HtmlArtifact, ScanInput, Severity};

const FINDING_TEXT_CAP: usize = 100;
const EVIDENCE_SNIPPET_CAP: usize = 200;

const KILL_SWITCH: &str = "Indexation Kill Switch";
const MODERATE_DRAG: &str = "Moderate Drag";

fn cap(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

fn user_agent_star_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)user-agent\s*:\s*\*").unwrap())
}

fn disallow_root_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)^\s*disallow\s*:\s*/\s*$").unwrap())
}

fn meta_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<meta\b[^>]*>").unwrap())
}

fn link_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<link\b[^>]*>").unwrap())
}

fn attr_re(attr: &str) -> Regex {
    Regex::new(&format!(r#"(?i)\b{attr}\s*=\s*["']([^"']*)["']"#)).unwrap()
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title>").unwrap())
}

fn extract_attr(tag: &str, attr: &str) -> Option<String> {
    attr_re(attr)
        .captures(tag)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn extract_title(html: &str) -> Option<String> {
    title_re()
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn robots_disallow_all(input: &ScanInput) -> Option<Finding> {
    let robots = input.robots_txt.as_ref()?;
    let text = robots.text.as_ref()?;
    if user_agent_star_re().is_match(text) && disallow_root_re().is_match(text) {
        let matched = disallow_root_re().find(text).map(|m| m.as_str()).unwrap_or("Disallow: /");
        Some(Finding {
            root_cause_key: "ROBOTS_DISALLOW_ALL",
            severity: Severity::P0,
            category: KILL_SWITCH,
            finding_text: cap("robots.txt disallows all crawlers from the entire site", FINDING_TEXT_CAP),
            evidence_url: robots.final_url.clone(),
            evidence_snippet: cap(matched.trim(), EVIDENCE_SNIPPET_CAP),
            why_it_suppresses: "A blanket robots.txt disallow stops search engines from crawling any page",
            how_to_verify: "Fetch /robots.txt and confirm the Disallow: / line under User-agent: *",
        })
    } else {
        None
    }
}

fn x_robots_noindex(input: &ScanInput) -> Option<Finding> {
    for page in input.html_pages() {
        if let Some(value) = page.headers.get("x-robots-tag") {
            if value.to_ascii_lowercase().contains("noindex") {
                return Some(Finding {
                    root_cause_key: "X_ROBOTS_NOINDEX",
                    severity: Severity::P0,
                    category: KILL_SWITCH,
                    finding_text: cap("X-Robots-Tag response header instructs noindex", FINDING_TEXT_CAP),
                    evidence_url: page.final_url.clone(),
                    evidence_snippet: cap(value, EVIDENCE_SNIPPET_CAP),
                    why_it_suppresses: "The X-Robots-Tag header overrides on-page signals and blocks indexing directly",
                    how_to_verify: "Inspect response headers for X-Robots-Tag: noindex",
                });
            }
        }
    }
    None
}

fn meta_robots_noindex(input: &ScanInput) -> Option<Finding> {
    for page in input.html_pages() {
        let Some(html) = &page.html else { continue };
        for tag_match in meta_tag_re().find_iter(html) {
            let tag = tag_match.as_str();
            let Some(name) = extract_attr(tag, "name") else { continue };
            if !name.eq_ignore_ascii_case("robots") {
                continue;
            }
            let Some(content) = extract_attr(tag, "content") else { continue };
            if content.to_ascii_lowercase().contains("noindex") {
                return Some(Finding {
                    root_cause_key: "META_ROBOTS_NOINDEX",
                    severity: Severity::P0,
                    category: KILL_SWITCH,
                    finding_text: cap("A meta robots tag instructs noindex", FINDING_TEXT_CAP),
                    evidence_url: page.final_url.clone(),
                    evidence_snippet: cap(tag, EVIDENCE_SNIPPET_CAP),
                    why_it_suppresses: "A page-level noindex directive removes that page from search results outright",
                    how_to_verify: "View source and look for <meta name=\"robots\" content=\"noindex\">",
                });
            }
        }
    }
    None
}

fn canonical_offdomain(input: &ScanInput) -> Option<Finding> {
    for page in input.html_pages() {
        let Some(html) = &page.html else { continue };
        let Ok(page_url) = Url::parse(&page.final_url) else { continue };
        for tag_match in link_tag_re().find_iter(html) {
            let tag = tag_match.as_str();
            let Some(rel) = extract_attr(tag, "rel") else { continue };
            if !rel.eq_ignore_ascii_case("canonical") {
                continue;
            }
            let Some(href) = extract_attr(tag, "href") else { continue };
            let Ok(canonical_url) = page_url.join(&href) else { continue };
            if canonical_url.host_str() != page_url.host_str() {
                return Some(Finding {
                    root_cause_key: "CANONICAL_OFFDOMAIN",
                    severity: Severity::P0,
                    category: KILL_SWITCH,
                    finding_text: cap("Canonical tag points to a different domain", FINDING_TEXT_CAP),
                    evidence_url: page.final_url.clone(),
                    evidence_snippet: cap(tag, EVIDENCE_SNIPPET_CAP),
                    why_it_suppresses: "Search engines consolidate ranking signal onto the canonical target, not this page",
                    how_to_verify: "Check <link rel=\"canonical\"> against the page's own hostname",
                });
            }
        }
    }
    None
}

fn missing_title(input: &ScanInput) -> Option<Finding> {
    for page in input.html_pages() {
        let Some(html) = &page.html else { continue };
        if extract_title(html).is_none() {
            return Some(Finding {
                root_cause_key: "MISSING_TITLE",
                severity: Severity::P2,
                category: MODERATE_DRAG,
                finding_text: cap("A page is missing a <title> element", FINDING_TEXT_CAP),
                evidence_url: page.final_url.clone(),
                evidence_snippet: cap("no <title>...</title> found in document", EVIDENCE_SNIPPET_CAP),
                why_it_suppresses: "Missing titles weaken click-through and relevance signal in search results",
                how_to_verify: "View source and confirm a <title> element is present",
            });
        }
    }
    None
}

fn dup_titles(input: &ScanInput) -> Option<Finding> {
    let mut by_title: HashMap<String, Vec<&HtmlArtifact>> = HashMap::new();
    for page in input.html_pages() {
        let Some(html) = &page.html else { continue };
        let Some(title) = extract_title(html) else { continue };
        if title.is_empty() {
            continue;
        }
        by_title.entry(title).or_default().push(page);
    }

    for page in input.html_pages() {
        let Some(html) = &page.html else { continue };
        let Some(title) = extract_title(html) else { continue };
        if let Some(pages) = by_title.get(&title) {
            if pages.len() >= 2 {
                return Some(Finding {
                    root_cause_key: "DUP_TITLES",
                    severity: Severity::P2,
                    category: MODERATE_DRAG,
                    finding_text: cap("Multiple pages share an identical <title>", FINDING_TEXT_CAP),
                    evidence_url: pages[0].final_url.clone(),
                    evidence_snippet: cap(&title, EVIDENCE_SNIPPET_CAP),
                    why_it_suppresses: "Duplicate titles blur topical distinction between pages and dilute ranking",
                    how_to_verify: "Compare <title> text across the listed pages",
                });
            }
        }
    }
    None
}

/// Run every rule once, in table order. Each rule contributes at most one
/// finding since `root_cause_key` values are fixed per rule.
pub fn analyze(input: &ScanInput) -> Vec<Finding> {
    [
        robots_disallow_all(input),
        x_robots_noindex(input),
        meta_robots_noindex(input),
        canonical_offdomain(input),
        missing_title(input),
        dup_titles(input),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Constraint, TextArtifact};
    use std::collections::BTreeMap;

    fn html_page(url: &str, html: &str) -> HtmlArtifact {
        HtmlArtifact {
            requested_url: url.to_string(),
            final_url: url.to_string(),
            status: 200,
            headers: BTreeMap::new(),
            html: Some(html.to_string()),
        }
    }

    fn base_input(homepage: HtmlArtifact) -> ScanInput {
        ScanInput {
            domain: "https://example.com".to_string(),
            scan_date: "2026-01-01".to_string(),
            baseline: None,
            homepage,
            robots_txt: None,
            sitemap_xml: None,
            extra_pages: Vec::new(),
            constraints: Vec::new(),
        }
    }

    #[test]
    fn detects_robots_disallow_all() {
        let mut input = base_input(html_page("https://example.com/", "<html><title>Home</title></html>"));
        input.robots_txt = Some(TextArtifact {
            requested_url: "https://example.com/robots.txt".to_string(),
            final_url: "https://example.com/robots.txt".to_string(),
            status: 200,
            headers: BTreeMap::new(),
            text: Some("User-agent: *\nDisallow: /".to_string()),
        });
        let findings = analyze(&input);
        assert!(findings.iter().any(|f| f.root_cause_key == "ROBOTS_DISALLOW_ALL"));
    }

    #[test]
    fn ignores_robots_disallow_for_specific_path() {
        let mut input = base_input(html_page("https://example.com/", "<html><title>Home</title></html>"));
        input.robots_txt = Some(TextArtifact {
            requested_url: "https://example.com/robots.txt".to_string(),
            final_url: "https://example.com/robots.txt".to_string(),
            status: 200,
            headers: BTreeMap::new(),
            text: Some("User-agent: *\nDisallow: /admin".to_string()),
        });
        let findings = analyze(&input);
        assert!(!findings.iter().any(|f| f.root_cause_key == "ROBOTS_DISALLOW_ALL"));
    }

    #[test]
    fn detects_x_robots_noindex_header() {
        let mut page = html_page("https://example.com/", "<html><title>Home</title></html>");
        page.headers.insert("x-robots-tag".to_string(), "noindex".to_string());
        let input = base_input(page);
        let findings = analyze(&input);
        assert!(findings.iter().any(|f| f.root_cause_key == "X_ROBOTS_NOINDEX"));
    }

    #[test]
    fn detects_meta_robots_noindex() {
        let input = base_input(html_page(
            "https://example.com/",
            r#"<html><head><title>Home</title><meta name="robots" content="noindex, nofollow"></head></html>"#,
        ));
        let findings = analyze(&input);
        assert!(findings.iter().any(|f| f.root_cause_key == "META_ROBOTS_NOINDEX"));
    }

    #[test]
    fn detects_canonical_offdomain() {
        let input = base_input(html_page(
            "https://example.com/",
            r#"<html><head><title>Home</title><link rel="canonical" href="https://other.example/"></head></html>"#,
        ));
        let findings = analyze(&input);
        assert!(findings.iter().any(|f| f.root_cause_key == "CANONICAL_OFFDOMAIN"));
    }

    #[test]
    fn detects_missing_title() {
        let input = base_input(html_page("https://example.com/", "<html><body>no title here</body></html>"));
        let findings = analyze(&input);
        assert!(findings.iter().any(|f| f.root_cause_key == "MISSING_TITLE"));
    }

    #[test]
    fn detects_duplicate_titles_across_pages_once() {
        let mut input = base_input(html_page("https://example.com/", "<html><title>Home</title></html>"));
        input.extra_pages.push(html_page(
            "https://example.com/about",
            "<html><title>Home</title></html>",
        ));
        input.extra_pages.push(html_page(
            "https://example.com/contact",
            "<html><title>Home</title></html>",
        ));
        let findings = analyze(&input);
        let dup_count = findings.iter().filter(|f| f.root_cause_key == "DUP_TITLES").count();
        assert_eq!(dup_count, 1);
    }

    #[test]
    fn clean_site_has_no_findings() {
        let input = base_input(html_page("https://example.com/", "<html><title>Unique Home</title></html>"));
        assert!(analyze(&input).is_empty());
    }

    #[test]
    fn constraint_tokens_are_exact() {
        assert_eq!(Constraint::FetchFailed.as_token(), "fetch_failed");
    }
}
