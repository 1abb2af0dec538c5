//! Link Extractor (spec §4.4): same-origin anchor targets from HTML, and
//! `<loc>` entries from sitemap XML.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

const BLOCKED_SCHEMES: [&str; 3] = ["mailto:", "tel:", "javascript:"];
const BLOCKED_EXTENSIONS: [&str; 8] = [
    ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".zip",
];

fn anchor_href_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?is)<a\b[^>]*\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap())
}

fn loc_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<loc>\s*([^<]*?)\s*</loc>").unwrap())
}

fn is_blocked_scheme(href: &str) -> bool {
    let lowered = href.trim().to_ascii_lowercase();
    BLOCKED_SCHEMES.iter().any(|s| lowered.starts_with(s))
}

fn has_blocked_extension(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    BLOCKED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Anchor targets in document order, resolved against `page_final_url`,
/// filtered to same-origin with `homepage_origin`, de-duplicated.
pub fn extract_html_links(html: &str, page_final_url: &Url, homepage_origin: &Url) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for caps in anchor_href_re().captures_iter(html) {
        let raw = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or("")
            .trim();
        if raw.is_empty() || is_blocked_scheme(raw) {
            continue;
        }

        let Ok(mut resolved) = page_final_url.join(raw) else {
            continue;
        };
        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }
        resolved.set_fragment(None);

        if !same_origin(&resolved, homepage_origin) || has_blocked_extension(&resolved) {
            continue;
        }

        if seen.insert(resolved.to_string()) {
            out.push(resolved);
        }
    }

    out
}

/// `<loc>` values in document order, resolved against `sitemap_url`,
/// filtered to same-origin with `homepage_origin`, de-duplicated.
pub fn extract_sitemap_locs(xml: &str, sitemap_url: &Url, homepage_origin: &Url) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for caps in loc_re().captures_iter(xml) {
        let raw = caps.get(1).map(|m| m.as_str()).unwrap_or("").trim();
        if raw.is_empty() {
            continue;
        }

        let Ok(resolved) = sitemap_url.join(raw) else {
            continue;
        };
        if !same_origin(&resolved, homepage_origin) {
            continue;
        }

        if seen.insert(resolved.to_string()) {
            out.push(resolved);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn extracts_same_origin_links_in_order() {
        let html = r#"<a href="/about">About</a><a href='/contact'>Contact</a>"#;
        let page = origin("https://example.com/");
        let links = extract_html_links(html, &page, &page);
        assert_eq!(
            links.iter().map(|u| u.path()).collect::<Vec<_>>(),
            vec!["/about", "/contact"]
        );
    }

    #[test]
    fn drops_blocked_schemes() {
        let html = r#"<a href="mailto:a@b.com">Mail</a><a href="tel:+1234">Tel</a><a href="javascript:void(0)">JS</a>"#;
        let page = origin("https://example.com/");
        assert!(extract_html_links(html, &page, &page).is_empty());
    }

    #[test]
    fn drops_off_origin_and_blocked_extensions() {
        let html = r#"<a href="https://other.example/page">Off</a><a href="/brochure.pdf">PDF</a><a href="/about">Ok</a>"#;
        let page = origin("https://example.com/");
        let links = extract_html_links(html, &page, &page);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].path(), "/about");
    }

    #[test]
    fn dedupes_and_clears_fragment() {
        let html = r#"<a href="/about#team">A</a><a href="/about">B</a>"#;
        let page = origin("https://example.com/");
        let links = extract_html_links(html, &page, &page);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "https://example.com/about");
    }

    #[test]
    fn extracts_sitemap_locs_same_origin_only() {
        let xml = r#"<urlset><url><loc>https://example.com/a</loc></url><url><loc>https://other.example/b</loc></url></urlset>"#;
        let sitemap = origin("https://example.com/sitemap.xml");
        let locs = extract_sitemap_locs(xml, &sitemap, &sitemap);
        assert_eq!(locs.len(), 1);
        assert_eq!(locs[0].path(), "/a");
    }
}
