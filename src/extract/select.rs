//! Page Selector (spec §4.5): deterministic ranking over homepage links plus
//! the first sitemap locations, merged into the extra-page fetch list.

use std::collections::HashSet;

use url::Url;

const KEYWORDS: [&str; 8] = [
    "contact",
    "about",
    "services",
    "service",
    "pricing",
    "book",
    "audit",
    "diagnostic",
];

const NO_MATCH_SCORE: u32 = 999;

fn score(path: &str) -> u32 {
    let lowered = path.to_ascii_lowercase();
    KEYWORDS
        .iter()
        .position(|kw| lowered.contains(kw))
        .map(|i| i as u32)
        .unwrap_or(NO_MATCH_SCORE)
}

/// ≤3 nav links, ranked by keyword priority then pathname length then
/// lexicographic pathname; root path excluded.
pub fn select_nav_pages(links: &[Url]) -> Vec<Url> {
    let mut candidates: Vec<&Url> = links.iter().filter(|u| u.path() != "/").collect();
    candidates.sort_by(|a, b| {
        score(a.path())
            .cmp(&score(b.path()))
            .then_with(|| a.path().len().cmp(&b.path().len()))
            .then_with(|| a.path().cmp(b.path()))
    });
    candidates.into_iter().take(3).cloned().collect()
}

/// ≤2 sitemap locations, in document order, root path excluded.
pub fn select_sitemap_pages(locs: &[Url]) -> Vec<Url> {
    locs.iter()
        .filter(|u| u.path() != "/")
        .take(2)
        .cloned()
        .collect()
}

/// `nav_picks ++ sitemap_picks`, de-duplicated preserving order.
pub fn select_extra_pages(nav_links: &[Url], sitemap_locs: &[Url]) -> Vec<Url> {
    let nav_picks = select_nav_pages(nav_links);
    let sitemap_picks = select_sitemap_pages(sitemap_locs);

    let mut seen: HashSet<String> = nav_picks.iter().map(|u| u.to_string()).collect();
    let mut out = nav_picks;
    for url in sitemap_picks {
        if seen.insert(url.to_string()) {
            out.push(url);
        }
    }
    out
}
