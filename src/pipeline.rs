//! Pipeline orchestration: Normalize → Guard → Fetch(home) → Fetch(robots,
//! sitemap) → Extract → Select → Fetch(extras) → Analyze → Flag → Assemble
//! (spec §2, §5). Concurrency is bounded by `AppState::outbound_limit`;
//! ordering of artifacts stays deterministic regardless of completion order.

use std::future::Future;

use chrono::Utc;
use url::Url;

use crate::analyze::rules;
use crate::assemble;
use crate::core::app_state::AppState;
use crate::core::types::{Baseline, Constraint, HtmlArtifact, Report, ScanInput};
use crate::error::ScanError;
use crate::extract::{links, select};
use crate::net::{fetch, normalize, ssrf_guard};

async fn with_permit<T>(state: &AppState, fut: impl Future<Output = T>) -> T {
    let _permit = state
        .outbound_limit
        .acquire()
        .await
        .expect("outbound semaphore is never closed");
    fut.await
}

fn push_unique(constraints: &mut Vec<Constraint>, constraint: Constraint) {
    if !constraints.contains(&constraint) {
        constraints.push(constraint);
    }
}

fn merge_constraints(into: &mut Vec<Constraint>, from: Vec<Constraint>) {
    for c in from {
        push_unique(into, c);
    }
}

pub async fn run_scan(
    state: &AppState,
    raw_url: &str,
    baseline: Option<Baseline>,
) -> Result<Report, ScanError> {
    let origin = normalize::normalize_to_origin(raw_url)?;
    ssrf_guard::check(&origin)?;

    let mut constraints = Vec::new();

    let (homepage, homepage_constraints) =
        with_permit(state, fetch::fetch_html(&state.http_client, &origin)).await;
    merge_constraints(&mut constraints, homepage_constraints);

    if homepage.html.is_none() {
        return Err(ScanError::InsufficientData(format!(
            "homepage HTML unavailable for '{}' (status {})",
            origin, homepage.status
        )));
    }

    let robots_url = origin
        .join("robots.txt")
        .expect("origin path is always '/'");
    let sitemap_url = origin
        .join("sitemap.xml")
        .expect("origin path is always '/'");

    let ((robots_artifact, robots_constraints), (sitemap_artifact, sitemap_constraints)) = tokio::join!(
        with_permit(state, fetch::fetch_text(&state.http_client, &robots_url)),
        with_permit(state, fetch::fetch_text(&state.http_client, &sitemap_url)),
    );
    merge_constraints(&mut constraints, robots_constraints);
    merge_constraints(&mut constraints, sitemap_constraints);
    if robots_artifact.text.is_none() {
        push_unique(&mut constraints, Constraint::RobotsUnavailable);
    }
    if sitemap_artifact.text.is_none() {
        push_unique(&mut constraints, Constraint::SitemapUnavailable);
    }

    let homepage_final_url = Url::parse(&homepage.final_url).unwrap_or_else(|_| origin.clone());
    let nav_links = homepage
        .html
        .as_deref()
        .map(|html| links::extract_html_links(html, &homepage_final_url, &origin))
        .unwrap_or_default();

    let sitemap_locs = sitemap_artifact
        .text
        .as_deref()
        .map(|xml| links::extract_sitemap_locs(xml, &sitemap_url, &origin))
        .unwrap_or_default();

    let extra_urls = select::select_extra_pages(&nav_links, &sitemap_locs);

    let extra_results: Vec<(HtmlArtifact, Vec<Constraint>)> = futures::future::join_all(
        extra_urls
            .iter()
            .map(|url| with_permit(state, fetch::fetch_html(&state.http_client, url))),
    )
    .await;

    let mut extra_pages = Vec::with_capacity(extra_results.len());
    for (artifact, page_constraints) in extra_results {
        merge_constraints(&mut constraints, page_constraints);
        extra_pages.push(artifact);
    }

    let scan_input = ScanInput {
        domain: origin.to_string(),
        scan_date: Utc::now().format("%Y-%m-%d").to_string(),
        baseline,
        homepage,
        robots_txt: Some(robots_artifact),
        sitemap_xml: Some(sitemap_artifact),
        extra_pages,
        constraints,
    };

    let findings = rules::analyze(&scan_input);
    Ok(assemble::assemble(&scan_input, &findings))
}
