use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Findings and proof are ranked on this order: P0 is most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    P0,
    P1,
    P2,
    P3,
}

/// External contract never exposes P3 as a proof severity (see `clamp_for_proof`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofSeverity {
    P0,
    P1,
    P2,
}

impl Severity {
    pub fn clamp_for_proof(self) -> ProofSeverity {
        match self {
            Severity::P0 => ProofSeverity::P0,
            Severity::P1 => ProofSeverity::P1,
            Severity::P2 | Severity::P3 => ProofSeverity::P2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    RED,
    AMBER,
    GREEN,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trajectory {
    UP,
    STABLE,
    DOWN,
}

/// Closed vocabulary for `inputs_used` / `inputs_missing` (spec §6.1, §3 invariants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSlot {
    Homepage,
    RobotsTxt,
    SitemapXml,
    ExtraPages,
}

impl InputSlot {
    pub const ALL: [InputSlot; 4] = [
        InputSlot::Homepage,
        InputSlot::RobotsTxt,
        InputSlot::SitemapXml,
        InputSlot::ExtraPages,
    ];
}

/// Closed constraints vocabulary (spec §6.4). Never re-exposed verbatim in the
/// public report; it only informs `inputs_missing` and internal logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    NonHtmlPage,
    FetchFailed,
    RobotsUnavailable,
    SitemapUnavailable,
    TruncatedDueToLimits,
}

impl Constraint {
    pub fn as_token(self) -> &'static str {
        match self {
            Constraint::NonHtmlPage => "non_html_homepage_or_page",
            Constraint::FetchFailed => "fetch_failed",
            Constraint::RobotsUnavailable => "robots_unavailable",
            Constraint::SitemapUnavailable => "sitemap_unavailable",
            Constraint::TruncatedDueToLimits => "truncated_due_to_limits",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityFlag {
    #[serde(rename = "PROMPT_INJECTION_DETECTED")]
    PromptInjectionDetected,
    #[serde(rename = "SCHEMA_MIMICRY_DETECTED")]
    SchemaMimicryDetected,
    #[serde(rename = "INSTRUCTION_IN_HTML_DETECTED")]
    InstructionInHtmlDetected,
}

/// An HTML page fetch: homepage or an extra linked page.
#[derive(Debug, Clone)]
pub struct HtmlArtifact {
    pub requested_url: String,
    pub final_url: String,
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub html: Option<String>,
}

/// A text fetch: robots.txt or sitemap.xml.
#[derive(Debug, Clone)]
pub struct TextArtifact {
    pub requested_url: String,
    pub final_url: String,
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub text: Option<String>,
}

/// Caller-supplied prior scan, used only to compute `trajectory`.
#[derive(Debug, Clone, Deserialize)]
pub struct Baseline {
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub scan_date: Option<String>,
    #[serde(default)]
    pub p0: Option<u32>,
    #[serde(default)]
    pub p1: Option<u32>,
    #[serde(default)]
    pub p2: Option<u32>,
    #[serde(default)]
    pub p3: Option<u32>,
}

/// Internal snapshot handed to the analyzer. Never serialized externally.
#[derive(Debug, Clone)]
pub struct ScanInput {
    pub domain: String,
    pub scan_date: String,
    pub baseline: Option<Baseline>,
    pub homepage: HtmlArtifact,
    pub robots_txt: Option<TextArtifact>,
    pub sitemap_xml: Option<TextArtifact>,
    pub extra_pages: Vec<HtmlArtifact>,
    pub constraints: Vec<Constraint>,
}

impl ScanInput {
    pub fn pages_analyzed(&self) -> usize {
        1 + self.extra_pages.len()
    }

    /// All HTML pages with a body, homepage first then extras in selection order.
    pub fn html_pages(&self) -> Vec<&HtmlArtifact> {
        let mut pages = Vec::with_capacity(1 + self.extra_pages.len());
        if self.homepage.html.is_some() {
            pages.push(&self.homepage);
        }
        pages.extend(self.extra_pages.iter().filter(|p| p.html.is_some()));
        pages
    }

    pub fn inputs_used(&self) -> Vec<InputSlot> {
        InputSlot::ALL
            .into_iter()
            .filter(|slot| self.slot_present(*slot))
            .collect()
    }

    pub fn inputs_missing(&self) -> Vec<InputSlot> {
        InputSlot::ALL
            .into_iter()
            .filter(|slot| !self.slot_present(*slot))
            .collect()
    }

    fn slot_present(&self, slot: InputSlot) -> bool {
        match slot {
            InputSlot::Homepage => self.homepage.html.is_some(),
            InputSlot::RobotsTxt => self.robots_txt.as_ref().is_some_and(|a| a.text.is_some()),
            InputSlot::SitemapXml => self.sitemap_xml.as_ref().is_some_and(|a| a.text.is_some()),
            InputSlot::ExtraPages => !self.extra_pages.is_empty(),
        }
    }
}

/// An analyzer-internal finding, keyed by root cause (spec §3, §4.6).
#[derive(Debug, Clone)]
pub struct Finding {
    pub root_cause_key: &'static str,
    pub severity: Severity,
    pub category: &'static str,
    pub finding_text: String,
    pub evidence_url: String,
    pub evidence_snippet: String,
    pub why_it_suppresses: &'static str,
    pub how_to_verify: &'static str,
}

// ---------------------------------------------------------------------------
// Output document shapes (spec §6.2, §6.3)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ScanMetadata {
    pub domain: String,
    pub scan_date: String,
    pub inputs_used: Vec<InputSlot>,
    pub inputs_missing: Vec<InputSlot>,
    pub pages_analyzed: usize,
}

#[derive(Debug, Serialize)]
pub struct Counts {
    pub p0: u32,
    pub p1: u32,
    pub p2: u32,
    pub p3: u32,
}

#[derive(Debug, Serialize)]
pub struct ScanResult {
    pub risk_level: RiskLevel,
    pub trajectory: Option<Trajectory>,
    pub counts: Counts,
    pub interpretation: String,
}

#[derive(Debug, Serialize)]
pub struct Evidence {
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Serialize)]
pub struct Proof {
    pub severity: ProofSeverity,
    pub category: String,
    pub finding: String,
    pub evidence: Evidence,
    pub why_it_suppresses: String,
    pub how_to_verify: String,
}

#[derive(Debug, Serialize)]
pub struct CtaEntry {
    pub label: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct Cta {
    pub primary: CtaEntry,
    pub secondary: CtaEntry,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub schema_version: &'static str,
    pub scan_metadata: ScanMetadata,
    pub result: ScanResult,
    pub proof: Proof,
    pub module_readiness_hint: &'static str,
    pub confidence_note: &'static str,
    pub security_flags: Vec<SecurityFlag>,
    pub cta: Cta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorType {
    #[serde(rename = "INVALID_URL")]
    InvalidUrl,
    #[serde(rename = "INSUFFICIENT_DATA")]
    InsufficientData,
    #[serde(rename = "FETCH_FAILED")]
    FetchFailed,
}

#[derive(Debug, Serialize)]
pub struct ErrorDoc {
    pub schema_version: &'static str,
    pub error: bool,
    pub error_type: ErrorType,
    pub error_message: String,
    pub partial_result: Option<()>,
}

impl ErrorDoc {
    pub fn new(error_type: ErrorType, error_message: impl Into<String>) -> Self {
        Self {
            schema_version: "1.0",
            error: true,
            error_type,
            error_message: error_message.into(),
            partial_result: None,
        }
    }
}

/// Tagged variant at the output boundary (spec §9 "polymorphism over errors").
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ScanOutcome {
    Success(Report),
    Error(ErrorDoc),
}

/// Inbound request body for `POST /scan`.
#[derive(Debug, Deserialize, Default)]
pub struct ScanRequestBody {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub baseline: Option<Baseline>,
}
