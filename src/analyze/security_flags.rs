//! Security Flag Detector (spec §4.8): substring scan over every fetched
//! HTML/text body for prompt-injection, schema-mimicry, and embedded
//! instruction patterns. Never logs the scanned content itself.

use crate::core::types::{ScanInput, SecurityFlag};

const PROMPT_INJECTION_PATTERNS: [&str; 5] = [
    "ignore previous instructions",
    "you are now",
    "system:",
    "assistant:",
    "human:",
];

const SCHEMA_MIMICRY_PATTERNS: [&str; 4] = [
    "\"schema_version\"",
    "output schema",
    "strict json",
    "error schema",
];

const INSTRUCTION_IN_HTML_PATTERNS: [&str; 3] = [
    "## system prompt",
    "critical security directive",
    "analysis rules",
];

fn corpus(input: &ScanInput) -> String {
    let mut parts = Vec::new();
    if let Some(html) = &input.homepage.html {
        parts.push(html.as_str());
    }
    if let Some(text) = input.robots_txt.as_ref().and_then(|a| a.text.as_deref()) {
        parts.push(text);
    }
    if let Some(text) = input.sitemap_xml.as_ref().and_then(|a| a.text.as_deref()) {
        parts.push(text);
    }
    for page in &input.extra_pages {
        if let Some(html) = &page.html {
            parts.push(html.as_str());
        }
    }
    parts.join(" ").to_ascii_lowercase()
}

pub fn detect(input: &ScanInput) -> Vec<SecurityFlag> {
    let haystack = corpus(input);
    let mut flags = Vec::new();

    if PROMPT_INJECTION_PATTERNS.iter().any(|p| haystack.contains(p)) {
        flags.push(SecurityFlag::PromptInjectionDetected);
    }
    if SCHEMA_MIMICRY_PATTERNS.iter().any(|p| haystack.contains(p)) {
        flags.push(SecurityFlag::SchemaMimicryDetected);
    }
    if INSTRUCTION_IN_HTML_PATTERNS.iter().any(|p| haystack.contains(p)) {
        flags.push(SecurityFlag::InstructionInHtmlDetected);
    }

    flags
}
