//! Assembler (spec §4.9): builds the fixed-shape `Report` from a `ScanInput`
//! and its findings.

use crate::analyze::{rollup, security_flags};
use crate::core::types::{Cta, CtaEntry, Finding, Report, ScanInput, ScanMetadata, ScanResult};

const MODULE_READINESS_HINT: &str =
    "This screen covers public signals only; pair it with a manual crawl before remediation work begins.";
const CONFIDENCE_NOTE: &str = "Findings are derived from a bounded, unauthenticated fetch of a handful of pages and may not reflect the full site.";

pub fn assemble(input: &ScanInput, findings: &[Finding]) -> Report {
    let counts = rollup::counts(findings);
    let risk_level = rollup::risk_level(&counts);
    let trajectory = rollup::trajectory(input.baseline.as_ref(), risk_level);
    let proof = rollup::select_proof(findings, &input.domain);
    let flags = security_flags::detect(input);

    Report {
        schema_version: "1.0",
        scan_metadata: ScanMetadata {
            domain: input.domain.clone(),
            scan_date: input.scan_date.clone(),
            inputs_used: input.inputs_used(),
            inputs_missing: input.inputs_missing(),
            pages_analyzed: input.pages_analyzed(),
        },
        result: ScanResult {
            risk_level,
            trajectory,
            counts,
            interpretation: rollup::interpretation(risk_level),
        },
        proof,
        module_readiness_hint: MODULE_READINESS_HINT,
        confidence_note: CONFIDENCE_NOTE,
        security_flags: flags,
        cta: Cta {
            primary: CtaEntry {
                label: "Book Growth Blocker Audit".to_string(),
                description: "Get a human review of every suppression signal found here, prioritized and actioned."
                    .to_string(),
            },
            secondary: CtaEntry {
                label: "Learn About Core".to_string(),
                description: "See how continuous monitoring catches these issues before they cost you traffic."
                    .to_string(),
            },
        },
    }
}
