//! Rollup & Proof Picker (spec §4.7): severity counts, risk level, trajectory
//! relative to a caller-supplied baseline, and single proof-finding selection.

use crate::core::types::{
    Baseline, Counts, Evidence, Finding, Proof, ProofSeverity, RiskLevel, Severity, Trajectory,
};

fn cap(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

pub fn counts(findings: &[Finding]) -> Counts {
    let mut counts = Counts { p0: 0, p1: 0, p2: 0, p3: 0 };
    for finding in findings {
        match finding.severity {
            Severity::P0 => counts.p0 += 1,
            Severity::P1 => counts.p1 += 1,
            Severity::P2 => counts.p2 += 1,
            Severity::P3 => counts.p3 += 1,
        }
    }
    counts
}

pub fn risk_level(counts: &Counts) -> RiskLevel {
    if counts.p0 >= 1 || counts.p1 >= 3 {
        RiskLevel::RED
    } else if (1..=2).contains(&counts.p1) || counts.p2 >= 5 {
        RiskLevel::AMBER
    } else {
        RiskLevel::GREEN
    }
}

pub fn trajectory(baseline: Option<&Baseline>, current: RiskLevel) -> Option<Trajectory> {
    let baseline = baseline?;
    let from = baseline.risk_level;
    if from == current {
        return Some(Trajectory::STABLE);
    }
    use RiskLevel::*;
    Some(match (from, current) {
        (RED, AMBER) | (AMBER, GREEN) => Trajectory::DOWN,
        (GREEN, AMBER) | (AMBER, RED) | (GREEN, RED) => Trajectory::UP,
        _ => Trajectory::STABLE,
    })
}

pub fn interpretation(level: RiskLevel) -> String {
    let text = match level {
        RiskLevel::RED => "High suppression risk: indexing is being actively blocked or severely degraded.",
        RiskLevel::AMBER => "Moderate suppression risk: some signals drag on indexing but nothing blocks it outright.",
        RiskLevel::GREEN => "Low suppression risk: no material indexing blockers were found.",
    };
    cap(text, 150)
}

/// Lowest-severity finding wins, ranked P0 < P1 < P2 < P3. Falls back to a
/// canned proof pointing at the domain origin when no findings exist.
pub fn select_proof(findings: &[Finding], domain: &str) -> Proof {
    let mut ranked: Vec<&Finding> = findings.iter().collect();
    ranked.sort_by_key(|f| f.severity);

    match ranked.first() {
        Some(finding) => Proof {
            severity: finding.severity.clamp_for_proof(),
            category: finding.category.to_string(),
            finding: finding.finding_text.clone(),
            evidence: Evidence {
                url: finding.evidence_url.clone(),
                snippet: finding.evidence_snippet.clone(),
            },
            why_it_suppresses: finding.why_it_suppresses.to_string(),
            how_to_verify: finding.how_to_verify.to_string(),
        },
        None => Proof {
            severity: ProofSeverity::P2,
            category: "None".to_string(),
            finding: "No clear suppressors detected".to_string(),
            evidence: Evidence {
                url: domain.to_string(),
                snippet: String::new(),
            },
            why_it_suppresses: "No suppression signal was found across the scanned pages".to_string(),
            how_to_verify: "Re-run the scan after publishing content or template changes".to_string(),
        },
    }
}
