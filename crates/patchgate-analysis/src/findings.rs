//! Risk findings and the safety verdict they aggregate into.

use serde::Serialize;

/// Severity of a risk finding.
///
/// This enumeration is closed: the classifier never produces a value outside
/// it. Serialised lowercase in verdict output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The artifact could not be analysed at all (for example, it does not
    /// parse). Reported, but does not gate the boolean verdict on its own
    /// merit; the short-circuit path that produces it sets `safe = false`
    /// directly.
    Critical,
    /// A construct that must block the patch.
    High,
    /// A construct worth surfacing but not blocking.
    Medium,
    /// Informational.
    Low,
}

/// The one severity that flips [`SafetyVerdict::safe`] to false.
///
/// Only `high` gates safety; critical, medium, and low findings are reported
/// without affecting the boolean verdict. Deliberate policy, kept as a named
/// constant rather than a generalised threshold.
pub const SAFETY_GATE_SEVERITY: Severity = Severity::High;

/// A single risk finding discovered during tree traversal.
///
/// Findings are immutable and ordered by discovery (pre-order traversal),
/// not by severity or line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// How serious the finding is.
    pub severity: Severity,
    /// One-based source line, when known.
    pub line: Option<u32>,
    /// Human-readable description naming the offending construct.
    pub message: String,
}

impl Finding {
    /// Creates a finding pinned to a source line.
    #[must_use]
    pub fn new(severity: Severity, line: u32, message: impl Into<String>) -> Self {
        Self {
            severity,
            line: Some(line),
            message: message.into(),
        }
    }

    /// Creates a finding with no usable position.
    #[must_use]
    pub fn unpositioned(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            line: None,
            message: message.into(),
        }
    }
}

/// Overall safety verdict for one source artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyVerdict {
    /// True iff no finding has severity [`SAFETY_GATE_SEVERITY`].
    pub safe: bool,
    /// All findings, in discovery order.
    pub issues: Vec<Finding>,
}

impl SafetyVerdict {
    /// Builds a verdict from classified findings, applying the severity gate.
    #[must_use]
    pub fn from_findings(issues: Vec<Finding>) -> Self {
        let safe = !issues
            .iter()
            .any(|finding| finding.severity == SAFETY_GATE_SEVERITY);
        Self { safe, issues }
    }

    /// Builds the unsafe verdict for an artifact that could not be analysed.
    #[must_use]
    pub fn unanalysable(finding: Finding) -> Self {
        Self {
            safe: false,
            issues: vec![finding],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_severity_gates_safety() {
        let verdict = SafetyVerdict::from_findings(vec![Finding::new(Severity::High, 3, "bad")]);
        assert!(!verdict.safe);
    }

    #[test]
    fn medium_and_low_findings_do_not_gate_safety() {
        let verdict = SafetyVerdict::from_findings(vec![
            Finding::new(Severity::Medium, 1, "import"),
            Finding::new(Severity::Low, 2, "note"),
        ]);
        assert!(verdict.safe);
        assert_eq!(verdict.issues.len(), 2);
    }

    #[test]
    fn severity_serialises_lowercase() {
        let json = serde_json::to_string(&Severity::High).expect("serialise");
        assert_eq!(json, "\"high\"");
    }

    #[test]
    fn finding_without_line_serialises_null() {
        let finding = Finding::unpositioned(Severity::Critical, "unreadable");
        let json = serde_json::to_string(&finding).expect("serialise");
        assert!(json.contains("\"line\":null"));
    }
}
