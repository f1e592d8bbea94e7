//! Syntax-tree safety classification of a single source artifact.
//!
//! The classifier walks the whole tree once, in pre-order, and matches two
//! node shapes against the configured [`RiskPolicy`]: call expressions whose
//! callee is a bare identifier, and `import` statements. Everything else
//! passes through untouched.

use patchgate_syntax::{ParseResult, parse_python};

use crate::findings::{Finding, SafetyVerdict, Severity};
use crate::risk::RiskPolicy;
use crate::tree::{node_line, node_text};

/// Tracing target for classification.
const CLASSIFY_TARGET: &str = "patchgate_analysis::classifier";

/// Walks syntax trees and reports risky constructs.
///
/// Stateless apart from its policy tables; classifying the same source twice
/// yields identical ordered finding sequences.
#[derive(Debug, Clone)]
pub struct SafetyClassifier {
    policy: RiskPolicy,
}

impl SafetyClassifier {
    /// Creates a classifier over the given risk policy.
    #[must_use]
    pub const fn new(policy: RiskPolicy) -> Self {
        Self { policy }
    }

    /// Classifies an already-parsed artifact.
    ///
    /// Returns findings in discovery order: a full pre-order traversal
    /// visiting every node exactly once, with no sorting applied.
    #[must_use]
    pub fn classify(&self, parsed: &ParseResult) -> Vec<Finding> {
        let mut findings = Vec::new();
        self.visit(parsed.root_node(), parsed.source(), &mut findings);
        findings
    }

    /// Parses and classifies raw source text.
    ///
    /// Never fails: source that does not parse short-circuits to an unsafe
    /// verdict containing a single critical finding carrying the parser's
    /// best-effort line and message.
    #[must_use]
    pub fn check_source(&self, source: &str) -> SafetyVerdict {
        match parse_python(source) {
            Ok(parsed) => SafetyVerdict::from_findings(self.classify(&parsed)),
            Err(failure) => {
                tracing::debug!(
                    target: CLASSIFY_TARGET,
                    line = failure.line,
                    "source failed to parse, reporting critical finding"
                );
                let finding = Finding {
                    severity: Severity::Critical,
                    line: failure.line,
                    message: format!("Syntax error: {}", failure.message),
                };
                SafetyVerdict::unanalysable(finding)
            }
        }
    }

    fn visit(&self, node: tree_sitter::Node<'_>, source: &str, findings: &mut Vec<Finding>) {
        match node.kind() {
            "call" => self.inspect_call(node, source, findings),
            "import_statement" => self.inspect_import(node, source, findings),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child, source, findings);
        }
    }

    /// Flags calls whose callee is a bare identifier in the call table.
    ///
    /// Attribute calls (`module.eval(...)`) and computed callees are not
    /// matched; only a direct identifier counts.
    fn inspect_call(&self, node: tree_sitter::Node<'_>, source: &str, findings: &mut Vec<Finding>) {
        let Some(callee) = node.child_by_field_name("function") else {
            return;
        };
        if callee.kind() != "identifier" {
            return;
        }
        let Some(name) = node_text(callee, source) else {
            return;
        };
        if let Some(severity) = self.policy.call_severity(name) {
            findings.push(Finding::new(
                severity,
                node_line(node),
                format!("Dangerous function call: {name}"),
            ));
        }
    }

    /// Flags `import` statements naming a module in the module table.
    ///
    /// One finding is emitted per matching imported name, all carrying the
    /// statement's line. `from x import y` is a different node kind and is
    /// deliberately not matched, mirroring the gate's original policy.
    fn inspect_import(
        &self,
        node: tree_sitter::Node<'_>,
        source: &str,
        findings: &mut Vec<Finding>,
    ) {
        let line = node_line(node);
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            let imported = match child.kind() {
                "dotted_name" => node_text(child, source),
                "aliased_import" => child
                    .child_by_field_name("name")
                    .and_then(|name| node_text(name, source)),
                _ => None,
            };
            let Some(module) = imported else {
                continue;
            };
            if let Some(severity) = self.policy.module_severity(module) {
                findings.push(Finding::new(
                    severity,
                    line,
                    format!("Potentially dangerous import: {module}"),
                ));
            }
        }
    }
}

impl Default for SafetyClassifier {
    fn default() -> Self {
        Self::new(RiskPolicy::default())
    }
}
