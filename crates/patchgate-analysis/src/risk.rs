//! Injectable risk policy for the safety classifier.
//!
//! The dangerous-call and dangerous-module tables are data, not compiled-in
//! constants, so a host can extend or reweight them without code changes.
//! [`RiskPolicy::default`] carries the canonical Python sets.

use std::collections::HashMap;

use crate::findings::Severity;

/// Symbol-to-severity tables consulted by the classifier.
///
/// Matching is purely syntactic: a call whose callee is a bare identifier in
/// the call table, or an `import` statement naming a module in the module
/// table. Aliases, re-exports, and indirect references are not resolved;
/// shadowed identifiers of the same name will match. Both false negatives
/// and false positives of that kind are accepted.
#[derive(Debug, Clone)]
pub struct RiskPolicy {
    calls: HashMap<String, Severity>,
    modules: HashMap<String, Severity>,
}

impl RiskPolicy {
    /// Creates an empty policy that flags nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            calls: HashMap::new(),
            modules: HashMap::new(),
        }
    }

    /// Adds or reweights a dangerous callee identifier.
    #[must_use]
    pub fn with_call(mut self, name: impl Into<String>, severity: Severity) -> Self {
        self.calls.insert(name.into(), severity);
        self
    }

    /// Adds or reweights a dangerous module name.
    #[must_use]
    pub fn with_module(mut self, name: impl Into<String>, severity: Severity) -> Self {
        self.modules.insert(name.into(), severity);
        self
    }

    /// Returns the severity assigned to a callee identifier, if flagged.
    #[must_use]
    pub fn call_severity(&self, name: &str) -> Option<Severity> {
        self.calls.get(name).copied()
    }

    /// Returns the severity assigned to an imported module, if flagged.
    #[must_use]
    pub fn module_severity(&self, name: &str) -> Option<Severity> {
        self.modules.get(name).copied()
    }
}

impl Default for RiskPolicy {
    /// The canonical Python risk tables: dynamic code evaluation primitives
    /// at high severity; process- and interpreter-facing modules at medium.
    fn default() -> Self {
        Self::empty()
            .with_call("eval", Severity::High)
            .with_call("exec", Severity::High)
            .with_call("__import__", Severity::High)
            .with_module("os", Severity::Medium)
            .with_module("subprocess", Severity::Medium)
            .with_module("sys", Severity::Medium)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("eval")]
    #[case("exec")]
    #[case("__import__")]
    fn default_policy_flags_dynamic_evaluation(#[case] name: &str) {
        let policy = RiskPolicy::default();
        assert_eq!(policy.call_severity(name), Some(Severity::High));
    }

    #[rstest]
    #[case("os")]
    #[case("subprocess")]
    #[case("sys")]
    fn default_policy_flags_process_modules(#[case] name: &str) {
        let policy = RiskPolicy::default();
        assert_eq!(policy.module_severity(name), Some(Severity::Medium));
    }

    #[test]
    fn unlisted_symbols_are_clean() {
        let policy = RiskPolicy::default();
        assert_eq!(policy.call_severity("print"), None);
        assert_eq!(policy.module_severity("json"), None);
    }

    #[test]
    fn policy_is_extensible() {
        let policy = RiskPolicy::default().with_call("compile", Severity::High);
        assert_eq!(policy.call_severity("compile"), Some(Severity::High));
    }
}
