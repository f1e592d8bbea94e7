//! Structural analysis of machine-generated Python patches.
//!
//! This crate implements the two analysers at the heart of the Patchgate
//! safety gate:
//!
//! - **Safety classification** via [`SafetyClassifier`]: walks the syntax
//!   tree of a single source artifact and reports risky constructs (dynamic
//!   evaluation calls, dangerous module imports) as [`Finding`]s, aggregated
//!   into a [`SafetyVerdict`].
//! - **Patch validation** via [`validate_patch`]: compares an original and a
//!   patched version of a file against a [`ConstraintSet`], combining a
//!   change-magnitude metric, syntax checks, and an API-preservation diff
//!   over extracted [`SignatureMap`]s into a [`PatchVerdict`].
//!
//! Both analysers are pure functions of their inputs: no state is retained
//! across calls, and no call ever panics or propagates an error past its
//! public contract. Unparsable input is itself a reported finding.
//!
//! # Example
//!
//! ```
//! use patchgate_analysis::{RiskPolicy, SafetyClassifier, Severity};
//!
//! let classifier = SafetyClassifier::new(RiskPolicy::default());
//! let verdict = classifier.check_source("eval('1+1')\n");
//!
//! assert!(!verdict.safe);
//! assert_eq!(verdict.issues[0].severity, Severity::High);
//! ```

mod classifier;
mod findings;
mod risk;
mod signatures;
mod tree;
mod validator;

pub use classifier::SafetyClassifier;
pub use findings::{Finding, SAFETY_GATE_SEVERITY, SafetyVerdict, Severity};
pub use risk::RiskPolicy;
pub use signatures::{SignatureMap, extract_signatures, extract_signatures_from_source};
pub use validator::{ConstraintSet, PatchVerdict, validate_patch};
