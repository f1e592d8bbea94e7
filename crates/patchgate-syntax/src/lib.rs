//! Tree-sitter powered structural parsing for the Patchgate safety gate.
//!
//! This crate turns Python source text into a syntax tree that the analysis
//! layer can reason over. Tree-sitter is error-tolerant, so a parse always
//! yields a tree; error and missing nodes within that tree are surfaced as
//! structured [`SyntaxErrorInfo`] records, and callers that require a clean
//! tree use [`parse_python`], which converts the first such record into a
//! [`ParseFailure`].
//!
//! # Example
//!
//! ```
//! use patchgate_syntax::parse_python;
//!
//! let parsed = parse_python("def hello():\n    pass\n")?;
//! assert_eq!(parsed.root_node().kind(), "module");
//!
//! let failure = parse_python("def broken(").unwrap_err();
//! assert!(failure.line.is_some());
//! # Ok::<(), patchgate_syntax::ParseFailure>(())
//! ```

mod error;
mod parser;
mod position;

pub use error::{ParseFailure, SyntaxError};
pub use parser::{ParseResult, Parser, SyntaxErrorInfo, parse_python};
