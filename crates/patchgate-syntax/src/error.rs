//! Error types for structural parsing.
//!
//! Two levels of failure exist: [`SyntaxError`] covers infrastructure
//! problems (parser initialisation, parser refusing to produce a tree), and
//! [`ParseFailure`] is the analyser-facing contract for "this source does not
//! parse", carrying a best-effort line number.

use std::fmt;

use thiserror::Error;

/// Errors from the parsing infrastructure itself.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Failed to initialise the Tree-sitter parser with the Python grammar.
    #[error("failed to initialise Python parser: {message}")]
    ParserInit {
        /// Description of the failure.
        message: String,
    },

    /// The parser did not produce a syntax tree.
    #[error("failed to parse Python source: {message}")]
    Parse {
        /// Description of the failure.
        message: String,
    },
}

impl SyntaxError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(message: impl Into<String>) -> Self {
        Self::ParserInit {
            message: message.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// A structured "source does not parse" report.
///
/// Produced by [`parse_python`](crate::parse_python) when the source contains
/// syntax errors or when the parsing infrastructure fails. The line number is
/// one-based and best-effort: infrastructure failures carry no position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseFailure {
    /// One-based line of the first syntax error, when known.
    pub line: Option<u32>,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ParseFailure {
    /// Creates a failure pinned to a source line.
    #[must_use]
    pub fn at_line(line: u32, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }

    /// Creates a failure with no usable position.
    #[must_use]
    pub fn unpositioned(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }
}

impl From<SyntaxError> for ParseFailure {
    fn from(error: SyntaxError) -> Self {
        Self::unpositioned(error.to_string())
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(line) = self.line {
            write!(f, " at line {line}")?;
        }
        Ok(())
    }
}
