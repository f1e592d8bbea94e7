//! Tree-sitter parsing wrapper with error recovery.
//!
//! Wraps the raw Tree-sitter parser configured with the Python grammar and
//! provides structured access to parse results and syntax errors. Tree-sitter
//! is error-tolerant, so a parse result may contain both a valid tree and
//! error nodes; [`parse_python`] is the strict entry point that rejects such
//! trees with a [`ParseFailure`].

use std::ops::Range;

use crate::error::{ParseFailure, SyntaxError};
use crate::position::point_to_one_based;

/// Result of parsing Python source code.
///
/// Owns both the syntax tree and the source it was parsed from, so analyses
/// can resolve node byte ranges back to text without carrying a second
/// reference around.
#[derive(Debug)]
pub struct ParseResult {
    tree: tree_sitter::Tree,
    source: String,
}

impl ParseResult {
    /// Returns the source code that was parsed.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the root node of the syntax tree.
    #[must_use]
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Returns whether the parse result contains any syntax errors.
    ///
    /// Tree-sitter produces ERROR and MISSING nodes for portions of the
    /// source that could not be parsed according to the grammar.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        has_error_nodes(self.tree.root_node())
    }

    /// Collects all syntax errors found in the parse result.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &self.source, &mut errors);
        errors
    }

    /// Returns the first syntax error in document order, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<SyntaxErrorInfo> {
        self.errors().into_iter().next()
    }
}

/// Information about a syntax error found during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Byte range of the error in the source.
    pub byte_range: Range<usize>,
    /// Line number (one-based) where the error starts.
    pub line: u32,
    /// Column number (one-based) where the error starts.
    pub column: u32,
    /// A snippet of the problematic source text.
    pub context: String,
    /// Human-readable description of the error.
    pub message: String,
}

impl SyntaxErrorInfo {
    /// Creates a new syntax error info from a Tree-sitter node.
    fn from_node(node: tree_sitter::Node<'_>, source: &str) -> Self {
        let start = node.start_position();
        let byte_range = node.byte_range();

        // The text of the error node, truncated if too long.
        let context = source
            .get(byte_range.clone())
            .map(|s| {
                if s.len() > 50 {
                    let truncated: String = s.chars().take(47).collect();
                    format!("{truncated}...")
                } else {
                    s.to_owned()
                }
            })
            .unwrap_or_default();

        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "invalid syntax".to_owned()
        };

        let (line, column) = point_to_one_based(start);

        Self {
            byte_range,
            line,
            column,
            context,
            message,
        }
    }
}

/// Tree-sitter parser wrapper configured for Python.
pub struct Parser {
    inner: tree_sitter::Parser,
}

impl Parser {
    /// Creates a new Python parser.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tree-sitter parser cannot be initialised with
    /// the Python grammar.
    pub fn new() -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| SyntaxError::parser_init(e.to_string()))?;

        Ok(Self { inner })
    }

    /// Parses Python source code and returns the result.
    ///
    /// Tree-sitter is error-tolerant, so this method will return a parse
    /// result even if the source contains syntax errors. Use
    /// [`ParseResult::has_errors`] to check for errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the parser fails to produce a syntax tree. This
    /// is rare and typically indicates a parser configuration issue.
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse("parsing failed"))?;

        Ok(ParseResult {
            tree,
            source: source.to_owned(),
        })
    }
}

/// Parses Python source, requiring an error-free tree.
///
/// This is the strict entry point used by the analysers: any syntax error in
/// the source, and any failure of the parsing infrastructure, is converted
/// into a [`ParseFailure`] carrying a best-effort one-based line number.
///
/// # Errors
///
/// Returns a [`ParseFailure`] when the source does not parse cleanly.
pub fn parse_python(source: &str) -> Result<ParseResult, ParseFailure> {
    let mut parser = Parser::new()?;
    let parsed = parser.parse(source)?;

    match parsed.first_error() {
        Some(error) => Err(ParseFailure::at_line(error.line, error.message)),
        None => Ok(parsed),
    }
}

/// Recursively checks if a node or any of its descendants is an ERROR node.
fn has_error_nodes(node: tree_sitter::Node<'_>) -> bool {
    if node.is_error() || node.is_missing() {
        return true;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if has_error_nodes(child) {
            return true;
        }
    }

    false
}

/// Recursively collects all ERROR nodes from a syntax tree.
fn collect_error_nodes(
    node: tree_sitter::Node<'_>,
    source: &str,
    errors: &mut Vec<SyntaxErrorInfo>,
) {
    if node.is_error() || node.is_missing() {
        errors.push(SyntaxErrorInfo::from_node(node, source));
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, source, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("def hello():\n    pass\n")]
    #[case("x = 1\ny = x + 2\n")]
    #[case("")]
    fn parser_parses_valid_source(#[case] source: &str) {
        let mut parser = Parser::new().expect("parser init");
        let result = parser.parse(source).expect("parse");

        assert!(!result.has_errors());
        assert_eq!(result.source(), source);
    }

    #[rstest]
    #[case("def broken(")]
    #[case("if True\n    pass\n")]
    #[case("return =")]
    fn parser_detects_syntax_errors(#[case] source: &str) {
        let mut parser = Parser::new().expect("parser init");
        let result = parser.parse(source).expect("parse");

        assert!(result.has_errors());
        assert!(!result.errors().is_empty());
    }

    #[test]
    fn syntax_error_info_has_line_and_column() {
        let mut parser = Parser::new().expect("parser init");
        let result = parser
            .parse("def ok():\n    pass\n\ndef broken(\n")
            .expect("parse");

        let errors = result.errors();
        assert!(!errors.is_empty());

        let first_error = errors.first().expect("has error");
        assert!(first_error.line >= 1);
        assert!(first_error.column >= 1);
    }

    #[test]
    fn parse_python_accepts_clean_source() {
        let parsed = parse_python("def f(a, b):\n    return a + b\n").expect("clean parse");
        assert_eq!(parsed.root_node().kind(), "module");
    }

    #[test]
    fn parse_python_reports_first_error_line() {
        let failure = parse_python("x = 1\ndef broken(\n").expect_err("must fail");
        assert!(failure.line.is_some());
        assert!(!failure.message.is_empty());
    }
}
