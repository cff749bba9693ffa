//! Syntax module for the `@assert` annotation mini-language.
//!
//! Reading an annotation is a two-stage process: [`extractor`] scans a doc comment
//! and isolates each tag occurrence, then [`parser`] splits one isolated test
//! expression into its arguments, operator and expected value.
//!
//! ```text
//! @assert[-<note>]
//!   [<preface line>]*
//!   (<arguments>) <operator> <expected>
//! ```

use serde::{Deserialize, Serialize};

pub mod extractor;
pub mod parser;

pub use extractor::extract_tags;
pub use parser::{parse_assertion, parse_constructor_args};

/// Represents a byte span in a doc comment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// One occurrence of an `@assert` tag inside a doc comment, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawAnnotationTag {
    /// The `<note>` from `@assert-<note>`, if present.
    pub note: Option<String>,
    /// Free-text lines between the tag keyword and the test expression.
    pub preface_lines: Vec<String>,
    /// The trimmed `(<arguments>) <operator> <expected>` line.
    pub test_expression: String,
    /// The tag text as written, from `@assert` through the end of the test expression.
    pub raw: String,
    /// Where `raw` sits in the doc comment.
    pub span: Span,
}

impl RawAnnotationTag {
    /// Renders the preface as comment lines ready to drop into a method body.
    ///
    /// Lines are joined with [`PREFACE_SEPARATOR`]; a non-empty preface is followed by a
    /// blank line so the assertion starts on its own line.
    pub fn preface_text(&self) -> String {
        if self.preface_lines.is_empty() {
            return String::new();
        }
        let joined = self
            .preface_lines
            .iter()
            .map(|line| format!("// {line}"))
            .collect::<Vec<_>>()
            .join(PREFACE_SEPARATOR);
        format!("{joined}\n{PREFACE_SEPARATOR}")
    }
}

/// Fixed separator between preface lines in a generated method body.
pub const PREFACE_SEPARATOR: &str = "\n\t\t";

/// A test expression split into its three parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedAssertion {
    /// Text between the opening `(` and the first `)`, trimmed.
    pub arguments: String,
    /// The operator token, exactly as written.
    pub operator: String,
    /// The rest of the line, trimmed. May be empty.
    pub expected: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_with_preface(lines: &[&str]) -> RawAnnotationTag {
        RawAnnotationTag {
            note: None,
            preface_lines: lines.iter().map(|l| l.to_string()).collect(),
            test_expression: "(1) == 1".to_string(),
            raw: String::new(),
            span: Span::default(),
        }
    }

    #[test]
    fn test_empty_preface_renders_nothing() {
        assert_eq!(tag_with_preface(&[]).preface_text(), "");
    }

    #[test]
    fn test_preface_lines_become_comments() {
        let tag = tag_with_preface(&["Adds two numbers.", "Order does not matter."]);
        assert_eq!(
            tag.preface_text(),
            "// Adds two numbers.\n\t\t// Order does not matter.\n\n\t\t"
        );
    }
}
