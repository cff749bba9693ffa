//! Assertion Parser - splits one isolated test expression.
//!
//! Input is the single line a tag ends with, e.g. `(2, 3) == 5`. The grammar lives in
//! `syntax/grammar.pest`. The arguments capture ends at the first `)`, so an argument
//! that itself contains a parenthesis is cut short; annotation authors rely on that
//! cut point, so it is kept.

use pest::{error::Error, Parser};
use pest_derive::Parser;

use super::{ParsedAssertion, RawAnnotationTag};
use crate::diagnostics::SourceArc;
use crate::{err_ctx, SkelError};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct AssertionGrammar;

const EXPECTED_SHAPE: &str = "write the test as `(<arguments>) <operator> <expected>`, e.g. `(2, 3) == 5`";

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse the test expression of `tag` into arguments, operator and expected value.
///
/// `source` is the doc comment the tag came from; it is attached to any error.
pub fn parse_assertion(
    tag: &RawAnnotationTag,
    source: &SourceArc,
) -> Result<ParsedAssertion, SkelError> {
    let expression = tag.test_expression.as_str();
    let pairs = AssertionGrammar::parse(Rule::assertion, expression)
        .map_err(|e| convert_parse_error(e, tag, source))?;

    let mut parsed = ParsedAssertion {
        arguments: String::new(),
        operator: String::new(),
        expected: String::new(),
    };
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::arguments => parsed.arguments = pair.as_str().trim().to_string(),
            Rule::operator => parsed.operator = pair.as_str().to_string(),
            Rule::expected => parsed.expected = pair.as_str().trim().to_string(),
            _ => {}
        }
    }

    Ok(parsed)
}

/// Extract the `(<args>)` of a class-level constructor tag.
///
/// The arguments run to the last `)` on the line, so nested calls are kept whole;
/// anything after it is ignored. Returns `None` when the expression does not open
/// with a parenthesized group.
pub fn parse_constructor_args(expression: &str) -> Option<String> {
    let pairs = AssertionGrammar::parse(Rule::constructor, expression).ok()?;
    pairs
        .flatten()
        .find(|pair| pair.as_rule() == Rule::constructor_arguments)
        .map(|pair| pair.as_str().to_string())
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

fn convert_parse_error(error: Error<Rule>, tag: &RawAnnotationTag, source: &SourceArc) -> SkelError {
    let expression = tag.test_expression.trim_start();

    let problem = if expression.is_empty() {
        "no test expression"
    } else if !expression.starts_with('(') {
        "test expression must start with `(`"
    } else if !expression.contains(')') {
        "missing closing `)` after the arguments"
    } else {
        "missing operator after the arguments"
    };

    let message = format!("{} in @assert tag `{}`", problem, tag.raw);
    err_ctx!(Parse, message, source, tag.span, EXPECTED_SHAPE).caused_by(error)
}
