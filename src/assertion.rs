//! Assertion kinds, the operator table, and template selection.
//!
//! An operator token from a test expression maps to exactly one [`AssertionKind`].
//! The kind's name is what ends up after `assert` in the generated test
//! (`assertEquals`, `assertNotEmpty`, ...).

use std::fmt;

use serde::Serialize;

use crate::diagnostics::{ErrorContext, SourceArc};
use crate::syntax::{ParsedAssertion, RawAnnotationTag};
use crate::SkelError;

/// The semantic check a generated test performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssertionKind {
    Equals,
    NotEquals,
    Same,
    NotSame,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Exception,
    Empty,
    NotEmpty,
    InstanceOf,
    NotInstanceOf,
    Contains,
    NotContains,
    ArrayHasKey,
    ArrayNotHasKey,
    ObjectHasAttribute,
    ObjectNotHasAttribute,
    InternalType,
    NotInternalType,
    ContainsOnly,
    NotContainsOnly,
    Count,
    NotCount,
    FileExists,
    FileNotExists,
    RegExp,
    NotRegExp,
}

/// Every supported operator token, in the order they are documented.
pub const OPERATOR_TABLE: &[(&str, AssertionKind)] = &[
    ("==", AssertionKind::Equals),
    ("!=", AssertionKind::NotEquals),
    ("===", AssertionKind::Same),
    ("!==", AssertionKind::NotSame),
    (">", AssertionKind::GreaterThan),
    (">=", AssertionKind::GreaterThanOrEqual),
    ("<", AssertionKind::LessThan),
    ("<=", AssertionKind::LessThanOrEqual),
    ("throws", AssertionKind::Exception),
    ("empty", AssertionKind::Empty),
    ("!empty", AssertionKind::NotEmpty),
    ("instanceof", AssertionKind::InstanceOf),
    ("!instanceof", AssertionKind::NotInstanceOf),
    ("contains-value", AssertionKind::Contains),
    ("!contains-value", AssertionKind::NotContains),
    ("contains-key", AssertionKind::ArrayHasKey),
    ("!contains-key", AssertionKind::ArrayNotHasKey),
    ("contains-property", AssertionKind::ObjectHasAttribute),
    ("!contains-property", AssertionKind::ObjectNotHasAttribute),
    ("is-type", AssertionKind::InternalType),
    ("!is-type", AssertionKind::NotInternalType),
    ("contains-only-type", AssertionKind::ContainsOnly),
    ("!contains-only-type", AssertionKind::NotContainsOnly),
    ("count", AssertionKind::Count),
    ("!count", AssertionKind::NotCount),
    ("file-exists", AssertionKind::FileExists),
    ("!file-exists", AssertionKind::FileNotExists),
    ("matches", AssertionKind::RegExp),
    ("!matches", AssertionKind::NotRegExp),
];

impl AssertionKind {
    /// Looks up an operator token. Matching is exact and case-sensitive.
    pub fn from_operator(token: &str) -> Option<Self> {
        OPERATOR_TABLE
            .iter()
            .find(|(operator, _)| *operator == token)
            .map(|(_, kind)| *kind)
    }

    pub fn as_str(&self) -> &'static str {
        use AssertionKind::*;
        match self {
            Equals => "Equals",
            NotEquals => "NotEquals",
            Same => "Same",
            NotSame => "NotSame",
            GreaterThan => "GreaterThan",
            GreaterThanOrEqual => "GreaterThanOrEqual",
            LessThan => "LessThan",
            LessThanOrEqual => "LessThanOrEqual",
            Exception => "Exception",
            Empty => "Empty",
            NotEmpty => "NotEmpty",
            InstanceOf => "InstanceOf",
            NotInstanceOf => "NotInstanceOf",
            Contains => "Contains",
            NotContains => "NotContains",
            ArrayHasKey => "ArrayHasKey",
            ArrayNotHasKey => "ArrayNotHasKey",
            ObjectHasAttribute => "ObjectHasAttribute",
            ObjectNotHasAttribute => "ObjectNotHasAttribute",
            InternalType => "InternalType",
            NotInternalType => "NotInternalType",
            ContainsOnly => "ContainsOnly",
            NotContainsOnly => "NotContainsOnly",
            Count => "Count",
            NotCount => "NotCount",
            FileExists => "FileExists",
            FileNotExists => "FileNotExists",
            RegExp => "RegExp",
            NotRegExp => "NotRegExp",
        }
    }

    /// Kinds whose generated test checks a single value, with no expected argument.
    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            AssertionKind::Empty
                | AssertionKind::NotEmpty
                | AssertionKind::FileExists
                | AssertionKind::FileNotExists
        )
    }

    /// The opposite kind for the boolean group; `None` outside it.
    fn negated(&self) -> Option<Self> {
        match self {
            AssertionKind::Empty => Some(AssertionKind::NotEmpty),
            AssertionKind::NotEmpty => Some(AssertionKind::Empty),
            AssertionKind::FileExists => Some(AssertionKind::FileNotExists),
            AssertionKind::FileNotExists => Some(AssertionKind::FileExists),
            _ => None,
        }
    }
}

impl fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applies boolean normalization to a looked-up kind.
///
/// `empty FALSE` means "not empty" (and so on for the other three boolean kinds), so the
/// kind flips and `expected` is dropped. Every other combination passes through.
pub fn normalize(kind: AssertionKind, expected: &str) -> (AssertionKind, String) {
    match kind.negated() {
        Some(flipped) if expected.eq_ignore_ascii_case("FALSE") => (flipped, String::new()),
        _ => (kind, expected.to_string()),
    }
}

/// Which generated-method shape renders an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TemplateKind {
    Generic,
    GenericStatic,
    Boolean,
    BooleanStatic,
    Exception,
    ExceptionStatic,
}

impl TemplateKind {
    pub fn select(kind: AssertionKind, is_static: bool) -> Self {
        match (kind, is_static) {
            (AssertionKind::Exception, false) => TemplateKind::Exception,
            (AssertionKind::Exception, true) => TemplateKind::ExceptionStatic,
            (k, false) if k.is_boolean() => TemplateKind::Boolean,
            (k, true) if k.is_boolean() => TemplateKind::BooleanStatic,
            (_, false) => TemplateKind::Generic,
            (_, true) => TemplateKind::GenericStatic,
        }
    }

    /// Identifier of the template asset this kind renders with.
    pub fn template_id(&self) -> &'static str {
        match self {
            TemplateKind::Generic => "TestMethod",
            TemplateKind::GenericStatic => "TestMethodStatic",
            TemplateKind::Boolean => "TestMethodBool",
            TemplateKind::BooleanStatic => "TestMethodBoolStatic",
            TemplateKind::Exception => "TestMethodException",
            TemplateKind::ExceptionStatic => "TestMethodExceptionStatic",
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(
            self,
            TemplateKind::GenericStatic | TemplateKind::BooleanStatic | TemplateKind::ExceptionStatic
        )
    }
}

/// A parsed assertion after operator lookup, normalization and template selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedAssertion {
    pub kind: AssertionKind,
    pub arguments: String,
    /// Empty when normalization made it meaningless.
    pub expected: String,
    pub template: TemplateKind,
    pub is_static: bool,
}

impl MappedAssertion {
    /// Maps a parsed assertion, failing on an operator outside [`OPERATOR_TABLE`].
    pub fn map(
        parsed: ParsedAssertion,
        is_static: bool,
        tag: &RawAnnotationTag,
        source: &SourceArc,
    ) -> Result<Self, SkelError> {
        let kind = AssertionKind::from_operator(&parsed.operator).ok_or_else(|| {
            SkelError::unsupported_operator(
                parsed.operator.as_str(),
                tag.raw.as_str(),
                ErrorContext::with_source_and_span(SourceArc::clone(source), tag.span)
                    .with_help("run `skelgen operators` to list the supported operators"),
            )
        })?;
        let (kind, expected) = normalize(kind, &parsed.expected);

        Ok(Self {
            kind,
            arguments: parsed.arguments,
            expected,
            template: TemplateKind::select(kind, is_static),
            is_static,
        })
    }
}
