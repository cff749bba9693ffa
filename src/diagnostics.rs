//!
//! ****************************************************************************************
//! ** ERROR CONSTRUCTION RULES FOR Skelgen Error Macros (`err_msg!`, `err_ctx!`)          **
//! ****************************************************************************************
//!
//! # Overview
//!
//! This module defines the unified, `miette`-based diagnostic system for skelgen. Every
//! failure of a generation run (a malformed `@assert` tag, an operator outside the mapping
//! table, missing class metadata, an unknown template) is represented by [`SkelError`].
//! Errors raised while reading a doc comment carry that doc comment as their named source
//! and the offending tag as their primary span, so `miette` can underline the tag.
//!
//! # Error Construction Macros
//!
//! - **Use `err_msg!` for simple, message-only errors.**
//!   - `err_msg!(MetadataUnavailable, "class `{}` has no metadata", name)`
//!
//! - **Use `err_ctx!` for errors with a source and span.**
//!   - `err_ctx!(Parse, "expected `(`", src, span)`
//!
//! - **Use [`SkelError::unsupported_operator`] for unknown operators.**
//!   The variant carries the token verbatim, so it does not fit the macros.
//!
//! # Rules
//!
//! - Pass `src` as a `&SourceArc`; the macros clone the `Arc` themselves.
//! - Never pass a bare offset as a span. Build a [`Span`].
//! - Messages quote the raw tag text whenever a tag is involved.
//!
//! ****************************************************************************************

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use crate::Span;

pub type SourceArc = Arc<NamedSource<String>>;

/// Type-safe error classification enum that corresponds to SkelError variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// A test expression that does not have the `(args) operator expected` shape
    Parse,
    /// An operator token outside the mapping table
    UnsupportedOperator,
    /// The metadata provider had nothing usable for the requested class
    MetadataUnavailable,
    /// A template identifier the renderer does not know
    Template,
    /// I/O and decoding failures in the driver
    Internal,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Parse => "Parse",
            ErrorType::UnsupportedOperator => "UnsupportedOperator",
            ErrorType::MetadataUnavailable => "MetadataUnavailable",
            ErrorType::Template => "Template",
            ErrorType::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The doc comment (or file) the error points into.
    pub source: Option<SourceArc>,
    /// The primary span for this error (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Unified error type for every way a generation run can fail.
///
/// All variants are fatal: the run that raised one produces no output.
#[derive(Debug, Error)]
pub enum SkelError {
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Unsupported operator `{operator}` in @assert tag `{tag}`")]
    UnsupportedOperator {
        operator: String,
        tag: String,
        ctx: ErrorContext,
    },
    #[error("Metadata unavailable: {message}")]
    MetadataUnavailable {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Template error: {message}")]
    Template {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl SkelError {
    /// Builds the error for an operator token missing from the mapping table.
    pub fn unsupported_operator(
        operator: impl Into<String>,
        tag: impl Into<String>,
        ctx: ErrorContext,
    ) -> Self {
        SkelError::UnsupportedOperator {
            operator: operator.into(),
            tag: tag.into(),
            ctx,
        }
    }

    /// Attaches an underlying cause. Ignored for variants without a cause slot.
    pub fn caused_by(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        match &mut self {
            SkelError::Parse { source, .. }
            | SkelError::MetadataUnavailable { source, .. }
            | SkelError::Template { source, .. }
            | SkelError::Internal { source, .. } => *source = Some(Box::new(cause)),
            SkelError::UnsupportedOperator { .. } => {}
        }
        self
    }

    fn get_ctx(&self) -> &ErrorContext {
        match self {
            SkelError::Parse { ctx, .. } => ctx,
            SkelError::UnsupportedOperator { ctx, .. } => ctx,
            SkelError::MetadataUnavailable { ctx, .. } => ctx,
            SkelError::Template { ctx, .. } => ctx,
            SkelError::Internal { ctx, .. } => ctx,
        }
    }

    /// Returns the type-safe error classification for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            SkelError::Parse { .. } => ErrorType::Parse,
            SkelError::UnsupportedOperator { .. } => ErrorType::UnsupportedOperator,
            SkelError::MetadataUnavailable { .. } => ErrorType::MetadataUnavailable,
            SkelError::Template { .. } => ErrorType::Template,
            SkelError::Internal { .. } => ErrorType::Internal,
        }
    }

    fn label_text(&self) -> String {
        match self {
            SkelError::UnsupportedOperator { operator, .. } => {
                format!("unsupported operator `{operator}`")
            }
            SkelError::Parse { message, .. }
            | SkelError::MetadataUnavailable { message, .. }
            | SkelError::Template { message, .. }
            | SkelError::Internal { message, .. } => message.clone(),
        }
    }
}

impl Diagnostic for SkelError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self.error_type() {
            ErrorType::Parse => "skelgen::parse",
            ErrorType::UnsupportedOperator => "skelgen::operator",
            ErrorType::MetadataUnavailable => "skelgen::metadata",
            ErrorType::Template => "skelgen::template",
            ErrorType::Internal => "skelgen::internal",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.get_ctx().span?;
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(self.label_text()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Wraps a doc comment (or any text) as a named source for error contexts.
pub fn to_error_source(name: impl AsRef<str>, source: impl AsRef<str>) -> SourceArc {
    Arc::new(NamedSource::new(
        name.as_ref().to_string(),
        source.as_ref().to_string(),
    ))
}

/// Constructs a SkelError variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $msg:expr, $($arg:expr),+ $(,)?) => {
        $crate::SkelError::$variant {
            message: format!($msg, $($arg),+),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
    ($variant:ident, $msg:expr) => {
        $crate::SkelError::$variant {
            message: format!("{}", $msg),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
}

/// Constructs a SkelError variant with a message, a source and a span, plus optional help.
#[macro_export]
macro_rules! err_ctx {
    // Message, src, span, help
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $help:expr) => {
        $crate::SkelError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext::with_source_and_span(
                $crate::diagnostics::SourceArc::clone($src),
                $span,
            )
            .with_help(format!("{}", $help)),
            source: None,
        }
    };
    // Message, src, span
    ($variant:ident, $msg:expr, $src:expr, $span:expr) => {
        $crate::SkelError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext::with_source_and_span(
                $crate::diagnostics::SourceArc::clone($src),
                $span,
            ),
            source: None,
        }
    };
}
