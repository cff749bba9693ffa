pub use crate::diagnostics::{ErrorContext, ErrorType, SkelError};
pub use crate::engine::{generate, GenerationOptions, TestClass, TestGenerator};
pub use crate::metadata::{ClassMetadata, MetadataManifest, MetadataProvider, SourceMethod};
pub use crate::syntax::Span;

pub mod assertion;
pub mod cli;
pub mod diagnostics;
pub mod engine;
pub mod metadata;
pub mod naming;
pub mod syntax;
pub mod template;
