//! Test-class assembly: the pipeline from class metadata to generated source.
//!
//! For each eligible method, in declaration order, the doc comment is scanned for
//! `@assert` tags. Every tag is parsed, mapped, named and rendered into one test
//! method; a method without tags gets one incomplete stub instead. Test methods come
//! first, stubs last, and the whole body goes into the `TestClass` template.
//!
//! A run is all or nothing: the first malformed tag or unknown operator aborts it.

use chrono::{Local, NaiveDateTime};
use miette::Report;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::assertion::MappedAssertion;
use crate::diagnostics::{to_error_source, SourceArc};
use crate::metadata::{ClassMetadata, MetadataProvider, QualifiedName, SourceMethod};
use crate::naming::MethodNamer;
use crate::syntax::{extract_tags, parse_assertion, parse_constructor_args, RawAnnotationTag};
use crate::template::{
    TemplateRenderer, TemplateSet, TemplateVars, INCOMPLETE_TEST_METHOD, TEST_CLASS,
};
use crate::{err_msg, SkelError};

/// Prints an error with its diagnostic rendering to stderr.
pub fn print_error(error: SkelError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Per-run settings that do not come from the class metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Fully qualified test class name; defaults to `<class>Test`.
    pub test_class_name: Option<String>,
    /// Stamped into the class header.
    pub version: String,
    /// Stamped into the class header. Fix it to get reproducible output.
    pub timestamp: NaiveDateTime,
}

impl GenerationOptions {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            test_class_name: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp,
        }
    }

    /// Options stamped with the local wall-clock time.
    pub fn now() -> Self {
        Self::new(Local::now().naive_local())
    }

    pub fn with_test_class_name(mut self, name: impl Into<String>) -> Self {
        self.test_class_name = Some(name.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    fn test_class_for(&self, class: &QualifiedName) -> QualifiedName {
        match &self.test_class_name {
            Some(name) => QualifiedName::parse(name),
            None => QualifiedName {
                namespace: class.namespace.clone(),
                class_name: format!("{}Test", class.class_name),
            },
        }
    }
}

// ============================================================================
// OUTPUT TYPES
// ============================================================================

/// One method of the generated test class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedMethod {
    /// Unique within the test class; the method is `test<name>`.
    pub name: String,
    pub orig_method_name: String,
    /// The tag this method was generated from; `None` for an incomplete stub.
    pub tag: Option<RawAnnotationTag>,
    pub assertion: Option<MappedAssertion>,
    pub rendered_body: String,
}

impl GeneratedMethod {
    pub fn is_incomplete(&self) -> bool {
        self.assertion.is_none()
    }
}

/// A fully assembled test class, ready for the class template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestClass {
    pub namespace_declaration: String,
    /// Short name of the class under test.
    pub class_name: String,
    pub test_class_name: String,
    /// Raw text from the class-level `@assert (<args>)`, or empty.
    pub constructor_args: String,
    /// Assertion-derived methods first, then incomplete stubs, each in declaration order.
    pub methods: Vec<GeneratedMethod>,
    pub date: String,
    pub time: String,
    pub version: String,
}

impl TestClass {
    /// All method bodies concatenated, trailing whitespace trimmed.
    pub fn methods_text(&self) -> String {
        let joined: String = self
            .methods
            .iter()
            .map(|method| method.rendered_body.as_str())
            .collect();
        joined.trim_end().to_string()
    }

    pub fn render(&self, renderer: &impl TemplateRenderer) -> Result<String, SkelError> {
        let mut vars = TemplateVars::new();
        vars.insert("namespace_declaration", self.namespace_declaration.clone());
        vars.insert("className", self.class_name.clone());
        vars.insert("testClassName", self.test_class_name.clone());
        vars.insert("constructorArgs", self.constructor_args.clone());
        vars.insert("methods", self.methods_text());
        vars.insert("date", self.date.clone());
        vars.insert("time", self.time.clone());
        vars.insert("version", self.version.clone());
        renderer.render(TEST_CLASS, &vars)
    }
}

// ============================================================================
// GENERATOR
// ============================================================================

/// Generates test classes with one renderer and one set of options.
#[derive(Debug, Clone)]
pub struct TestGenerator<R = TemplateSet> {
    renderer: R,
    options: GenerationOptions,
}

impl TestGenerator<TemplateSet> {
    /// A generator using the built-in templates.
    pub fn new(options: GenerationOptions) -> Self {
        Self::with_renderer(TemplateSet::builtin(), options)
    }
}

impl<R: TemplateRenderer> TestGenerator<R> {
    pub fn with_renderer(renderer: R, options: GenerationOptions) -> Self {
        Self { renderer, options }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Looks up `class` through `provider` and renders its test class source.
    pub fn generate(
        &self,
        provider: &impl MetadataProvider,
        class: &str,
    ) -> Result<String, SkelError> {
        let metadata = provider.class_metadata(class).ok_or_else(|| {
            err_msg!(MetadataUnavailable, "no metadata for class `{}`", class)
        })?;
        self.generate_class(&metadata)
    }

    /// Renders the test class source for already-loaded metadata.
    pub fn generate_class(&self, class: &ClassMetadata) -> Result<String, SkelError> {
        let test_class = self.assemble(class)?;
        let source = self.render(&test_class)?;
        info!(
            class = %class.name,
            test_class = %test_class.test_class_name,
            methods = test_class.methods.len(),
            "generated test class"
        );
        Ok(source)
    }

    /// Renders an assembled test class into the class template.
    pub fn render(&self, test_class: &TestClass) -> Result<String, SkelError> {
        test_class.render(&self.renderer)
    }

    /// Builds the test class without rendering the class wrapper.
    pub fn assemble(&self, class: &ClassMetadata) -> Result<TestClass, SkelError> {
        let qualified = class.qualified_name();
        if qualified.class_name.is_empty() {
            return Err(err_msg!(
                MetadataUnavailable,
                "class metadata has no usable class name (got `{}`)",
                class.name
            ));
        }

        let mut namer = MethodNamer::new();
        let mut assertion_methods = Vec::new();
        let mut incomplete_methods = Vec::new();

        for method in &class.methods {
            if !method.is_eligible() {
                trace!(method = %method.name, "skipping ineligible method");
                continue;
            }

            let tags = extract_tags(&method.doc_comment);
            if tags.is_empty() {
                debug!(method = %method.name, "no @assert tags, emitting incomplete stub");
                incomplete_methods.push(self.incomplete_method(
                    &qualified,
                    method,
                    &mut namer,
                )?);
                continue;
            }

            let source = to_error_source(
                format!("{}::{}", qualified.class_name, method.name),
                &method.doc_comment,
            );
            for tag in tags {
                assertion_methods.push(self.assertion_method(
                    &qualified,
                    method,
                    tag,
                    &source,
                    &mut namer,
                )?);
            }
        }

        let test_class = self.options.test_class_for(&qualified);
        let mut methods = assertion_methods;
        methods.extend(incomplete_methods);

        Ok(TestClass {
            namespace_declaration: test_class.namespace_declaration(),
            class_name: qualified.class_name,
            test_class_name: test_class.class_name,
            constructor_args: constructor_args(&class.doc_comment),
            methods,
            date: self.options.timestamp.format("%Y-%m-%d").to_string(),
            time: self.options.timestamp.format("%H:%M:%S").to_string(),
            version: self.options.version.clone(),
        })
    }

    fn assertion_method(
        &self,
        class: &QualifiedName,
        method: &SourceMethod,
        tag: RawAnnotationTag,
        source: &SourceArc,
        namer: &mut MethodNamer,
    ) -> Result<GeneratedMethod, SkelError> {
        let parsed = parse_assertion(&tag, source)?;
        let assertion = MappedAssertion::map(parsed, method.is_static, &tag, source)?;
        let name = namer.next_name(&method.name);
        debug!(
            method = %method.name,
            test = %name,
            note = tag.note.as_deref().unwrap_or(""),
            assertion = %assertion.kind,
            template = assertion.template.template_id(),
            "mapped @assert tag"
        );

        let mut vars = TemplateVars::new();
        vars.insert("preface", tag.preface_text());
        vars.insert("arguments", assertion.arguments.clone());
        vars.insert("assertion", assertion.kind.as_str().to_string());
        vars.insert("expected", assertion.expected.clone());
        vars.insert("className", class.class_name.clone());
        vars.insert("origMethodName", method.name.clone());
        vars.insert("methodName", name.clone());
        let rendered_body = self
            .renderer
            .render(assertion.template.template_id(), &vars)?;

        Ok(GeneratedMethod {
            name,
            orig_method_name: method.name.clone(),
            tag: Some(tag),
            assertion: Some(assertion),
            rendered_body,
        })
    }

    fn incomplete_method(
        &self,
        class: &QualifiedName,
        method: &SourceMethod,
        namer: &mut MethodNamer,
    ) -> Result<GeneratedMethod, SkelError> {
        let name = namer.next_name(&method.name);
        let mut vars = TemplateVars::new();
        vars.insert("className", class.class_name.clone());
        vars.insert("origMethodName", method.name.clone());
        vars.insert("methodName", name.clone());
        let rendered_body = self.renderer.render(INCOMPLETE_TEST_METHOD, &vars)?;

        Ok(GeneratedMethod {
            name,
            orig_method_name: method.name.clone(),
            tag: None,
            assertion: None,
            rendered_body,
        })
    }
}

/// Generates a test class with the built-in templates.
pub fn generate(
    provider: &impl MetadataProvider,
    class: &str,
    options: GenerationOptions,
) -> Result<String, SkelError> {
    TestGenerator::new(options).generate(provider, class)
}

/// Finds the class-level `@assert (<args>)` and returns `<args>` verbatim.
///
/// Only tags without a note, written on one line as `@assert (<args>)`, count.
/// Missing or malformed tags mean no arguments.
pub fn constructor_args(class_doc_comment: &str) -> String {
    extract_tags(class_doc_comment)
        .iter()
        .filter(|tag| {
            tag.note.is_none() && tag.preface_lines.is_empty() && !tag.raw.contains('\n')
        })
        .find_map(|tag| parse_constructor_args(&tag.test_expression))
        .unwrap_or_default()
}
