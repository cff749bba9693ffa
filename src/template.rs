//! Template rendering for generated test source.
//!
//! A template is plain text with `{name}` placeholders. Rendering substitutes every
//! placeholder whose name is in the variable map and leaves the rest as written.
//! Substituted values are not scanned again.
//!
//! Eight template assets ship with the crate (see [`TEMPLATE_IDS`]). A directory of
//! `<id>.tpl` files can replace any of them.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::{err_msg, SkelError};

/// Variables for one rendering, keyed by placeholder name.
pub type TemplateVars = BTreeMap<&'static str, String>;

pub const TEST_CLASS: &str = "TestClass";
pub const INCOMPLETE_TEST_METHOD: &str = "IncompleteTestMethod";

/// Every template identifier the generator asks for.
pub const TEMPLATE_IDS: &[&str] = &[
    TEST_CLASS,
    "TestMethod",
    "TestMethodStatic",
    "TestMethodBool",
    "TestMethodBoolStatic",
    "TestMethodException",
    "TestMethodExceptionStatic",
    INCOMPLETE_TEST_METHOD,
];

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid"));

/// Turns a template identifier plus variables into text.
pub trait TemplateRenderer {
    fn render(&self, template_id: &str, vars: &TemplateVars) -> Result<String, SkelError>;
}

/// Substitutes `{name}` placeholders in `template`.
pub fn substitute(template: &str, vars: &TemplateVars) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn builtin_source(template_id: &str) -> Option<&'static str> {
    let source = match template_id {
        "TestClass" => include_str!("templates/TestClass.tpl"),
        "TestMethod" => include_str!("templates/TestMethod.tpl"),
        "TestMethodStatic" => include_str!("templates/TestMethodStatic.tpl"),
        "TestMethodBool" => include_str!("templates/TestMethodBool.tpl"),
        "TestMethodBoolStatic" => include_str!("templates/TestMethodBoolStatic.tpl"),
        "TestMethodException" => include_str!("templates/TestMethodException.tpl"),
        "TestMethodExceptionStatic" => include_str!("templates/TestMethodExceptionStatic.tpl"),
        "IncompleteTestMethod" => include_str!("templates/IncompleteTestMethod.tpl"),
        _ => return None,
    };
    Some(source)
}

/// The built-in templates, optionally with some replaced from disk.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    overrides: HashMap<String, String>,
}

impl TemplateSet {
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Replaces built-in templates with any `<id>.tpl` found in `dir`.
    ///
    /// Files whose stem is not a known identifier are ignored.
    pub fn with_override_dir(mut self, dir: impl AsRef<Path>) -> Result<Self, SkelError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(err_msg!(
                Template,
                "template directory `{}` does not exist",
                dir.display()
            ));
        }
        for id in TEMPLATE_IDS {
            let path = dir.join(format!("{id}.tpl"));
            if !path.is_file() {
                continue;
            }
            let text = fs::read_to_string(&path).map_err(|e| {
                err_msg!(Template, "failed to read template `{}`", path.display()).caused_by(e)
            })?;
            debug!(template = id, path = %path.display(), "using template override");
            self.overrides.insert((*id).to_string(), text);
        }
        Ok(self)
    }

    pub fn with_override(mut self, template_id: &str, text: impl Into<String>) -> Self {
        self.overrides.insert(template_id.to_string(), text.into());
        self
    }

    fn source(&self, template_id: &str) -> Option<&str> {
        self.overrides
            .get(template_id)
            .map(String::as_str)
            .or_else(|| builtin_source(template_id))
    }
}

impl TemplateRenderer for TemplateSet {
    fn render(&self, template_id: &str, vars: &TemplateVars) -> Result<String, SkelError> {
        let source = self
            .source(template_id)
            .ok_or_else(|| err_msg!(Template, "unknown template `{}`", template_id))?;
        Ok(substitute(source, vars))
    }
}
