//! Class metadata: the records generation runs on, and where they come from.
//!
//! The generator never introspects code itself. It asks a [`MetadataProvider`] for a
//! [`ClassMetadata`] record holding the class doc comment and its methods in
//! declaration order. [`MetadataManifest`] is the provider backed by a JSON or YAML file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{err_msg, SkelError};

// ============================================================================
// RECORDS
// ============================================================================

/// One method of the class under test, as declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMethod {
    pub name: String,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_constructor: bool,
    /// False for methods inherited from a parent class or trait.
    #[serde(default = "default_true")]
    pub declared_on_target: bool,
    #[serde(default)]
    pub doc_comment: String,
}

fn default_true() -> bool {
    true
}

impl SourceMethod {
    /// A public, concrete, non-static method declared on the target class.
    pub fn new(name: impl Into<String>, doc_comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            is_public: true,
            is_abstract: false,
            is_constructor: false,
            declared_on_target: true,
            doc_comment: doc_comment.into(),
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn with_constructor(mut self, is_constructor: bool) -> Self {
        self.is_constructor = is_constructor;
        self
    }

    pub fn with_declared_on_target(mut self, declared: bool) -> Self {
        self.declared_on_target = declared;
        self
    }

    /// Only public, concrete, non-constructor methods declared on the class get tests.
    pub fn is_eligible(&self) -> bool {
        self.is_public && !self.is_constructor && !self.is_abstract && self.declared_on_target
    }
}

/// Everything the generator needs to know about one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMetadata {
    /// Fully qualified name, e.g. `\Acme\Math\Calculator`.
    pub name: String,
    #[serde(default)]
    pub doc_comment: String,
    /// Methods in declaration order.
    #[serde(default)]
    pub methods: Vec<SourceMethod>,
    /// The file declaring the class, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<PathBuf>,
}

impl ClassMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc_comment: String::new(),
            methods: Vec::new(),
            source_file: None,
        }
    }

    pub fn with_doc_comment(mut self, doc_comment: impl Into<String>) -> Self {
        self.doc_comment = doc_comment.into();
        self
    }

    pub fn with_method(mut self, method: SourceMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_file = Some(path.into());
        self
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::parse(&self.name)
    }
}

/// A class name split into namespace and short name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QualifiedName {
    /// Without leading or trailing `\`; empty for the global namespace.
    pub namespace: String,
    pub class_name: String,
}

impl QualifiedName {
    pub fn parse(name: &str) -> Self {
        let name = name.trim().trim_start_matches('\\');
        match name.rsplit_once('\\') {
            Some((namespace, class_name)) => Self {
                namespace: namespace.to_string(),
                class_name: class_name.to_string(),
            },
            None => Self {
                namespace: String::new(),
                class_name: name.to_string(),
            },
        }
    }

    /// `\`-prefixed fully qualified form.
    pub fn fully_qualified(&self) -> String {
        if self.namespace.is_empty() {
            format!("\\{}", self.class_name)
        } else {
            format!("\\{}\\{}", self.namespace, self.class_name)
        }
    }

    /// The namespace statement for a generated file: `"\nnamespace Ns;\n"`, or empty.
    pub fn namespace_declaration(&self) -> String {
        if self.namespace.is_empty() {
            String::new()
        } else {
            format!("\nnamespace {};\n", self.namespace)
        }
    }
}

// ============================================================================
// PROVIDERS
// ============================================================================

/// Supplies class metadata by class identifier.
pub trait MetadataProvider {
    /// Returns the metadata for `class`, or `None` when nothing is known about it.
    fn class_metadata(&self, class: &str) -> Option<ClassMetadata>;
}

fn same_class(a: &str, b: &str) -> bool {
    a.trim().trim_start_matches('\\') == b.trim().trim_start_matches('\\')
}

impl MetadataProvider for ClassMetadata {
    fn class_metadata(&self, class: &str) -> Option<ClassMetadata> {
        same_class(&self.name, class).then(|| self.clone())
    }
}

/// A set of class records, usually loaded from a metadata file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataManifest {
    pub classes: Vec<ClassMetadata>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ManifestFile {
    Many { classes: Vec<ClassMetadata> },
    One(ClassMetadata),
}

impl MetadataManifest {
    pub fn new(classes: Vec<ClassMetadata>) -> Self {
        Self { classes }
    }

    /// Loads a manifest from a `.json`, `.yaml` or `.yml` file.
    ///
    /// The file holds either one class record or `{ classes: [...] }`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SkelError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            err_msg!(Internal, "failed to read metadata file `{}`", path.display()).caused_by(e)
        })?;

        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        let manifest = if is_yaml {
            Self::from_yaml_str(&text)
        } else {
            Self::from_json_str(&text)
        }
        .map_err(|e| {
            err_msg!(Internal, "failed to load metadata file `{}`", path.display()).caused_by(e)
        })?;

        debug!(
            path = %path.display(),
            classes = manifest.classes.len(),
            "loaded metadata manifest"
        );
        Ok(manifest)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SkelError> {
        let file: ManifestFile = serde_json::from_str(text)
            .map_err(|e| err_msg!(Internal, "invalid JSON metadata").caused_by(e))?;
        Ok(file.into_manifest())
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, SkelError> {
        let file: ManifestFile = serde_yaml::from_str(text)
            .map_err(|e| err_msg!(Internal, "invalid YAML metadata").caused_by(e))?;
        Ok(file.into_manifest())
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|class| class.name.as_str())
    }
}

impl ManifestFile {
    fn into_manifest(self) -> MetadataManifest {
        match self {
            ManifestFile::Many { classes } => MetadataManifest { classes },
            ManifestFile::One(class) => MetadataManifest {
                classes: vec![class],
            },
        }
    }
}

impl MetadataProvider for MetadataManifest {
    fn class_metadata(&self, class: &str) -> Option<ClassMetadata> {
        self.classes
            .iter()
            .find(|candidate| same_class(&candidate.name, class))
            .cloned()
    }
}
