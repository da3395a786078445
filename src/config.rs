use crate::error::ActiveDocError;
use crate::namespace::NamespaceContext;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Per-domain-type settings: the root element, namespace map and default, and
/// the registry of fields that [`Document::field`](crate::Document::field)
/// accepts. An empty registry accepts any field.
///
/// ```json
/// { "root": "book",
///   "default_namespace": "urn:books",
///   "namespaces": { "isbn": "urn:isbn" },
///   "fields": ["title", "isbn"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub namespaces: HashMap<String, String>,
    #[serde(default)]
    pub default_namespace: Option<String>,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl DomainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_namespace(mut self, element: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.insert(element.into(), uri.into());
        self
    }

    pub fn with_default_namespace(mut self, uri: impl Into<String>) -> Self {
        self.default_namespace = Some(uri.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn from_json(text: &str) -> Result<Self, ActiveDocError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ActiveDocError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Composes this configuration over `parent`. Anything set here wins;
    /// fields are the union, parent's first.
    pub fn extend(&self, parent: &DomainConfig) -> DomainConfig {
        let mut namespaces = parent.namespaces.clone();
        namespaces.extend(self.namespaces.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut fields = parent.fields.clone();
        for field in &self.fields {
            if !fields.contains(field) {
                fields.push(field.clone());
            }
        }

        DomainConfig {
            root: self.root.clone().or_else(|| parent.root.clone()),
            namespaces,
            default_namespace: self
                .default_namespace
                .clone()
                .or_else(|| parent.default_namespace.clone()),
            fields,
        }
    }

    pub fn namespace_context(&self) -> NamespaceContext {
        let mut context = NamespaceContext::new();
        for (element, uri) in &self.namespaces {
            context.add_namespace(element.clone(), uri.clone());
        }
        context.set_default_namespace(self.default_namespace.clone());
        context
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.is_empty() || self.fields.iter().any(|f| f == name)
    }

    /// Namespace of the root element, if a root is configured.
    pub fn root_namespace(&self) -> Option<String> {
        let root = self.root.as_deref()?;
        self.namespace_context().resolve(root, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let config = DomainConfig::from_json(
            r#"{ "root": "book", "default_namespace": "urn:books",
                 "namespaces": { "isbn": "urn:isbn" }, "fields": ["title"] }"#,
        )
        .unwrap();
        assert_eq!(config.root.as_deref(), Some("book"));
        assert_eq!(config.root_namespace().as_deref(), Some("urn:books"));
        let ns = config.namespace_context();
        assert_eq!(ns.resolve("isbn", None).as_deref(), Some("urn:isbn"));
        assert!(config.has_field("title"));
        assert!(!config.has_field("isbn"));
    }

    #[test]
    fn test_empty_registry_accepts_anything() {
        assert!(DomainConfig::new().has_field("whatever"));
        assert!(DomainConfig::from_json("{}").unwrap().has_field("x"));
    }

    #[test]
    fn test_extend() {
        let parent = DomainConfig::new()
            .with_root("item")
            .with_default_namespace("urn:base")
            .with_namespace("id", "urn:id")
            .with_field("id");
        let child = DomainConfig::new()
            .with_root("book")
            .with_namespace("id", "urn:book-id")
            .with_field("title")
            .with_field("id");

        let merged = child.extend(&parent);
        assert_eq!(merged.root.as_deref(), Some("book"));
        assert_eq!(merged.default_namespace.as_deref(), Some("urn:base"));
        assert_eq!(merged.namespaces["id"], "urn:book-id");
        assert_eq!(merged.fields, vec!["id", "title"]);
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "root": "note", "fields": ["body"] }}"#).unwrap();

        let config = DomainConfig::from_file(file.path()).unwrap();
        assert_eq!(config.root.as_deref(), Some("note"));
        assert_eq!(config.fields, vec!["body"]);

        assert!(matches!(
            DomainConfig::from_file(file.path().with_extension("missing")),
            Err(ActiveDocError::Io(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            DomainConfig::from_json("{ root: }"),
            Err(ActiveDocError::Json(_))
        ));
    }
}
