//! Documents: a parsed tree plus its identity and namespace configuration.

use crate::config::DomainConfig;
use crate::error::ActiveDocError;
use crate::namespace::NamespaceContext;
use crate::projection::{DocumentProjector, Projection};
use crate::session::Session;
use activedoc_dom::{Element, ExpandedName, NamespaceDecl, Tree};

/// An XML document with attribute-style access to its elements.
///
/// Reads search the whole document, so `read("title")` finds every `title`
/// element at any depth. Writes change exactly one simple element in place.
#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree,
    uri: Option<String>,
    config: DomainConfig,
    namespaces: NamespaceContext,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self, ActiveDocError> {
        Self::parse_with(text, &DomainConfig::default())
    }

    pub fn parse_with(text: &str, config: &DomainConfig) -> Result<Self, ActiveDocError> {
        Ok(Self::from_tree(Tree::parse(text)?, config))
    }

    /// A new document holding only the configured root element, or nothing
    /// when no root is configured.
    pub fn empty(config: &DomainConfig) -> Self {
        let mut tree = Tree::new();
        if let Some(root) = &config.root {
            let namespace = config.root_namespace();
            let namespaces = namespace
                .iter()
                .map(|uri| NamespaceDecl {
                    prefix: None,
                    uri: uri.clone(),
                })
                .collect();
            let top = tree.root();
            tree.append_element(
                top,
                Element {
                    name: ExpandedName {
                        namespace,
                        local: root.clone(),
                    },
                    prefix: None,
                    attributes: vec![],
                    namespaces,
                },
            );
        }
        Self::from_tree(tree, config)
    }

    pub(crate) fn from_tree(tree: Tree, config: &DomainConfig) -> Self {
        Self {
            tree,
            uri: None,
            config: config.clone(),
            namespaces: config.namespace_context(),
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn set_uri(&mut self, uri: Option<String>) {
        self.uri = uri;
    }

    /// The configured root name, else the local name of the top element.
    pub fn root(&self) -> Option<&str> {
        self.config.root.as_deref().or_else(|| {
            self.tree
                .root_element()
                .and_then(|id| self.tree.local_name(id))
        })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    pub fn namespaces(&self) -> &NamespaceContext {
        &self.namespaces
    }

    /// Overrides the namespace of `element` for this document only.
    pub fn add_namespace(&mut self, element: impl Into<String>, uri: impl Into<String>) {
        self.namespaces.add_namespace(element, uri);
    }

    pub fn remove_namespace(&mut self, element: &str) -> Option<String> {
        self.namespaces.remove_namespace(element)
    }

    pub fn set_default_namespace(&mut self, uri: Option<String>) {
        self.namespaces.set_default_namespace(uri);
    }

    pub fn read(&self, path: &str) -> Result<Projection, ActiveDocError> {
        self.read_in(path, None)
    }

    /// Reads with an explicit namespace for every name step of `path`.
    pub fn read_in(
        &self,
        path: &str,
        namespace: Option<&str>,
    ) -> Result<Projection, ActiveDocError> {
        DocumentProjector::new(&self.namespaces)
            .with_override(namespace)
            .read(&self.tree, &[self.tree.root()], path)
    }

    pub fn write(&mut self, path: &str, value: &str) -> Result<(), ActiveDocError> {
        self.write_in(path, value, None)
    }

    pub fn write_in(
        &mut self,
        path: &str,
        value: &str,
        namespace: Option<&str>,
    ) -> Result<(), ActiveDocError> {
        DocumentProjector::new(&self.namespaces)
            .with_override(namespace)
            .write(&mut self.tree, path, value)
    }

    /// Reads a field registered in the domain configuration.
    pub fn field(&self, name: &str) -> Result<Projection, ActiveDocError> {
        self.check_field(name)?;
        self.read(name)
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), ActiveDocError> {
        self.check_field(name)?;
        self.write(name, value)
    }

    fn check_field(&self, name: &str) -> Result<(), ActiveDocError> {
        if self.config.has_field(name) {
            Ok(())
        } else {
            Err(ActiveDocError::UnknownField {
                field: name.to_string(),
                root: self.root().unwrap_or_default().to_string(),
            })
        }
    }

    pub fn to_xml(&self) -> Result<String, ActiveDocError> {
        Ok(self.tree.to_xml_document()?)
    }

    /// Fetches and parses the document stored at `uri`.
    pub fn load(
        session: &Session,
        uri: &str,
        config: &DomainConfig,
    ) -> Result<Self, ActiveDocError> {
        let statement = session.statements().load(uri);
        let response = session.execute(&statement)?;
        let document = Self::parse_with(&response, config)?.with_uri(uri);
        log::info!("Loaded document {}", uri);
        Ok(document)
    }

    pub fn save(&self, session: &Session) -> Result<(), ActiveDocError> {
        let uri = self.uri.as_deref().ok_or(ActiveDocError::Identifier("save"))?;
        let statement = session.statements().save(uri, &self.to_xml()?);
        session.execute(&statement)?;
        log::info!("Saved document {}", uri);
        Ok(())
    }

    pub fn delete(&self, session: &Session) -> Result<(), ActiveDocError> {
        let uri = self.uri.as_deref().ok_or(ActiveDocError::Identifier("delete"))?;
        let statement = session.statements().delete(uri);
        session.execute(&statement)?;
        log::info!("Deleted document {}", uri);
        Ok(())
    }
}
