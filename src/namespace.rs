//! Namespace resolution for unprefixed element names.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolves `element` to a namespace URI. Highest precedence first: the
/// caller's explicit override, the per-element map, the default, and finally
/// no namespace. An empty override selects no namespace.
pub fn resolve(
    element: &str,
    explicit: Option<&str>,
    map: &HashMap<String, String>,
    default: Option<&str>,
) -> Option<String> {
    if let Some(uri) = explicit {
        return (!uri.is_empty()).then(|| uri.to_string());
    }
    map.get(element)
        .map(String::as_str)
        .or(default)
        .map(str::to_string)
}

/// A per-element namespace map plus an optional default namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceContext {
    #[serde(default)]
    namespaces: HashMap<String, String>,
    #[serde(default)]
    default_namespace: Option<String>,
}

impl NamespaceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(uri: impl Into<String>) -> Self {
        Self {
            namespaces: HashMap::new(),
            default_namespace: Some(uri.into()),
        }
    }

    /// Maps `element` to `uri`, replacing any previous mapping. The mapping is
    /// used by every later resolution through this context.
    pub fn add_namespace(&mut self, element: impl Into<String>, uri: impl Into<String>) {
        self.namespaces.insert(element.into(), uri.into());
    }

    pub fn remove_namespace(&mut self, element: &str) -> Option<String> {
        self.namespaces.remove(element)
    }

    pub fn set_default_namespace(&mut self, uri: Option<String>) {
        self.default_namespace = uri;
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// The explicit per-element mapping, ignoring the default.
    pub fn namespace_for(&self, element: &str) -> Option<&str> {
        self.namespaces.get(element).map(String::as_str)
    }

    pub fn namespaces(&self) -> &HashMap<String, String> {
        &self.namespaces
    }

    pub fn resolve(&self, element: &str, explicit: Option<&str>) -> Option<String> {
        resolve(
            element,
            explicit,
            &self.namespaces,
            self.default_namespace.as_deref(),
        )
    }

    /// Lays `self` over `parent`: entries here win, the rest come from the parent.
    pub fn extend(&self, parent: &NamespaceContext) -> NamespaceContext {
        let mut namespaces = parent.namespaces.clone();
        namespaces.extend(self.namespaces.iter().map(|(k, v)| (k.clone(), v.clone())));
        NamespaceContext {
            namespaces,
            default_namespace: self
                .default_namespace
                .clone()
                .or_else(|| parent.default_namespace.clone()),
        }
    }
}
