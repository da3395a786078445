//! The arena that owns every node of a document.

use crate::XML_NAMESPACE;
use crate::error::DomError;
use crate::node::XmlNode;
use std::collections::HashMap;
use std::fmt;

/// Index of a node inside its [`Tree`]. Ids are handed out in creation order,
/// which for parsed and copied trees is document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A namespace URI plus local name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedName {
    pub namespace: Option<String>,
    pub local: String,
}

/// A namespace declaration (`xmlns` or `xmlns:prefix`) carried by an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub prefix: Option<String>,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: ExpandedName,
    pub prefix: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: ExpandedName,
    pub prefix: Option<String>,
    pub attributes: Vec<Attribute>,
    /// Declarations made on this element, not everything in scope.
    pub namespaces: Vec<NamespaceDecl>,
}

impl Element {
    /// The name as written in markup, `prefix:local` or `local`.
    pub fn qualified_name(&self) -> String {
        qualify(self.prefix.as_deref(), &self.name.local)
    }
}

pub(crate) fn qualify(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(p) => format!("{}:{}", p, local),
        None => local.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Element(Element),
    Text(String),
    Comment(String),
    ProcessingInstruction { target: String, value: Option<String> },
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An owned XML tree. Node `#0` is always the document root.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// An empty document: a root with no children.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Root,
                parent: None,
                children: vec![],
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The single top-level element, if the document has one.
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root())
            .iter()
            .copied()
            .find(|&id| self.element(id).is_some())
    }

    /// A navigable handle for the path engine.
    pub fn node(&self, id: NodeId) -> XmlNode<'_> {
        XmlNode::new(self, id)
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Text(_))
    }

    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.name.local.as_str())
    }

    pub fn namespace(&self, id: NodeId) -> Option<&str> {
        self.element(id).and_then(|e| e.name.namespace.as_deref())
    }

    /// The XPath string value: text content for text nodes, concatenated
    /// descendant text for elements and the root.
    pub fn text(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Text(text) | NodeKind::Comment(text) => text.clone(),
            NodeKind::ProcessingInstruction { value, .. } => value.clone().unwrap_or_default(),
            NodeKind::Root | NodeKind::Element(_) => {
                let mut out = String::new();
                self.collect_text(id, &mut out);
                out
            }
        }
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for &child in self.children(id) {
            match self.kind(child) {
                NodeKind::Text(text) => out.push_str(text),
                NodeKind::Element(_) => self.collect_text(child, out),
                _ => {}
            }
        }
    }

    /// Every namespace binding visible at `id`, innermost declaration winning
    /// per prefix. The implicit `xml` binding is not included.
    pub fn in_scope_namespaces(&self, id: NodeId) -> Vec<NamespaceDecl> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }

        let mut scope: Vec<NamespaceDecl> = Vec::new();
        for node in chain.into_iter().rev() {
            if let Some(element) = self.element(node) {
                for decl in &element.namespaces {
                    scope.retain(|d| d.prefix != decl.prefix);
                    scope.push(decl.clone());
                }
            }
        }
        scope.retain(|d| d.uri != XML_NAMESPACE);
        scope
    }

    // --- Construction ---

    pub(crate) fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: vec![],
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Appends a new element under `parent`.
    pub fn append_element(&mut self, parent: NodeId, element: Element) -> NodeId {
        self.push(parent, NodeKind::Element(element))
    }

    /// Appends a text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.push(parent, NodeKind::Text(text.into()))
    }

    /// Deep-copies `node` from `source` under `parent` in this tree and returns
    /// the id of the copy. When `node` is an element, every namespace in scope
    /// at the original position is declared on the copy, so the copy serializes
    /// as standalone markup.
    pub fn copy_subtree(&mut self, source: &Tree, node: NodeId, parent: NodeId) -> NodeId {
        self.copy_with(source, node, parent, &mut |_, _| {})
    }

    /// Like [`copy_subtree`](Tree::copy_subtree), also recording the id of
    /// every copied node (the top one included) in `copies`, keyed by its id
    /// in `source`.
    pub fn copy_subtree_mapped(
        &mut self,
        source: &Tree,
        node: NodeId,
        parent: NodeId,
        copies: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        self.copy_with(source, node, parent, &mut |from, to| {
            copies.insert(from, to);
        })
    }

    fn copy_with(
        &mut self,
        source: &Tree,
        node: NodeId,
        parent: NodeId,
        record: &mut impl FnMut(NodeId, NodeId),
    ) -> NodeId {
        let kind = match source.kind(node) {
            NodeKind::Element(element) => {
                let mut element = element.clone();
                element.namespaces = source.in_scope_namespaces(node);
                NodeKind::Element(element)
            }
            other => other.clone(),
        };
        let copy = self.push(parent, kind);
        record(node, copy);
        for &child in source.children(node) {
            self.copy_descendants(source, child, copy, record);
        }
        copy
    }

    fn copy_descendants(
        &mut self,
        source: &Tree,
        node: NodeId,
        parent: NodeId,
        record: &mut impl FnMut(NodeId, NodeId),
    ) {
        let copy = self.push(parent, source.kind(node).clone());
        record(node, copy);
        for &child in source.children(node) {
            self.copy_descendants(source, child, copy, record);
        }
    }

    /// Nodes allocated in the arena, including any detached by mutation.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- Mutation ---

    /// Replaces the content of element `id` with a single text node holding
    /// `value`. An existing lone text child is updated in place so node ids
    /// keep following document order.
    pub fn set_text(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        if self.element(id).is_none() {
            return Err(DomError::NotAnElement(id));
        }
        if let [only] = self.children(id)
            && self.is_text(*only)
        {
            let only = *only;
            self.nodes[only.index()].kind = NodeKind::Text(value.to_string());
            return Ok(());
        }

        for child in std::mem::take(&mut self.nodes[id.index()].children) {
            self.nodes[child.index()].parent = None;
        }
        self.append_text(id, value);
        Ok(())
    }
}
