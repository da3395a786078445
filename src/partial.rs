//! Read-only structural views.

use crate::error::ActiveDocError;
use crate::namespace::NamespaceContext;
use crate::projection::{DocumentProjector, Projection};
use activedoc_dom::{NodeId, Tree};
use std::collections::HashMap;

/// A detached snapshot of one node or an ordered node-set. Reads through a
/// view only search the descendants of the wrapped nodes. The namespace
/// context is copied when the view is created, so later changes to the
/// owning document's namespaces are not seen here.
#[derive(Debug, Clone)]
pub struct PartialResult {
    tree: Tree,
    nodes: Vec<NodeId>,
    namespaces: NamespaceContext,
    root: Option<String>,
}

impl PartialResult {
    /// Copies `nodes` (in document order) into a fresh tree. A node nested
    /// inside an earlier member is not copied again; it is wrapped at its
    /// position inside that member's copy.
    pub(crate) fn capture(source: &Tree, nodes: &[NodeId], namespaces: &NamespaceContext) -> Self {
        let mut tree = Tree::new();
        let top = tree.root();
        let mut copies = HashMap::new();
        let nodes: Vec<NodeId> = nodes
            .iter()
            .map(|&node| match copies.get(&node) {
                Some(&copy) => copy,
                None => tree.copy_subtree_mapped(source, node, top, &mut copies),
            })
            .collect();
        let root = nodes
            .first()
            .and_then(|&id| tree.local_name(id))
            .map(str::to_string);
        log::trace!(
            "Captured a view over {} node(s) in {} copied node(s)",
            nodes.len(),
            tree.node_count()
        );
        Self {
            tree,
            nodes,
            namespaces: namespaces.clone(),
            root,
        }
    }

    /// Local name of the first wrapped node.
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn namespaces(&self) -> &NamespaceContext {
        &self.namespaces
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A view over just the `index`th wrapped node.
    pub fn get(&self, index: usize) -> Option<PartialResult> {
        let id = *self.nodes.get(index)?;
        Some(Self::capture(&self.tree, &[id], &self.namespaces))
    }

    pub fn iter(&self) -> impl Iterator<Item = PartialResult> + '_ {
        self.nodes
            .iter()
            .map(|&id| Self::capture(&self.tree, &[id], &self.namespaces))
    }

    /// Text content of every wrapped node, concatenated.
    pub fn text(&self) -> String {
        self.nodes.iter().map(|&id| self.tree.text(id)).collect()
    }

    /// Markup of every wrapped node, concatenated in order.
    pub fn to_xml(&self) -> Result<String, ActiveDocError> {
        let mut out = String::new();
        for &id in &self.nodes {
            if self.tree.parent(id) == Some(self.tree.root()) {
                out.push_str(&self.tree.to_xml(id)?);
            } else {
                // nested member: detach it so its namespaces are declared
                let mut single = Tree::new();
                let top = single.root();
                let copy = single.copy_subtree(&self.tree, id, top);
                out.push_str(&single.to_xml(copy)?);
            }
        }
        Ok(out)
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
            .read(&self.tree, &self.nodes, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(xml: &str, path: &str) -> PartialResult {
        let tree = Tree::parse(xml).unwrap();
        let ns = NamespaceContext::new();
        DocumentProjector::new(&ns)
            .read(&tree, &[tree.root()], path)
            .unwrap()
            .into_view()
            .unwrap()
    }

    #[test]
    fn test_chained_reads_stay_in_subtree() {
        let chapters = view(
            "<book><title>Book</title><chapter><title>A</title></chapter><chapter><title>B</title></chapter></book>",
            "chapter",
        );
        assert_eq!(chapters.root(), Some("chapter"));
        assert_eq!(chapters.len(), 2);

        let first = chapters.get(0).unwrap();
        assert_eq!(first.read("title").unwrap().as_text(), Some("A"));
        assert_eq!(
            chapters.get(1).unwrap().read("title").unwrap().as_text(),
            Some("B")
        );
        assert!(chapters.get(2).is_none());

        // the book title is outside every chapter
        assert_eq!(
            chapters.read("title").unwrap().as_texts(),
            Some(&["A".to_string(), "B".to_string()][..])
        );
    }

    #[test]
    fn test_text_and_markup() {
        let chapters = view("<b><c><t>A</t></c><c><t>B</t><n/></c></b>", "c");
        assert_eq!(chapters.text(), "AB");
        assert_eq!(chapters.to_xml().unwrap(), "<c><t>A</t></c><c><t>B</t><n/></c>");
        let texts: Vec<String> = chapters.iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["A", "B"]);
    }

    #[test]
    fn test_view_markup_is_standalone() {
        let ns = NamespaceContext::with_default("urn:x");
        let xml = r#"<x:b xmlns:x="urn:x"><x:c><x:t>A</x:t><x:u/></x:c></x:b>"#;
        let tree = Tree::parse(xml).unwrap();
        let c = DocumentProjector::new(&ns)
            .read(&tree, &[tree.root()], "c")
            .unwrap()
            .into_view()
            .unwrap();
        assert_eq!(
            c.to_xml().unwrap(),
            r#"<x:c xmlns:x="urn:x"><x:t>A</x:t><x:u/></x:c>"#
        );
        assert_eq!(c.read("t").unwrap().as_text(), Some("A"));
    }

    #[test]
    fn test_nested_members_share_one_copy() {
        let sections = view("<r><s><t>A</t><s><t>B</t></s></s></r>", "s");
        assert_eq!(sections.len(), 2);
        assert_eq!(
            sections.read("t").unwrap().as_texts(),
            Some(&["A".to_string(), "B".to_string()][..])
        );
        assert_eq!(sections.get(1).unwrap().read("t").unwrap().as_text(), Some("B"));
        assert_eq!(sections.text(), "ABB");
        assert_eq!(
            sections.to_xml().unwrap(),
            "<s><t>A</t><s><t>B</t></s></s><s><t>B</t></s>"
        );
    }

    #[test]
    fn test_nested_member_markup_declares_namespaces() {
        let ns = NamespaceContext::with_default("urn:x");
        let xml = r#"<x:s xmlns:x="urn:x"><x:s>B</x:s><x:u/></x:s>"#;
        let tree = Tree::parse(xml).unwrap();
        let sections = DocumentProjector::new(&ns)
            .read(&tree, &[tree.root()], "s")
            .unwrap()
            .into_view()
            .unwrap();
        assert_eq!(sections.len(), 2);
        assert!(
            sections
                .to_xml()
                .unwrap()
                .ends_with(r#"<x:s xmlns:x="urn:x">B</x:s>"#)
        );
    }
}
