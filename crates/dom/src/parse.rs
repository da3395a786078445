// Importing a roxmltree document into the arena.
use crate::XML_NAMESPACE;
use crate::error::DomError;
use crate::tree::{Attribute, Element, ExpandedName, NamespaceDecl, NodeId, NodeKind, Tree};

impl Tree {
    /// Parses `text` into a new tree. CDATA sections become ordinary text.
    pub fn parse(text: &str) -> Result<Tree, DomError> {
        let doc = roxmltree::Document::parse(text)?;
        let mut tree = Tree::new();
        let root = tree.root();
        for child in doc.root().children() {
            import(&mut tree, child, root);
        }
        log::debug!("Parsed XML document into {} nodes", tree.node_count());
        Ok(tree)
    }
}

fn import(tree: &mut Tree, node: roxmltree::Node<'_, '_>, parent: NodeId) {
    let kind = match node.node_type() {
        roxmltree::NodeType::Element => NodeKind::Element(import_element(node)),
        roxmltree::NodeType::Text => NodeKind::Text(node.text().unwrap_or_default().to_string()),
        roxmltree::NodeType::Comment => {
            NodeKind::Comment(node.text().unwrap_or_default().to_string())
        }
        roxmltree::NodeType::PI => match node.pi() {
            Some(pi) => NodeKind::ProcessingInstruction {
                target: pi.target.to_string(),
                value: pi.value.map(str::to_string),
            },
            None => return,
        },
        roxmltree::NodeType::Root => return,
    };
    let id = tree.push(parent, kind);
    for child in node.children() {
        import(tree, child, id);
    }
}

fn import_element(node: roxmltree::Node<'_, '_>) -> Element {
    let tag = node.tag_name();
    let namespace = tag.namespace().map(str::to_string);
    let prefix = tag
        .namespace()
        .and_then(|uri| prefix_for(node, uri, true));

    let attributes = node
        .attributes()
        .map(|attr| Attribute {
            name: ExpandedName {
                namespace: attr.namespace().map(str::to_string),
                local: attr.name().to_string(),
            },
            prefix: attr.namespace().and_then(|uri| prefix_for(node, uri, false)),
            value: attr.value().to_string(),
        })
        .collect();

    Element {
        name: ExpandedName {
            namespace,
            local: tag.name().to_string(),
        },
        prefix,
        attributes,
        namespaces: declared_namespaces(node),
    }
}

/// Finds the prefix bound to `uri` at `node`. Elements may use the default
/// namespace (no prefix); attributes never do.
fn prefix_for(node: roxmltree::Node<'_, '_>, uri: &str, allow_default: bool) -> Option<String> {
    if uri == XML_NAMESPACE {
        return Some("xml".to_string());
    }
    if allow_default
        && node
            .namespaces()
            .any(|ns| ns.name().is_none() && ns.uri() == uri)
    {
        return None;
    }
    node.namespaces()
        .find(|ns| ns.uri() == uri && ns.name().is_some())
        .and_then(|ns| ns.name().map(str::to_string))
}

/// The bindings that are new at `node` compared with its parent element.
fn declared_namespaces(node: roxmltree::Node<'_, '_>) -> Vec<NamespaceDecl> {
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();

    node.namespaces()
        .filter(|ns| ns.uri() != XML_NAMESPACE)
        .filter(|ns| !inherited.contains(&(ns.name(), ns.uri())))
        .map(|ns| NamespaceDecl {
            prefix: ns.name().map(str::to_string),
            uri: ns.uri().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_namespaced_document() {
        let xml = r#"<lib:book xmlns:lib="urn:lib" xmlns="urn:default"><title lang="en">Dune</title><!-- c --><?pi data?></lib:book>"#;
        let tree = Tree::parse(xml).unwrap();

        let book = tree.root_element().unwrap();
        let element = tree.element(book).unwrap();
        assert_eq!(element.qualified_name(), "lib:book");
        assert_eq!(tree.namespace(book), Some("urn:lib"));
        assert_eq!(element.namespaces.len(), 2);

        let children = tree.children(book);
        assert_eq!(children.len(), 3);
        let title = tree.element(children[0]).unwrap();
        assert_eq!(title.name.namespace.as_deref(), Some("urn:default"));
        assert_eq!(title.prefix, None);
        assert!(title.namespaces.is_empty());
        assert_eq!(title.attributes[0].name.local, "lang");
        assert_eq!(title.attributes[0].name.namespace, None);

        assert!(matches!(tree.kind(children[1]), NodeKind::Comment(c) if c == " c "));
        assert!(matches!(
            tree.kind(children[2]),
            NodeKind::ProcessingInstruction { target, .. } if target == "pi"
        ));
    }

    #[test]
    fn test_parse_keeps_whitespace_and_cdata_as_text() {
        let tree = Tree::parse("<a> <b><![CDATA[x < y]]></b></a>").unwrap();
        let a = tree.root_element().unwrap();
        assert_eq!(tree.child_count(a), 2);
        let b = tree.children(a)[1];
        assert_eq!(tree.child_count(b), 1);
        assert_eq!(tree.text(b), "x < y");
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(Tree::parse("<a><b></a>"), Err(DomError::Parse(_))));
    }
}
