//! Path projection: compiles an element path against a namespace context,
//! selects nodes in a scope and collapses them by cardinality and shape.

use crate::error::{ActiveDocError, MutationError};
use crate::namespace::NamespaceContext;
use crate::partial::PartialResult;
use activedoc_dom::{NodeId, NodeKind, Tree, XmlNode};
use activedoc_xpath::{Axis, DataSourceNode, LocationPath, parse_path, select};

/// The outcome of a read.
#[derive(Debug, Clone)]
pub enum Projection {
    /// Nothing matched.
    Empty,
    /// One simple match.
    Text(String),
    /// Several matches, all simple, in document order.
    TextList(Vec<String>),
    /// One complex match, or several matches of which at least one is complex.
    View(PartialResult),
}

impl Projection {
    pub fn is_empty(&self) -> bool {
        matches!(self, Projection::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Projection::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_texts(&self) -> Option<&[String]> {
        match self {
            Projection::TextList(texts) => Some(texts),
            _ => None,
        }
    }

    pub fn as_view(&self) -> Option<&PartialResult> {
        match self {
            Projection::View(view) => Some(view),
            _ => None,
        }
    }

    pub fn into_view(self) -> Option<PartialResult> {
        match self {
            Projection::View(view) => Some(view),
            _ => None,
        }
    }
}

enum Shape {
    Simple { text: String, id: Option<NodeId> },
    Complex(NodeId),
}

impl Shape {
    fn id(&self) -> Option<NodeId> {
        match self {
            Shape::Simple { id, .. } => *id,
            Shape::Complex(id) => Some(*id),
        }
    }
}

/// An element is simple when its only child is a text node.
pub fn is_simple(tree: &Tree, id: NodeId) -> bool {
    tree.element(id).is_some() && matches!(tree.children(id), [only] if tree.is_text(*only))
}

fn element_shape(tree: &Tree, id: NodeId) -> Shape {
    if is_simple(tree, id) {
        Shape::Simple {
            text: tree.text(id),
            id: Some(id),
        }
    } else {
        Shape::Complex(id)
    }
}

// Attributes and character nodes always collapse to their string value.
fn shape(tree: &Tree, node: XmlNode<'_>) -> Shape {
    let Some(id) = node.id() else {
        return Shape::Simple {
            text: node.string_value(),
            id: None,
        };
    };
    match tree.kind(id) {
        NodeKind::Element(_) => element_shape(tree, id),
        NodeKind::Root => match tree.root_element() {
            Some(element) => element_shape(tree, element),
            None => Shape::Simple {
                text: String::new(),
                id: None,
            },
        },
        _ => Shape::Simple {
            text: tree.text(id),
            id: Some(id),
        },
    }
}

/// Compiles and evaluates paths with one namespace context and an optional
/// explicit namespace that overrides it for every name step.
#[derive(Debug, Clone, Copy)]
pub struct DocumentProjector<'a> {
    namespaces: &'a NamespaceContext,
    namespace_override: Option<&'a str>,
}

impl<'a> DocumentProjector<'a> {
    pub fn new(namespaces: &'a NamespaceContext) -> Self {
        Self {
            namespaces,
            namespace_override: None,
        }
    }

    pub fn with_override(mut self, namespace: Option<&'a str>) -> Self {
        self.namespace_override = namespace;
        self
    }

    /// Parses `path`, binds each name step to its namespace and anchors the
    /// leading step on the descendant axis so it matches anywhere in scope.
    pub fn compile(&self, path: &str) -> Result<LocationPath, ActiveDocError> {
        let parsed = parse_path(path)?;
        Ok(self.bind(parsed))
    }

    fn bind(&self, mut path: LocationPath) -> LocationPath {
        let namespaces = self.namespaces;
        let explicit = self.namespace_override;
        path.bind_namespaces(&mut |local: &str| namespaces.resolve(local, explicit));

        path.is_absolute = false;
        if let Some(first) = path.steps.first_mut()
            && first.axis == Axis::Child
        {
            first.axis = Axis::Descendant;
        }
        log::debug!("Compiled path into {} step(s)", path.steps.len());
        path
    }

    /// Reads `path` below the `scope` nodes of `tree` and collapses the matches.
    pub fn read(
        &self,
        tree: &Tree,
        scope: &[NodeId],
        path: &str,
    ) -> Result<Projection, ActiveDocError> {
        let compiled = self.compile(path)?;
        let context: Vec<XmlNode<'_>> = scope.iter().map(|&id| tree.node(id)).collect();
        let found = select(&compiled, &context)?;
        log::debug!("'{}' matched {} node(s)", path, found.len());

        let shapes: Vec<Shape> = found.into_iter().map(|node| shape(tree, node)).collect();
        let projection = self.collapse(tree, shapes);
        log::trace!("'{}' collapsed to {:?}", path, projection);
        Ok(projection)
    }

    fn collapse(&self, tree: &Tree, mut shapes: Vec<Shape>) -> Projection {
        if shapes.len() == 1 {
            return match shapes.remove(0) {
                Shape::Simple { text, .. } => Projection::Text(text),
                Shape::Complex(id) => {
                    Projection::View(PartialResult::capture(tree, &[id], self.namespaces))
                }
            };
        }
        if shapes.is_empty() {
            return Projection::Empty;
        }
        if shapes.iter().all(|s| matches!(s, Shape::Simple { .. })) {
            let texts = shapes
                .into_iter()
                .filter_map(|s| match s {
                    Shape::Simple { text, .. } => Some(text),
                    Shape::Complex(_) => None,
                })
                .collect();
            return Projection::TextList(texts);
        }
        let ids: Vec<NodeId> = shapes.iter().filter_map(Shape::id).collect();
        Projection::View(PartialResult::capture(tree, &ids, self.namespaces))
    }

    /// Replaces the text of the single simple element `path` names. Only plain
    /// child-step element paths are writable; predicates are allowed. On any
    /// error the tree is left exactly as it was.
    pub fn write(&self, tree: &mut Tree, path: &str, value: &str) -> Result<(), ActiveDocError> {
        let parsed = parse_path(path)?;
        if !parsed.is_named_element_path() {
            log::warn!("Refusing write to non-element path '{}'", path);
            return Err(MutationError::UnsupportedPath(path.to_string()).into());
        }
        let compiled = self.bind(parsed);

        let targets: Vec<NodeId> = select(&compiled, &[tree.node(tree.root())])?
            .into_iter()
            .filter_map(|node| node.id())
            .collect();

        let target = match targets.as_slice() {
            [] => Err(MutationError::NotFound(path.to_string())),
            [only] if is_simple(tree, *only) => Ok(*only),
            [_] => Err(MutationError::Complex(path.to_string())),
            many => Err(MutationError::Ambiguous {
                path: path.to_string(),
                count: many.len(),
            }),
        };
        let target = target.inspect_err(|e| log::warn!("{}", e))?;

        tree.set_text(target, value)?;
        log::debug!("Wrote '{}' to {}", path, target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK: &str =
        "<book><chapter><title>A</title></chapter><chapter><title>B</title></chapter><empty/></book>";

    fn read(xml: &str, path: &str) -> Projection {
        let tree = Tree::parse(xml).unwrap();
        let ns = NamespaceContext::new();
        DocumentProjector::new(&ns)
            .read(&tree, &[tree.root()], path)
            .unwrap()
    }

    #[test]
    fn test_collapse_rules() {
        assert!(read(BOOK, "missing").is_empty());
        assert_eq!(read("<a><b>v</b></a>", "b").as_text(), Some("v"));
        assert_eq!(
            read(BOOK, "title").as_texts(),
            Some(&["A".to_string(), "B".to_string()][..])
        );
        assert_eq!(read(BOOK, "chapter").as_view().map(PartialResult::len), Some(2));
        assert_eq!(read(BOOK, "book").as_view().map(PartialResult::len), Some(1));
    }

    #[test]
    fn test_zero_child_element_is_complex() {
        let view = read(BOOK, "empty").into_view().unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view.text(), "");
    }

    #[test]
    fn test_mixed_matches_become_one_view() {
        let view = read("<r><x>1</x><x><y/></x></r>", "x").into_view().unwrap();
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_attribute_reads_collapse_to_text() {
        assert_eq!(read(r#"<r><x id="7">a</x></r>"#, "x/@id").as_text(), Some("7"));
    }

    #[test]
    fn test_absolute_paths_search_anywhere() {
        assert_eq!(
            read(BOOK, "/title").as_texts().map(<[String]>::len),
            Some(2)
        );
        assert_eq!(read(BOOK, "//chapter[2]/title").as_text(), Some("B"));
    }

    #[test]
    fn test_override_applies_to_every_step() {
        let xml = r#"<a:book xmlns:a="urn:a"><a:chapter><a:title>A</a:title></a:chapter></a:book>"#;
        let tree = Tree::parse(xml).unwrap();
        let ns = NamespaceContext::new();
        let projector = DocumentProjector::new(&ns);
        assert!(
            projector
                .read(&tree, &[tree.root()], "chapter/title")
                .unwrap()
                .is_empty()
        );
        let projection = projector
            .with_override(Some("urn:a"))
            .read(&tree, &[tree.root()], "chapter/title")
            .unwrap();
        assert_eq!(projection.as_text(), Some("A"));
    }

    #[test]
    fn test_write_rules() {
        let ns = NamespaceContext::new();
        let projector = DocumentProjector::new(&ns);
        let mut tree = Tree::parse(BOOK).unwrap();

        projector.write(&mut tree, "chapter[2]/title", "Z").unwrap();
        assert_eq!(
            projector.read(&tree, &[tree.root()], "title").unwrap().as_texts(),
            Some(&["A".to_string(), "Z".to_string()][..])
        );

        let before = tree.to_xml_document().unwrap();
        let cases = [
            ("nothing", "NotFound"),
            ("title", "Ambiguous"),
            ("chapter[1]", "Complex"),
            ("empty", "Complex"),
            ("title/@id", "UnsupportedPath"),
            ("*", "UnsupportedPath"),
        ];
        for (path, expected) in cases {
            let err = projector.write(&mut tree, path, "x").unwrap_err();
            let kind = match err {
                ActiveDocError::Mutation(MutationError::NotFound(_)) => "NotFound",
                ActiveDocError::Mutation(MutationError::Ambiguous { .. }) => "Ambiguous",
                ActiveDocError::Mutation(MutationError::Complex(_)) => "Complex",
                ActiveDocError::Mutation(MutationError::UnsupportedPath(_)) => "UnsupportedPath",
                other => panic!("unexpected error for {}: {}", path, other),
            };
            assert_eq!(kind, expected, "path {}", path);
        }
        assert_eq!(tree.to_xml_document().unwrap(), before);
    }
}
