// Path-engine adapter over the arena.
use crate::tree::{NodeId, NodeKind, Tree};
use activedoc_xpath::{DataSourceNode, NodeType, QName};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Either a tree node or an attribute of an element. Attributes are data on
/// their element in the arena, so they are addressed by owner and index.
#[derive(Debug, Clone, Copy)]
pub enum XmlNode<'a> {
    Node { tree: &'a Tree, id: NodeId },
    Attribute { tree: &'a Tree, owner: NodeId, index: usize },
}

impl<'a> XmlNode<'a> {
    pub fn new(tree: &'a Tree, id: NodeId) -> Self {
        XmlNode::Node { tree, id }
    }

    /// The arena id, or `None` for attributes.
    pub fn id(&self) -> Option<NodeId> {
        match self {
            XmlNode::Node { id, .. } => Some(*id),
            XmlNode::Attribute { .. } => None,
        }
    }

    fn tree(&self) -> &'a Tree {
        match *self {
            XmlNode::Node { tree, .. } | XmlNode::Attribute { tree, .. } => tree,
        }
    }

    // (owner-or-self id, 0 for nodes / 1 for attributes, attribute index)
    fn order_key(&self) -> (NodeId, u8, usize) {
        match self {
            XmlNode::Node { id, .. } => (*id, 0, 0),
            XmlNode::Attribute { owner, index, .. } => (*owner, 1, *index),
        }
    }
}

impl PartialEq for XmlNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree(), other.tree()) && self.order_key() == other.order_key()
    }
}

impl Eq for XmlNode<'_> {}

impl PartialOrd for XmlNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// An element sorts before its attributes, and its attributes before its
// children, because children always have larger ids than their parent.
impl Ord for XmlNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }
}

impl Hash for XmlNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.order_key().hash(state);
    }
}

impl<'a> DataSourceNode<'a> for XmlNode<'a> {
    fn node_type(&self) -> NodeType {
        match self {
            XmlNode::Node { tree, id } => match tree.kind(*id) {
                NodeKind::Root => NodeType::Root,
                NodeKind::Element(_) => NodeType::Element,
                NodeKind::Text(_) => NodeType::Text,
                NodeKind::Comment(_) => NodeType::Comment,
                NodeKind::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
            },
            XmlNode::Attribute { .. } => NodeType::Attribute,
        }
    }

    fn name(&self) -> Option<QName<'a>> {
        match *self {
            XmlNode::Node { tree, id } => match tree.kind(id) {
                NodeKind::Element(element) => Some(QName {
                    namespace: element.name.namespace.as_deref(),
                    local_part: &element.name.local,
                }),
                NodeKind::ProcessingInstruction { target, .. } => Some(QName {
                    namespace: None,
                    local_part: target,
                }),
                _ => None,
            },
            XmlNode::Attribute { tree, owner, index } => tree
                .element(owner)
                .and_then(|e| e.attributes.get(index))
                .map(|attr| QName {
                    namespace: attr.name.namespace.as_deref(),
                    local_part: &attr.name.local,
                }),
        }
    }

    fn string_value(&self) -> String {
        match *self {
            XmlNode::Node { tree, id } => tree.text(id),
            XmlNode::Attribute { tree, owner, index } => tree
                .element(owner)
                .and_then(|e| e.attributes.get(index))
                .map(|attr| attr.value.clone())
                .unwrap_or_default(),
        }
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        match *self {
            XmlNode::Node { tree, id } => {
                let count = tree.element(id).map_or(0, |e| e.attributes.len());
                Box::new((0..count).map(move |index| XmlNode::Attribute {
                    tree,
                    owner: id,
                    index,
                }))
            }
            XmlNode::Attribute { .. } => Box::new(std::iter::empty()),
        }
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        match *self {
            XmlNode::Node { tree, id } => Box::new(
                tree.children(id)
                    .iter()
                    .map(move |&child| XmlNode::Node { tree, id: child }),
            ),
            XmlNode::Attribute { .. } => Box::new(std::iter::empty()),
        }
    }

    fn parent(&self) -> Option<Self> {
        match *self {
            XmlNode::Node { tree, id } => tree.parent(id).map(|p| XmlNode::Node { tree, id: p }),
            XmlNode::Attribute { tree, owner, .. } => Some(XmlNode::Node { tree, id: owner }),
        }
    }
}
