//! Defines the core abstraction for a navigable data source tree.
use std::hash::Hash;

/// An expanded name: the namespace URI (if any) and the local part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QName<'a> {
    pub namespace: Option<&'a str>,
    pub local_part: &'a str,
}

/// The type of a node in the data source tree, aligned with the XPath 1.0 data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

/// The contract the path engine is written against.
///
/// Nodes are cheap handles into a tree owned elsewhere. `Ord` must follow
/// document order, since selections are returned sorted by it.
///
/// `'a` is the lifetime of the underlying tree.
pub trait DataSourceNode<'a>:
    std::fmt::Debug + Clone + Copy + PartialEq + Eq + Hash + PartialOrd + Ord
{
    /// The type of the node (Element, Text, Attribute, etc.).
    fn node_type(&self) -> NodeType;

    /// The expanded name of elements and attributes, or the target of a
    /// processing instruction. `None` for text, comment, and root nodes.
    fn name(&self) -> Option<QName<'a>>;

    /// The string value as defined by the XPath 1.0 `string()` function: the
    /// concatenated descendant text for elements, the content otherwise.
    fn string_value(&self) -> String;

    /// The attribute nodes of this node; empty for non-element nodes.
    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// The child nodes of this node; empty for leaf nodes.
    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    fn parent(&self) -> Option<Self>;
}
