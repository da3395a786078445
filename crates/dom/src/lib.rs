//! An owned, mutable XML tree.
//!
//! Documents are parsed with `roxmltree`, held in an arena addressed by
//! [`NodeId`], written back out with `quick-xml`, and navigated by the path
//! engine through [`XmlNode`].

pub mod error;
pub mod node;
mod parse;
mod serialize;
pub mod tree;

pub use error::DomError;
pub use node::XmlNode;
pub use tree::{Attribute, Element, ExpandedName, NamespaceDecl, NodeId, NodeKind, Tree};

/// The namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
