//! Attribute-style access to XML documents.
//!
//! A [`Document`] resolves element paths against its namespace configuration
//! and collapses what it finds into text, a list of texts, or a read-only
//! [`PartialResult`] view that supports further reads scoped to its subtree.
//! [`SearchOptions`] compiles named constraints into a search options
//! document, and a [`Session`] carries the injected store collaborators.

pub mod config;
pub mod document;
pub mod error;
pub mod namespace;
pub mod partial;
pub mod projection;
pub mod session;

pub use config::DomainConfig;
pub use document::Document;
pub use error::{ActiveDocError, MutationError, TransportError};
pub use namespace::{NamespaceContext, resolve};
pub use partial::PartialResult;
pub use projection::{DocumentProjector, Projection, is_simple};
pub use session::{Session, StatementBuilder, Transport};

pub use activedoc_dom::{self as dom, NodeId, Tree};
pub use activedoc_search::{
    self as search, ComputedBucket, ConstraintDefinition, ElementRef, RangeConstraint,
    SearchOptions, ValueConstraint, WordConstraint,
};
pub use activedoc_xpath as xpath;
