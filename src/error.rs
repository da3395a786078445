// src/error.rs
use activedoc_dom::DomError;
use activedoc_search::SearchError;
use activedoc_xpath::XPathError;
use thiserror::Error;

/// Why a `write` was refused. The document is untouched whenever one of
/// these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("No element matches '{0}'")]
    NotFound(String),

    #[error("'{path}' matches {count} elements; a write needs exactly one")]
    Ambiguous { path: String, count: usize },

    #[error("'{0}' is not a simple text element")]
    Complex(String),

    #[error("'{0}' is not a plain element path and cannot be written")]
    UnsupportedPath(String),
}

/// Failure reported by a [`Transport`](crate::session::Transport).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Statement rejected: {0}")]
    Rejected(String),
}

/// The error type for every document, session and CLI operation.
#[derive(Error, Debug)]
pub enum ActiveDocError {
    #[error("Write rejected: {0}")]
    Mutation(#[from] MutationError),

    #[error("Cannot {0} a document that has no uri")]
    Identifier(&'static str),

    #[error("'{field}' is not a registered field of '{root}'")]
    UnknownField { field: String, root: String },

    #[error("Invalid path: {0}")]
    Path(#[from] XPathError),

    #[error("XML error: {0}")]
    Dom(#[from] DomError),

    #[error("Search options error: {0}")]
    Search(#[from] SearchError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
