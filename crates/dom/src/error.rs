use crate::tree::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("XML parsing error: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("I/O error while writing XML: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),
}
