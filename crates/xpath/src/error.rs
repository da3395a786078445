use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum XPathError {
    #[error("XPath parse error in '{0}': {1}")]
    XPathParse(String, String),

    #[error("Expression '{0}' is not a location path")]
    NotALocationPath(String),

    #[error("Function '{function}' error: {message}")]
    FunctionError { function: String, message: String },

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    #[error("Type error: {0}")]
    TypeError(String),
}
