use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("A {kind} constraint named '{token}' already exists")]
    DuplicateConstraint { kind: &'static str, token: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error while writing XML: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl SearchError {
    pub(crate) fn required(field: &'static str) -> Self {
        SearchError::Validation {
            field,
            message: "must not be empty".to_string(),
        }
    }
}
