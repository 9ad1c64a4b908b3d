use thiserror::Error;

pub type Result<T> = std::result::Result<T, CmsError>;

#[derive(Debug, Clone, Error)]
pub enum CmsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode API response: {0}")]
    Decode(String),

    #[error("Cursor is not a page of this repository: {0}")]
    InvalidCursor(String),

    #[error("Repository has no master ref")]
    MissingRef,
}

impl From<reqwest::Error> for CmsError {
    fn from(err: reqwest::Error) -> Self {
        CmsError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for CmsError {
    fn from(err: serde_json::Error) -> Self {
        CmsError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for CmsError {
    fn from(err: url::ParseError) -> Self {
        CmsError::InvalidCursor(err.to_string())
    }
}
