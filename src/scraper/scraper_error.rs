use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Search query is required")]
    EmptyQuery,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("Unexpected data shape: {0}")]
    UnexpectedShape(String),
}
