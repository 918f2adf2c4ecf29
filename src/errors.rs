// errors.rs
use astra::Response;
use thiserror::Error;

use crate::drafting::DraftError;
use crate::mailings::MailError;
use crate::scraper::ScraperError;
use crate::store::StoreError;

/// Errors originating from either the server logic
/// (routing, validation, missing resources) or downstream adapters.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    RateLimited(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Scrape(#[from] ScraperError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),

    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::RateLimited(_) => 429,
            // A query that never reached the provider is the caller's fault.
            ServerError::Scrape(ScraperError::EmptyQuery) => 400,
            ServerError::Store(StoreError::Invalid(_)) => 400,
            ServerError::Store(StoreError::NotFound(_)) => 404,
            _ => 500,
        }
    }
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
