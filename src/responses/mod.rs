pub mod errors;
pub mod html;
pub mod json;
pub mod xlsx;

pub use crate::errors::ResultResp;
pub use errors::{html_error_response, json_error_response};
pub use html::{html_response, redirect};
pub use json::{json_ok, json_response};
pub use xlsx::xlsx_response;
