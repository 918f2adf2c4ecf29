use crate::domain::LeadStatus;
use maud::{html, Markup};

pub mod card;
pub mod error;

pub use card::{card, stat_card};
pub use error::error_page;

pub fn status_badge(status: LeadStatus) -> Markup {
    html! {
        span class=(format!("badge badge-{}", status.as_str())) { (status.label()) }
    }
}
