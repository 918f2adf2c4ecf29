pub mod address;
pub mod lead;
pub mod list_field;

pub use lead::{Lead, LeadPatch, LeadStatus, SocialLinks};
