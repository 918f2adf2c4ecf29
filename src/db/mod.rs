pub mod connection;
pub mod leads;
pub mod sends;

pub use connection::{init_db, Database};
pub use leads::SqliteLeadStore;
