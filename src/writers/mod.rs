pub mod schema;
pub mod sqlite_writer;

pub use schema::{enable_foreign_keys, ensure_schema};
pub use sqlite_writer::{LoadSummary, SqliteWriter};
