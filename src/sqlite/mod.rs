//! rusqlite-backed implementation of the connection capability set.

mod connection;
pub mod params;
pub mod query;

pub use connection::SqliteConnection;
pub use params::{NamedParams, sql_value_to_sqlite};
pub use query::{build_raw_rows, sqlite_extract_value};
