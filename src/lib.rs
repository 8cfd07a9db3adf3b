//! Fluent statement builder over a relational connection.
//!
//! A [`DataSet`] accumulates a target table, column/key declarations, and
//! transaction configuration through chained calls, then compiles them into
//! one parameterized statement (`insert`, `update`, `delete`, `select`,
//! `truncate`) with the fixed `:name` marker style. Reads materialize into
//! loosely-typed, alias-renamed [`Record`]s.
//!
//! ```rust
//! use sql_dataset::prelude::*;
//!
//! # fn demo() -> Result<(), DataSetError> {
//! let mut conn = SqliteConnection::open_in_memory()?;
//! conn.execute_batch("CREATE TABLE test (card_number INTEGER, last_name TEXT)")?;
//!
//! let mut ds = DataSet::with_open(conn);
//! ds.table_in("main", "test")?
//!     .column("card_number").set(10)
//!     .column("last_name").set("Ivanov")
//!     .insert()?;
//!
//! let students = ds
//!     .clear_metadata()
//!     .table_in("main", "test")?
//!     .column("card_number").with_alias("cid").get()
//!     .with_keys("card_number").set(10)
//!     .select()?;
//! assert_eq!(students.records[0].get("cid"), Some(&SqlValue::Int(10)));
//! # Ok(())
//! # }
//! ```

pub mod binder;
pub mod connection;
pub mod dataset;
pub mod error;
pub mod metadata;
pub mod prelude;
pub mod results;
pub mod statement;
pub mod transaction;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use binder::{ColumnBinder, KeyBinder};
pub use connection::{DatabaseConnection, RawRows};
pub use dataset::{DEFAULT_SCHEMA, DataSet};
pub use error::DataSetError;
pub use metadata::{ColumnEntry, IsolationLevel, StatementMetadata, TransactionOptions, TxScope};
pub use results::{Record, ResultSet};
pub use statement::SqlStatement;
pub use transaction::run_scoped;
pub use types::{SqlParam, SqlType, SqlValue};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteConnection;
