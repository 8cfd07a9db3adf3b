//! Convenient imports for common functionality.

pub use crate::binder::{ColumnBinder, KeyBinder};
pub use crate::connection::{DatabaseConnection, RawRows};
pub use crate::dataset::DataSet;
pub use crate::error::DataSetError;
pub use crate::metadata::{
    ColumnEntry, IsolationLevel, StatementMetadata, TransactionOptions, TxScope,
};
pub use crate::results::{Record, ResultSet};
pub use crate::types::{SqlParam, SqlType, SqlValue};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteConnection;
