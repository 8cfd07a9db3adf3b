use crate::error::DataSetError;
use crate::metadata::TransactionOptions;
use crate::types::{SqlParam, SqlValue};

/// Driver-neutral, eagerly materialized query output handed to result mapping.
///
/// `rows` are in cursor order; each row's values are in the cursor's column
/// order and NULLs arrive as [`SqlValue::Null`].
#[derive(Debug, Clone, Default)]
pub struct RawRows {
    pub column_names: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

/// Capability set the statement builder requires from a relational client.
///
/// Any driver exposing open-state, execute, query, and transaction control can
/// back a [`crate::DataSet`]; the builder depends on nothing driver-specific.
/// Statements arrive with the fixed `:name` parameter marker style.
///
/// All methods are synchronous blocking round trips (one per terminal
/// operation); the builder never issues concurrent calls on one connection.
pub trait DatabaseConnection {
    /// Whether the connection is currently usable.
    fn is_open(&self) -> bool;

    /// Open the connection if it is not already open.
    ///
    /// # Errors
    /// Returns `DataSetError` if the connection cannot be established.
    fn open(&mut self) -> Result<(), DataSetError>;

    /// Execute a non-query statement, returning rows affected.
    ///
    /// # Errors
    /// Returns `DataSetError` if preparation, binding, or execution fails.
    fn execute(&mut self, sql: &str, params: &[SqlParam]) -> Result<usize, DataSetError>;

    /// Execute a query and materialize the full cursor.
    ///
    /// # Errors
    /// Returns `DataSetError` if preparation, binding, or reading fails.
    fn query(&mut self, sql: &str, params: &[SqlParam]) -> Result<RawRows, DataSetError>;

    /// Begin a transaction (or a nested one, where the driver supports it).
    ///
    /// # Errors
    /// Returns `DataSetError` if the transaction cannot be started.
    fn begin(&mut self, options: &TransactionOptions) -> Result<(), DataSetError>;

    /// Commit the innermost open transaction.
    ///
    /// # Errors
    /// Returns `DataSetError` if committing fails or no transaction is open.
    fn commit(&mut self) -> Result<(), DataSetError>;

    /// Roll back the innermost open transaction.
    ///
    /// # Errors
    /// Returns `DataSetError` if rolling back fails or no transaction is open.
    fn rollback(&mut self) -> Result<(), DataSetError>;

    /// Whether at least one transaction is currently open.
    fn in_transaction(&self) -> bool;

    /// Release the underlying connection. Idempotent; later calls are no-ops.
    ///
    /// # Errors
    /// Returns `DataSetError` if the driver fails to close cleanly.
    fn close(&mut self) -> Result<(), DataSetError>;
}
