use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};

use crate::binder::{ColumnBinder, KeyBinder};
use crate::connection::DatabaseConnection;
use crate::error::DataSetError;
use crate::metadata::{IsolationLevel, StatementMetadata, TransactionOptions, TxScope};
use crate::results::ResultSet;
use crate::statement::{self, SqlStatement};
use crate::transaction::run_scoped;
use crate::types::{SqlParam, SqlType};

/// Default schema used by [`DataSet::table`] when none is given.
pub const DEFAULT_SCHEMA: &str = "public";

/// The fluent statement builder.
///
/// Owns a connection and one [`StatementMetadata`]; declaration calls mutate
/// the metadata, terminal calls compile it into one parameterized statement,
/// execute it (optionally inside a transaction scope), and for reads map the
/// cursor into alias-renamed [`crate::Record`]s.
///
/// ```rust
/// use sql_dataset::{DataSet, SqliteConnection};
///
/// # fn demo() -> Result<(), sql_dataset::DataSetError> {
/// let conn = SqliteConnection::open_in_memory()?;
/// let mut ds = DataSet::with_open(conn);
/// ds.table_in("main", "students")?
///     .column("last_name").set("Ivanov")
///     .column("comment").set("the diligent student")
///     .insert()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DataSet<C: DatabaseConnection> {
    conn: C,
    meta: StatementMetadata,
}

impl<C: DatabaseConnection> DataSet<C> {
    /// Wrap a connection, opening it first if it is not already open.
    ///
    /// # Errors
    /// Returns `DataSetError` if opening the connection fails.
    pub fn new(mut conn: C) -> Result<Self, DataSetError> {
        if !conn.is_open() {
            conn.open()?;
        }
        Ok(Self {
            conn,
            meta: StatementMetadata::new(),
        })
    }

    /// Wrap a ready-made connection without touching its open state.
    #[must_use]
    pub fn with_open(conn: C) -> Self {
        Self {
            conn,
            meta: StatementMetadata::new(),
        }
    }

    /// The accumulated statement metadata.
    #[must_use]
    pub fn metadata(&self) -> &StatementMetadata {
        &self.meta
    }

    pub(crate) fn metadata_mut(&mut self) -> &mut StatementMetadata {
        &mut self.meta
    }

    /// Set the target table in the default `public` schema. Fails if the
    /// table identity was already set on this metadata instance.
    ///
    /// # Errors
    /// Returns `DataSetError::ConfigError` on a second table assignment.
    pub fn table(&mut self, table: impl Into<String>) -> Result<&mut Self, DataSetError> {
        self.meta.set_table(DEFAULT_SCHEMA, table)?;
        Ok(self)
    }

    /// Set the target table with an explicit schema. Fails if the table
    /// identity was already set on this metadata instance.
    ///
    /// # Errors
    /// Returns `DataSetError::ConfigError` on a second table assignment.
    pub fn table_in(
        &mut self,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Result<&mut Self, DataSetError> {
        self.meta.set_table(schema, table)?;
        Ok(self)
    }

    /// Declare a column, returning a binder to assign its value or alias.
    /// Does not itself mutate the metadata.
    pub fn column(&mut self, name: impl Into<String>) -> ColumnBinder<'_, C> {
        ColumnBinder::new(self, name.into(), SqlType::Any)
    }

    /// Declare a column with an explicit type tag.
    pub fn column_typed(&mut self, name: impl Into<String>, ty: SqlType) -> ColumnBinder<'_, C> {
        ColumnBinder::new(self, name.into(), ty)
    }

    /// Declare a key (WHERE-predicate) column, returning a binder to assign
    /// its value.
    pub fn with_keys(&mut self, name: impl Into<String>) -> KeyBinder<'_, C> {
        KeyBinder::new(self, name.into(), SqlType::Any)
    }

    /// Declare a key column with an explicit type tag.
    pub fn with_keys_typed(&mut self, name: impl Into<String>, ty: SqlType) -> KeyBinder<'_, C> {
        KeyBinder::new(self, name.into(), ty)
    }

    /// Enable transaction wrapping for subsequent DML terminals and overwrite
    /// the stored transaction configuration.
    pub fn with_transaction(
        &mut self,
        isolation: IsolationLevel,
        timeout_secs: u64,
        scope: TxScope,
    ) -> &mut Self {
        self.meta.set_transaction(TransactionOptions {
            isolation,
            timeout: Duration::from_secs(timeout_secs),
            scope,
        });
        self
    }

    /// Compile and execute an `insert` from the declared columns.
    ///
    /// # Errors
    /// Returns `DataSetError::ConfigError` without a table identity, or the
    /// driver's error verbatim if execution fails.
    pub fn insert(&mut self) -> Result<&mut Self, DataSetError> {
        let stmt = statement::insert(&self.meta)?;
        self.execute_dml(&stmt)?;
        Ok(self)
    }

    /// Compile and execute an `update`: SET from columns, WHERE from keys.
    ///
    /// With no keys declared this updates every row of the table.
    ///
    /// # Errors
    /// Returns `DataSetError::ConfigError` without a table identity, or the
    /// driver's error verbatim if execution fails.
    pub fn update(&mut self) -> Result<&mut Self, DataSetError> {
        let stmt = statement::update(&self.meta)?;
        self.warn_if_whole_table("update");
        self.execute_dml(&stmt)?;
        Ok(self)
    }

    /// Compile and execute a `delete` filtered by the declared keys.
    ///
    /// With no keys declared this deletes every row of the table.
    ///
    /// # Errors
    /// Returns `DataSetError::ConfigError` without a table identity, or the
    /// driver's error verbatim if execution fails.
    pub fn delete(&mut self) -> Result<&mut Self, DataSetError> {
        let stmt = statement::delete(&self.meta)?;
        self.warn_if_whole_table("delete");
        self.execute_dml(&stmt)?;
        Ok(self)
    }

    /// Execute `truncate table schema.table;`. Runs directly on the
    /// connection, outside any transaction scope.
    ///
    /// # Errors
    /// Returns `DataSetError::ConfigError` without a table identity, or the
    /// driver's error verbatim if execution fails.
    pub fn truncate(&mut self) -> Result<&mut Self, DataSetError> {
        let stmt = statement::truncate(&self.meta)?;
        debug!(sql = %stmt.sql, "executing statement");
        self.conn.execute(&stmt.sql, &stmt.params)?;
        Ok(self)
    }

    /// Compile and execute a keyed `select`, projecting the declared columns
    /// filtered by the keys-predicate.
    ///
    /// # Errors
    /// Returns `DataSetError::ConfigError` without a table identity, or the
    /// driver's error verbatim if the query fails.
    pub fn select(&mut self) -> Result<ResultSet, DataSetError> {
        let stmt = statement::select(&self.meta)?;
        self.read(&stmt)
    }

    /// Execute a caller-supplied query fragment, wrapped as a subquery when
    /// columns were declared and filtered by the keys-predicate when keys
    /// were declared. Key parameters are bound when keys were declared.
    ///
    /// # Errors
    /// Returns `DataSetError::ConfigError` without a table identity, or the
    /// driver's error verbatim if the query fails.
    pub fn select_query(&mut self, query: &str) -> Result<ResultSet, DataSetError> {
        self.meta.qualified_table()?;
        let stmt = statement::select_query(&self.meta, query, None);
        self.read(&stmt)
    }

    /// [`select_query`](Self::select_query) with explicit parameters, which
    /// take precedence over derived key parameters.
    ///
    /// # Errors
    /// Returns `DataSetError::ConfigError` without a table identity, or the
    /// driver's error verbatim if the query fails.
    pub fn select_query_with(
        &mut self,
        query: &str,
        params: &[SqlParam],
    ) -> Result<ResultSet, DataSetError> {
        self.meta.qualified_table()?;
        let stmt = statement::select_query(&self.meta, query, Some(params));
        self.read(&stmt)
    }

    /// Discard the accumulated metadata and start a fresh statement session.
    pub fn clear_metadata(&mut self) -> &mut Self {
        self.meta = StatementMetadata::new();
        self
    }

    /// Release the underlying connection. Also performed on drop; the
    /// connection is closed exactly once either way.
    ///
    /// # Errors
    /// Returns `DataSetError` if the driver fails to close cleanly.
    pub fn close(&mut self) -> Result<(), DataSetError> {
        self.conn.close()
    }

    fn execute_dml(&mut self, stmt: &SqlStatement) -> Result<usize, DataSetError> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "executing statement");
        if self.meta.transaction_enabled {
            let options = self.meta.transaction.clone();
            run_scoped(&mut self.conn, &options, |conn| {
                conn.execute(&stmt.sql, &stmt.params)
            })
        } else {
            self.conn.execute(&stmt.sql, &stmt.params)
        }
    }

    fn read(&mut self, stmt: &SqlStatement) -> Result<ResultSet, DataSetError> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "executing query");
        let raw = self.conn.query(&stmt.sql, &stmt.params)?;
        Ok(ResultSet::from_raw(raw, &self.meta.column_alias_map()))
    }

    fn warn_if_whole_table(&self, op: &str) {
        if self.meta.keys.is_empty() {
            warn!(
                table = self.meta.table().unwrap_or_default(),
                "no keys declared; {op} affects all rows"
            );
        }
    }
}

impl<C: DatabaseConnection> fmt::Display for DataSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(&self.meta) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl<C: DatabaseConnection> Drop for DataSet<C> {
    fn drop(&mut self) {
        let _ = self.conn.close();
    }
}
