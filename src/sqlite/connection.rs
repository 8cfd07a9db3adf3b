use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::connection::{DatabaseConnection, RawRows};
use crate::error::DataSetError;
use crate::metadata::{IsolationLevel, TransactionOptions};
use crate::types::SqlParam;

use super::params::NamedParams;
use super::query::build_raw_rows;

#[derive(Debug, Clone)]
enum Target {
    Memory,
    File(PathBuf),
}

/// Blocking connection over an owned `rusqlite::Connection`.
///
/// Transactions are depth-tracked: the outermost scope issues `BEGIN`, nested
/// scopes use savepoints, so `TxScope::RequiresNew` can nest inside an open
/// transaction. Isolation mapping is sqlite's: `ReadUncommitted` sets
/// `PRAGMA read_uncommitted`, `Serializable`/`Snapshot` begin `immediate`,
/// the rest begin deferred; the configured timeout maps to the busy timeout.
pub struct SqliteConnection {
    conn: Option<rusqlite::Connection>,
    target: Target,
    tx_depth: usize,
    read_uncommitted: bool,
}

impl SqliteConnection {
    /// An unopened in-memory connection; [`DatabaseConnection::open`] (or
    /// `DataSet::new`) establishes it.
    #[must_use]
    pub fn memory() -> Self {
        Self {
            conn: None,
            target: Target::Memory,
            tx_depth: 0,
            read_uncommitted: false,
        }
    }

    /// An unopened connection to a database file.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            conn: None,
            target: Target::File(path.into()),
            tx_depth: 0,
            read_uncommitted: false,
        }
    }

    /// Open an in-memory database immediately.
    ///
    /// # Errors
    /// Returns `DataSetError` if the database cannot be opened.
    pub fn open_in_memory() -> Result<Self, DataSetError> {
        let mut conn = Self::memory();
        conn.open()?;
        Ok(conn)
    }

    /// Open a database file immediately.
    ///
    /// # Errors
    /// Returns `DataSetError` if the database cannot be opened.
    pub fn open_file(path: impl Into<PathBuf>) -> Result<Self, DataSetError> {
        let mut conn = Self::file(path);
        conn.open()?;
        Ok(conn)
    }

    /// Run raw SQL directly, outside the builder (schema setup, pragmas).
    ///
    /// # Errors
    /// Returns `DataSetError` if execution fails or the connection is closed.
    pub fn execute_batch(&mut self, sql: &str) -> Result<(), DataSetError> {
        self.handle()?
            .execute_batch(sql)
            .map_err(DataSetError::SqliteError)
    }

    fn handle(&self) -> Result<&rusqlite::Connection, DataSetError> {
        self.conn
            .as_ref()
            .ok_or_else(|| DataSetError::ConnectionError("connection is not open".into()))
    }

    fn savepoint_name(depth: usize) -> String {
        format!("sql_dataset_sp_{depth}")
    }
}

// sqlite has no TRUNCATE; rewrite the generated statement at the adapter
// boundary. The core always emits `truncate table …;`.
fn adapt_statement(sql: &str) -> Cow<'_, str> {
    let trimmed = sql.trim_start();
    if let Some(rest) = trimmed
        .strip_prefix("truncate table ")
        .or_else(|| trimmed.strip_prefix("TRUNCATE TABLE "))
    {
        let table = rest.trim_end().trim_end_matches(';');
        return Cow::Owned(format!("delete from {table}"));
    }
    Cow::Borrowed(sql)
}

impl DatabaseConnection for SqliteConnection {
    fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn open(&mut self) -> Result<(), DataSetError> {
        if self.conn.is_some() {
            return Ok(());
        }
        let conn = match &self.target {
            Target::Memory => rusqlite::Connection::open_in_memory()?,
            Target::File(path) => rusqlite::Connection::open(path)?,
        };
        self.conn = Some(conn);
        Ok(())
    }

    fn execute(&mut self, sql: &str, params: &[SqlParam]) -> Result<usize, DataSetError> {
        let adapted = adapt_statement(sql);
        let converted = NamedParams::convert(params);
        let conn = self.handle()?;
        let mut stmt = conn
            .prepare(adapted.as_ref())
            .map_err(DataSetError::SqliteError)?;
        let affected = stmt
            .execute(&converted.as_refs()[..])
            .map_err(DataSetError::SqliteError)?;
        Ok(affected)
    }

    fn query(&mut self, sql: &str, params: &[SqlParam]) -> Result<RawRows, DataSetError> {
        let converted = NamedParams::convert(params);
        let conn = self.handle()?;
        let mut stmt = conn.prepare(sql).map_err(DataSetError::SqliteError)?;
        build_raw_rows(&mut stmt, &converted)
    }

    fn begin(&mut self, options: &TransactionOptions) -> Result<(), DataSetError> {
        if self.tx_depth == 0 {
            let conn = self.handle()?;
            conn.busy_timeout(options.timeout)
                .map_err(DataSetError::SqliteError)?;
            if options.isolation == IsolationLevel::ReadUncommitted {
                conn.pragma_update(None, "read_uncommitted", 1)
                    .map_err(DataSetError::SqliteError)?;
                self.read_uncommitted = true;
            }
            let begin = match options.isolation {
                IsolationLevel::Serializable | IsolationLevel::Snapshot => "BEGIN IMMEDIATE",
                _ => "BEGIN",
            };
            self.handle()?
                .execute_batch(begin)
                .map_err(DataSetError::SqliteError)?;
        } else {
            let sp = Self::savepoint_name(self.tx_depth);
            debug!(savepoint = %sp, "nesting transaction scope");
            self.handle()?
                .execute_batch(&format!("SAVEPOINT {sp}"))
                .map_err(DataSetError::SqliteError)?;
        }
        self.tx_depth += 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DataSetError> {
        match self.tx_depth {
            0 => Err(DataSetError::ExecutionError(
                "sqlite transaction not active".into(),
            )),
            1 => {
                self.handle()?
                    .execute_batch("COMMIT")
                    .map_err(DataSetError::SqliteError)?;
                self.tx_depth = 0;
                self.reset_read_uncommitted()
            }
            depth => {
                let sp = Self::savepoint_name(depth - 1);
                self.handle()?
                    .execute_batch(&format!("RELEASE {sp}"))
                    .map_err(DataSetError::SqliteError)?;
                self.tx_depth = depth - 1;
                Ok(())
            }
        }
    }

    fn rollback(&mut self) -> Result<(), DataSetError> {
        match self.tx_depth {
            0 => Err(DataSetError::ExecutionError(
                "sqlite transaction not active".into(),
            )),
            1 => {
                self.handle()?
                    .execute_batch("ROLLBACK")
                    .map_err(DataSetError::SqliteError)?;
                self.tx_depth = 0;
                self.reset_read_uncommitted()
            }
            depth => {
                let sp = Self::savepoint_name(depth - 1);
                self.handle()?
                    .execute_batch(&format!("ROLLBACK TO {sp}; RELEASE {sp}"))
                    .map_err(DataSetError::SqliteError)?;
                self.tx_depth = depth - 1;
                Ok(())
            }
        }
    }

    fn in_transaction(&self) -> bool {
        self.tx_depth > 0
    }

    fn close(&mut self) -> Result<(), DataSetError> {
        match self.conn.take() {
            Some(conn) => conn
                .close()
                .map_err(|(_, err)| DataSetError::SqliteError(err)),
            None => Ok(()),
        }
    }
}

impl SqliteConnection {
    fn reset_read_uncommitted(&mut self) -> Result<(), DataSetError> {
        if self.read_uncommitted {
            self.handle()?
                .pragma_update(None, "read_uncommitted", 0)
                .map_err(DataSetError::SqliteError)?;
            self.read_uncommitted = false;
        }
        Ok(())
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("target", &self.target)
            .field("open", &self.conn.is_some())
            .field("tx_depth", &self.tx_depth)
            .finish()
    }
}
