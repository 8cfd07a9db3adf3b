use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use crate::error::DataSetError;
use crate::types::{SqlType, SqlValue};

/// Transaction isolation levels accepted by [`crate::DataSet::with_transaction`].
///
/// How (and whether) a level maps onto the backend is a driver concern; the
/// sqlite adapter documents its mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
    Snapshot,
}

/// Policy governing how an execution relates to an ambient transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TxScope {
    /// Join an open transaction if one exists, otherwise create one.
    Required,
    /// Always create a new (possibly nested) transaction.
    RequiresNew,
    /// Execute with no transaction scope at all.
    Suppress,
}

/// Transaction configuration carried by the metadata and consumed by the
/// scope runner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionOptions {
    pub isolation: IsolationLevel,
    pub timeout: Duration,
    pub scope: TxScope,
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self {
            isolation: IsolationLevel::ReadCommitted,
            timeout: Duration::from_secs(30),
            scope: TxScope::Required,
        }
    }
}

/// One declared column or key: its name, declared type tag, assigned value,
/// and (for columns) an optional display alias used only by result mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnEntry {
    pub name: String,
    pub ty: SqlType,
    pub value: SqlValue,
    pub alias: Option<String>,
}

/// Accumulated, not-yet-executed description of one statement: target table,
/// declared columns and keys, and transaction configuration.
///
/// Mutated only through the builder's fluent calls and discarded when the
/// owning builder is cleared or dropped. Duplicate declarations of the same
/// name append duplicate entries; insertion order determines SQL clause order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatementMetadata {
    schema: Option<String>,
    table: Option<String>,
    pub columns: Vec<ColumnEntry>,
    pub keys: Vec<ColumnEntry>,
    pub transaction_enabled: bool,
    pub transaction: TransactionOptions,
}

impl StatementMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target table identity. Settable exactly once per metadata
    /// instance.
    ///
    /// # Errors
    /// Returns `DataSetError::ConfigError` if the identity was already set.
    pub fn set_table(
        &mut self,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Result<(), DataSetError> {
        if self.table.is_some() {
            return Err(DataSetError::ConfigError(
                "table metadata already initialized".into(),
            ));
        }
        self.schema = Some(schema.into());
        self.table = Some(table.into());
        Ok(())
    }

    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    #[must_use]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// The `schema.table` form used in generated SQL.
    ///
    /// # Errors
    /// Returns `DataSetError::ConfigError` if no table identity has been set.
    pub fn qualified_table(&self) -> Result<String, DataSetError> {
        match (&self.schema, &self.table) {
            (Some(schema), Some(table)) => Ok(format!("{schema}.{table}")),
            _ => Err(DataSetError::ConfigError("missing table name".into())),
        }
    }

    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        ty: SqlType,
        value: SqlValue,
        alias: Option<String>,
    ) {
        self.columns.push(ColumnEntry {
            name: name.into(),
            ty,
            value,
            alias,
        });
    }

    pub fn add_key(&mut self, name: impl Into<String>, ty: SqlType, value: SqlValue) {
        self.keys.push(ColumnEntry {
            name: name.into(),
            ty,
            value,
            alias: None,
        });
    }

    /// Enable transaction wrapping and overwrite the stored configuration.
    pub fn set_transaction(&mut self, options: TransactionOptions) {
        self.transaction = options;
        self.transaction_enabled = true;
    }

    /// Map from declared column name to its display alias (or itself when no
    /// alias was declared). Last declaration of a name wins.
    #[must_use]
    pub fn column_alias_map(&self) -> HashMap<String, String> {
        self.columns
            .iter()
            .map(|entry| {
                let alias = entry.alias.clone().unwrap_or_else(|| entry.name.clone());
                (entry.name.clone(), alias)
            })
            .collect()
    }
}
