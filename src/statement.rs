//! Compiles accumulated [`StatementMetadata`] into SQL text plus a named
//! parameter list.
//!
//! Pure string/parameter derivation, no I/O. Column parameters are named
//! `<column>_p` and key parameters `<key>_cnd_p`, so the same identifier can
//! appear in both lists without a marker collision. All statements use the
//! fixed `:name` marker style.

use crate::error::DataSetError;
use crate::metadata::{ColumnEntry, StatementMetadata};
use crate::types::SqlParam;

/// A generated statement and the parameters it binds, in binding order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl SqlStatement {
    fn new(sql: String, params: Vec<SqlParam>) -> Self {
        Self { sql, params }
    }
}

/// The WHERE fragment derived from declared keys: a conjunction of
/// `name = :name_cnd_p` in declaration order, or the literal `true` when no
/// key was declared (whole-relation match).
#[must_use]
pub fn keys_predicate(meta: &StatementMetadata) -> String {
    if meta.keys.is_empty() {
        return "true".to_owned();
    }
    meta.keys
        .iter()
        .map(|key| format!("{} = :{}_cnd_p", key.name, key.name))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn key_params(meta: &StatementMetadata) -> Vec<SqlParam> {
    meta.keys.iter().map(|k| entry_param(k, "_cnd_p")).collect()
}

fn column_params(meta: &StatementMetadata) -> Vec<SqlParam> {
    meta.columns.iter().map(|c| entry_param(c, "_p")).collect()
}

fn entry_param(entry: &ColumnEntry, suffix: &str) -> SqlParam {
    SqlParam::new(
        format!("{}{suffix}", entry.name),
        entry.ty,
        entry.value.clone(),
    )
}

fn projection(meta: &StatementMetadata) -> String {
    if meta.columns.is_empty() {
        // No declared columns; project everything rather than emit an empty list.
        return "*".to_owned();
    }
    meta.columns
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `truncate table schema.table;` with no parameters.
///
/// # Errors
/// Returns `DataSetError::ConfigError` if no table identity has been set.
pub fn truncate(meta: &StatementMetadata) -> Result<SqlStatement, DataSetError> {
    let table = meta.qualified_table()?;
    Ok(SqlStatement::new(
        format!("truncate table {table};"),
        Vec::new(),
    ))
}

/// `insert into schema.table (c1, …) values (:c1_p, …)`.
///
/// Column list and placeholder list are derived, in declaration order, solely
/// from the declared columns, so both always have equal length and order.
///
/// # Errors
/// Returns `DataSetError::ConfigError` if no table identity has been set.
pub fn insert(meta: &StatementMetadata) -> Result<SqlStatement, DataSetError> {
    let table = meta.qualified_table()?;
    let cols = meta
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let markers = meta
        .columns
        .iter()
        .map(|c| format!(":{}_p", c.name))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(SqlStatement::new(
        format!("insert into {table} ({cols}) values ({markers})"),
        column_params(meta),
    ))
}

/// `update schema.table set c = :c_p, … where <keys-predicate>`.
///
/// Parameter order is keys first, then columns, with no deduplication even
/// when a name appears in both lists.
///
/// # Errors
/// Returns `DataSetError::ConfigError` if no table identity has been set.
pub fn update(meta: &StatementMetadata) -> Result<SqlStatement, DataSetError> {
    let table = meta.qualified_table()?;
    let assignments = meta
        .columns
        .iter()
        .map(|c| format!("{} = :{}_p", c.name, c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let mut params = key_params(meta);
    params.extend(column_params(meta));
    Ok(SqlStatement::new(
        format!(
            "update {table} set {assignments} where {}",
            keys_predicate(meta)
        ),
        params,
    ))
}

/// `delete from schema.table where <keys-predicate>`; key parameters only.
///
/// # Errors
/// Returns `DataSetError::ConfigError` if no table identity has been set.
pub fn delete(meta: &StatementMetadata) -> Result<SqlStatement, DataSetError> {
    let table = meta.qualified_table()?;
    Ok(SqlStatement::new(
        format!("delete from {table} where {}", keys_predicate(meta)),
        key_params(meta),
    ))
}

/// Keyed select: projects the declared columns (by name; aliases affect only
/// result mapping) filtered by the keys-predicate.
///
/// # Errors
/// Returns `DataSetError::ConfigError` if no table identity has been set.
pub fn select(meta: &StatementMetadata) -> Result<SqlStatement, DataSetError> {
    let table = meta.qualified_table()?;
    Ok(SqlStatement::new(
        format!(
            "select {} from {table} where {}",
            projection(meta),
            keys_predicate(meta)
        ),
        key_params(meta),
    ))
}

/// Raw-query select: wraps the caller's fragment as a subquery when columns
/// were declared, appends the keys-predicate when keys were declared, and
/// passes the fragment through untouched otherwise.
///
/// Explicit caller parameters take precedence over derived key parameters.
#[must_use]
pub fn select_query(
    meta: &StatementMetadata,
    fragment: &str,
    explicit_params: Option<&[SqlParam]>,
) -> SqlStatement {
    let mut sql = fragment.to_owned();
    if !meta.columns.is_empty() {
        sql = format!("select {} from ({sql}) d", projection(meta));
    }
    if !meta.keys.is_empty() {
        sql = format!("{sql} where {}", keys_predicate(meta));
    }
    let params = match explicit_params {
        Some(given) => given.to_vec(),
        None => key_params(meta),
    };
    SqlStatement::new(sql, params)
}
