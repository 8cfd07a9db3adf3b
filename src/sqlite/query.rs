use rusqlite::Statement;
use rusqlite::types::Value;

use crate::connection::RawRows;
use crate::error::DataSetError;
use crate::types::SqlValue;

use super::params::NamedParams;

/// Extract a [`SqlValue`] from a sqlite row.
///
/// # Errors
/// Returns `DataSetError` if the value cannot be read.
pub fn sqlite_extract_value(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<SqlValue, DataSetError> {
    let value: Value = row.get(idx).map_err(DataSetError::SqliteError)?;
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Integer(i) => Ok(SqlValue::Int(i)),
        Value::Real(f) => Ok(SqlValue::Float(f)),
        Value::Text(s) => Ok(SqlValue::Text(s)),
        Value::Blob(b) => Ok(SqlValue::Blob(b)),
    }
}

/// Run a prepared query and materialize the whole cursor into [`RawRows`].
///
/// # Errors
/// Returns `DataSetError` if binding or row iteration fails.
pub fn build_raw_rows(
    stmt: &mut Statement,
    params: &NamedParams,
) -> Result<RawRows, DataSetError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut raw = RawRows {
        column_names,
        rows: Vec::new(),
    };

    let mut rows_iter = stmt.query(&params.as_refs()[..])?;
    while let Some(row) = rows_iter.next()? {
        let mut values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            values.push(sqlite_extract_value(row, i)?);
        }
        raw.rows.push(values);
    }

    Ok(raw)
}
