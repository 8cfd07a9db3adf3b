use rusqlite::ToSql;
use rusqlite::types::Value;
use std::fmt::Write;

use crate::types::{SqlParam, SqlValue};

/// Convert a single [`SqlValue`] to a rusqlite `Value`.
#[must_use]
pub fn sql_value_to_sqlite(value: &SqlValue) -> Value {
    match value {
        SqlValue::Int(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        SqlValue::Timestamp(dt) => {
            let mut buf = String::with_capacity(32);
            // Infallible for String
            let _ = write!(buf, "{}", dt.format("%F %T%.f"));
            Value::Text(buf)
        }
        SqlValue::Null => Value::Null,
        SqlValue::Json(jval) => Value::Text(jval.to_string()),
        SqlValue::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Named parameters converted to sqlite values, marker prefix included.
pub struct NamedParams(Vec<(String, Value)>);

impl NamedParams {
    /// Convert builder parameters into sqlite named-binding pairs.
    #[must_use]
    pub fn convert(params: &[SqlParam]) -> Self {
        NamedParams(
            params
                .iter()
                .map(|p| (p.marker(), sql_value_to_sqlite(&p.value)))
                .collect(),
        )
    }

    /// Borrowed pairs in the shape rusqlite's named-parameter binding expects.
    #[must_use]
    pub fn as_refs(&self) -> Vec<(&str, &dyn ToSql)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect()
    }
}
