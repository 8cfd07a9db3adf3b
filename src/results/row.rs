use std::collections::HashMap;
use std::sync::Arc;

use crate::types::SqlValue;

/// One materialized result row.
///
/// Field names are shared across all records of a result set and are already
/// alias-substituted; values keep the source row's column order. NULLs are
/// [`SqlValue::Null`], never a zero value.
#[derive(Debug, Clone)]
pub struct Record {
    /// The field names for this record (shared across the result set)
    pub field_names: Arc<Vec<String>>,
    /// The values for this record
    pub values: Vec<SqlValue>,
    // Shared name-to-index map to avoid repeated string comparisons
    #[doc(hidden)]
    pub(crate) field_index: Arc<HashMap<String, usize>>,
}

impl Record {
    /// Create a standalone record, building its own field index.
    #[must_use]
    pub fn new(field_names: Arc<Vec<String>>, values: Vec<SqlValue>) -> Self {
        let field_index = Arc::new(
            field_names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );
        Self {
            field_names,
            values,
            field_index,
        }
    }

    /// Get the index of a field by name.
    #[must_use]
    pub fn get_field_index(&self, field_name: &str) -> Option<usize> {
        if let Some(&idx) = self.field_index.get(field_name) {
            return Some(idx);
        }
        // Fall back to linear search
        self.field_names.iter().position(|name| name == field_name)
    }

    /// Get a value by field name, or `None` if the field is absent.
    #[must_use]
    pub fn get(&self, field_name: &str) -> Option<&SqlValue> {
        self.get_field_index(field_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by positional index.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Iterate `(field name, value)` pairs in source-column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.field_names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}
