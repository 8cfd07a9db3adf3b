use std::collections::HashMap;
use std::sync::Arc;

use crate::connection::RawRows;
use crate::types::SqlValue;

use super::row::Record;

/// An eagerly materialized sequence of [`Record`]s.
///
/// Field names (and the name-to-index map) are stored once and shared by every
/// record instead of being duplicated per row.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The records returned by the query, in cursor order
    pub records: Vec<Record>,
    /// The number of rows affected (row count for reads)
    pub rows_affected: usize,
    field_names: Option<Arc<Vec<String>>>,
    field_index: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    /// Create an empty result set with preallocated row capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            records: Vec::with_capacity(capacity),
            rows_affected: 0,
            field_names: None,
            field_index: None,
        }
    }

    /// Map driver output into records, renaming declared columns through the
    /// alias table (`declared-name -> alias-or-self`). Columns absent from the
    /// table keep their native result-column names.
    #[must_use]
    pub fn from_raw(raw: RawRows, aliases: &HashMap<String, String>) -> ResultSet {
        let field_names: Vec<String> = raw
            .column_names
            .into_iter()
            .map(|name| aliases.get(&name).cloned().unwrap_or(name))
            .collect();

        let mut result_set = ResultSet::with_capacity(raw.rows.len());
        result_set.set_field_names(Arc::new(field_names));
        for row in raw.rows {
            result_set.add_values(row);
        }
        result_set
    }

    /// Set the field names shared by all records of this result set.
    pub fn set_field_names(&mut self, field_names: Arc<Vec<String>>) {
        let index = Arc::new(
            field_names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );
        self.field_names = Some(field_names);
        self.field_index = Some(index);
    }

    /// Get the shared field names, if any record has been added.
    #[must_use]
    pub fn field_names(&self) -> Option<&Arc<Vec<String>>> {
        self.field_names.as_ref()
    }

    /// Append one row of values as a record sharing this set's field names.
    pub fn add_values(&mut self, values: Vec<SqlValue>) {
        if let (Some(field_names), Some(field_index)) = (&self.field_names, &self.field_index) {
            self.records.push(Record {
                field_names: field_names.clone(),
                values,
                field_index: field_index.clone(),
            });
            self.rows_affected += 1;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
