use crate::connection::DatabaseConnection;
use crate::dataset::DataSet;
use crate::types::{SqlType, SqlValue};

/// Short-lived handle returned by [`DataSet::column`].
///
/// Its only job is to attach a value (and optionally a display alias) back to
/// the owning builder's metadata, then resume the fluent chain. No validation
/// happens here; constraint enforcement is the driver's job at execution time.
pub struct ColumnBinder<'a, C: DatabaseConnection> {
    owner: &'a mut DataSet<C>,
    name: String,
    ty: SqlType,
    alias: Option<String>,
}

impl<'a, C: DatabaseConnection> ColumnBinder<'a, C> {
    pub(crate) fn new(owner: &'a mut DataSet<C>, name: String, ty: SqlType) -> Self {
        Self {
            owner,
            name,
            ty,
            alias: None,
        }
    }

    /// Record a display alias, used only when mapping result rows.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Assign a value to this column and hand control back to the builder.
    pub fn set(self, value: impl Into<SqlValue>) -> &'a mut DataSet<C> {
        self.owner
            .metadata_mut()
            .add_column(self.name, self.ty, value.into(), self.alias);
        self.owner
    }

    /// Declare this column for projection without binding a value.
    ///
    /// The value-less variant of [`set`](Self::set), used to pick columns for
    /// `select`.
    pub fn get(self) -> &'a mut DataSet<C> {
        self.owner
            .metadata_mut()
            .add_column(self.name, self.ty, SqlValue::Null, self.alias);
        self.owner
    }
}

/// Short-lived handle returned by [`DataSet::with_keys`]; assigns a predicate
/// value for one key.
pub struct KeyBinder<'a, C: DatabaseConnection> {
    owner: &'a mut DataSet<C>,
    name: String,
    ty: SqlType,
}

impl<'a, C: DatabaseConnection> KeyBinder<'a, C> {
    pub(crate) fn new(owner: &'a mut DataSet<C>, name: String, ty: SqlType) -> Self {
        Self { owner, name, ty }
    }

    /// Assign the key's predicate value and hand control back to the builder.
    pub fn set(self, value: impl Into<SqlValue>) -> &'a mut DataSet<C> {
        self.owner
            .metadata_mut()
            .add_key(self.name, self.ty, value.into());
        self.owner
    }
}
