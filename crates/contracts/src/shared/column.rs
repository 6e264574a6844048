use serde::{Deserialize, Serialize};

/// Описание колонки таблицы
///
/// Columns are immutable for the lifetime of a table instance; the accessor is a key
/// or dot-path resolved through [`crate::shared::row::Row::field`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub id: String,
    pub accessor: String,
    pub header: String,
    pub sortable: bool,
    pub filterable: bool,
}

impl ColumnDef {
    /// Column whose accessor equals its id
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            accessor: id.clone(),
            id,
            header: header.into(),
            sortable: true,
            filterable: true,
        }
    }

    pub fn accessor(mut self, accessor: impl Into<String>) -> Self {
        self.accessor = accessor.into();
        self
    }

    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn not_filterable(mut self) -> Self {
        self.filterable = false;
        self
    }
}
