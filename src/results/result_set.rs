use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use super::row::{CustomDbRow, index_columns};
use crate::types::RowValues;

/// Metadata of one result column, as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub name: String,
    /// Table (or alias) the column comes from; empty for computed columns.
    pub table: String,
    /// Driver type name, e.g. `MYSQL_TYPE_LONG`.
    pub column_type: String,
    /// Maximum display length.
    pub length: u32,
    /// Raw column flag bits.
    pub flags: u16,
    pub decimals: u8,
}

impl FieldInfo {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: String::new(),
            column_type: String::new(),
            length: 0,
            flags: 0,
            decimals: 0,
        }
    }
}

/// A buffered result set from a database query
///
/// Rows share the column names and the name lookup table of the set.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<CustomDbRow>,
    fields: Vec<FieldInfo>,
    column_names: Arc<Vec<String>>,
    column_index_cache: Arc<HashMap<String, usize>>,
}

impl ResultSet {
    /// Create an empty result set for the given columns.
    #[must_use]
    pub fn new(fields: Vec<FieldInfo>) -> Self {
        Self::with_capacity(fields, 0)
    }

    /// Create a result set with room for `capacity` rows.
    #[must_use]
    pub fn with_capacity(fields: Vec<FieldInfo>, capacity: usize) -> Self {
        let column_names: Vec<String> = fields.iter().map(|f| f.name.clone()).collect();
        let cache = index_columns(&column_names);
        Self {
            results: Vec::with_capacity(capacity),
            fields,
            column_names: Arc::new(column_names),
            column_index_cache: Arc::new(cache),
        }
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[must_use]
    pub fn column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }

    /// Add a row to the result set
    ///
    /// # Arguments
    ///
    /// * `row_values` - The values for this row, in column order
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        self.results.push(CustomDbRow {
            column_names: Arc::clone(&self.column_names),
            rows: row_values,
            column_index_cache: Arc::clone(&self.column_index_cache),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
