use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use super::result_set::{FieldInfo, ResultSet};
use super::row::CustomDbRow;
use crate::error::SquirrelError;
use crate::types::RowValues;

/// Forward-only cursor over one result set.
///
/// Rows are buffered by the driver, so [`ResultCursor::rewind`] can always restart the
/// sequence. Every fetch shape advances the same position.
#[derive(Debug, Clone)]
pub struct ResultCursor {
    set: ResultSet,
    position: usize,
}

impl ResultCursor {
    #[must_use]
    pub fn new(set: ResultSet) -> Self {
        Self { set, position: 0 }
    }

    /// Next row, addressable by column name and by index.
    pub fn fetch(&mut self) -> Option<CustomDbRow> {
        let row = self.set.results.get(self.position)?.clone();
        self.position += 1;
        Some(row)
    }

    /// Next row as positional values.
    pub fn fetch_row(&mut self) -> Option<Vec<RowValues>> {
        self.fetch().map(|row| row.rows)
    }

    /// Next row as a column name to value map.
    pub fn fetch_assoc(&mut self) -> Option<BTreeMap<String, RowValues>> {
        self.fetch().map(CustomDbRow::into_assoc)
    }

    /// Next row deserialized into `T`.
    ///
    /// # Errors
    ///
    /// Returns `SquirrelError::DecodeError` if the row does not fit `T`.
    pub fn fetch_object<T: DeserializeOwned>(&mut self) -> Result<Option<T>, SquirrelError> {
        self.fetch().map(|row| row.deserialize()).transpose()
    }

    /// Rewind, then collect every row.
    pub fn fetch_all(&mut self) -> Vec<CustomDbRow> {
        self.rewind();
        let rows = self.set.results.clone();
        self.position = rows.len();
        rows
    }

    /// Seek back to the first row.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Metadata for the column at `offset`.
    #[must_use]
    pub fn field_info(&self, offset: usize) -> Option<&FieldInfo> {
        self.set.fields().get(offset)
    }

    #[must_use]
    pub fn num_fields(&self) -> usize {
        self.set.fields().len()
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.set.len()
    }

    /// Zero-based index of the row most recently fetched.
    #[must_use]
    pub fn key(&self) -> Option<usize> {
        self.position.checked_sub(1)
    }

    /// Give up the cursor and keep the buffered rows.
    #[must_use]
    pub fn into_result_set(self) -> ResultSet {
        self.set
    }
}

impl Iterator for ResultCursor {
    type Item = CustomDbRow;

    fn next(&mut self) -> Option<Self::Item> {
        self.fetch()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.set.len().saturating_sub(self.position);
        (left, Some(left))
    }
}
