mod cursor;
mod result_set;
mod row;

pub use cursor::ResultCursor;
pub use result_set::{FieldInfo, ResultSet};
pub use row::CustomDbRow;

/// What a statement produced: a result set, or the number of affected rows.
#[derive(Debug)]
pub enum QueryOutcome {
    Rows(ResultCursor),
    Affected(u64),
}

impl QueryOutcome {
    /// The cursor, if the statement returned rows.
    #[must_use]
    pub fn into_rows(self) -> Option<ResultCursor> {
        match self {
            QueryOutcome::Rows(cursor) => Some(cursor),
            QueryOutcome::Affected(_) => None,
        }
    }

    /// The affected row count, if the statement returned no rows.
    #[must_use]
    pub fn affected(&self) -> Option<u64> {
        match self {
            QueryOutcome::Affected(n) => Some(*n),
            QueryOutcome::Rows(_) => None,
        }
    }
}
