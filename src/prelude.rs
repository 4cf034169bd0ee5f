//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::connection::Squirrel;
pub use crate::driver::{Connector, Driver};
pub use crate::error::SquirrelError;
pub use crate::mysql::{MysqlOptions, MysqlOptionsBuilder};
pub use crate::params;
pub use crate::prepared::PreparedStatement;
pub use crate::results::{CustomDbRow, FieldInfo, QueryOutcome, ResultCursor, ResultSet};
pub use crate::types::RowValues;
