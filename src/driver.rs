//! The seam between the wrapper and a concrete database client.
//!
//! Only the MySQL backend ships with the crate, but anything that can open a connection,
//! run textual SQL and escape a string can sit behind [`Squirrel`](crate::Squirrel).

use crate::error::SquirrelError;
use crate::results::QueryOutcome;

/// Opens connections; holds whatever credentials the backend needs.
pub trait Connector {
    type Conn: Driver;

    /// Establish a connection, select the database and apply the character set.
    ///
    /// # Errors
    ///
    /// Returns `SquirrelError::ConnectionError` or `SquirrelError::CharacterSetError`.
    fn connect(&self) -> Result<Self::Conn, SquirrelError>;

    /// Short description for logs. Must not include secrets.
    fn describe(&self) -> String;
}

/// An open connection.
pub trait Driver {
    /// Run one textual statement and buffer its result.
    ///
    /// # Errors
    ///
    /// Returns the driver's error, typically `SquirrelError::DriverError`.
    fn execute(&mut self, sql: &str) -> Result<QueryOutcome, SquirrelError>;

    /// Escape `value` for use between single quotes, exactly as the server expects it.
    fn escape(&self, value: &str) -> String;

    /// Auto-increment id generated by the last statement.
    fn last_insert_id(&self) -> u64;

    /// Rows changed by the last statement.
    fn affected_rows(&self) -> u64;
}
