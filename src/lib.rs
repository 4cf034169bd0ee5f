//! Placeholder substitution and prepared-statement emulation over a blocking MySQL client.
//!
//! Queries are written as templates with `?` markers. Every parameter is escaped by the
//! driver (or inlined, for numbers) before the statement is sent, so SQL is never built by
//! concatenating user input.

mod connection;
mod prepared;

pub mod driver;
pub mod error;
pub mod literal;
pub mod mysql;
pub mod prelude;
pub mod results;
pub mod template;
pub mod types;

pub use connection::Squirrel;
pub use driver::{Connector, Driver};
pub use error::SquirrelError;
pub use prepared::PreparedStatement;
pub use results::{CustomDbRow, FieldInfo, QueryOutcome, ResultCursor, ResultSet};
pub use template::Template;
pub use types::RowValues;
