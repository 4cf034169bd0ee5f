mod config;
mod connection;
mod escape;
mod query;

pub use config::{MysqlOptions, MysqlOptionsBuilder};
pub use connection::MysqlConnection;
pub use escape::escape_string;
pub use query::{build_outcome, mysql_value_to_row_value};
