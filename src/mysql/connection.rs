use std::sync::LazyLock;

use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder};
use regex::Regex;
use tracing::debug;

use super::config::MysqlOptions;
use super::escape::escape_string;
use super::query::build_outcome;
use crate::driver::Driver;
use crate::error::SquirrelError;
use crate::results::QueryOutcome;

static CHARSET_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z0-9_]+$").expect("charset pattern is valid"));

// Multi-byte charsets whose trailing bytes can be 0x5C. Escaping is charset-blind, so a
// lead byte could swallow the backslash that protects a quote.
const UNSAFE_CHARSETS: [&str; 5] = ["big5", "cp932", "gbk", "gb18030", "sjis"];

/// An open MySQL connection.
pub struct MysqlConnection {
    conn: Conn,
    forced_no_backslash_escapes: bool,
}

impl MysqlConnection {
    /// Connect, select the database and switch the character set.
    ///
    /// # Errors
    ///
    /// `ConnectionError` if the server is unreachable or the database cannot be selected;
    /// `CharacterSetError` if the charset name is malformed or rejected.
    pub fn open(opts: &MysqlOptions) -> Result<Self, SquirrelError> {
        if let Some(charset) = &opts.charset {
            validate_charset(charset)?;
        }

        let builder = OptsBuilder::new()
            .ip_or_hostname(Some(opts.host.clone()))
            .tcp_port(opts.port)
            .user(Some(opts.user.clone()))
            .pass(Some(opts.password.clone()));
        let mut conn = Conn::new(builder).map_err(|e| {
            SquirrelError::ConnectionError(format!("could not connect to {}: {e}", opts.host))
        })?;

        if let Some(database) = &opts.database {
            conn.query_drop(format!("USE {}", quote_identifier(database)))
                .map_err(|e| {
                    SquirrelError::ConnectionError(format!(
                        "could not select database {database}: {e}"
                    ))
                })?;
        }

        if let Some(charset) = &opts.charset {
            conn.query_drop(format!("SET NAMES {charset}")).map_err(|e| {
                SquirrelError::CharacterSetError(format!(
                    "could not switch the connection to {charset}: {e}"
                ))
            })?;
        }

        let this = Self {
            conn,
            forced_no_backslash_escapes: opts.no_backslash_escapes,
        };
        debug!(
            no_backslash_escapes = this.no_backslash_escapes(),
            "escaping mode at connect"
        );
        Ok(this)
    }

    /// Whether string escaping doubles quotes instead of using backslashes.
    ///
    /// Follows the server status flag reported with every OK packet, so a later
    /// `SET sql_mode` is picked up by the next escape.
    #[must_use]
    pub fn no_backslash_escapes(&self) -> bool {
        self.forced_no_backslash_escapes || self.conn.no_backslash_escape()
    }
}

impl Driver for MysqlConnection {
    fn execute(&mut self, sql: &str) -> Result<QueryOutcome, SquirrelError> {
        let mut result = self.conn.query_iter(sql)?;
        build_outcome(&mut result)
    }

    fn escape(&self, value: &str) -> String {
        escape_string(value, self.no_backslash_escapes())
    }

    fn last_insert_id(&self) -> u64 {
        self.conn.last_insert_id()
    }

    fn affected_rows(&self) -> u64 {
        self.conn.affected_rows()
    }
}

pub(crate) fn validate_charset(charset: &str) -> Result<(), SquirrelError> {
    if !CHARSET_NAME.is_match(charset) {
        return Err(SquirrelError::CharacterSetError(format!(
            "{charset:?} is not a valid character set name"
        )));
    }
    if UNSAFE_CHARSETS
        .iter()
        .any(|unsafe_name| charset.eq_ignore_ascii_case(unsafe_name))
    {
        return Err(SquirrelError::CharacterSetError(format!(
            "{charset} cannot be escaped safely; use utf8mb4 or a single-byte charset"
        )));
    }
    Ok(())
}

fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
