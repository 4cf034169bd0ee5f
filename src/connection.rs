use std::cell::{Cell, RefCell};

use tracing::{debug, info, warn};

use crate::driver::{Connector, Driver};
use crate::error::SquirrelError;
use crate::mysql::MysqlOptions;
use crate::prepared::PreparedStatement;
use crate::results::QueryOutcome;
use crate::template::Template;
use crate::types::RowValues;

/// A lazily connected database handle.
///
/// Nothing touches the network until the first statement. The handle is meant for one
/// thread: statements, prepared handles and transactions all share a single connection.
///
/// ```rust,no_run
/// use mysquirrel::prelude::*;
///
/// # fn demo() -> Result<(), SquirrelError> {
/// let db = Squirrel::connect("localhost", "user", "pass", "database", None);
/// db.set_paranoid_mode();
///
/// if let Some(mut users) = db.query("SELECT * FROM users WHERE id = ?", &params![5])?.into_rows() {
///     while let Some(row) = users.fetch() {
///         println!("{:?}", row.get("name"));
///     }
/// }
///
/// db.query("UPDATE users SET email = ? WHERE id = ?", &params!["a@b.com", 5])?;
/// # Ok(())
/// # }
/// ```
pub struct Squirrel<C: Connector = MysqlOptions> {
    connector: C,
    conn: RefCell<Option<C::Conn>>,
    connected: Cell<bool>,
    paranoid: Cell<bool>,
    unmagic: Cell<bool>,
}

impl<C: Connector> Squirrel<C> {
    #[must_use]
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            conn: RefCell::new(None),
            connected: Cell::new(false),
            paranoid: Cell::new(false),
            unmagic: Cell::new(false),
        }
    }

    #[must_use]
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Disable raw queries and reject templates with quotes or comments.
    ///
    /// There is no way back out of paranoid mode.
    pub fn set_paranoid_mode(&self) {
        self.paranoid.set(true);
    }

    #[must_use]
    pub fn is_paranoid(&self) -> bool {
        self.paranoid.get()
    }

    /// Strip backslash escaping from text parameters before they are escaped again.
    ///
    /// For input that an upstream layer has already escaped.
    pub fn set_unmagic(&self, enabled: bool) {
        self.unmagic.set(enabled);
    }

    #[must_use]
    pub fn is_unmagic(&self) -> bool {
        self.unmagic.get()
    }

    /// Whether the lazy connection has been opened.
    ///
    /// Readable at any time, including while a statement is running.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    /// Prepare `template` server-side.
    ///
    /// # Errors
    ///
    /// Fails on statement separators, on quotes or comments in paranoid mode, on
    /// connection failures, or if the server rejects the statement.
    pub fn prepare(&self, template: &str) -> Result<PreparedStatement<'_, C>, SquirrelError> {
        let template = Template::parse(template, self.is_paranoid())?;
        PreparedStatement::prepare(self, template)
    }

    /// Substitute `params` into `template` and run it.
    ///
    /// # Errors
    ///
    /// Returns `MultipleStatementsError`, `ParanoidModeError` or `ParameterMismatchError`
    /// before anything is sent; otherwise connection or driver errors.
    pub fn query(&self, template: &str, params: &[RowValues]) -> Result<QueryOutcome, SquirrelError> {
        let template = Template::parse(template, self.is_paranoid())?;
        template.check_arity(params.len())?;

        let unmagic = self.is_unmagic();
        self.with_connection(|conn| {
            let sql = {
                let escape = |value: &str| conn.escape(value);
                template.render(params, &escape, unmagic)?
            };
            debug!(sql = %sql, "query");
            conn.execute(&sql)
        })
    }

    /// Run `sql` exactly as given.
    ///
    /// # Errors
    ///
    /// Always `ParanoidModeError` in paranoid mode; otherwise connection or driver errors.
    pub fn raw_query(&self, sql: &str) -> Result<QueryOutcome, SquirrelError> {
        if self.is_paranoid() {
            return Err(SquirrelError::ParanoidModeError(
                "raw_query() is disabled in paranoid mode".to_string(),
            ));
        }
        self.run(sql)
    }

    /// Rows changed by the last statement, or `None` before the first connection.
    #[must_use]
    pub fn affected_rows(&self) -> Option<u64> {
        let slot = self.conn.try_borrow().ok()?;
        slot.as_ref().map(Driver::affected_rows)
    }

    /// Last auto-increment id, or `None` before the first connection.
    #[must_use]
    pub fn last_insert_id(&self) -> Option<u64> {
        let slot = self.conn.try_borrow().ok()?;
        slot.as_ref().map(Driver::last_insert_id)
    }

    /// Send `BEGIN`.
    ///
    /// # Errors
    ///
    /// Connection errors pass through; a failing `BEGIN` becomes `TransactionError`.
    pub fn begin_transaction(&self) -> Result<(), SquirrelError> {
        self.with_connection(|_| Ok(()))?;
        self.run("BEGIN")
            .map(drop)
            .map_err(|e| SquirrelError::TransactionError(format!("can't begin: {e}")))
    }

    /// Send `COMMIT`.
    ///
    /// # Errors
    ///
    /// `TransactionError` when there is no connection or the statement fails.
    pub fn commit(&self) -> Result<(), SquirrelError> {
        self.finish_transaction("COMMIT", "commit")
    }

    /// Send `ROLLBACK`.
    ///
    /// # Errors
    ///
    /// `TransactionError` when there is no connection or the statement fails.
    pub fn rollback(&self) -> Result<(), SquirrelError> {
        self.finish_transaction("ROLLBACK", "rollback")
    }

    /// Run `body` between `BEGIN` and `COMMIT`, rolling back if it returns an error.
    ///
    /// # Errors
    ///
    /// Returns the error of `body`, or a `TransactionError` from begin/commit.
    pub fn transaction<R, F>(&self, body: F) -> Result<R, SquirrelError>
    where
        F: FnOnce(&Self) -> Result<R, SquirrelError>,
    {
        self.begin_transaction()?;
        match body(self) {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.rollback() {
                    warn!(error = %rollback_err, "rollback after failed transaction body also failed");
                }
                Err(err)
            }
        }
    }

    fn finish_transaction(&self, statement: &str, verb: &str) -> Result<(), SquirrelError> {
        if !self.is_connected() {
            return Err(SquirrelError::TransactionError(format!(
                "can't {verb}: no transaction is currently in progress"
            )));
        }
        self.run(statement)
            .map(drop)
            .map_err(|e| SquirrelError::TransactionError(format!("can't {verb}: {e}")))
    }

    pub(crate) fn run(&self, sql: &str) -> Result<QueryOutcome, SquirrelError> {
        self.with_connection(|conn| {
            debug!(sql = %sql, "statement");
            conn.execute(sql)
        })
    }

    pub(crate) fn with_connection<R>(
        &self,
        f: impl FnOnce(&mut C::Conn) -> Result<R, SquirrelError>,
    ) -> Result<R, SquirrelError> {
        let mut slot = self.conn.try_borrow_mut().map_err(|_| {
            SquirrelError::ConnectionError("connection is already in use".to_string())
        })?;

        if slot.is_none() {
            debug!(target_db = %self.connector.describe(), "connecting on first use");
            let conn = self.connector.connect()?;
            info!(target_db = %self.connector.describe(), "connected");
            *slot = Some(conn);
            self.connected.set(true);
        }

        match slot.as_mut() {
            Some(conn) => f(conn),
            None => Err(SquirrelError::ConnectionError("not connected".to_string())),
        }
    }
}
