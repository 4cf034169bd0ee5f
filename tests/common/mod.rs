#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use mysquirrel::mysql::escape_string;
use mysquirrel::prelude::*;

/// Shared view of everything a recording connection was asked to do.
#[derive(Default)]
pub struct Recorder {
    pub statements: RefCell<Vec<String>>,
    pub connects: Cell<usize>,
    /// Statements starting with this prefix fail with a server error.
    pub fail_prefix: RefCell<Option<String>>,
    /// Rows handed back for statements starting with `SELECT` or `EXECUTE`.
    pub rows: RefCell<Option<ResultSet>>,
    pub refuse_connect: Cell<bool>,
    /// Mirrors the server's `NO_BACKSLASH_ESCAPES` status flag.
    pub no_backslash_escapes: Cell<bool>,
}

impl Recorder {
    pub fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.statements.borrow().last().cloned()
    }

    pub fn fail_on(&self, prefix: &str) {
        *self.fail_prefix.borrow_mut() = Some(prefix.to_string());
    }

    pub fn clear_failure(&self) {
        *self.fail_prefix.borrow_mut() = None;
    }

    pub fn serve_rows(&self, rows: ResultSet) {
        *self.rows.borrow_mut() = Some(rows);
    }

    pub fn count_starting_with(&self, prefix: &str) -> usize {
        self.statements
            .borrow()
            .iter()
            .filter(|s| s.starts_with(prefix))
            .count()
    }
}

#[derive(Clone, Default)]
pub struct RecordingConnector {
    pub recorder: Rc<Recorder>,
}

pub struct RecordingConnection {
    recorder: Rc<Recorder>,
    affected: u64,
    last_id: u64,
}

impl Connector for RecordingConnector {
    type Conn = RecordingConnection;

    fn connect(&self) -> Result<Self::Conn, SquirrelError> {
        if self.recorder.refuse_connect.get() {
            return Err(SquirrelError::ConnectionError(
                "could not connect to test".into(),
            ));
        }
        self.recorder.connects.set(self.recorder.connects.get() + 1);
        Ok(RecordingConnection {
            recorder: Rc::clone(&self.recorder),
            affected: 0,
            last_id: 0,
        })
    }

    fn describe(&self) -> String {
        "recording".to_string()
    }
}

impl Driver for RecordingConnection {
    fn execute(&mut self, sql: &str) -> Result<QueryOutcome, SquirrelError> {
        self.recorder.statements.borrow_mut().push(sql.to_string());

        let failing = self
            .recorder
            .fail_prefix
            .borrow()
            .as_deref()
            .is_some_and(|prefix| sql.starts_with(prefix));
        if failing {
            return Err(SquirrelError::DriverError {
                code: 1064,
                message: format!("refused: {sql}"),
            });
        }

        if let Some(mode) = sql.strip_prefix("SET SESSION sql_mode = ") {
            self.recorder
                .no_backslash_escapes
                .set(mode.contains("NO_BACKSLASH_ESCAPES"));
        }

        if sql.starts_with("SELECT") || sql.starts_with("EXECUTE") {
            if let Some(rows) = self.recorder.rows.borrow().clone() {
                self.affected = rows.len() as u64;
                return Ok(QueryOutcome::Rows(ResultCursor::new(rows)));
            }
        }

        if sql.starts_with("INSERT") {
            self.last_id += 1;
        }
        self.affected = 1;
        Ok(QueryOutcome::Affected(1))
    }

    fn escape(&self, value: &str) -> String {
        escape_string(value, self.recorder.no_backslash_escapes.get())
    }

    fn last_insert_id(&self) -> u64 {
        self.last_id
    }

    fn affected_rows(&self) -> u64 {
        self.affected
    }
}

pub fn recording_db() -> (Squirrel<RecordingConnector>, Rc<Recorder>) {
    let connector = RecordingConnector::default();
    let recorder = Rc::clone(&connector.recorder);
    (Squirrel::new(connector), recorder)
}

pub fn users_result() -> ResultSet {
    let mut set = ResultSet::new(vec![FieldInfo::named("id"), FieldInfo::named("name")]);
    set.add_row_values(vec![RowValues::Int(1), RowValues::Text("ann".into())]);
    set.add_row_values(vec![RowValues::Int(2), RowValues::Text("bob".into())]);
    set
}
