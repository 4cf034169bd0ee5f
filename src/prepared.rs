use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::connection::Squirrel;
use crate::driver::{Connector, Driver};
use crate::error::SquirrelError;
use crate::literal::to_sql_literal;
use crate::results::QueryOutcome;
use crate::template::Template;
use crate::types::RowValues;

// Statement names only need to be unique per connection.
static NEXT_STATEMENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_statement_name() -> String {
    format!("ps_{}", NEXT_STATEMENT_ID.fetch_add(1, Ordering::Relaxed))
}

/// A server-side prepared statement driven through `PREPARE`, `SET`, `EXECUTE` and
/// `DEALLOCATE PREPARE`.
///
/// The statement is deallocated exactly once: by [`PreparedStatement::close`], or when the
/// handle is dropped.
pub struct PreparedStatement<'a, C: Connector> {
    owner: &'a Squirrel<C>,
    name: String,
    template: Template,
    deallocated: bool,
}

impl<'a, C: Connector> PreparedStatement<'a, C> {
    pub(crate) fn prepare(owner: &'a Squirrel<C>, template: Template) -> Result<Self, SquirrelError> {
        let name = next_statement_name();
        owner.with_connection(|conn| {
            let sql = format!("PREPARE {name} FROM '{}'", conn.escape(template.sql()));
            debug!(statement = %name, sql = %sql, "prepare");
            conn.execute(&sql).map(drop)
        })?;

        Ok(Self {
            owner,
            name,
            template,
            deallocated: false,
        })
    }

    /// Bind `params` to session variables and execute the statement.
    ///
    /// # Errors
    ///
    /// `ParameterMismatchError` if the count is wrong (nothing is sent); `InvalidParameter`
    /// for values without an SQL literal; otherwise driver errors.
    pub fn execute(&self, params: &[RowValues]) -> Result<QueryOutcome, SquirrelError> {
        self.template.check_arity(params.len())?;

        let unmagic = self.owner.is_unmagic();
        self.owner.with_connection(|conn| {
            let literals = {
                let escape = |value: &str| conn.escape(value);
                params
                    .iter()
                    .map(|param| to_sql_literal(param, &escape, unmagic))
                    .collect::<Result<Vec<_>, _>>()?
            };

            let mut execute = format!("EXECUTE {}", self.name);
            for (i, literal) in literals.iter().enumerate() {
                let var = format!("@{}_v{i}", self.name);
                conn.execute(&format!("SET {var} = {literal}"))?;
                execute.push_str(if i == 0 { " USING " } else { ", " });
                execute.push_str(&var);
            }

            debug!(statement = %self.name, sql = %execute, "execute");
            conn.execute(&execute)
        })
    }

    /// Server-side statement name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The template this statement was prepared from.
    #[must_use]
    pub fn sql(&self) -> &str {
        self.template.sql()
    }

    #[must_use]
    pub fn num_args(&self) -> usize {
        self.template.placeholder_count()
    }

    /// Deallocate now and report the outcome.
    ///
    /// # Errors
    ///
    /// Returns the driver error if `DEALLOCATE PREPARE` fails.
    pub fn close(mut self) -> Result<(), SquirrelError> {
        self.deallocate()
    }

    fn deallocate(&mut self) -> Result<(), SquirrelError> {
        if self.deallocated {
            return Ok(());
        }
        self.deallocated = true;
        self.owner
            .run(&format!("DEALLOCATE PREPARE {}", self.name))
            .map(drop)
    }
}

impl<C: Connector> Drop for PreparedStatement<'_, C> {
    fn drop(&mut self) {
        if let Err(err) = self.deallocate() {
            warn!(statement = %self.name, error = %err, "failed to deallocate prepared statement");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_names_are_unique() {
        let a = next_statement_name();
        let b = next_statement_name();
        assert_ne!(a, b);
        assert!(a.starts_with("ps_"));
    }
}
