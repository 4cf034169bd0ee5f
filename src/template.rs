//! Placeholder templates: validation and parameter substitution.
//!
//! A template is split once on every `?` marker. Each placeholder is later replaced by the
//! SQL literal of the matching parameter, so no value ever gets concatenated into SQL
//! unescaped.

use crate::error::SquirrelError;
use crate::literal::to_sql_literal;
use crate::types::RowValues;

const STATEMENT_SEPARATOR: char = ';';
const PLACEHOLDER: char = '?';
const QUOTES: [char; 2] = ['\'', '"'];
const COMMENT_MARKERS: [&str; 3] = ["--", "#", "/*"];

/// A parsed query template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    sql: String,
    segments: Vec<String>,
}

impl Template {
    /// Trim and validate `template`.
    ///
    /// # Errors
    ///
    /// Returns `SquirrelError::MultipleStatementsError` if the template contains a statement
    /// separator, and `SquirrelError::ParanoidModeError` if `paranoid` is set and the template
    /// contains a quote or a comment marker.
    pub fn parse(template: &str, paranoid: bool) -> Result<Self, SquirrelError> {
        let sql = template.trim();
        if sql.contains(STATEMENT_SEPARATOR) {
            return Err(SquirrelError::MultipleStatementsError(
                "a template may only contain one statement".to_string(),
            ));
        }
        if paranoid && has_quote_or_comment(sql) {
            return Err(SquirrelError::ParanoidModeError(
                "templates cannot contain quotes or comments while in paranoid mode".to_string(),
            ));
        }

        Ok(Self {
            sql: sql.to_string(),
            segments: sql.split(PLACEHOLDER).map(str::to_string).collect(),
        })
    }

    /// The trimmed template text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.segments.len() - 1
    }

    /// Fail unless exactly one parameter is supplied per placeholder.
    ///
    /// # Errors
    ///
    /// Returns `SquirrelError::ParameterMismatchError` when the counts differ.
    pub fn check_arity(&self, given: usize) -> Result<(), SquirrelError> {
        check_arity(self.placeholder_count(), given)
    }

    /// Substitute `params` into the template.
    ///
    /// # Errors
    ///
    /// Returns `SquirrelError::ParameterMismatchError` when the counts differ, or
    /// `SquirrelError::InvalidParameter` when a value has no SQL literal.
    pub fn render<E>(&self, params: &[RowValues], escape: &E, unmagic: bool) -> Result<String, SquirrelError>
    where
        E: Fn(&str) -> String + ?Sized,
    {
        self.check_arity(params.len())?;

        let mut out = String::with_capacity(self.sql.len() + params.len() * 8);
        for (segment, param) in self.segments.iter().zip(params) {
            out.push_str(segment);
            out.push_str(&to_sql_literal(param, escape, unmagic)?);
        }
        if let Some(tail) = self.segments.last() {
            out.push_str(tail);
        }
        Ok(out)
    }
}

pub(crate) fn check_arity(expected: usize, given: usize) -> Result<(), SquirrelError> {
    if expected == given {
        Ok(())
    } else {
        Err(SquirrelError::ParameterMismatchError { expected, given })
    }
}

fn has_quote_or_comment(sql: &str) -> bool {
    sql.contains(QUOTES) || COMMENT_MARKERS.iter().any(|marker| sql.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double_quotes(s: &str) -> String {
        s.replace('\'', "''")
    }

    #[test]
    fn numeric_parameter_is_inlined() {
        let t = Template::parse("SELECT * FROM users WHERE id = ?", false).unwrap();
        let sql = t.render(&[RowValues::Int(5)], &double_quotes, false).unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE id = 5");
    }

    #[test]
    fn mixed_parameters_keep_positional_order() {
        let t = Template::parse("UPDATE users SET email = ? WHERE id = ?", false).unwrap();
        let sql = t
            .render(&[RowValues::Text("a@b.com".into()), RowValues::Int(5)], &double_quotes, false)
            .unwrap();
        assert_eq!(sql, "UPDATE users SET email = 'a@b.com' WHERE id = 5");
    }

    #[test]
    fn placeholder_inside_value_is_not_reexpanded() {
        let t = Template::parse("SELECT ?, ?", false).unwrap();
        let sql = t
            .render(&[RowValues::Text("?".into()), RowValues::Int(1)], &double_quotes, false)
            .unwrap();
        assert_eq!(sql, "SELECT '?', 1");
    }

    #[test]
    fn template_is_trimmed() {
        let t = Template::parse("  SELECT 1 \n", false).unwrap();
        assert_eq!(t.sql(), "SELECT 1");
        assert_eq!(t.placeholder_count(), 0);
        assert_eq!(t.render(&[], &double_quotes, false).unwrap(), "SELECT 1");
    }

    #[test]
    fn separator_is_rejected_even_with_matching_counts() {
        let err = Template::parse("SELECT ?; DROP TABLE users", false).unwrap_err();
        assert!(matches!(err, SquirrelError::MultipleStatementsError(_)));
    }

    #[test]
    fn paranoid_rejects_quotes_and_comments() {
        for sql in [
            "SELECT * FROM t WHERE a = 'x'",
            "SELECT * FROM t WHERE a = \"x\"",
            "SELECT * FROM t -- tail",
            "SELECT * FROM t # tail",
            "SELECT /* hint */ * FROM t",
        ] {
            assert!(matches!(
                Template::parse(sql, true),
                Err(SquirrelError::ParanoidModeError(_))
            ));
            assert!(Template::parse(sql, false).is_ok());
        }
    }

    #[test]
    fn arity_mismatch_reports_counts() {
        let t = Template::parse("SELECT ? + ?", false).unwrap();
        let err = t.render(&[RowValues::Int(1)], &double_quotes, false).unwrap_err();
        assert!(matches!(
            err,
            SquirrelError::ParameterMismatchError { expected: 2, given: 1 }
        ));
    }
}
