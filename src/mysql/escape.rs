use mysql::Value;

/// Escape `value` with the MySQL client's own quoting rules, without the surrounding quotes.
///
/// With `no_backslash_escapes` (the server's `NO_BACKSLASH_ESCAPES` SQL mode) only single
/// quotes are doubled; otherwise quotes, backslashes and control characters are
/// backslash-escaped.
#[must_use]
pub fn escape_string(value: &str, no_backslash_escapes: bool) -> String {
    let quoted = Value::from(value).as_sql(no_backslash_escapes);
    if quoted.len() >= 2 && quoted.starts_with('\'') && quoted.ends_with('\'') {
        quoted[1..quoted.len() - 1].to_string()
    } else {
        quoted
    }
}
