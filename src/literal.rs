use std::fmt::Write;

use crate::error::SquirrelError;
use crate::types::RowValues;

/// Render a single parameter as an SQL literal.
///
/// Numbers are inlined verbatim, `NULL` is emitted as the keyword, and every string-like
/// value is passed through `escape` (the driver's own escaping) and wrapped in single quotes.
/// With `unmagic` set, text values have upstream backslash escaping removed first.
///
/// # Errors
///
/// Returns `SquirrelError::InvalidParameter` for floats that have no SQL literal (NaN, infinity).
pub fn to_sql_literal<E>(value: &RowValues, escape: &E, unmagic: bool) -> Result<String, SquirrelError>
where
    E: Fn(&str) -> String + ?Sized,
{
    let literal = match value {
        RowValues::Int(i) => i.to_string(),
        RowValues::Float(f) => {
            if !f.is_finite() {
                return Err(SquirrelError::InvalidParameter(format!(
                    "{f} cannot be written as an SQL literal"
                )));
            }
            f.to_string()
        }
        RowValues::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        RowValues::Null => "NULL".to_string(),
        RowValues::Text(s) => {
            if unmagic {
                quoted(&escape(&unescape(s)))
            } else {
                quoted(&escape(s))
            }
        }
        RowValues::Timestamp(dt) => quoted(&escape(&dt.format("%Y-%m-%d %H:%M:%S%.f").to_string())),
        RowValues::JSON(json) => quoted(&escape(&json.to_string())),
        RowValues::Blob(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => quoted(&escape(text)),
            Err(_) => hex_literal(bytes),
        },
    };
    Ok(literal)
}

fn quoted(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len() + 2);
    out.push('\'');
    out.push_str(escaped);
    out.push('\'');
    out
}

fn hex_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 3);
    out.push_str("X'");
    for b in bytes {
        // writing to a String cannot fail
        let _ = write!(out, "{b:02X}");
    }
    out.push('\'');
    out
}

/// Undo backslash escaping as MySQL reads it inside a string literal.
///
/// `\0`, `\b`, `\n`, `\r`, `\t` and `\Z` map back to their control characters; any other
/// escaped character stands for itself. A trailing lone backslash is dropped.
#[must_use]
pub fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('\0'),
            Some('b') => out.push('\x08'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('Z') => out.push('\x1a'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
