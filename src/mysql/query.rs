use chrono::{NaiveDate, NaiveDateTime};
use mysql::consts::ColumnType;
use mysql::{Column, QueryResult, Text, Value};

use crate::error::SquirrelError;
use crate::results::{FieldInfo, QueryOutcome, ResultCursor, ResultSet};
use crate::types::RowValues;

// Collation id of the `binary` character set.
const BINARY_CHARSET: u16 = 63;

/// Buffer a text-protocol result into a [`QueryOutcome`].
///
/// Statements without columns report their affected row count instead.
///
/// # Errors
///
/// Returns the driver error if a row cannot be read.
pub fn build_outcome(result: &mut QueryResult<'_, '_, '_, Text>) -> Result<QueryOutcome, SquirrelError> {
    let columns: Vec<Column> = result.columns().as_ref().to_vec();
    if columns.is_empty() {
        return Ok(QueryOutcome::Affected(result.affected_rows()));
    }

    let fields = columns.iter().map(field_info).collect();
    let mut result_set = ResultSet::with_capacity(fields, 10);

    for row in result.by_ref() {
        let values = mysql::Row::unwrap(row?)
            .into_iter()
            .zip(&columns)
            .map(|(value, column)| mysql_value_to_row_value(value, column))
            .collect();
        result_set.add_row_values(values);
    }

    Ok(QueryOutcome::Rows(ResultCursor::new(result_set)))
}

fn field_info(column: &Column) -> FieldInfo {
    FieldInfo {
        name: column.name_str().into_owned(),
        table: column.table_str().into_owned(),
        column_type: format!("{:?}", column.column_type()),
        length: column.column_length(),
        flags: column.flags().bits(),
        decimals: column.decimals(),
    }
}

/// Convert a driver value into a [`RowValues`], using the column type to recover numbers,
/// timestamps and JSON from the text protocol.
#[must_use]
pub fn mysql_value_to_row_value(value: Value, column: &Column) -> RowValues {
    match value {
        Value::NULL => RowValues::Null,
        Value::Int(i) => RowValues::Int(i),
        Value::UInt(u) => i64::try_from(u).map_or_else(|_| RowValues::Text(u.to_string()), RowValues::Int),
        Value::Float(f) => RowValues::Float(f64::from(f)),
        Value::Double(d) => RowValues::Float(d),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
                .and_then(|date| {
                    date.and_hms_micro_opt(u32::from(hour), u32::from(minute), u32::from(second), micros)
                })
                .map_or_else(
                    || {
                        RowValues::Text(format!(
                            "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                        ))
                    },
                    RowValues::Timestamp,
                )
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if negative { "-" } else { "" };
            let total_hours = days * 24 + u32::from(hours);
            RowValues::Text(format!(
                "{sign}{total_hours:02}:{minutes:02}:{seconds:02}.{micros:06}"
            ))
        }
        Value::Bytes(bytes) => decode_text(bytes, column),
    }
}

fn decode_text(bytes: Vec<u8>, column: &Column) -> RowValues {
    let column_type = column.column_type();
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => return RowValues::Blob(err.into_bytes()),
    };

    match column_type {
        ColumnType::MYSQL_TYPE_TINY
        | ColumnType::MYSQL_TYPE_SHORT
        | ColumnType::MYSQL_TYPE_INT24
        | ColumnType::MYSQL_TYPE_LONG
        | ColumnType::MYSQL_TYPE_LONGLONG
        | ColumnType::MYSQL_TYPE_YEAR => text
            .parse::<i64>()
            .map_or_else(|_| RowValues::Text(text.clone()), RowValues::Int),
        ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE => text
            .parse::<f64>()
            .map_or_else(|_| RowValues::Text(text.clone()), RowValues::Float),
        ColumnType::MYSQL_TYPE_DATETIME | ColumnType::MYSQL_TYPE_TIMESTAMP => {
            NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S%.f")
                .map_or_else(|_| RowValues::Text(text.clone()), RowValues::Timestamp)
        }
        ColumnType::MYSQL_TYPE_JSON => serde_json::from_str(&text)
            .map_or_else(|_| RowValues::Text(text.clone()), RowValues::JSON),
        ColumnType::MYSQL_TYPE_BIT => RowValues::Blob(text.into_bytes()),
        _ if column.character_set() == BINARY_CHARSET && is_string_type(column_type) => {
            RowValues::Blob(text.into_bytes())
        }
        _ => RowValues::Text(text),
    }
}

fn is_string_type(column_type: ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::MYSQL_TYPE_STRING
            | ColumnType::MYSQL_TYPE_VAR_STRING
            | ColumnType::MYSQL_TYPE_VARCHAR
            | ColumnType::MYSQL_TYPE_TINY_BLOB
            | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
            | ColumnType::MYSQL_TYPE_LONG_BLOB
            | ColumnType::MYSQL_TYPE_BLOB
    )
}
