use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

/// Values that can be bound to a placeholder or read back from a result row.
///
/// Numeric variants (`Int`, `Float`, `Bool`) are inlined into SQL verbatim; everything
/// else goes through the driver's escaping and gets single-quoted:
/// ```rust
/// use mysquirrel::prelude::*;
///
/// let params = params![5, "a@b.com", true, None::<i64>];
/// assert_eq!(params[0], RowValues::Int(5));
/// assert_eq!(params[1], RowValues::Text("a@b.com".into()));
/// assert!(params[3].is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the value is rendered as an unquoted numeric literal.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_) | Self::Bool(_))
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    /// JSON rendering used when a row is deserialized into a caller type.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            RowValues::Int(i) => JsonValue::from(*i),
            RowValues::Float(f) => JsonValue::from(*f),
            RowValues::Text(s) => JsonValue::from(s.as_str()),
            RowValues::Bool(b) => JsonValue::from(*b),
            RowValues::Timestamp(dt) => JsonValue::from(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            RowValues::Null => JsonValue::Null,
            RowValues::JSON(v) => v.clone(),
            RowValues::Blob(bytes) => JsonValue::from(bytes.clone()),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RowValues {
                fn from(value: $ty) -> Self {
                    RowValues::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for RowValues {
    fn from(value: f32) -> Self {
        RowValues::Float(f64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<&String> for RowValues {
    fn from(value: &String) -> Self {
        RowValues::Text(value.clone())
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        RowValues::JSON(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl From<&[u8]> for RowValues {
    fn from(value: &[u8]) -> Self {
        RowValues::Blob(value.to_vec())
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// Build a `Vec<RowValues>` from heterogeneous values.
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::RowValues>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::RowValues::from($value)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(RowValues::from(None::<&str>), RowValues::Null);
        assert_eq!(RowValues::from(Some(7_i32)), RowValues::Int(7));
    }

    #[test]
    fn numeric_classification() {
        assert!(RowValues::Int(1).is_numeric());
        assert!(RowValues::Float(1.5).is_numeric());
        assert!(RowValues::Bool(false).is_numeric());
        assert!(!RowValues::Text("1".into()).is_numeric());
        assert!(!RowValues::Null.is_numeric());
    }

    #[test]
    fn as_bool_accepts_zero_and_one() {
        assert_eq!(RowValues::Int(1).as_bool(), Some(&true));
        assert_eq!(RowValues::Int(0).as_bool(), Some(&false));
        assert_eq!(RowValues::Int(2).as_bool(), None);
    }

    #[test]
    fn as_timestamp_parses_mysql_text() {
        let ts = RowValues::Text("2024-02-29 13:45:00".into()).as_timestamp();
        assert!(ts.is_some());
        let frac = RowValues::Text("2024-02-29 13:45:00.250".into()).as_timestamp();
        assert!(frac.is_some());
    }

    #[test]
    fn params_macro_converts_each_item() {
        let p = crate::params![1_i64, 2.5, "x", json!({"a": 1})];
        assert_eq!(
            p,
            vec![
                RowValues::Int(1),
                RowValues::Float(2.5),
                RowValues::Text("x".into()),
                RowValues::JSON(json!({"a": 1})),
            ]
        );
        assert!(crate::params![].is_empty());
    }
}
