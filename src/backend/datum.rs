//! Scalar values exchanged with a backend

use std::fmt;

/// A single scalar value in a query parameter or result row
///
/// The text protocol returns every value as a string, the binary protocol
/// returns typed integers. Accessors accept both forms.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
}

impl Datum {
    /// Check if the value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// Interpret as a signed integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Datum::Int(v) => Some(*v),
            Datum::UInt(v) => i64::try_from(*v).ok(),
            Datum::Float(v) => Some(*v as i64),
            Datum::String(s) => parse_integral(s),
            Datum::Null => None,
        }
    }

    /// Interpret as an unsigned integer
    ///
    /// DECIMAL results (e.g. `SUM(...)`) arrive as strings such as `"16384"`
    /// or `"16384.0000"`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Datum::UInt(v) => Some(*v),
            other => other.as_i64().and_then(|v| u64::try_from(v).ok()),
        }
    }

    /// Interpret as a boolean
    ///
    /// Integers are true when non-zero. MySQL privilege columns are
    /// `ENUM('N','Y')`, so `"Y"` is true as well.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Datum::String(s) if s.eq_ignore_ascii_case("y") => Some(true),
            Datum::String(s) if s.eq_ignore_ascii_case("n") => Some(false),
            Datum::Null => None,
            other => other.as_i64().map(|v| v != 0),
        }
    }

    /// Borrow as a string, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::String(s) => Some(s),
            _ => None,
        }
    }
}

fn parse_integral(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    // DECIMAL with a fractional part
    let (whole, frac) = s.split_once('.')?;
    if !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    whole.parse().ok()
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => write!(f, "NULL"),
            Datum::Int(v) => write!(f, "{}", v),
            Datum::UInt(v) => write!(f, "{}", v),
            Datum::Float(v) => write!(f, "{}", v),
            Datum::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Datum::String(s.to_string())
    }
}

impl From<String> for Datum {
    fn from(s: String) -> Self {
        Datum::String(s)
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Int(v)
    }
}

impl From<u64> for Datum {
    fn from(v: u64) -> Self {
        Datum::UInt(v)
    }
}

impl From<Datum> for mysql_async::Value {
    fn from(d: Datum) -> Self {
        match d {
            Datum::Null => mysql_async::Value::NULL,
            Datum::Int(v) => mysql_async::Value::Int(v),
            Datum::UInt(v) => mysql_async::Value::UInt(v),
            Datum::Float(v) => mysql_async::Value::Double(v),
            Datum::String(s) => mysql_async::Value::Bytes(s.into_bytes()),
        }
    }
}

impl From<&mysql_async::Value> for Datum {
    fn from(v: &mysql_async::Value) -> Self {
        use mysql_async::Value;

        match v {
            Value::NULL => Datum::Null,
            Value::Int(i) => Datum::Int(*i),
            Value::UInt(u) => Datum::UInt(*u),
            Value::Float(f) => Datum::Float(f64::from(*f)),
            Value::Double(d) => Datum::Float(*d),
            Value::Bytes(b) => Datum::String(String::from_utf8_lossy(b).into_owned()),
            // Dates and times never appear in administrative results; keep
            // their SQL rendering rather than failing the row.
            other => Datum::String(other.as_sql(true).trim_matches('\'').to_string()),
        }
    }
}

/// A result row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<Datum>,
}

impl Row {
    /// Create a new row from values
    pub fn new(values: Vec<Datum>) -> Self {
        Row { values }
    }

    /// Get the value at a column index
    pub fn get(&self, index: usize) -> Option<&Datum> {
        self.values.get(index)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consume the row, returning its values
    pub fn into_values(self) -> Vec<Datum> {
        self.values
    }
}

impl From<mysql_async::Row> for Row {
    fn from(row: mysql_async::Row) -> Self {
        let values = (0..row.len())
            .map(|i| row.as_ref(i).map(Datum::from).unwrap_or(Datum::Null))
            .collect();
        Row { values }
    }
}
