use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value as JsonValue};
use uuid::Uuid;

/// One decoded row: column name to value.
///
/// Each call to the mapper allocates fresh records; the caller owns them outright.
pub type RowRecord = HashMap<String, RowValues>;

/// A network address with its prefix length, as stored in `inet` and `cidr` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Inet {
    pub addr: IpAddr,
    pub prefix: u8,
}

impl Inet {
    #[must_use]
    pub fn new(addr: IpAddr, prefix: u8) -> Self {
        Self { addr, prefix }
    }

    /// A single host address (`/32` or `/128`).
    #[must_use]
    pub fn host(addr: IpAddr) -> Self {
        let prefix = if addr.is_ipv4() { 32 } else { 128 };
        Self { addr, prefix }
    }
}

impl fmt::Display for Inet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

/// Values that can be stored in a database row or used as query parameters.
///
/// Each variant corresponds to a column type one of the drivers can decode, so
/// consumers matching on a value get exhaustiveness checking:
/// ```rust
/// use sql_rowmap::prelude::*;
///
/// fn describe(value: &RowValues) -> &'static str {
///     match value {
///         RowValues::Int16(_) | RowValues::Int32(_) | RowValues::Int64(_) => "integer",
///         RowValues::Text(_) => "text",
///         RowValues::Null => "null",
///         _ => "other",
///     }
/// }
/// assert_eq!(describe(&RowValues::Int32(7)), "integer");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// `int2` / `smallint`
    Int16(i16),
    /// `int4` / `integer`
    Int32(i32),
    /// `int8` / `bigint`, and every SQLite integer
    Int64(i64),
    /// `float4` / `real`
    Float32(f32),
    /// `float8` / `double precision`, and every SQLite real
    Float64(f64),
    /// `numeric`
    Decimal(Decimal),
    /// Text/string value
    Text(String),
    /// Timestamp without time zone
    Timestamp(NaiveDateTime),
    /// Timestamp with time zone, normalized to UTC
    TimestampTz(DateTime<Utc>),
    /// Calendar date
    Date(NaiveDate),
    /// UUID value
    Uuid(Uuid),
    /// `inet` / `cidr`
    Inet(Inet),
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

    /// Integer value widened to `i64`, whatever its column width.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RowValues::Int16(v) => Some(i64::from(*v)),
            RowValues::Int32(v) => Some(i64::from(*v)),
            RowValues::Int64(v) => Some(*v),
            _ => None,
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
    pub fn as_bool(&self) -> Option<bool> {
        if let RowValues::Bool(value) = self {
            return Some(*value);
        } else if let Some(i) = self.as_int() {
            if i == 1 {
                return Some(true);
            } else if i == 0 {
                return Some(false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            RowValues::Timestamp(value) => Some(*value),
            RowValues::TimestampTz(value) => Some(value.naive_utc()),
            RowValues::Text(s) => {
                // Try "YYYY-MM-DD HH:MM:SS"
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                    return Some(dt);
                }
                // Try "YYYY-MM-DD HH:MM:SS.SSS"
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").ok()
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RowValues::Float32(v) => Some(f64::from(*v)),
            RowValues::Float64(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            RowValues::Decimal(v) => Some(*v),
            RowValues::Int16(_) | RowValues::Int32(_) | RowValues::Int64(_) => {
                self.as_int().map(Decimal::from)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            RowValues::Uuid(v) => Some(*v),
            RowValues::Text(s) => Uuid::parse_str(s).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_inet(&self) -> Option<Inet> {
        if let RowValues::Inet(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        if let RowValues::JSON(v) = self {
            Some(v)
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

    /// Render the value as JSON. Decimals keep full precision as strings; non-finite floats
    /// become `null`.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            RowValues::Null => JsonValue::Null,
            RowValues::Bool(b) => JsonValue::Bool(*b),
            RowValues::Int16(v) => JsonValue::from(*v),
            RowValues::Int32(v) => JsonValue::from(*v),
            RowValues::Int64(v) => JsonValue::from(*v),
            RowValues::Float32(v) => {
                Number::from_f64(f64::from(*v)).map_or(JsonValue::Null, JsonValue::Number)
            }
            RowValues::Float64(v) => Number::from_f64(*v).map_or(JsonValue::Null, JsonValue::Number),
            RowValues::Decimal(d) => JsonValue::String(d.to_string()),
            RowValues::Text(s) => JsonValue::String(s.clone()),
            RowValues::Timestamp(dt) => {
                JsonValue::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            RowValues::TimestampTz(dt) => {
                JsonValue::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            RowValues::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
            RowValues::Uuid(u) => JsonValue::String(u.to_string()),
            RowValues::Inet(inet) => JsonValue::String(inet.to_string()),
            RowValues::JSON(v) => v.clone(),
            RowValues::Blob(bytes) => {
                JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect())
            }
        }
    }
}

/// Convert a whole record into a JSON object keyed by column name.
#[must_use]
pub fn record_to_json(record: &RowRecord) -> JsonValue {
    let mut object = Map::with_capacity(record.len());
    for (column, value) in record {
        object.insert(column.clone(), value.to_json());
    }
    JsonValue::Object(object)
}
