use chrono::SecondsFormat;
use rusqlite::types::Value;

use crate::error::RowMapError;
use crate::types::RowValues;

/// Convert a single `RowValues` to a rusqlite `Value`.
///
/// SQLite has no native type for timestamps, decimals, UUIDs, addresses or JSON; those bind as
/// their text form.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Null => Value::Null,
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Int16(i) => Value::Integer(i64::from(*i)),
        RowValues::Int32(i) => Value::Integer(i64::from(*i)),
        RowValues::Int64(i) => Value::Integer(*i),
        RowValues::Float32(f) => Value::Real(f64::from(*f)),
        RowValues::Float64(f) => Value::Real(*f),
        RowValues::Decimal(d) => Value::Text(d.to_string()),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::TimestampTz(dt) => {
            Value::Text(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }
        RowValues::Date(d) => Value::Text(d.format("%F").to_string()),
        RowValues::Uuid(u) => Value::Text(u.to_string()),
        RowValues::Inet(inet) => Value::Text(inet.to_string()),
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Unified `SQLite` parameter container.
pub struct Params(pub Vec<Value>);

impl Params {
    /// Convert bind arguments into `SQLite` values.
    ///
    /// # Errors
    /// Currently infallible; kept fallible to match the Postgres converter.
    pub fn convert(params: &[RowValues]) -> Result<Self, RowMapError> {
        Ok(Params(params.iter().map(row_value_to_sqlite_value).collect()))
    }

    /// Borrow the underlying values.
    #[must_use]
    pub fn as_values(&self) -> &[Value] {
        &self.0
    }
}
