use std::error::Error;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tokio_postgres::Column;
use tokio_postgres::types::{FromSql, Type};
use uuid::Uuid;

use crate::column_map::FieldDescription;
use crate::error::RowMapError;
use crate::types::{Inet, RowValues};

/// Field descriptions for a prepared statement's result columns.
///
/// `position` is the 1-based ordinal in the result; `table_attribute` carries the source
/// table's attribute number when Postgres reports one.
#[must_use]
pub fn field_descriptions(columns: &[Column]) -> Vec<FieldDescription> {
    columns
        .iter()
        .enumerate()
        .map(|(i, col)| FieldDescription {
            name: col.name().to_string(),
            position: i + 1,
            table_attribute: col.column_id(),
        })
        .collect()
}

/// Wire decoding for `inet` and `cidr`, which the driver has no native type for.
struct PgInet(Inet);

impl<'a> FromSql<'a> for PgInet {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        let [family, prefix, _is_cidr, len, addr @ ..] = raw else {
            return Err("inet value too short".into());
        };
        if usize::from(*len) != addr.len() {
            return Err(format!(
                "inet value declares {len} address bytes but carries {}",
                addr.len()
            )
            .into());
        }
        let addr = match *family {
            2 => IpAddr::V4(Ipv4Addr::from(<[u8; 4]>::try_from(addr)?)),
            3 => IpAddr::V6(Ipv6Addr::from(<[u8; 16]>::try_from(addr)?)),
            other => return Err(format!("unknown inet address family {other}").into()),
        };
        Ok(PgInet(Inet::new(addr, *prefix)))
    }

    fn accepts(ty: &Type) -> bool {
        matches!(*ty, Type::INET | Type::CIDR)
    }
}

/// Extracts a `RowValues` from a `tokio_postgres` Row at the given index.
///
/// # Errors
/// Returns `RowMapError` if the column cannot be retrieved.
pub fn postgres_extract_value(
    row: &tokio_postgres::Row,
    idx: usize,
) -> Result<RowValues, RowMapError> {
    let type_info = row.columns()[idx].type_();

    match type_info.name() {
        "int2" => {
            let val: Option<i16> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Int16))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Int32))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Int64))
        }
        "char" => {
            let val: Option<i8> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int16(i16::from(v))))
        }
        "float4" => {
            let val: Option<f32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Float32))
        }
        "float8" => {
            let val: Option<f64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Float64))
        }
        "numeric" => {
            let val: Option<Decimal> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Decimal))
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Bool))
        }
        "timestamp" => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Timestamp))
        }
        "timestamptz" => {
            let val: Option<DateTime<Utc>> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::TimestampTz))
        }
        "date" => {
            let val: Option<NaiveDate> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Date))
        }
        "uuid" => {
            let val: Option<Uuid> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Uuid))
        }
        "inet" | "cidr" => {
            let val: Option<PgInet> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Inet(v.0)))
        }
        "json" | "jsonb" => {
            let val: Option<Value> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::JSON))
        }
        "bytea" => {
            let val: Option<Vec<u8>> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Blob))
        }
        // text, varchar, bpchar, name, and anything else the driver can read as a string
        _ => {
            let val: Option<String> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Text))
        }
    }
}

/// Decode every column of `row`, in result order.
///
/// # Errors
/// Returns the first column's decoding error.
pub fn postgres_extract_row(row: &tokio_postgres::Row) -> Result<Vec<RowValues>, RowMapError> {
    let mut values = Vec::with_capacity(row.len());
    for idx in 0..row.len() {
        values.push(postgres_extract_value(row, idx)?);
    }
    Ok(values)
}
