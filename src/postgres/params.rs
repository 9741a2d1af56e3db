use std::error::Error;
use std::net::IpAddr;

use rust_decimal::Decimal;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_util::bytes::{BufMut, BytesMut};

use crate::error::RowMapError;
use crate::types::{Inet, RowValues};

type SqlResult = Result<IsNull, Box<dyn Error + Sync + Send>>;

/// Container for Postgres parameters with lifetime tracking
pub struct Params<'a> {
    references: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> Params<'a> {
    /// Convert from a slice of `RowValues` to Postgres parameters
    ///
    /// # Errors
    /// Currently infallible; width and type checks happen when the driver binds each value.
    pub fn convert(params: &'a [RowValues]) -> Result<Params<'a>, RowMapError> {
        let references: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        Ok(Params { references })
    }

    /// Get a reference to the underlying parameter array
    #[must_use]
    pub fn as_refs(&self) -> &[&'a (dyn ToSql + Sync)] {
        &self.references
    }
}

// Integers narrow to the column's width so an Int64 argument can bind to an int4 column.
fn int_to_sql(value: i64, ty: &Type, out: &mut BytesMut) -> SqlResult {
    match *ty {
        Type::INT2 => i16::try_from(value)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(value)?.to_sql(ty, out),
        Type::NUMERIC => Decimal::from(value).to_sql(ty, out),
        _ => value.to_sql(ty, out),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_sql(value: f64, ty: &Type, out: &mut BytesMut) -> SqlResult {
    match *ty {
        Type::FLOAT4 => (value as f32).to_sql(ty, out),
        Type::NUMERIC => Decimal::try_from(value)?.to_sql(ty, out),
        _ => value.to_sql(ty, out),
    }
}

// Binary inet/cidr layout: family, prefix bits, is_cidr, address length, address bytes.
fn inet_to_sql(inet: &Inet, ty: &Type, out: &mut BytesMut) -> SqlResult {
    let is_cidr = u8::from(*ty == Type::CIDR);
    match inet.addr {
        IpAddr::V4(v4) => {
            out.put_slice(&[2, inet.prefix, is_cidr, 4]);
            out.put_slice(&v4.octets());
        }
        IpAddr::V6(v6) => {
            out.put_slice(&[3, inet.prefix, is_cidr, 16]);
            out.put_slice(&v6.octets());
        }
    }
    Ok(IsNull::No)
}

impl ToSql for RowValues {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> SqlResult {
        match self {
            RowValues::Null => Ok(IsNull::Yes),
            RowValues::Bool(b) => b.to_sql(ty, out),
            RowValues::Int16(i) => int_to_sql(i64::from(*i), ty, out),
            RowValues::Int32(i) => int_to_sql(i64::from(*i), ty, out),
            RowValues::Int64(i) => int_to_sql(*i, ty, out),
            RowValues::Float32(f) => float_to_sql(f64::from(*f), ty, out),
            RowValues::Float64(f) => float_to_sql(*f, ty, out),
            RowValues::Decimal(d) => d.to_sql(ty, out),
            RowValues::Text(s) => s.to_sql(ty, out),
            RowValues::Timestamp(dt) => match *ty {
                Type::TIMESTAMPTZ => dt.and_utc().to_sql(ty, out),
                Type::DATE => dt.date().to_sql(ty, out),
                _ => dt.to_sql(ty, out),
            },
            RowValues::TimestampTz(dt) => match *ty {
                Type::TIMESTAMP => dt.naive_utc().to_sql(ty, out),
                _ => dt.to_sql(ty, out),
            },
            RowValues::Date(d) => d.to_sql(ty, out),
            RowValues::Uuid(u) => u.to_sql(ty, out),
            RowValues::Inet(inet) => inet_to_sql(inet, ty, out),
            RowValues::JSON(jsval) => jsval.to_sql(ty, out),
            RowValues::Blob(bytes) => bytes.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::NUMERIC
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::DATE
                | Type::UUID
                | Type::INET
                | Type::CIDR
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}
