//! Typed bind values for PostgreSQL queries.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value bound to a positional placeholder. Values never appear in SQL
/// text; an `SqlParam::Null` used in an equality condition compiles to
/// `IS NULL` and is not bound at all.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlParam {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(uuid::Uuid),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
}

impl SqlParam {
    pub const fn is_null(&self) -> bool {
        matches!(self, SqlParam::Null)
    }
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(s: String) -> Self {
        SqlParam::Text(s)
    }
}

impl From<i64> for SqlParam {
    fn from(n: i64) -> Self {
        SqlParam::Int(n)
    }
}

impl From<f64> for SqlParam {
    fn from(n: f64) -> Self {
        SqlParam::Float(n)
    }
}

impl From<uuid::Uuid> for SqlParam {
    fn from(u: uuid::Uuid) -> Self {
        SqlParam::Uuid(u)
    }
}

impl<'q> Encode<'q, Postgres> for SqlParam {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            SqlParam::Null => <Option<String> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            SqlParam::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            SqlParam::Int(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            SqlParam::Float(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            SqlParam::Text(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
            SqlParam::Uuid(u) => <uuid::Uuid as Encode<Postgres>>::encode_by_ref(u, buf)?,
            SqlParam::DateTime(t) => <NaiveDateTime as Encode<Postgres>>::encode_by_ref(t, buf)?,
            SqlParam::Date(d) => <NaiveDate as Encode<Postgres>>::encode_by_ref(d, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            SqlParam::Null | SqlParam::Text(_) => <String as Type<Postgres>>::type_info(),
            SqlParam::Bool(_) => <bool as Type<Postgres>>::type_info(),
            SqlParam::Int(_) => <i64 as Type<Postgres>>::type_info(),
            SqlParam::Float(_) => <f64 as Type<Postgres>>::type_info(),
            SqlParam::Uuid(_) => <uuid::Uuid as Type<Postgres>>::type_info(),
            SqlParam::DateTime(_) => <NaiveDateTime as Type<Postgres>>::type_info(),
            SqlParam::Date(_) => <NaiveDate as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for SqlParam {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }
}
