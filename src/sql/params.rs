//! Bind `FieldValue` directly to MySQL statements.

use crate::model::FieldValue;
use chrono::{DateTime, Utc};
use sqlx::encode::{Encode, IsNull};
use sqlx::mysql::{MySql, MySqlTypeInfo};
use sqlx::{Database, Type};

impl<'q> Encode<'q, MySql> for FieldValue {
    fn encode_by_ref(
        &self,
        buf: &mut <MySql as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            FieldValue::Null => Ok(IsNull::Yes),
            FieldValue::Text(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<MySql>>::encode_by_ref(&s_ref, buf)
            }
            FieldValue::Int(n) => <i32 as Encode<MySql>>::encode_by_ref(n, buf),
            FieldValue::Float(f) => <f64 as Encode<MySql>>::encode_by_ref(f, buf),
            FieldValue::Timestamp(t) => <DateTime<Utc> as Encode<MySql>>::encode_by_ref(t, buf),
        }
    }

    /// MySQL sends a type per parameter, so each variant reports its own.
    fn produces(&self) -> Option<MySqlTypeInfo> {
        Some(match self {
            FieldValue::Null | FieldValue::Text(_) => <str as Type<MySql>>::type_info(),
            FieldValue::Int(_) => <i32 as Type<MySql>>::type_info(),
            FieldValue::Float(_) => <f64 as Type<MySql>>::type_info(),
            FieldValue::Timestamp(_) => <DateTime<Utc> as Type<MySql>>::type_info(),
        })
    }
}

impl Type<MySql> for FieldValue {
    fn type_info() -> MySqlTypeInfo {
        <str as Type<MySql>>::type_info()
    }
}
