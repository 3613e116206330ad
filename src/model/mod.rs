//! Resource definitions shared by every backend: record shapes, create/update
//! payloads, field rules and the change-set produced by an update.

mod order;
mod product;
mod user;

pub use order::{CreateOrder, Order, UpdateOrder};
pub use product::{CreateProduct, Product, UpdateProduct};
pub use user::{CreateUser, UpdateUser, User};

use crate::error::AppError;
use crate::service::FieldRule;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// A resource kind stored on every backend.
///
/// `Self` is the response shape; `Create` and `Update` are the request payloads.
/// `row` must list values in `COLUMNS` order.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    type Create: DeserializeOwned + Send;
    type Update: DeserializeOwned + Send;

    /// Human-readable name used in error messages.
    const KIND: &'static str;
    /// Table / collection name, also the route segment.
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    const RULES: &'static [FieldRule];

    fn build(id: String, created_at: DateTime<Utc>, input: Self::Create) -> Self;

    /// Supplied fields of an update payload. Absent or null fields are left out.
    fn changes(update: Self::Update) -> ChangeSet;

    fn id(&self) -> &str;

    fn row(&self) -> Vec<(&'static str, FieldValue)>;
}

/// Backend-neutral column value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Int(i32),
    Float(f64),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Int(n) => Value::Number((*n).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Timestamp(t) => Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Ordered set of column assignments for an update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangeSet {
    fields: Vec<(&'static str, FieldValue)>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &'static str, value: impl Into<FieldValue>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Record `value` only when it was supplied.
    pub fn set_opt<T: Into<FieldValue>>(&mut self, field: &'static str, value: Option<T>) {
        if let Some(v) = value {
            self.set(field, v);
        }
    }

    /// Adds the `updated_at` assignment every persisted mutation carries.
    pub fn touched(mut self, at: DateTime<Utc>) -> Self {
        self.set("updated_at", at);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(f, v)| (*f, v))
    }
}

/// Fresh public identifier (UUID v4, lowercase hyphenated).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Normalize a path identifier. Anything that is not a UUID is a client error.
pub fn parse_id(raw: &str) -> Result<String, AppError> {
    uuid::Uuid::parse_str(raw)
        .map(|u| u.to_string())
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", raw)))
}

/// Canonical spelling of a UUID reference held in a payload. Input that is not a
/// UUID is returned as-is; validation rejects it before a record is built.
pub fn canonical_ref(raw: String) -> String {
    uuid::Uuid::parse_str(&raw)
        .map(|u| u.to_string())
        .unwrap_or(raw)
}

/// Current time at millisecond precision, the finest every backend round-trips.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_set_keeps_last_assignment() {
        let mut c = ChangeSet::new();
        c.set("name", "a".to_string());
        c.set("name", "b".to_string());
        c.set_opt::<i32>("age", None);
        assert_eq!(c.len(), 1);
        assert_eq!(c.iter().next(), Some(("name", &FieldValue::Text("b".into()))));
    }

    #[test]
    fn touched_adds_updated_at() {
        let at = now();
        let c = ChangeSet::new().touched(at);
        assert!(!c.is_empty());
        assert_eq!(c.iter().last(), Some(("updated_at", &FieldValue::Timestamp(at))));
    }

    #[test]
    fn parse_id_normalizes_and_rejects() {
        let id = parse_id("0B6E2C1A-3F4D-4E5B-9C8A-7D6E5F4A3B2C").unwrap();
        assert_eq!(id, "0b6e2c1a-3f4d-4e5b-9c8a-7d6e5f4a3b2c");
        assert!(matches!(parse_id("42"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn references_are_lowercased() {
        let upper = "0B6E2C1A-3F4D-4E5B-9C8A-7D6E5F4A3B2C".to_string();
        assert_eq!(canonical_ref(upper), "0b6e2c1a-3f4d-4e5b-9c8a-7d6e5f4a3b2c");
        assert_eq!(canonical_ref("not-a-uuid".into()), "not-a-uuid");
    }

    #[test]
    fn now_is_millisecond_precise() {
        assert_eq!(now().timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn timestamp_json_parses_back() {
        let at = now();
        let v = FieldValue::Timestamp(at).to_json();
        let back: DateTime<Utc> = serde_json::from_value(v).unwrap();
        assert_eq!(back, at);
    }
}
