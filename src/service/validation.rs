//! Request validation from declarative per-field rules.

use crate::error::AppError;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

/// Pattern accepted for email fields.
pub const EMAIL_PATTERN: &str = r"^[^@]+@[^@]+\.[^@]+$";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Number,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Uuid,
}

/// Constraints for one payload field. Built in const context so each resource can
/// declare its rules as a static table.
#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<&'static str>,
    pub format: Option<Format>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
}

impl FieldRule {
    const fn of(field: &'static str, kind: FieldKind) -> Self {
        FieldRule {
            field,
            kind,
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
            format: None,
            minimum: None,
            maximum: None,
            exclusive_minimum: None,
        }
    }

    pub const fn text(field: &'static str) -> Self {
        Self::of(field, FieldKind::Text)
    }

    pub const fn integer(field: &'static str) -> Self {
        Self::of(field, FieldKind::Integer)
    }

    pub const fn number(field: &'static str) -> Self {
        Self::of(field, FieldKind::Number)
    }

    pub const fn required(self) -> Self {
        FieldRule { required: true, ..self }
    }

    pub const fn length(self, min: usize, max: usize) -> Self {
        FieldRule {
            min_length: Some(min),
            max_length: Some(max),
            ..self
        }
    }

    pub const fn max_length(self, max: usize) -> Self {
        FieldRule {
            max_length: Some(max),
            ..self
        }
    }

    pub const fn pattern(self, pattern: &'static str) -> Self {
        FieldRule {
            pattern: Some(pattern),
            ..self
        }
    }

    pub const fn format(self, format: Format) -> Self {
        FieldRule {
            format: Some(format),
            ..self
        }
    }

    pub const fn range(self, min: f64, max: f64) -> Self {
        FieldRule {
            minimum: Some(min),
            maximum: Some(max),
            ..self
        }
    }

    /// Value must be strictly greater than `bound`.
    pub const fn greater_than(self, bound: f64) -> Self {
        FieldRule {
            exclusive_minimum: Some(bound),
            ..self
        }
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate body against per-field rules. All required fields must be present.
    pub fn validate(body: &HashMap<String, Value>, rules: &[FieldRule]) -> Result<(), AppError> {
        for rule in rules {
            let val = body.get(rule.field);
            if rule.required && (val.is_none() || val == Some(&Value::Null)) {
                return Err(AppError::Validation(format!("{} is required", rule.field)));
            }
            if let Some(v) = val {
                validate_field(v, rule)?;
            }
        }
        Ok(())
    }

    /// Validate only the fields present in body (for updates). Required is not enforced for missing fields.
    pub fn validate_partial(body: &HashMap<String, Value>, rules: &[FieldRule]) -> Result<(), AppError> {
        for (field, v) in body {
            if let Some(rule) = rules.iter().find(|r| r.field == field) {
                validate_field(v, rule)?;
            }
        }
        Ok(())
    }
}

fn validate_field(v: &Value, rule: &FieldRule) -> Result<(), AppError> {
    let col = rule.field;
    if v.is_null() {
        return Ok(());
    }
    match rule.kind {
        FieldKind::Text if !v.is_string() => {
            return Err(AppError::Validation(format!("{} must be a string", col)));
        }
        FieldKind::Integer if !(v.is_i64() || v.is_u64()) => {
            return Err(AppError::Validation(format!("{} must be an integer", col)));
        }
        FieldKind::Number if !v.is_number() => {
            return Err(AppError::Validation(format!("{} must be a number", col)));
        }
        _ => {}
    }
    if let Some(s) = v.as_str() {
        let len = s.chars().count();
        if let Some(min) = rule.min_length {
            if len < min {
                return Err(AppError::Validation(format!(
                    "{} must be at least {} characters",
                    col, min
                )));
            }
        }
        if let Some(max) = rule.max_length {
            if len > max {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    col, max
                )));
            }
        }
        if let Some(pattern) = rule.pattern {
            let re = Regex::new(pattern).map_err(|_| AppError::Validation(format!("invalid pattern for {}", col)))?;
            if !re.is_match(s) {
                return Err(AppError::Validation(format!("{} does not match required pattern", col)));
            }
        }
        if let Some(Format::Uuid) = rule.format {
            if uuid::Uuid::parse_str(s).is_err() {
                return Err(AppError::Validation(format!("{} must be a valid UUID", col)));
            }
        }
    }
    if let Some(n) = v.as_f64() {
        if let Some(min) = rule.minimum {
            if n < min {
                return Err(AppError::Validation(format!("{} must be at least {}", col, min)));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                return Err(AppError::Validation(format!("{} must be at most {}", col, max)));
            }
        }
        if let Some(bound) = rule.exclusive_minimum {
            if n <= bound {
                return Err(AppError::Validation(format!("{} must be greater than {}", col, bound)));
            }
        }
    }
    Ok(())
}
