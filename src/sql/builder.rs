//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for MySQL.

use crate::model::{ChangeSet, FieldValue};

/// Quote identifier for MySQL (safe: only from resource definitions).
fn quoted(s: &str) -> String {
    format!("`{}`", s.replace('`', "``"))
}

fn column_list(columns: &[&str]) -> String {
    columns.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<FieldValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: FieldValue) {
        self.params.push(v);
    }
}

pub struct OrderBy<'a> {
    pub column: &'a str,
    pub descending: bool,
}

impl<'a> OrderBy<'a> {
    pub fn desc(column: &'a str) -> Self {
        OrderBy {
            column,
            descending: true,
        }
    }
}

/// INSERT with one placeholder per column, in row order.
pub fn insert(table: &str, row: Vec<(&'static str, FieldValue)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(row.len());
    for (col, val) in row {
        cols.push(quoted(col));
        q.push_param(val);
    }
    let placeholders = vec!["?"; cols.len()].join(", ");
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(table),
        cols.join(", "),
        placeholders
    );
    q
}

pub fn select_by_id(table: &str, columns: &[&str], id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.push_param(FieldValue::Text(id.to_string()));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ?",
        column_list(columns),
        quoted(table),
        quoted("id")
    );
    q
}

pub fn select_all(table: &str, columns: &[&str], order: Option<OrderBy<'_>>) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT {} FROM {}", column_list(columns), quoted(table));
    if let Some(o) = order {
        q.sql.push_str(&format!(
            " ORDER BY {} {}",
            quoted(o.column),
            if o.descending { "DESC" } else { "ASC" }
        ));
    }
    q
}

/// Row lock inside a transaction; a hit proves the record exists.
pub fn lock_by_id(table: &str, id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.push_param(FieldValue::Text(id.to_string()));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ? FOR UPDATE",
        quoted("id"),
        quoted(table),
        quoted("id")
    );
    q
}

/// UPDATE SET for the assigned columns. Caller must not pass an empty change-set.
pub fn update(table: &str, id: &str, changes: &ChangeSet) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut set_parts = Vec::with_capacity(changes.len());
    for (col, val) in changes.iter() {
        set_parts.push(format!("{} = ?", quoted(col)));
        q.push_param(val.clone());
    }
    q.push_param(FieldValue::Text(id.to_string()));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        quoted(table),
        set_parts.join(", "),
        quoted("id")
    );
    q
}

pub fn delete(table: &str, id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.push_param(FieldValue::Text(id.to_string()));
    q.sql = format!("DELETE FROM {} WHERE {} = ?", quoted(table), quoted("id"));
    q
}
