use super::{ChangeSet, FieldValue, Resource};
use crate::service::{FieldRule, EMAIL_PATTERN};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

impl Resource for User {
    type Create = CreateUser;
    type Update = UpdateUser;

    const KIND: &'static str = "User";
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["id", "name", "email", "age", "created_at", "updated_at"];
    const RULES: &'static [FieldRule] = &[
        FieldRule::text("name").required().length(1, 100),
        FieldRule::text("email").required().max_length(255).pattern(EMAIL_PATTERN),
        FieldRule::integer("age").range(0.0, 150.0),
    ];

    fn build(id: String, created_at: DateTime<Utc>, input: CreateUser) -> Self {
        User {
            id,
            name: input.name,
            email: input.email,
            age: input.age,
            created_at,
            updated_at: None,
        }
    }

    fn changes(update: UpdateUser) -> ChangeSet {
        let mut c = ChangeSet::new();
        c.set_opt("name", update.name);
        c.set_opt("email", update.email);
        c.set_opt("age", update.age);
        c
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn row(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.clone().into()),
            ("name", self.name.clone().into()),
            ("email", self.email.clone().into()),
            ("age", self.age.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}
