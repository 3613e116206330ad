use super::{ChangeSet, FieldValue, Resource};
use crate::service::FieldRule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
}

impl Resource for Product {
    type Create = CreateProduct;
    type Update = UpdateProduct;

    const KIND: &'static str = "Product";
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "price",
        "category",
        "created_at",
        "updated_at",
    ];
    const RULES: &'static [FieldRule] = &[
        FieldRule::text("name").required().length(1, 200),
        FieldRule::text("description").max_length(1000),
        FieldRule::number("price").required().greater_than(0.0),
        FieldRule::text("category").required().length(1, 100),
    ];

    fn build(id: String, created_at: DateTime<Utc>, input: CreateProduct) -> Self {
        Product {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
            created_at,
            updated_at: None,
        }
    }

    fn changes(update: UpdateProduct) -> ChangeSet {
        let mut c = ChangeSet::new();
        c.set_opt("name", update.name);
        c.set_opt("description", update.description);
        c.set_opt("price", update.price);
        c.set_opt("category", update.category);
        c
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn row(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.clone().into()),
            ("name", self.name.clone().into()),
            ("description", self.description.clone().into()),
            ("price", self.price.into()),
            ("category", self.category.clone().into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}
