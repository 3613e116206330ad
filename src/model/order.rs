use super::{canonical_ref, ChangeSet, FieldValue, Resource};
use crate::service::{FieldRule, Format};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub quantity: i32,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CreateOrder {
    pub user_id: String,
    pub product_id: String,
    pub quantity: i32,
    pub total_amount: f64,
}

/// The user and product an order points at are fixed once it is placed.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOrder {
    pub quantity: Option<i32>,
    pub total_amount: Option<f64>,
}

impl Resource for Order {
    type Create = CreateOrder;
    type Update = UpdateOrder;

    const KIND: &'static str = "Order";
    const TABLE: &'static str = "orders";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "product_id",
        "quantity",
        "total_amount",
        "created_at",
        "updated_at",
    ];
    const RULES: &'static [FieldRule] = &[
        FieldRule::text("user_id").required().format(Format::Uuid),
        FieldRule::text("product_id").required().format(Format::Uuid),
        FieldRule::integer("quantity").required().greater_than(0.0),
        FieldRule::number("total_amount").required().greater_than(0.0),
    ];

    fn build(id: String, created_at: DateTime<Utc>, input: CreateOrder) -> Self {
        Order {
            id,
            user_id: canonical_ref(input.user_id),
            product_id: canonical_ref(input.product_id),
            quantity: input.quantity,
            total_amount: input.total_amount,
            created_at,
            updated_at: None,
        }
    }

    fn changes(update: UpdateOrder) -> ChangeSet {
        let mut c = ChangeSet::new();
        c.set_opt("quantity", update.quantity);
        c.set_opt("total_amount", update.total_amount);
        c
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn row(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.clone().into()),
            ("user_id", self.user_id.clone().into()),
            ("product_id", self.product_id.clone().into()),
            ("quantity", self.quantity.into()),
            ("total_amount", self.total_amount.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}
