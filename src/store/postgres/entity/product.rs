use crate::model::Product;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order::Entity")]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        Product {
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price,
            category: m.category,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<Product> for ActiveModel {
    fn from(p: Product) -> Self {
        ActiveModel {
            id: Set(p.id),
            name: Set(p.name),
            description: Set(p.description),
            price: Set(p.price),
            category: Set(p.category),
            created_at: Set(p.created_at),
            updated_at: Set(p.updated_at),
        }
    }
}
