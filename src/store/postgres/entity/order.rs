use crate::model::Order;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub quantity: i32,
    pub total_amount: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Order {
    fn from(m: Model) -> Self {
        Order {
            id: m.id,
            user_id: m.user_id,
            product_id: m.product_id,
            quantity: m.quantity,
            total_amount: m.total_amount,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<Order> for ActiveModel {
    fn from(o: Order) -> Self {
        ActiveModel {
            id: Set(o.id),
            user_id: Set(o.user_id),
            product_id: Set(o.product_id),
            quantity: Set(o.quantity),
            total_amount: Set(o.total_amount),
            created_at: Set(o.created_at),
            updated_at: Set(o.updated_at),
        }
    }
}
