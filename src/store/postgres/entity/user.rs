use crate::model::User;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub age: Option<i32>,
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

impl From<Model> for User {
    fn from(m: Model) -> Self {
        User {
            id: m.id,
            name: m.name,
            email: m.email,
            age: m.age,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<User> for ActiveModel {
    fn from(u: User) -> Self {
        ActiveModel {
            id: Set(u.id),
            name: Set(u.name),
            email: Set(u.email),
            age: Set(u.age),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
        }
    }
}
