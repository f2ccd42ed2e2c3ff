use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product snapshot for analytics, keyed by name rather than catalog id so
/// catalog deletions don't break sales history. Price and stock are
/// refreshed on every sale of the product.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report_products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub price: i64,
    pub stock: i32,
    #[sea_orm(nullable)]
    pub image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::report_order_item::Entity")]
    Items,
}

impl Related<super::report_order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
