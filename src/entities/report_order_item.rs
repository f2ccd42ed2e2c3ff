use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One analytics line within a report order. `unit_price` is the price at
/// the time of sale, independent of later catalog changes.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report_order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::report_order::Entity",
        from = "Column::OrderId",
        to = "super::report_order::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::report_product::Entity",
        from = "Column::ProductId",
        to = "super::report_product::Column::Id"
    )]
    Product,
}

impl Related<super::report_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::report_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
