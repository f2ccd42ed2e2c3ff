use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{Event, OrderPlaced};
use crate::{
    entities::{report_order, report_order_item, report_product, ReportProduct},
    errors::ServiceError,
};

/// Applies a committed event to the report tables. Events that do not feed
/// the projection are ignored.
pub async fn apply(db: &DatabaseConnection, event: &Event) -> Result<(), ServiceError> {
    match event {
        Event::OrderPlaced(sale) => apply_order_placed(db, sale).await,
        _ => Ok(()),
    }
}

/// Writes the denormalized record of one committed checkout: a completed
/// report order, a name-keyed product snapshot per line, and one order item
/// per line. Snapshots of previously sold products get their price and
/// stock refreshed.
#[instrument(skip(db, sale), fields(total = %sale.total, lines = sale.lines.len()))]
pub async fn apply_order_placed(
    db: &DatabaseConnection,
    sale: &OrderPlaced,
) -> Result<(), ServiceError> {
    let txn = db.begin().await?;

    let report_order_id = Uuid::new_v4();
    report_order::ActiveModel {
        id: Set(report_order_id),
        customer_id: Set(sale.customer_id),
        created_at: Set(sale.placed_at),
        is_completed: Set(true),
        total: Set(sale.total),
    }
    .insert(&txn)
    .await?;

    for line in &sale.lines {
        let snapshot = ReportProduct::find()
            .filter(report_product::Column::Name.eq(line.name.as_str()))
            .one(&txn)
            .await?;

        let product_id = match snapshot {
            Some(existing) => {
                let id = existing.id;
                let mut existing: report_product::ActiveModel = existing.into();
                existing.price = Set(line.unit_price);
                existing.stock = Set(line.stock_after);
                existing.update(&txn).await?;
                id
            }
            None => {
                let id = Uuid::new_v4();
                report_product::ActiveModel {
                    id: Set(id),
                    name: Set(line.name.clone()),
                    price: Set(line.unit_price),
                    stock: Set(line.stock_after),
                    image: Set(line.image.clone()),
                }
                .insert(&txn)
                .await?;
                id
            }
        };

        report_order_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(report_order_id),
            product_id: Set(product_id),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    info!(report_order = %report_order_id, "Projected sale");
    Ok(())
}
