use std::sync::Arc;

use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    entities::{product, Product},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// The stock ledger. [`StockLedger::reduce`] is the one sanctioned way to
/// decrement a product's quantity; [`StockLedger::restock`] is the credit
/// side, used when an order is cancelled and for replenishment.
#[derive(Clone)]
pub struct StockLedger {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl StockLedger {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Decrements stock iff `quantity >= amount`, as a single conditional
    /// update. The guard is evaluated at the instant the statement runs, so
    /// concurrent attempts can never jointly oversell. Returns whether the
    /// decrement happened; a refusal leaves the quantity untouched.
    ///
    /// Takes any connection so the checkout commit can run it inside its
    /// transaction.
    #[instrument(skip(self, conn))]
    pub async fn reduce<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: Uuid,
        amount: i32,
    ) -> Result<bool, ServiceError> {
        let result = Product::update_many()
            .col_expr(
                product::Column::Quantity,
                Expr::col(product::Column::Quantity).sub(amount),
            )
            .filter(product::Column::Id.eq(product_id))
            .filter(product::Column::Quantity.gte(amount))
            .exec(conn)
            .await?;

        let reduced = result.rows_affected == 1;
        if !reduced {
            warn!(%product_id, amount, "Stock reduction refused");
        }
        Ok(reduced)
    }

    /// Credits stock back to a product. Only the debit side carries a
    /// quantity guard.
    #[instrument(skip(self))]
    pub async fn restock(&self, product_id: Uuid, amount: i32) -> Result<(), ServiceError> {
        let result = Product::update_many()
            .col_expr(
                product::Column::Quantity,
                Expr::col(product::Column::Quantity).add(amount),
            )
            .filter(product::Column::Id.eq(product_id))
            .exec(&*self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Product {} not found",
                product_id
            )));
        }

        self.event_sender
            .send_or_log(Event::StockRestocked { product_id, amount })
            .await;

        info!(%product_id, amount, "Stock credited");
        Ok(())
    }
}
