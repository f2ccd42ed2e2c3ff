use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    entities::{order, Order, OrderStatus, Product},
    errors::ServiceError,
    events::{Event, EventSender},
    services::inventory::StockLedger,
};

/// Input for creating an order line directly (staff surface). When `price`
/// is not supplied it is derived as unit price x quantity.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderInput {
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Option<i64>,
    pub address: String,
    pub phone: String,
}

/// Service for reading and administering committed orders.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    ledger: StockLedger,
    event_sender: EventSender,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>, ledger: StockLedger, event_sender: EventSender) -> Self {
        Self {
            db,
            ledger,
            event_sender,
        }
    }

    /// Creates a single order line. Checkout writes its own rows inside its
    /// transaction; this path serves staff corrections and tooling.
    #[instrument(skip(self, input), fields(customer = %input.customer_id))]
    pub async fn create_order(&self, input: CreateOrderInput) -> Result<order::Model, ServiceError> {
        if input.quantity < 1 {
            return Err(ServiceError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let product = Product::find_by_id(input.product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", input.product_id))
            })?;

        let price = input
            .price
            .unwrap_or(product.price * i64::from(input.quantity));

        let created = order::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(input.customer_id),
            product_id: Set(input.product_id),
            ordered_at: Set(Utc::now()),
            price: Set(price),
            status: Set(OrderStatus::Pending),
            address: Set(input.address),
            phone: Set(input.phone),
            quantity: Set(input.quantity),
        }
        .insert(&*self.db)
        .await?;

        info!(order = %created.id, "Order created");
        Ok(created)
    }

    pub async fn get_order(&self, order_id: Uuid) -> Result<Option<order::Model>, ServiceError> {
        Ok(Order::find_by_id(order_id).one(&*self.db).await?)
    }

    /// A customer's orders, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<order::Model>, ServiceError> {
        Ok(Order::find()
            .filter(order::Column::CustomerId.eq(customer_id))
            .order_by_desc(order::Column::OrderedAt)
            .all(&*self.db)
            .await?)
    }

    /// Staff status update. Transitions are unordered; entering Cancelled
    /// credits the consumed stock back to the ledger, exactly once.
    /// Resurrecting a cancelled order does not re-reserve stock.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<order::Model, ServiceError> {
        let existing = Order::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let old_status = existing.status;
        let product_id = existing.product_id;
        let quantity = existing.quantity;

        let mut active: order::ActiveModel = existing.into();
        active.status = Set(new_status);
        let updated = active.update(&*self.db).await?;

        if new_status == OrderStatus::Cancelled && old_status != OrderStatus::Cancelled {
            self.ledger.restock(product_id, quantity).await?;
        }

        self.event_sender
            .send_or_log(Event::OrderStatusChanged {
                order_id,
                old_status: old_status.to_string(),
                new_status: new_status.to_string(),
            })
            .await;

        info!(%order_id, %old_status, %new_status, "Order status updated");
        Ok(updated)
    }
}
