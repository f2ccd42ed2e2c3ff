use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

pub mod projection;

/// Snapshot of one committed sale line, as consumed by the analytics
/// projection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlacedLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
    /// Stock level immediately after the reduction for this sale.
    pub stock_after: i32,
    pub image: Option<String>,
}

/// A committed checkout, published after its transaction commits.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub customer_id: Option<Uuid>,
    pub placed_at: DateTime<Utc>,
    /// Post-discount, post-fee grand total for the whole cart.
    pub total: Decimal,
    pub lines: Vec<PlacedLine>,
}

// The events that can occur in the system.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Event {
    OrderPlaced(OrderPlaced),
    OrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },
    StockRestocked {
        product_id: Uuid,
        amount: i32,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the channel is gone.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Event channel unavailable: {}", e);
        }
    }
}

/// Background worker: applies committed events to the analytics projection
/// until the channel closes.
pub async fn process_events(db: Arc<DatabaseConnection>, mut receiver: mpsc::Receiver<Event>) {
    info!("Event processor started");
    while let Some(event) = receiver.recv().await {
        if let Err(e) = projection::apply(&db, &event).await {
            error!("Failed to project event: {}", e);
        }
    }
    info!("Event processor stopped");
}
