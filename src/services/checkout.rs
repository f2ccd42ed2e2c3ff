use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::StoreInfo,
    documents::{pdf, receipt},
    entities::{order, Customer, OrderStatus, Product},
    errors::ServiceError,
    events::{Event, EventSender, OrderPlaced, PlacedLine},
    services::{
        carts::CartStore,
        inventory::StockLedger,
        pricing::{CartQuote, PricingService},
    },
    sessions::CartKey,
};

/// Why a checkout attempt was rejected. Every variant is a normal,
/// user-facing outcome; only `Service` wraps a real failure.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Insufficient stock for: {}", .names.join(", "))]
    InsufficientStock { names: Vec<String> },

    #[error("Please log in to complete your order")]
    Unauthenticated,

    #[error("Please provide both destination and contact number")]
    MissingDeliveryInfo,

    #[error("Stock update failed for {product_name}")]
    StockReconciliationFailed { product_name: String },

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<sea_orm::DbErr> for CheckoutError {
    fn from(err: sea_orm::DbErr) -> Self {
        CheckoutError::Service(ServiceError::DatabaseError(err))
    }
}

/// Delivery details collected at submission. The contact number is a free
/// text field; it is never charged against a payment network.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "Destination is required"))]
    pub destination: String,
    #[validate(length(min = 1, message = "Contact number is required"))]
    pub contact_number: String,
}

/// A committed checkout: the rendered receipt plus the totals it was built
/// from.
#[derive(Debug)]
pub struct CheckoutReceipt {
    pub pdf: Vec<u8>,
    pub quote: CartQuote,
}

/// Drives a checkout attempt through
/// `START -> PRICED -> STOCK_RECONCILED -> COMMITTED`, rejecting along the
/// way without mutation. Stock reduction and order rows commit in a single
/// transaction; the analytics projection is fed by the `OrderPlaced` event
/// published after commit.
#[derive(Clone)]
pub struct CheckoutService {
    db: Arc<DatabaseConnection>,
    carts: Arc<CartStore>,
    pricing: PricingService,
    ledger: StockLedger,
    event_sender: EventSender,
    store: StoreInfo,
}

impl CheckoutService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        carts: Arc<CartStore>,
        pricing: PricingService,
        ledger: StockLedger,
        event_sender: EventSender,
        store: StoreInfo,
    ) -> Self {
        Self {
            db,
            carts,
            pricing,
            ledger,
            event_sender,
            store,
        }
    }

    /// Prices the current cart for the checkout page without committing
    /// anything.
    #[instrument(skip(self))]
    pub async fn summary(&self, key: &CartKey) -> Result<CartQuote, CheckoutError> {
        let entries = self.carts.view(key);
        if entries.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let quote = self.pricing.quote(&entries).await?;
        if quote.is_rejected() {
            return Err(CheckoutError::InsufficientStock {
                names: quote.insufficient,
            });
        }
        Ok(quote)
    }

    /// Runs the commit sequence for the identity's cart and returns the
    /// rendered receipt. The cart survives every rejection; only a fully
    /// committed checkout clears it.
    #[instrument(skip(self, request), fields(customer = ?customer_id))]
    pub async fn checkout(
        &self,
        key: &CartKey,
        customer_id: Option<Uuid>,
        request: CheckoutRequest,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        // START -> PRICED. No mutation has happened on any rejection here.
        let entries = self.carts.view(key);
        if entries.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let quote = self.pricing.quote(&entries).await?;
        if quote.is_rejected() {
            return Err(CheckoutError::InsufficientStock {
                names: quote.insufficient,
            });
        }

        let customer_id = customer_id.ok_or(CheckoutError::Unauthenticated)?;
        let customer = Customer::find_by_id(customer_id)
            .one(&*self.db)
            .await?
            .ok_or(CheckoutError::Unauthenticated)?;

        if request.destination.trim().is_empty() || request.contact_number.trim().is_empty() {
            return Err(CheckoutError::MissingDeliveryInfo);
        }

        // PRICED -> STOCK_RECONCILED -> COMMITTED. One transaction for every
        // line: the ledger re-validates each quantity at mutation time, and
        // any refusal rolls the whole attempt back.
        let placed_at = Utc::now();
        let txn = self.db.begin().await?;
        let mut placed_lines = Vec::with_capacity(quote.lines.len());

        for line in &quote.lines {
            if !self.ledger.reduce(&txn, line.product_id, line.quantity).await? {
                txn.rollback().await?;
                return Err(CheckoutError::StockReconciliationFailed {
                    product_name: line.name.clone(),
                });
            }

            let (stock_after, image) = Product::find_by_id(line.product_id)
                .one(&txn)
                .await?
                .map(|p| (p.quantity, p.image))
                .unwrap_or((0, None));

            order::ActiveModel {
                id: Set(Uuid::new_v4()),
                customer_id: Set(customer.id),
                product_id: Set(line.product_id),
                ordered_at: Set(placed_at),
                price: Set(line.line_total),
                status: Set(OrderStatus::Pending),
                address: Set(request.destination.clone()),
                phone: Set(request.contact_number.clone()),
                quantity: Set(line.quantity),
            }
            .insert(&txn)
            .await?;

            placed_lines.push(PlacedLine {
                product_id: line.product_id,
                name: line.name.clone(),
                unit_price: line.unit_price,
                quantity: line.quantity,
                stock_after,
                image,
            });
        }

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::OrderPlaced(OrderPlaced {
                customer_id: Some(customer.id),
                placed_at,
                total: quote.total,
                lines: placed_lines,
            }))
            .await;

        self.carts.clear(key);

        let document = receipt::receipt_document(
            &self.store,
            &customer.full_name(),
            &request.destination,
            &request.contact_number,
            &quote,
            placed_at,
        );
        let bytes = pdf::render(&document).map_err(CheckoutError::Service)?;

        info!(
            customer = %customer.id,
            total = %quote.total,
            lines = quote.lines.len(),
            "Checkout committed"
        );

        Ok(CheckoutReceipt { pdf: bytes, quote })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_message_names_every_product() {
        let err = CheckoutError::InsufficientStock {
            names: vec!["ProductX".to_string(), "ProductY".to_string()],
        };
        assert_eq!(err.to_string(), "Insufficient stock for: ProductX, ProductY");
    }

    #[test]
    fn reconciliation_failure_names_the_product() {
        let err = CheckoutError::StockReconciliationFailed {
            product_name: "Laptop".to_string(),
        };
        assert_eq!(err.to_string(), "Stock update failed for Laptop");
    }

    #[test]
    fn checkout_request_requires_both_fields() {
        let missing = CheckoutRequest {
            destination: String::new(),
            contact_number: "0712000000".to_string(),
        };
        assert!(missing.validate().is_err());

        let complete = CheckoutRequest {
            destination: "Nairobi CBD".to_string(),
            contact_number: "0712000000".to_string(),
        };
        assert!(complete.validate().is_ok());
    }
}
