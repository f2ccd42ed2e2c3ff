use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{product, Product},
    errors::ServiceError,
    services::carts::CartEntry,
};

/// Flat order discount: 5% of the subtotal.
pub const DISCOUNT_RATE: Decimal = dec!(0.05);
/// Flat delivery fee in currency units.
pub const DELIVERY_FEE: i64 = 100;

/// One priced cart line, in cart order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub line_total: i64,
}

/// A stock-checked price computation over a cart snapshot. Insufficient
/// lines are excluded from `lines` and the subtotal; their product names
/// land in `insufficient`, and any entry there rejects the quote.
#[derive(Clone, Debug, Serialize)]
pub struct CartQuote {
    pub lines: Vec<PricedLine>,
    pub insufficient: Vec<String>,
    pub subtotal: i64,
    pub discount: Decimal,
    pub delivery_fee: i64,
    pub total: Decimal,
}

impl CartQuote {
    pub fn is_rejected(&self) -> bool {
        !self.insufficient.is_empty()
    }
}

/// Cart-page view: line totals without stock enforcement.
#[derive(Clone, Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<PricedLine>,
    pub total_price: i64,
}

#[derive(Clone)]
pub struct PricingService {
    db: Arc<DatabaseConnection>,
}

impl PricingService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Point-in-time product snapshot for the whole cart, as one batch
    /// lookup.
    async fn fetch_products(
        &self,
        entries: &[CartEntry],
    ) -> Result<HashMap<Uuid, product::Model>, ServiceError> {
        let ids: Vec<Uuid> = entries.iter().map(|e| e.product_id).collect();
        let products = Product::find()
            .filter(product::Column::Id.is_in(ids))
            .all(&*self.db)
            .await?;
        Ok(products.into_iter().map(|p| (p.id, p)).collect())
    }

    /// Prices the cart for display. Lines whose product no longer exists
    /// are dropped silently; stock is not enforced here.
    #[instrument(skip(self, entries))]
    pub async fn view(&self, entries: &[CartEntry]) -> Result<CartView, ServiceError> {
        let products = self.fetch_products(entries).await?;

        let mut lines = Vec::new();
        let mut total_price = 0i64;
        for entry in entries {
            let Some(product) = products.get(&entry.product_id) else {
                continue;
            };
            let quantity = entry.quantity as i32;
            let line_total = product.price * i64::from(quantity);
            total_price += line_total;
            lines.push(PricedLine {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.price,
                quantity,
                line_total,
            });
        }

        Ok(CartView { lines, total_price })
    }

    /// Stock-checked quote over a point-in-time product snapshot. The stock
    /// read here is advisory only; the ledger re-validates at commit time.
    #[instrument(skip(self, entries))]
    pub async fn quote(&self, entries: &[CartEntry]) -> Result<CartQuote, ServiceError> {
        let products = self.fetch_products(entries).await?;

        let mut lines = Vec::new();
        let mut insufficient = Vec::new();
        let mut subtotal = 0i64;
        for entry in entries {
            let Some(product) = products.get(&entry.product_id) else {
                continue;
            };
            let quantity = entry.quantity as i32;
            if product.quantity < quantity {
                insufficient.push(product.name.clone());
                continue;
            }
            let line_total = product.price * i64::from(quantity);
            subtotal += line_total;
            lines.push(PricedLine {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.price,
                quantity,
                line_total,
            });
        }

        Ok(compute_totals(lines, insufficient, subtotal))
    }
}

/// Fixed pricing policy: 5% of the integer subtotal has at most two
/// fractional digits, so the decimal arithmetic is exact and no further
/// rounding applies.
fn compute_totals(lines: Vec<PricedLine>, insufficient: Vec<String>, subtotal: i64) -> CartQuote {
    let discount = Decimal::from(subtotal) * DISCOUNT_RATE;
    let total = Decimal::from(subtotal) - discount + Decimal::from(DELIVERY_FEE);
    CartQuote {
        lines,
        insufficient,
        subtotal,
        discount,
        delivery_fee: DELIVERY_FEE,
        total,
    }
}
