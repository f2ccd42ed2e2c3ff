use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{report_order, ReportOrder, ReportOrderItem, ReportProduct},
    errors::ServiceError,
};

/// Default ranking depth for the top-products table.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// One row of the top-products ranking.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopProduct {
    pub name: String,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

/// Aggregates over committed sales. Feeds both the on-screen summary and
/// the PDF report.
#[derive(Clone, Debug, Serialize)]
pub struct SalesSummary {
    pub total_revenue: Decimal,
    pub total_orders: u64,
    pub top_products: Vec<TopProduct>,
}

/// Read-only queries over the report tables.
#[derive(Clone)]
pub struct SalesReportService {
    db: Arc<DatabaseConnection>,
}

impl SalesReportService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Revenue, order count and the top products by quantity sold over all
    /// completed report orders. Quantity ties rank by product name so the
    /// ordering is stable across runs.
    #[instrument(skip(self))]
    pub async fn sales_summary(&self, limit: usize) -> Result<SalesSummary, ServiceError> {
        let completed = ReportOrder::find()
            .filter(report_order::Column::IsCompleted.eq(true))
            .all(&*self.db)
            .await?;

        let total_revenue: Decimal = completed.iter().map(|o| o.total).sum();
        let total_orders = completed.len() as u64;
        let completed_ids: HashSet<Uuid> = completed.iter().map(|o| o.id).collect();

        let names: HashMap<Uuid, String> = ReportProduct::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let mut ranked: Vec<TopProduct> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for item in ReportOrderItem::find().all(&*self.db).await? {
            if !completed_ids.contains(&item.order_id) {
                continue;
            }
            let Some(name) = names.get(&item.product_id) else {
                continue;
            };
            let revenue = Decimal::from(item.unit_price) * Decimal::from(item.quantity);
            match positions.get(name) {
                Some(&index) => {
                    ranked[index].quantity_sold += i64::from(item.quantity);
                    ranked[index].revenue += revenue;
                }
                None => {
                    positions.insert(name.clone(), ranked.len());
                    ranked.push(TopProduct {
                        name: name.clone(),
                        quantity_sold: i64::from(item.quantity),
                        revenue,
                    });
                }
            }
        }

        ranked.sort_by(|a, b| {
            b.quantity_sold
                .cmp(&a.quantity_sold)
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked.truncate(limit);

        Ok(SalesSummary {
            total_revenue,
            total_orders,
            top_products: ranked,
        })
    }
}
