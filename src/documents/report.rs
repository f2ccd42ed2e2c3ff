use chrono::{DateTime, Utc};

use super::layout::MARGIN;
use super::model::{Align, Column, DocumentSpec, TotalLine};
use super::receipt::money;
use crate::{config::StoreInfo, services::reports::SalesSummary};

/// Fixed download filename for the sales report.
pub const SALES_REPORT_FILENAME: &str = "sales_report.pdf";

const NAME_WIDTH: usize = 30;

/// Builds the printable sales report from the shared aggregation.
pub fn sales_report_document(
    store: &StoreInfo,
    summary: &SalesSummary,
    generated_at: DateTime<Utc>,
) -> DocumentSpec {
    let currency = store.currency.as_str();

    let columns = vec![
        Column {
            header: "Product".to_string(),
            x: MARGIN,
            align: Align::Left,
            max_chars: NAME_WIDTH,
        },
        Column {
            header: "Quantity Sold".to_string(),
            x: 330.0,
            align: Align::Left,
            max_chars: 12,
        },
        Column {
            header: format!("Revenue ({})", currency),
            x: 550.0,
            align: Align::Right,
            max_chars: 18,
        },
    ];

    let rows = summary
        .top_products
        .iter()
        .map(|product| {
            vec![
                product.name.clone(),
                product.quantity_sold.to_string(),
                format!("{:.2}", product.revenue),
            ]
        })
        .collect();

    let note = if summary.total_orders == 0 {
        Some("No completed sales recorded.".to_string())
    } else {
        None
    };

    DocumentSpec {
        company: store.name.clone(),
        tagline: store.tagline.clone(),
        title: "Sales Report".to_string(),
        meta: vec![
            format!("Period: All Time to {}", generated_at.format("%Y-%m-%d")),
            format!("Total Orders: {}", summary.total_orders),
        ],
        columns,
        rows,
        totals: vec![TotalLine::emphasized(
            "Total Revenue:",
            money(currency, summary.total_revenue),
        )],
        note,
        footer: format!("{} | {}", store.name, store.support_contact),
    }
}
