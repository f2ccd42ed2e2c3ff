use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::layout::MARGIN;
use super::model::{Align, Column, DocumentSpec, TotalLine};
use crate::{config::StoreInfo, services::pricing::CartQuote};

/// Fixed download filename for receipts.
pub const RECEIPT_FILENAME: &str = "receipt.pdf";

/// Product names wider than this are cut in the line-item table.
const NAME_WIDTH: usize = 30;

pub(super) fn money(currency: &str, amount: Decimal) -> String {
    format!("{} {:.2}", currency, amount)
}

/// Builds the printable receipt for a committed checkout. Pure assembly of
/// already-computed totals into the generic document model.
pub fn receipt_document(
    store: &StoreInfo,
    customer_name: &str,
    destination: &str,
    contact_number: &str,
    quote: &CartQuote,
    placed_at: DateTime<Utc>,
) -> DocumentSpec {
    let currency = store.currency.as_str();

    let columns = vec![
        Column {
            header: "Item".to_string(),
            x: MARGIN,
            align: Align::Left,
            max_chars: NAME_WIDTH,
        },
        Column {
            header: "Qty".to_string(),
            x: 300.0,
            align: Align::Left,
            max_chars: 6,
        },
        Column {
            header: "Price".to_string(),
            x: 430.0,
            align: Align::Right,
            max_chars: 18,
        },
        Column {
            header: "Total".to_string(),
            x: 550.0,
            align: Align::Right,
            max_chars: 18,
        },
    ];

    let rows = quote
        .lines
        .iter()
        .map(|line| {
            vec![
                line.name.clone(),
                line.quantity.to_string(),
                money(currency, Decimal::from(line.unit_price)),
                money(currency, Decimal::from(line.line_total)),
            ]
        })
        .collect();

    let totals = vec![
        TotalLine::new(
            "Subtotal:",
            money(currency, Decimal::from(quote.subtotal)),
        ),
        TotalLine::new(
            "Discount (5%):",
            format!("-{}", money(currency, quote.discount)),
        ),
        TotalLine::new(
            "Delivery Fee:",
            money(currency, Decimal::from(quote.delivery_fee)),
        ),
        TotalLine::emphasized("Total:", money(currency, quote.total)),
    ];

    DocumentSpec {
        company: store.name.clone(),
        tagline: store.tagline.clone(),
        title: "Order Receipt".to_string(),
        meta: vec![
            format!("Date: {}", placed_at.format("%B %d, %Y")),
            format!("Customer: {}", customer_name),
            format!("Destination: {}", destination),
            format!("Contact Number: {}", contact_number),
        ],
        columns,
        rows,
        totals,
        note: Some(format!(
            "Thank you for shopping with {}, welcome again!",
            store.name
        )),
        footer: format!("Contact us: {}", store.support_contact),
    }
}
