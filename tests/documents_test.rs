use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use storefront_api::{
    config::StoreInfo,
    documents::{layout, pdf, receipt::receipt_document, report::sales_report_document},
    services::{
        pricing::{CartQuote, PricedLine},
        reports::{SalesSummary, TopProduct},
    },
};
use uuid::Uuid;

fn fixed_instant() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn quote(lines: usize) -> CartQuote {
    let lines: Vec<PricedLine> = (0..lines)
        .map(|i| PricedLine {
            product_id: Uuid::from_u128(i as u128 + 1),
            name: format!("Product {}", i),
            unit_price: 1000,
            quantity: 1,
            line_total: 1000,
        })
        .collect();
    let subtotal = 1000 * lines.len() as i64;
    CartQuote {
        subtotal,
        discount: rust_decimal::Decimal::from(subtotal) * dec!(0.05),
        delivery_fee: 100,
        total: rust_decimal::Decimal::from(subtotal) * dec!(0.95) + dec!(100),
        lines,
        insufficient: Vec::new(),
    }
}

#[test]
fn rendering_the_same_order_twice_is_identical() {
    let store = StoreInfo::default();
    let doc_a = receipt_document(&store, "Jane Wanjiku", "Nairobi", "0712", &quote(3), fixed_instant());
    let doc_b = receipt_document(&store, "Jane Wanjiku", "Nairobi", "0712", &quote(3), fixed_instant());
    assert_eq!(layout::layout(&doc_a), layout::layout(&doc_b));
}

#[test]
fn long_receipts_paginate() {
    let store = StoreInfo::default();
    let doc = receipt_document(&store, "Jane", "Nairobi", "0712", &quote(60), fixed_instant());
    let pages = layout::layout(&doc);
    assert!(pages.len() > 1);
}

#[test]
fn short_receipts_fit_one_page() {
    let store = StoreInfo::default();
    let doc = receipt_document(&store, "Jane", "Nairobi", "0712", &quote(2), fixed_instant());
    assert_eq!(layout::layout(&doc).len(), 1);
}

#[test]
fn receipt_pdf_bytes_are_a_pdf() {
    let store = StoreInfo::default();
    let doc = receipt_document(&store, "Jane", "Nairobi", "0712", &quote(2), fixed_instant());
    let bytes = pdf::render(&doc).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 500);
}

#[test]
fn sales_report_pdf_bytes_are_a_pdf() {
    let store = StoreInfo::default();
    let summary = SalesSummary {
        total_revenue: dec!(9100.00),
        total_orders: 2,
        top_products: vec![TopProduct {
            name: "ProductB".to_string(),
            quantity_sold: 5,
            revenue: dec!(2500.00),
        }],
    };
    let doc = sales_report_document(&store, &summary, fixed_instant());
    let bytes = pdf::render(&doc).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn overlong_product_names_are_cut_in_the_table() {
    let store = StoreInfo::default();
    let mut long_quote = quote(1);
    long_quote.lines[0].name =
        "Ultra HD Curved Widescreen Professional Display 32 Inch".to_string();
    let doc = receipt_document(&store, "Jane", "Nairobi", "0712", &long_quote, fixed_instant());

    let pages = layout::layout(&doc);
    let has_full_name = pages.iter().any(|page| {
        page.ops.iter().any(|op| match op {
            layout::DrawOp::Text { text, .. } => text == &long_quote.lines[0].name,
            _ => false,
        })
    });
    assert!(!has_full_name, "table cells must truncate to the column width");

    let truncated: String = long_quote.lines[0].name.chars().take(30).collect();
    let has_truncated = pages.iter().any(|page| {
        page.ops.iter().any(|op| match op {
            layout::DrawOp::Text { text, .. } => text == &truncated,
            _ => false,
        })
    });
    assert!(has_truncated);
}
