mod common;

use common::{seed_product, TestApp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use storefront_api::services::carts::CartEntry;
use uuid::Uuid;

#[tokio::test]
async fn quote_prices_lines_in_cart_order() {
    let app = TestApp::new().await;
    let laptop = seed_product(&app, "Laptop", 55000, 4).await;
    let mouse = seed_product(&app, "Mouse", 1200, 20).await;

    let entries = vec![
        CartEntry { product_id: laptop, quantity: 1 },
        CartEntry { product_id: mouse, quantity: 2 },
    ];
    let quote = app.state.services.pricing.quote(&entries).await.unwrap();

    assert!(!quote.is_rejected());
    assert_eq!(quote.lines.len(), 2);
    assert_eq!(quote.lines[0].name, "Laptop");
    assert_eq!(quote.lines[1].line_total, 2400);
    assert_eq!(quote.subtotal, 57400);
    assert_eq!(quote.discount, dec!(2870.00));
    assert_eq!(
        quote.total,
        Decimal::from(57400) - dec!(2870.00) + Decimal::from(100)
    );
}

#[tokio::test]
async fn missing_products_are_dropped_silently() {
    let app = TestApp::new().await;
    let mouse = seed_product(&app, "Mouse", 1200, 20).await;

    let entries = vec![
        CartEntry { product_id: Uuid::new_v4(), quantity: 3 },
        CartEntry { product_id: mouse, quantity: 1 },
    ];
    let quote = app.state.services.pricing.quote(&entries).await.unwrap();

    assert!(!quote.is_rejected());
    assert_eq!(quote.lines.len(), 1);
    assert_eq!(quote.subtotal, 1200);
}

#[tokio::test]
async fn insufficient_lines_are_flagged_and_excluded_from_the_subtotal() {
    let app = TestApp::new().await;
    let scarce = seed_product(&app, "Webcam", 3000, 1).await;
    let plenty = seed_product(&app, "Keyboard", 2500, 50).await;

    let entries = vec![
        CartEntry { product_id: scarce, quantity: 2 },
        CartEntry { product_id: plenty, quantity: 1 },
    ];
    let quote = app.state.services.pricing.quote(&entries).await.unwrap();

    assert!(quote.is_rejected());
    assert_eq!(quote.insufficient, vec!["Webcam".to_string()]);
    assert_eq!(quote.subtotal, 2500, "only the valid line counts");
    assert_eq!(quote.lines.len(), 1);
}

#[tokio::test]
async fn cart_view_ignores_stock_levels() {
    let app = TestApp::new().await;
    let scarce = seed_product(&app, "Webcam", 3000, 1).await;

    let entries = vec![CartEntry { product_id: scarce, quantity: 5 }];
    let view = app.state.services.pricing.view(&entries).await.unwrap();

    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.total_price, 15000);
}

#[tokio::test]
async fn requesting_exactly_the_available_stock_is_sufficient() {
    let app = TestApp::new().await;
    let product = seed_product(&app, "Webcam", 3000, 2).await;

    let entries = vec![CartEntry { product_id: product, quantity: 2 }];
    let quote = app.state.services.pricing.quote(&entries).await.unwrap();
    assert!(!quote.is_rejected());
}
