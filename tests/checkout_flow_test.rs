mod common;

use assert_matches::assert_matches;
use common::{product_stock, seed_customer, seed_product, TestApp};
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use storefront_api::{
    entities::{Order, OrderStatus, ReportOrder, ReportOrderItem, ReportProduct},
    services::checkout::{CheckoutError, CheckoutRequest},
    sessions::CartKey,
};
use uuid::Uuid;

fn delivery() -> CheckoutRequest {
    CheckoutRequest {
        destination: "Nairobi CBD".to_string(),
        contact_number: "0712000000".to_string(),
    }
}

#[tokio::test]
async fn committed_checkout_creates_orders_and_reduces_stock() {
    // Scenario A: 2 x ProductX at 1000 with 10 in stock.
    let mut app = TestApp::new().await;
    let product_id = seed_product(&app, "ProductX", 1000, 10).await;
    let customer_id = seed_customer(&app, "jane@example.com").await;
    let key = CartKey::Customer(customer_id);

    app.state.services.carts.add(&key, product_id);
    app.state.services.carts.add(&key, product_id);

    let receipt = app
        .state
        .services
        .checkout
        .checkout(&key, Some(customer_id), delivery())
        .await
        .expect("checkout should commit");

    assert_eq!(receipt.quote.subtotal, 2000);
    assert_eq!(receipt.quote.discount, dec!(100.00));
    assert_eq!(receipt.quote.delivery_fee, 100);
    assert_eq!(receipt.quote.total, dec!(2000.00));
    assert!(receipt.pdf.starts_with(b"%PDF"));

    assert_eq!(product_stock(&app, product_id).await, 8);
    assert!(app.state.services.carts.is_empty(&key));

    let orders = Order::find().all(&*app.state.db).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Pending);
    assert_eq!(orders[0].customer_id, customer_id);
    assert_eq!(orders[0].quantity, 2);
    assert_eq!(orders[0].price, 2000);
    assert_eq!(orders[0].address, "Nairobi CBD");

    // The projection runs off the committed event.
    app.project_pending_events().await;

    let report_orders = ReportOrder::find().all(&*app.state.db).await.unwrap();
    assert_eq!(report_orders.len(), 1);
    assert!(report_orders[0].is_completed);
    assert_eq!(report_orders[0].total, dec!(2000.00));

    let items = ReportOrderItem::find().all(&*app.state.db).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].unit_price, 1000);

    let snapshots = ReportProduct::find().all(&*app.state.db).await.unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].name, "ProductX");
    assert_eq!(snapshots[0].stock, 8);
}

#[tokio::test]
async fn insufficient_stock_rejects_before_any_mutation() {
    // Scenario B: 2 x ProductY with only 1 in stock.
    let mut app = TestApp::new().await;
    let product_id = seed_product(&app, "ProductY", 500, 1).await;
    let customer_id = seed_customer(&app, "jane@example.com").await;
    let key = CartKey::Customer(customer_id);

    app.state.services.carts.add(&key, product_id);
    app.state.services.carts.add(&key, product_id);

    let err = app
        .state
        .services
        .checkout
        .checkout(&key, Some(customer_id), delivery())
        .await
        .expect_err("checkout must reject");

    assert_matches!(err, CheckoutError::InsufficientStock { names } if names == vec!["ProductY".to_string()]);

    assert_eq!(product_stock(&app, product_id).await, 1);
    assert!(!app.state.services.carts.is_empty(&key));

    app.project_pending_events().await;
    assert!(Order::find().all(&*app.state.db).await.unwrap().is_empty());
    assert!(ReportOrder::find().all(&*app.state.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let app = TestApp::new().await;
    let customer_id = seed_customer(&app, "jane@example.com").await;
    let key = CartKey::Customer(customer_id);

    let err = app
        .state
        .services
        .checkout
        .checkout(&key, Some(customer_id), delivery())
        .await
        .expect_err("empty cart must reject");
    assert_matches!(err, CheckoutError::EmptyCart);
}

#[tokio::test]
async fn unauthenticated_checkout_is_rejected_without_mutation() {
    let app = TestApp::new().await;
    let product_id = seed_product(&app, "ProductX", 1000, 10).await;
    let key = CartKey::Anonymous("guest".to_string());

    app.state.services.carts.add(&key, product_id);

    let err = app
        .state
        .services
        .checkout
        .checkout(&key, None, delivery())
        .await
        .expect_err("unauthenticated checkout must reject");
    assert_matches!(err, CheckoutError::Unauthenticated);

    assert_eq!(product_stock(&app, product_id).await, 10);
    assert!(!app.state.services.carts.is_empty(&key));
}

#[tokio::test]
async fn unknown_customer_id_is_treated_as_unauthenticated() {
    let app = TestApp::new().await;
    let product_id = seed_product(&app, "ProductX", 1000, 10).await;
    let ghost = Uuid::new_v4();
    let key = CartKey::Customer(ghost);

    app.state.services.carts.add(&key, product_id);

    let err = app
        .state
        .services
        .checkout
        .checkout(&key, Some(ghost), delivery())
        .await
        .expect_err("stale identity must reject");
    assert_matches!(err, CheckoutError::Unauthenticated);
}

#[tokio::test]
async fn missing_delivery_fields_are_rejected() {
    let app = TestApp::new().await;
    let product_id = seed_product(&app, "ProductX", 1000, 10).await;
    let customer_id = seed_customer(&app, "jane@example.com").await;
    let key = CartKey::Customer(customer_id);

    app.state.services.carts.add(&key, product_id);

    let err = app
        .state
        .services
        .checkout
        .checkout(
            &key,
            Some(customer_id),
            CheckoutRequest {
                destination: "   ".to_string(),
                contact_number: "0712000000".to_string(),
            },
        )
        .await
        .expect_err("blank destination must reject");
    assert_matches!(err, CheckoutError::MissingDeliveryInfo);

    assert_eq!(product_stock(&app, product_id).await, 10);
}

#[tokio::test]
async fn dropped_products_are_priced_out_silently() {
    let mut app = TestApp::new().await;
    let product_id = seed_product(&app, "ProductX", 1000, 10).await;
    let customer_id = seed_customer(&app, "jane@example.com").await;
    let key = CartKey::Customer(customer_id);

    app.state.services.carts.add(&key, product_id);
    // A line whose product was deleted from the catalog.
    app.state.services.carts.add(&key, Uuid::new_v4());

    let receipt = app
        .state
        .services
        .checkout
        .checkout(&key, Some(customer_id), delivery())
        .await
        .expect("checkout should commit the surviving line");

    assert_eq!(receipt.quote.lines.len(), 1);
    assert_eq!(receipt.quote.subtotal, 1000);

    app.project_pending_events().await;
    assert_eq!(Order::find().all(&*app.state.db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_checkouts_never_oversell() {
    // Two attempts, each wanting 3 of 5 units: exactly one commits and the
    // shelf ends at 2, never negative.
    let app = TestApp::new().await;
    let product_id = seed_product(&app, "ProductX", 1000, 5).await;
    let first_customer = seed_customer(&app, "first@example.com").await;
    let second_customer = seed_customer(&app, "second@example.com").await;

    let first_key = CartKey::Customer(first_customer);
    let second_key = CartKey::Customer(second_customer);
    for _ in 0..3 {
        app.state.services.carts.add(&first_key, product_id);
        app.state.services.carts.add(&second_key, product_id);
    }

    let first = app
        .state
        .services
        .checkout
        .checkout(&first_key, Some(first_customer), delivery());
    let second = app
        .state
        .services
        .checkout
        .checkout(&second_key, Some(second_customer), delivery());

    let (first, second) = tokio::join!(first, second);

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one attempt must commit");

    let failure = if first.is_err() { first.err() } else { second.err() }.unwrap();
    assert_matches!(
        failure,
        CheckoutError::StockReconciliationFailed { .. } | CheckoutError::InsufficientStock { .. }
    );

    let remaining = product_stock(&app, product_id).await;
    assert_eq!(remaining, 2);
}
