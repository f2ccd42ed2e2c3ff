//! Storefront checkout transaction engine.
//!
//! The transactional core of a small storefront: session-scoped carts,
//! stock-aware pricing, the atomic commit that turns a cart into orders
//! while reducing inventory, and the sales reporting built from committed
//! sales — with printable receipts and reports.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]

pub mod config;
pub mod db;
pub mod documents;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod services;
pub mod sessions;

use std::sync::Arc;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

use services::{
    carts::CartStore, checkout::CheckoutService, inventory::StockLedger, orders::OrderService,
    pricing::PricingService, reports::SalesReportService,
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: AppServices,
}

/// The service graph shared by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub carts: Arc<CartStore>,
    pub pricing: PricingService,
    pub inventory: StockLedger,
    pub checkout: CheckoutService,
    pub orders: OrderService,
    pub reports: SalesReportService,
}

impl AppServices {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: events::EventSender,
        store: config::StoreInfo,
    ) -> Self {
        let carts = Arc::new(CartStore::new());
        let pricing = PricingService::new(db.clone());
        let inventory = StockLedger::new(db.clone(), event_sender.clone());
        let checkout = CheckoutService::new(
            db.clone(),
            carts.clone(),
            pricing.clone(),
            inventory.clone(),
            event_sender.clone(),
            store,
        );
        let orders = OrderService::new(db.clone(), inventory.clone(), event_sender);
        let reports = SalesReportService::new(db);

        Self {
            carts,
            pricing,
            inventory,
            checkout,
            orders,
            reports,
        }
    }
}

/// Composes the HTTP surface over the shared state.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/cart", handlers::carts::cart_routes())
        .nest("/checkout", handlers::checkout::checkout_routes())
        .nest("/orders", handlers::orders::order_routes())
        .nest("/reports", handlers::reports::report_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
