use std::sync::Arc;

use sea_orm::{ActiveModelTrait, Set};
use storefront_api::{
    config::AppConfig,
    db,
    entities::{category, customer, product},
    events::{self, Event, EventSender},
    AppServices, AppState,
};
use tempfile::TempDir;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Harness for spinning up application state backed by a throwaway SQLite
/// database with the embedded migrator applied. Events are captured on a
/// channel the test drains itself, so the analytics projection runs
/// deterministically.
pub struct TestApp {
    pub state: Arc<AppState>,
    pub events: mpsc::Receiver<Event>,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_dir = tempfile::tempdir().expect("failed to create temp dir");
        let db_path = db_dir.path().join("storefront_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        cfg.db_max_connections = 5;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool).await.expect("failed migrations");
        let db = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let services = AppServices::new(db.clone(), event_sender.clone(), cfg.store.clone());

        let state = Arc::new(AppState {
            db,
            config: cfg,
            event_sender,
            services,
        });

        Self {
            state,
            events: event_rx,
            _db_dir: db_dir,
        }
    }

    /// Applies every pending event to the analytics projection, in order.
    #[allow(dead_code)]
    pub async fn project_pending_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            events::projection::apply(&self.state.db, &event)
                .await
                .expect("failed to apply projection");
        }
    }
}

#[allow(dead_code)]
pub async fn seed_category(app: &TestApp, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    category::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
    }
    .insert(&*app.state.db)
    .await
    .expect("failed to seed category");
    id
}

#[allow(dead_code)]
pub async fn seed_product(app: &TestApp, name: &str, price: i64, stock: i32) -> Uuid {
    let category_id = seed_category(app, &format!("{} category", name)).await;
    let id = Uuid::new_v4();
    product::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        brand: Set(None),
        description: Set(None),
        price: Set(price),
        category_id: Set(category_id),
        quantity: Set(stock),
        image: Set(None),
    }
    .insert(&*app.state.db)
    .await
    .expect("failed to seed product");
    id
}

#[allow(dead_code)]
pub async fn seed_customer(app: &TestApp, email: &str) -> Uuid {
    let id = Uuid::new_v4();
    customer::ActiveModel {
        id: Set(id),
        first_name: Set("Jane".to_string()),
        last_name: Set("Wanjiku".to_string()),
        email: Set(email.to_string()),
        phone: Set("0712000000".to_string()),
        password_hash: Set("argon2-hash-placeholder".to_string()),
    }
    .insert(&*app.state.db)
    .await
    .expect("failed to seed customer");
    id
}

#[allow(dead_code)]
pub async fn product_stock(app: &TestApp, product_id: Uuid) -> i32 {
    use sea_orm::EntityTrait;
    storefront_api::entities::Product::find_by_id(product_id)
        .one(&*app.state.db)
        .await
        .expect("failed to fetch product")
        .expect("product missing")
        .quantity
}
