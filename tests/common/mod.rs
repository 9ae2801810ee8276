use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use storefront_api::{
    config::AppConfig,
    db,
    entities::{cart_item, ProductModel},
    events::{self, EventSender},
    handlers::AppServices,
    services::catalog::CreateProductInput,
    stores::{SqlCartStore, SqlCatalogStore, SqlUserStore},
    AppState,
};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness for spinning up an application backed by a private
/// in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: Arc<AppState>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "development".to_string(),
        );
        // A single pooled connection keeps the in-memory database alive
        // for the lifetime of the harness.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(
            Arc::new(SqlCatalogStore::new(db_arc.clone())),
            Arc::new(SqlCartStore::new(db_arc.clone())),
            Arc::new(SqlUserStore::new(db_arc.clone())),
            Arc::new(event_sender.clone()),
        );

        let state = Arc::new(AppState {
            db: Some(db_arc),
            config: cfg,
            event_sender,
            services,
        });

        let router = storefront_api::api_routes()
            .layer(axum::middleware::from_fn(
                storefront_api::request_id::request_id_middleware,
            ))
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    /// Send a request with extra headers.
    #[allow(dead_code)]
    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Seed a catalog product through the service layer.
    #[allow(dead_code)]
    pub async fn seed_product(&self, name: &str, price: Decimal) -> ProductModel {
        self.state
            .services
            .catalog
            .create_product(CreateProductInput {
                name: name.to_string(),
                description: format!("{} seeded for integration tests", name),
                price,
                image: format!("{}.png", name.to_lowercase()),
                stock: 10,
            })
            .await
            .expect("seed product for tests")
    }

    /// Insert a cart row directly, bypassing the add-to-cart existence
    /// check. Simulates a product that vanished after it was added.
    #[allow(dead_code)]
    pub async fn seed_stale_cart_item(&self, user_id: &str, product_id: Uuid, quantity: i32) {
        let db = self
            .state
            .db
            .as_ref()
            .expect("test app runs on the SQL backend");

        cart_item::ActiveModel {
            user_id: Set(user_id.to_string()),
            product_id: Set(product_id),
            quantity: Set(quantity),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await
        .expect("seed stale cart item");
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}
