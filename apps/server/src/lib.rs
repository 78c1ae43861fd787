//! # Lylas POS HTTP API
//!
//! Thin axum layer over `lylas-db`. Handlers deserialize a typed DTO,
//! validate through `lylas-core`, call one repository method, and map
//! the result to JSON.
//!
//! ## Route Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /health                        liveness + store reachability   │
//! │                                                                         │
//! │  POST   /api/login                     employee login                  │
//! │  GET    /api/employees                 employee list                   │
//! │  GET    /api/employees/{id}            employee lookup                 │
//! │                                                                         │
//! │  GET    /api/categories                category lookup                 │
//! │  GET    /api/products                  product list (with categories)  │
//! │  POST   /api/products                  create product                  │
//! │  PUT    /api/products/{id}             update product                  │
//! │  DELETE /api/products/{id}             delete product                  │
//! │                                                                         │
//! │  GET    /api/stock                     all batches                     │
//! │  GET    /api/stock/available           sellable batches (expiry order) │
//! │  POST   /api/stock                     receive a lot                   │
//! │  PUT    /api/stock/{id}                correct a lot                   │
//! │  DELETE /api/stock/{id}                remove a lot                    │
//! │                                                                         │
//! │  GET    /api/stock-issues              issuance list                   │
//! │  POST   /api/stock-issues              issue stock out (atomic)        │
//! │  DELETE /api/stock-issues/{id}         reverse an issuance (atomic)    │
//! │                                                                         │
//! │  GET    /api/events                    events with schedules           │
//! │  GET    /api/event-types               event type lookup               │
//! │  POST   /api/events                    create event + schedule         │
//! │  DELETE /api/events/{id}               delete event + schedule         │
//! │                                                                         │
//! │  GET    /api/transactions              sales, newest first             │
//! │  GET    /api/transactions/{id}         one sale                        │
//! │  GET    /api/transactions/{id}/lines   its order lines                 │
//! │  POST   /api/checkout                  atomic checkout                 │
//! │  DELETE /api/transactions/{id}         atomic reversal                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use lylas_db::Database;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use extract::ApiJson;

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

/// Builds the application router.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/health", get(routes::health::health))
        .route("/api/login", post(routes::employees::login))
        .route("/api/employees", get(routes::employees::list))
        .route("/api/employees/{id}", get(routes::employees::get_employee))
        .route("/api/categories", get(routes::products::list_categories))
        .route(
            "/api/products",
            get(routes::products::list).post(routes::products::create),
        )
        .route(
            "/api/products/{id}",
            put(routes::products::update).delete(routes::products::remove),
        )
        .route(
            "/api/stock",
            get(routes::stock::list).post(routes::stock::create),
        )
        .route("/api/stock/available", get(routes::stock::list_available))
        .route(
            "/api/stock/{id}",
            put(routes::stock::update).delete(routes::stock::remove),
        )
        .route(
            "/api/stock-issues",
            get(routes::issues::list).post(routes::issues::create),
        )
        .route("/api/stock-issues/{id}", delete(routes::issues::remove))
        .route(
            "/api/events",
            get(routes::events::list).post(routes::events::create),
        )
        .route("/api/events/{id}", delete(routes::events::remove))
        .route("/api/event-types", get(routes::events::list_event_types))
        .route("/api/transactions", get(routes::transactions::list))
        .route(
            "/api/transactions/{id}",
            get(routes::transactions::get_transaction).delete(routes::transactions::reverse),
        )
        .route(
            "/api/transactions/{id}/lines",
            get(routes::transactions::lines),
        )
        .route("/api/checkout", post(routes::checkout::checkout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
