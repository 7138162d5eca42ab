//! Marketplace service: seller onboarding with KYC moderation, a product
//! catalog, and an order workflow over PostgreSQL and a blob store.

pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::MarketplaceConfig;
use crate::services::{Database, JwtService, OnboardingService, OrderService, Storage};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: MarketplaceConfig,
    pub db: Database,
    pub jwt: JwtService,
    pub storage: Arc<dyn Storage>,
    pub orders: OrderService,
    pub onboarding: OnboardingService,
}

/// Build the HTTP router with all routes, CORS, and request tracing.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/user/:id", get(handlers::auth::get_user))
        .route("/kyc/upload", post(handlers::kyc::upload_document))
        .route("/kyc/user/:user_id", get(handlers::kyc::list_user_documents))
        .route("/kyc/pending", get(handlers::kyc::list_pending_documents))
        .route("/kyc/verify", post(handlers::kyc::verify_document))
        .route(
            "/categories",
            get(handlers::categories::list).post(handlers::categories::create),
        )
        .route(
            "/categories/:id",
            get(handlers::categories::get)
                .put(handlers::categories::update)
                .delete(handlers::categories::delete),
        )
        .route(
            "/products",
            get(handlers::products::list).post(handlers::products::create),
        )
        .route("/products/upload-image", post(handlers::products::upload_image))
        .route(
            "/products/:id",
            get(handlers::products::get)
                .put(handlers::products::update)
                .delete(handlers::products::delete),
        )
        .route(
            "/orders",
            get(handlers::orders::list).post(handlers::orders::create),
        )
        .route("/orders/:id", get(handlers::orders::get))
        .route("/orders/:id/status", put(handlers::orders::update_status))
        .route("/admin/sellers", get(handlers::admin::list_sellers))
        .route(
            "/admin/pending-sellers",
            get(handlers::admin::list_pending_sellers),
        )
        .route("/admin/verify-seller", post(handlers::admin::verify_seller))
        .route("/admin/dashboard", get(handlers::admin::dashboard))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &MarketplaceConfig) -> CorsLayer {
    let methods = vec![
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if config.security.allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .security
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(methods)
            .allow_headers(Any)
    }
}
