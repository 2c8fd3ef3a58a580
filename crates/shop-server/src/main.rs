//! Storefront Checkout Server
//!
//! Axum-based HTTP API that validates and re-prices carts against the
//! server-side catalog before delegating payment to Stripe.

mod config;
mod handlers;
mod rate_limit;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shop_core::Catalog;
use shop_payments::StripeClient;

use crate::config::Config;
use crate::handlers::{
    checkout_session_status, confirm_payment, create_checkout, create_payment_intent,
    health_check,
};
use crate::rate_limit::RateLimiter;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Required variables gate startup
    let config = Arc::new(Config::from_env()?);

    let stripe = Arc::new(StripeClient::new(&config.stripe_secret_key));
    tracing::info!("✓ Stripe configured");

    let state = AppState {
        catalog: Arc::new(Catalog::default()),
        stripe,
        config: config.clone(),
    };

    // CORS: locked to the frontend origin in production
    let allowed_origin = if config.production {
        config.frontend_url.as_str()
    } else {
        "http://localhost:3000"
    };
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin.parse::<HeaderValue>()?)
        .allow_methods(Any)
        .allow_headers(Any);
    tracing::info!(origin = %allowed_origin, "CORS configured");

    // Two-tier rate limiting: everything, plus a stricter budget for
    // the endpoints that create Stripe objects.
    let global_limiter = Arc::new(RateLimiter::global());
    let checkout_limiter = Arc::new(RateLimiter::checkout());

    let correlation_header = HeaderName::from_static("x-correlation-id");
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let correlation_id = request
            .headers()
            .get("x-correlation-id")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("unknown");
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            correlation_id = %correlation_id,
        )
    });

    let checkout_routes = Router::new()
        .route("/api/checkout", post(create_checkout))
        .route("/api/payment-intent/create", post(create_payment_intent))
        .layer(middleware::from_fn_with_state(
            checkout_limiter,
            rate_limit::enforce,
        ));

    let app = Router::new()
        // Health & return page
        .route("/health", get(health_check))
        .route("/api/checkout/session", get(checkout_session_status))
        .route(
            "/api/payment-intent/confirm/{payment_intent_id}",
            get(confirm_payment),
        )
        // Stripe-creating endpoints, behind the stricter limiter
        .merge(checkout_routes)
        .layer(middleware::from_fn_with_state(
            global_limiter,
            rate_limit::enforce,
        ))
        .layer(cors)
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::new(correlation_header.clone()))
        .layer(SetRequestIdLayer::new(correlation_header, MakeRequestUuid))
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 checkout server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                                  - Health check");
    tracing::info!("  POST /api/checkout                            - Create Checkout Session");
    tracing::info!("  GET  /api/checkout/session?session_id=...     - Session status");
    tracing::info!("  POST /api/payment-intent/create               - Create Payment Intent");
    tracing::info!("  GET  /api/payment-intent/confirm/:id          - Confirm payment");
    tracing::info!("");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
