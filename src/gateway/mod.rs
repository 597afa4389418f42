//! HTTP Gateway
//!
//! One authenticated operation plus health and docs. The identity
//! middleware resolves bearer tokens to a caller uid; the claim handler
//! validates and hands off to the transactor.

pub mod handlers;
pub mod openapi;
pub mod state;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::middleware::identity_middleware;
use state::AppState;

/// Start the HTTP gateway server
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) {
    let claim_routes = Router::new()
        .route("/offer/claim", post(handlers::claim_offer))
        .layer(from_fn_with_state(state.clone(), identity_middleware));

    let app = Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1", claim_routes);

    // [SECURITY] Mock API routes - only compiled when 'mock-api' feature is
    // enabled. Production builds MUST be compiled with
    // `--no-default-features` to exclude this.
    #[cfg(feature = "mock-api")]
    let app = app.nest(
        "/internal/mock",
        Router::new()
            .route("/offer", post(handlers::mock::put_offer))
            .route("/account", post(handlers::mock::put_account))
            .route("/token", post(handlers::mock::issue_token)),
    );

    let app = app
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()));

    let addr = format!("{}:{}", host, port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to bind to {}: {}", addr, e);
            eprintln!(
                "   Hint: Port {} may already be in use. Check with: lsof -i :{}",
                port, port
            );
            std::process::exit(1);
        }
    };

    println!("🚀 Gateway listening on http://{}", addr);
    println!("📖 API Docs: http://{}/docs", addr);
    #[cfg(feature = "mock-api")]
    println!("🧪 Mock API:  /internal/mock/* (dev builds only)");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ FATAL: Server error: {}", e);
        std::process::exit(1);
    }
}
