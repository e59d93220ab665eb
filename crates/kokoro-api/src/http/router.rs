//! Axum router configuration with middleware.
//!
//! All routes are under `/api/`.
//! Middleware: session assignment, CORS, tracing.
//!
//! In production mode the built single-page app is served from
//! `server.web_dir`. API routes take priority; unknown paths fall through to
//! the app's `index.html` for client-side routing. If the directory does not
//! exist, only the API is served.

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use kokoro_types::config::ServerConfig;

use crate::http::extractors::session::assign_session;
use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let server = state.config.server.clone();

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        // Accounts
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        // Personas
        .route("/personas", get(handlers::persona::list_personas))
        // Chat
        .route("/chat", post(handlers::chat::send_message))
        .route("/chat/clear", post(handlers::chat::clear_history))
        .route("/chat/history", get(handlers::chat::get_history));

    let mut router = Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(state.clone(), assign_session))
        .layer(cors_layer(&server))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if server.production {
        if std::path::Path::new(&server.web_dir).exists() {
            let index_path = format!("{}/index.html", server.web_dir);
            let serve_dir = ServeDir::new(&server.web_dir).fallback(ServeFile::new(index_path));
            router = router.fallback_service(serve_dir);
            tracing::info!(path = %server.web_dir, "SPA static file serving enabled");
        } else {
            tracing::warn!(path = %server.web_dir, "web directory not found, serving API only");
        }
    }

    router
}

/// Credentialed CORS restricted to the configured origins.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
