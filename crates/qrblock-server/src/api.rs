//! HTTP API routes and handlers.
//!
//! This module contains all HTTP endpoint implementations organized by domain:
//! - `blocks` - Block resolution, rendering and configuration validation
//! - `catalog` - Course catalog reload
//! - `health` - Service health checks
//! - `error` - API error types
//! - `openapi` - OpenAPI specification generation

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::SharedState;

pub mod blocks;
pub mod catalog;
pub mod error;
pub mod health;
pub mod openapi;

// Re-export commonly used types
pub use error::{ApiError, ApiResult, ErrorResponse};

// Re-export OpenAPI utilities for the gen-openapi binary
pub use openapi::{get_openapi_json, ApiDoc};

/// Creates the combined API router with all endpoints.
///
/// # Route Structure
///
/// ```text
/// /health                - Health check
/// /api
/// ├── /blocks
/// │   ├── /content       - Resolve + assemble (JSON template data)
/// │   ├── /render        - Resolve + assemble + render
/// │   └── /validate      - Settings-form validation
/// ├── /catalog/reload    - Re-read the catalog file
/// └── /openapi.json      - OpenAPI specification
/// /swagger-ui            - Swagger UI
/// ```
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest(
            "/api",
            Router::new()
                // OpenAPI spec at /api/openapi.json
                .route("/openapi.json", get(openapi::get_openapi_spec))
                // Block rendering
                .nest("/blocks", blocks::router())
                // Catalog management
                .nest("/catalog", catalog::router()),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
