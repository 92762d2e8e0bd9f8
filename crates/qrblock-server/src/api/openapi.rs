//! OpenAPI specification generation for the qrblock API.
//!
//! The document is served at `/api/openapi.json`, backs the Swagger UI, and is
//! written to the workspace root by the `gen-openapi` binary.

use axum::Json;
use qrblock_core::{BlockConfiguration, HealthResponse, RequestContext};
use utoipa::OpenApi;

use super::blocks::{
    BlockContentResponse, BlockRequest, RenderResponse, ValidateResponse, ValidationIssue,
};
use super::catalog::ReloadResponse;
use super::error::ErrorResponse;

/// Serve the OpenAPI specification as JSON.
///
/// This endpoint is available at `/api/openapi.json`.
pub async fn get_openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Returns the OpenAPI specification as a pretty-printed string.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
pub fn get_openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

/// Main OpenAPI document structure for qrblock.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "qrblock API",
        version = "0.1.0",
        description = r#"
# qrblock API

Resolves QR code block configurations into the data a course page template renders.

## Overview

A block instance stores one display mode:

1. **currenturl / courseurl**: link to the current page or the course page
2. **internalcontent**: link to a course module (`cmid=<id>`) or section (`section=<id>`)
3. **owncontent**: free text, linked when it is an absolute URL
4. **event / geolocation / wifi**: calendar entry, map position or network credentials

Blocks that cannot be shown answer `available: false` instead of an error.
"#,
        license(name = "GPL-3.0-or-later", url = "https://www.gnu.org/licenses/gpl-3.0.html")
    ),
    servers(
        (url = "/", description = "Local qrblock server")
    ),
    tags(
        (
            name = "system",
            description = "Health checks"
        ),
        (
            name = "blocks",
            description = "Block resolution, rendering and configuration validation"
        ),
        (
            name = "catalog",
            description = "Course catalog management"
        )
    ),
    paths(
        // Health endpoints
        super::health::health_check,
        // Block endpoints
        super::blocks::block_content,
        super::blocks::render_block,
        super::blocks::validate_config,
        // Catalog endpoints
        super::catalog::reload_catalog,
    ),
    components(
        schemas(
            // Error types
            ErrorResponse,
            // Health types
            HealthResponse,
            // Block types
            BlockConfiguration,
            RequestContext,
            BlockRequest,
            BlockContentResponse,
            RenderResponse,
            ValidationIssue,
            ValidateResponse,
            // Catalog types
            ReloadResponse,
        )
    )
)]
pub struct ApiDoc;
