//! Course catalog API endpoints.

use std::path::Path;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use qrblock_core::FileCatalog;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::state::SharedState;

/// Creates the catalog router.
pub fn router() -> Router<SharedState> {
    Router::new().route("/reload", post(reload_catalog))
}

/// Catalog reload result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "courses": 12,
    "path": "/var/lib/qrblock/catalog.json"
}))]
pub struct ReloadResponse {
    /// Number of courses after the reload.
    #[schema(example = 12)]
    pub courses: usize,

    /// Backing file, absent for an in-memory catalog.
    #[schema(nullable)]
    pub path: Option<String>,
}

/// Re-read the course catalog file.
#[utoipa::path(
    post,
    path = "/api/catalog/reload",
    tag = "catalog",
    operation_id = "reloadCatalog",
    summary = "Reload course catalog",
    description = "Re-reads the catalog file so course, section and module changes \
        show up without a restart. On failure the previous catalog stays in place.",
    responses(
        (status = 200, description = "Catalog reloaded", body = ReloadResponse),
        (status = 404, description = "Catalog file missing", body = ErrorResponse),
        (status = 422, description = "Catalog file malformed", body = ErrorResponse)
    )
)]
pub async fn reload_catalog(State(state): State<SharedState>) -> ApiResult<Json<ReloadResponse>> {
    let (path, courses) = {
        let state_guard = state.read().await;
        (
            state_guard.catalog.path().map(Path::to_path_buf),
            state_guard.catalog.course_count(),
        )
    };
    let Some(path) = path else {
        return Ok(Json(ReloadResponse {
            courses,
            path: None,
        }));
    };

    let source = path.clone();
    let catalog = tokio::task::spawn_blocking(move || FileCatalog::load(source))
        .await
        .map_err(|e| ApiError::InternalError {
            error_code: "catalog_reload_failed".to_string(),
            message: "Catalog reload task failed".to_string(),
            details: Some(e.to_string()),
        })??;

    let courses = catalog.course_count();
    state.write().await.catalog = catalog;

    Ok(Json(ReloadResponse {
        courses,
        path: Some(path.display().to_string()),
    }))
}
