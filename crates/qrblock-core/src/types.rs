//! Shared API types.
//!
//! Request and response bodies that belong to a single endpoint live with the
//! server handlers; this module holds the ones both crates need.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    #[schema(example = "ok")]
    pub status: String,

    /// Service version.
    #[schema(example = "0.1.0")]
    pub version: String,

    /// Number of courses in the loaded catalog.
    #[schema(example = 12)]
    pub courses: usize,
}

impl HealthResponse {
    /// Healthy response for this build.
    #[must_use]
    pub fn ok(courses: usize) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            courses,
        }
    }
}
