//! Unified error types for the qrblock core library.
//!
//! [`QrBlockError`] covers the faults a host has to report: a bad site base
//! URL, an unreadable course catalog, or a failed render. A block that cannot
//! be resolved is not a fault; resolution reports that through
//! [`crate::dispatch::ResolveError`] and the block renders nothing.
//!
//! # Example
//!
//! ```rust
//! use qrblock_core::error::{QrBlockError, Result};
//! use std::path::Path;
//!
//! fn require_catalog(path: &Path) -> Result<()> {
//!     if !path.exists() {
//!         return Err(QrBlockError::CatalogNotFound(path.to_path_buf()));
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// The unified error type for all qrblock operations.
#[derive(Debug, Error)]
pub enum QrBlockError {
    // =========================================================================
    // CONFIGURATION ERRORS
    // =========================================================================
    /// The site base URL is not an absolute http(s) URL.
    #[error("Invalid site base URL: '{0}'")]
    InvalidBaseUrl(String),

    // =========================================================================
    // CATALOG ERRORS
    // =========================================================================
    /// The course catalog file was not found.
    #[error("Course catalog not found at: {}", .0.display())]
    CatalogNotFound(PathBuf),

    /// The course catalog file could not be parsed.
    #[error("Failed to parse course catalog: {0}")]
    CatalogParseError(String),

    // =========================================================================
    // RENDERING & I/O ERRORS
    // =========================================================================
    /// The template renderer failed.
    #[error("Template rendering failed: {0}")]
    RenderFailed(String),

    /// A low-level I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A specialized [`Result`] type for qrblock operations.
pub type Result<T> = std::result::Result<T, QrBlockError>;

impl QrBlockError {
    /// Returns an HTTP-appropriate status code for this error.
    #[inline]
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 404 Not Found
            Self::CatalogNotFound(_) => 404,

            // 422 Unprocessable Entity - semantic errors
            Self::InvalidBaseUrl(_) | Self::CatalogParseError(_) => 422,

            // 500 Internal Server Error
            Self::RenderFailed(_) | Self::IoError(_) => 500,
        }
    }

    /// Returns a machine-readable error code for API responses.
    #[inline]
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidBaseUrl(_) => "INVALID_BASE_URL",
            Self::CatalogNotFound(_) => "CATALOG_NOT_FOUND",
            Self::CatalogParseError(_) => "CATALOG_PARSE_ERROR",
            Self::RenderFailed(_) => "RENDER_FAILED",
            Self::IoError(_) => "IO_ERROR",
        }
    }
}

// =============================================================================
// CONVERSIONS FROM CATALOG ERRORS
// =============================================================================

impl From<crate::storage::StorageError> for QrBlockError {
    fn from(err: crate::storage::StorageError) -> Self {
        use crate::storage::StorageError;
        match err {
            StorageError::NotFound(path) => Self::CatalogNotFound(path),
            StorageError::ReadError { source, .. } => Self::IoError(source),
            StorageError::JsonError { path, source } => {
                Self::CatalogParseError(format!("{}: {source}", path.display()))
            }
            StorageError::TomlError { path, source } => {
                Self::CatalogParseError(format!("{}: {source}", path.display()))
            }
            StorageError::UnsupportedFormat(path) => Self::CatalogParseError(format!(
                "{}: expected a .json or .toml file",
                path.display()
            )),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
