//! # qrblock-core
//!
//! Payload logic for the QR code block of a learning management system.
//!
//! A block instance stores a [`BlockConfiguration`] naming one display mode.
//! On every page render the block resolves that configuration against the
//! [`RequestContext`] into a [`DisplayPayload`] (what to encode, what to show
//! under the code) and assembles it into the record the block template
//! consumes.
//!
//! ## Architecture
//!
//! - [`config`] - block instance configuration and process settings
//! - [`context`] - the page a block is rendered on
//! - [`course`] - course metadata and record store collaborators
//! - [`dispatch`] - mode selection and resolution
//! - [`modes`] - one payload builder per display mode
//! - [`assembler`] - presentation fields and template rendering
//! - [`storage`] - file-backed course catalog
//! - [`format`], [`strings`], [`urls`] - section links, localization, site URLs
//! - [`error`] - unified error types for the crate
//!
//! ## Example
//!
//! ```rust
//! use qrblock_core::{
//!     resolve, BlockConfiguration, Collaborators, EnglishStrings, FileCatalog,
//!     FormatRegistry, RequestContext, UrlBuilder,
//! };
//!
//! let catalog = FileCatalog::empty();
//! let formats = FormatRegistry::new();
//! let strings = EnglishStrings::new();
//! let urls = UrlBuilder::new("https://lms.example.org").unwrap();
//! let env = Collaborators {
//!     courses: &catalog,
//!     records: &catalog,
//!     formats: &formats,
//!     strings: &strings,
//!     urls: &urls,
//!     timezone: chrono_tz::UTC,
//! };
//!
//! let ctx = RequestContext::new("/my/courses.php");
//! let payload = resolve(&BlockConfiguration::for_new_instance(), &ctx, &env).unwrap();
//! assert_eq!(payload.qr_link(), Some("https://lms.example.org/my/courses.php"));
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod assembler;
pub mod config;
pub mod context;
pub mod course;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod modes;
pub mod payload;
pub mod storage;
pub mod strings;
pub mod types;
pub mod urls;

#[cfg(test)]
mod testing;

// Re-export primary types for convenience
pub use assembler::{
    assemble, short_link, BlockView, JsonRenderer, PresentationSettings, QrBlock, TemplateData,
    TemplateRenderer, SHORTLINK_TOKEN, TEMPLATE_NAME,
};
pub use config::{
    default_settings_path, BlockConfiguration, ConfigError, ConfigResult, PresentationConfig,
    Settings,
};
pub use context::RequestContext;
pub use course::{CourseMetadata, CourseSnapshot, ModuleInfo, ModuleRecords, SectionInfo};
pub use dispatch::{
    resolve, select, Collaborators, InternalReference, Mode, ModeRequest, ResolveError,
};
pub use error::{QrBlockError, Result};
pub use format::{FormatRegistry, SectionUrlFn, TILES_FORMAT};
pub use payload::{CalendarDetails, DisplayPayload, GeoDetails, ModeDetails, WifiDetails};
pub use storage::{default_catalog_path, FileCatalog, StorageError, StorageResult};
pub use strings::{EnglishStrings, StringSource};
pub use types::HealthResponse;
pub use urls::{is_absolute_url, UrlBuilder};
