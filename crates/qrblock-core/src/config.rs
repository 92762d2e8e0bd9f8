//! Block and process configuration.
//!
//! Two kinds of configuration live here:
//!
//! - [`BlockConfiguration`] - the per-instance record an administrator edits in
//!   the block settings form (display mode plus mode-specific fields). It is
//!   stored by the host and is read-only to payload resolution.
//! - [`Settings`] - process-level settings (site base URL, short-link template,
//!   client script location, display timezone, server address). Loaded from
//!   defaults, an optional TOML file and `QRBLOCK__*` environment variables.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use utoipa::ToSchema;

use crate::dispatch::{InternalReference, Mode};

/// Location of the client-side QR renderer, relative to the site root.
pub const DEFAULT_CLIENT_SCRIPT_PATH: &str = "/blocks/qr/js/qrcode.min.js";

/// Default address the HTTP host binds to.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Authentication types accepted by the Wi-Fi QR payload.
pub const WIFI_AUTHENTICATION_TYPES: [&str; 3] = ["WPA", "WEP", "nopass"];

/// Values accepted for the hidden-network flag.
pub const WIFI_HIDDEN_OPTIONS: [&str; 3] = ["", "true", "false"];

/// Link modes accepted for the geolocation display.
pub const GEO_LINK_MODES: [&str; 2] = ["nolink", "osm"];

/// Environment variable prefix for settings overrides.
pub const ENV_PREFIX: &str = "QRBLOCK";

static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{1,3}(\.\d+)?$").expect("valid decimal regex"));

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The layered configuration could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    /// A single field failed validation.
    #[error("{field}: {message}")]
    ValidationError {
        /// Name of the offending field, as stored.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// Several fields failed validation.
    #[error("{} validation errors", .0.len())]
    MultipleValidationErrors(Vec<ConfigError>),
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Flattens validation failures into `(field, message)` pairs.
    ///
    /// Non-validation errors are reported under the field name `"config"`.
    #[must_use]
    pub fn violations(&self) -> Vec<(String, String)> {
        match self {
            Self::ValidationError { field, message } => vec![(field.clone(), message.clone())],
            Self::MultipleValidationErrors(errors) => {
                errors.iter().flat_map(Self::violations).collect()
            }
            other => vec![("config".to_string(), other.to_string())],
        }
    }
}

// =============================================================================
// BLOCK CONFIGURATION
// =============================================================================

/// Per-instance block configuration as stored by the host.
///
/// Field names on the wire match the stored record so existing instances
/// deserialize unchanged. Form data stores numbers as strings, so numeric
/// fields accept either; a value that is not an integer in range reads as
/// unset. Every field is optional; builders apply the same
/// defaults the block always has (`""`, `0`, `"nolink"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
#[schema(example = json!({
    "options": "wifi",
    "wifiauthentication": "WPA",
    "wifissid": "SchoolNet",
    "wifipasskey": "secret",
    "wifissidoptions": "false"
}))]
pub struct BlockConfiguration {
    /// Selected display mode.
    #[serde(rename = "options")]
    #[schema(example = "currenturl")]
    pub mode: Option<String>,

    /// Packed internal content reference (`cmid=<id>` or `section=<id>`).
    #[schema(example = "cmid=42")]
    pub internal: Option<String>,

    /// Description shown under the course URL code.
    #[serde(rename = "courseurldesc")]
    pub course_url_description: Option<String>,

    /// Free-form content to encode.
    #[serde(rename = "owncontent")]
    pub own_content: Option<String>,

    /// Calendar event summary.
    pub event_summary: Option<String>,

    /// Calendar event location.
    pub event_location: Option<String>,

    /// Calendar event start (UTC epoch seconds).
    #[serde(deserialize_with = "lenient_number::deserialize")]
    pub event_start: Option<i64>,

    /// Calendar event end (UTC epoch seconds).
    #[serde(deserialize_with = "lenient_number::deserialize")]
    pub event_end: Option<i64>,

    /// All-day flag (`0` or `1`).
    #[serde(rename = "allday", deserialize_with = "lenient_number::deserialize")]
    pub all_day: Option<u8>,

    /// Latitude as entered.
    #[serde(rename = "geolocation_br")]
    #[schema(example = "48.137")]
    pub latitude: Option<String>,

    /// Longitude as entered.
    #[serde(rename = "geolocation_lng")]
    #[schema(example = "11.575")]
    pub longitude: Option<String>,

    /// Geolocation link mode (`nolink` or `osm`).
    pub link: Option<String>,

    /// Wi-Fi authentication type.
    #[serde(rename = "wifiauthentication")]
    pub wifi_authentication: Option<String>,

    /// Wi-Fi network name.
    #[serde(rename = "wifissid")]
    pub wifi_ssid: Option<String>,

    /// Wi-Fi passkey.
    #[serde(rename = "wifipasskey")]
    pub wifi_passkey: Option<String>,

    /// Hidden-network flag as entered.
    #[serde(rename = "wifissidoptions")]
    pub wifi_hidden: Option<String>,

    /// Display size of the code in pixels.
    #[serde(deserialize_with = "lenient_number::deserialize")]
    pub size: Option<u32>,
}

impl BlockConfiguration {
    /// Configuration given to a freshly added block: show the current URL.
    #[must_use]
    pub fn for_new_instance() -> Self {
        Self {
            mode: Some(Mode::CurrentUrl.as_str().to_string()),
            ..Self::default()
        }
    }

    /// Configuration for a given mode with every other field unset.
    #[must_use]
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            mode: Some(mode.as_str().to_string()),
            ..Self::default()
        }
    }

    /// Validates the configuration the way the settings form does.
    ///
    /// Resolution never requires this; an invalid configuration simply
    /// renders as unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a single failure or
    /// [`ConfigError::MultipleValidationErrors`] when several fields fail.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut errors = Vec::new();

        let mode = match self.mode.as_deref() {
            None | Some("") => {
                errors.push(ConfigError::invalid("options", "a display mode is required"));
                None
            }
            Some(raw) => match raw.parse::<Mode>() {
                Ok(mode) => Some(mode),
                Err(_) => {
                    errors.push(ConfigError::invalid(
                        "options",
                        format!("unknown display mode '{raw}'"),
                    ));
                    None
                }
            },
        };

        match mode {
            Some(Mode::InternalContent) => {
                let internal = self.internal.as_deref().unwrap_or_default();
                if internal.parse::<InternalReference>().is_err() {
                    errors.push(ConfigError::invalid(
                        "internal",
                        "select a course module or section",
                    ));
                }
            }
            Some(Mode::Event) => self.validate_event(&mut errors),
            Some(Mode::Geolocation) => self.validate_geolocation(&mut errors),
            Some(Mode::Wifi) => self.validate_wifi(&mut errors),
            _ => {}
        }

        if self.size == Some(0) {
            errors.push(ConfigError::invalid("size", "size must be positive"));
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ConfigError::MultipleValidationErrors(errors)),
        }
    }

    fn validate_event(&self, errors: &mut Vec<ConfigError>) {
        if let (Some(start), Some(end)) = (self.event_start, self.event_end) {
            if end < start {
                errors.push(ConfigError::invalid(
                    "event_end",
                    "event must not end before it starts",
                ));
            }
        }
        if !matches!(self.all_day, None | Some(0 | 1)) {
            errors.push(ConfigError::invalid("allday", "must be 0 or 1"));
        }
    }

    fn validate_geolocation(&self, errors: &mut Vec<ConfigError>) {
        let checks = [
            ("geolocation_br", self.latitude.as_deref(), 90.0),
            ("geolocation_lng", self.longitude.as_deref(), 180.0),
        ];
        for (field, value, limit) in checks {
            if !is_coordinate(value.unwrap_or_default(), limit) {
                errors.push(ConfigError::invalid(
                    field,
                    format!("expected a decimal number between -{limit} and {limit}"),
                ));
            }
        }
        if let Some(link) = self.link.as_deref() {
            if !GEO_LINK_MODES.contains(&link) {
                errors.push(ConfigError::invalid("link", format!("unknown link mode '{link}'")));
            }
        }
    }

    fn validate_wifi(&self, errors: &mut Vec<ConfigError>) {
        if self.wifi_ssid.as_deref().unwrap_or_default().is_empty() {
            errors.push(ConfigError::invalid("wifissid", "network name is required"));
        }
        let auth = self.wifi_authentication.as_deref().unwrap_or_default();
        if !WIFI_AUTHENTICATION_TYPES.contains(&auth) {
            errors.push(ConfigError::invalid(
                "wifiauthentication",
                format!("expected one of {}", WIFI_AUTHENTICATION_TYPES.join(", ")),
            ));
        }
        let hidden = self.wifi_hidden.as_deref().unwrap_or_default();
        if !WIFI_HIDDEN_OPTIONS.contains(&hidden) {
            errors.push(ConfigError::invalid(
                "wifissidoptions",
                "expected 'true', 'false' or empty",
            ));
        }
    }
}

mod lenient_number {
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Number(i64),
        Text(String),
        Other(IgnoredAny),
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<i64>,
    {
        let value = match Stored::deserialize(deserializer)? {
            Stored::Number(n) => Some(n),
            Stored::Text(text) => text.trim().parse::<i64>().ok(),
            Stored::Other(_) => None,
        };
        Ok(value.and_then(|n| T::try_from(n).ok()))
    }
}

fn is_coordinate(value: &str, limit: f64) -> bool {
    DECIMAL_RE.is_match(value)
        && value
            .parse::<f64>()
            .is_ok_and(|parsed| (-limit..=limit).contains(&parsed))
}

// =============================================================================
// PROCESS SETTINGS
// =============================================================================

/// Process-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Site identity and locale.
    pub site: SiteSettings,
    /// Presentation options shared by every block.
    pub presentation: PresentationConfig,
    /// HTTP host options.
    pub server: ServerSettings,
    /// Course catalog location.
    pub catalog: CatalogSettings,
}

/// Site identity and locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Absolute base URL of the site.
    pub wwwroot: String,
    /// IANA timezone used for human-readable dates.
    pub timezone: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            wwwroot: "http://localhost".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

/// Presentation options shared by every block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Short-link service template; `SHORTLINK` is replaced by the encoded link.
    pub short_link_template: Option<String>,
    /// Path of the client QR renderer below the site root.
    pub client_script_path: String,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            short_link_template: None,
            client_script_path: DEFAULT_CLIENT_SCRIPT_PATH.to_string(),
        }
    }
}

/// HTTP host options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address to bind.
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

/// Course catalog location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Catalog file (`.json` or `.toml`). Falls back to the platform data directory.
    pub path: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from defaults, an optional TOML file and the environment.
    ///
    /// Environment overrides use a double underscore between sections, e.g.
    /// `QRBLOCK__SITE__WWWROOT=https://lms.example.org`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, cannot be parsed, or the
    /// resulting settings fail validation.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        let settings: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        tracing::debug!(
            wwwroot = %settings.site.wwwroot,
            timezone = %settings.site.timezone,
            "settings loaded"
        );
        Ok(settings)
    }

    /// Validates process settings.
    ///
    /// # Errors
    ///
    /// Returns every failing field, like [`BlockConfiguration::validate`].
    pub fn validate(&self) -> ConfigResult<()> {
        let mut errors = Vec::new();

        match Url::parse(&self.site.wwwroot) {
            Ok(url) if url.has_host() && matches!(url.scheme(), "http" | "https") => {}
            _ => errors.push(ConfigError::invalid(
                "site.wwwroot",
                format!("'{}' is not an absolute http(s) URL", self.site.wwwroot),
            )),
        }

        if self.site.timezone.parse::<Tz>().is_err() {
            errors.push(ConfigError::invalid(
                "site.timezone",
                format!("unknown timezone '{}'", self.site.timezone),
            ));
        }

        if !self.presentation.client_script_path.starts_with('/') {
            errors.push(ConfigError::invalid(
                "presentation.client_script_path",
                "must start with '/'",
            ));
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ConfigError::MultipleValidationErrors(errors)),
        }
    }

    /// Display timezone, UTC when the configured name is unknown.
    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.site.timezone.parse().unwrap_or(chrono_tz::UTC)
    }
}

/// Default location of the settings file for this platform.
#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "qrblock")
        .map(|dirs| dirs.config_dir().join("qrblock.toml"))
}
