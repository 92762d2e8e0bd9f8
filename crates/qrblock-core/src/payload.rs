//! The record every mode builder produces.
//!
//! Fields are private so the link invariant holds by construction: a
//! [`DisplayPayload`] only carries a `qr_link` when `has_link` is set, and
//! `qr_content` is always a string (empty means "nothing to encode").

use serde::Serialize;

/// Normalized display data for one block render.
///
/// Serialized names are the template contract (`qrurl`, `qrcodecontent`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayPayload {
    description: Option<String>,
    #[serde(rename = "qrurl")]
    has_link: bool,
    #[serde(rename = "qrcodecontent")]
    qr_content: String,
    #[serde(rename = "qrcodelink")]
    qr_link: Option<String>,
    #[serde(flatten)]
    details: Option<ModeDetails>,
}

impl DisplayPayload {
    /// A navigable payload: the link is both encoded and offered as a link.
    #[must_use]
    pub fn link(description: Option<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            description,
            has_link: true,
            qr_content: url.clone(),
            qr_link: Some(url),
            details: None,
        }
    }

    /// A payload whose content is encoded but not offered as a link.
    #[must_use]
    pub fn content(description: Option<String>, content: impl Into<String>) -> Self {
        Self {
            description,
            has_link: false,
            qr_content: content.into(),
            qr_link: None,
            details: None,
        }
    }

    /// Encoded content plus a separate navigable link.
    #[must_use]
    pub fn content_with_link(
        description: Option<String>,
        content: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            description,
            has_link: true,
            qr_content: content.into(),
            qr_link: Some(link.into()),
            details: None,
        }
    }

    /// The referenced entity cannot be shown; only the message is displayed.
    #[must_use]
    pub fn unavailable(description: impl Into<String>) -> Self {
        Self::content(Some(description.into()), String::new())
    }

    /// Attaches mode-specific display fields.
    #[must_use]
    pub fn with_details(mut self, details: ModeDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Text shown with the code.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the payload offers a navigable link.
    #[must_use]
    pub const fn has_link(&self) -> bool {
        self.has_link
    }

    /// Literal data to encode.
    #[must_use]
    pub fn qr_content(&self) -> &str {
        &self.qr_content
    }

    /// Navigable URL, present only when [`Self::has_link`] is true.
    #[must_use]
    pub fn qr_link(&self) -> Option<&str> {
        self.qr_link.as_deref()
    }

    /// Mode-specific display fields.
    #[must_use]
    pub const fn details(&self) -> Option<&ModeDetails> {
        self.details.as_ref()
    }

    /// Whether this is an "unavailable" payload (nothing to encode).
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.qr_content.is_empty() && !self.has_link
    }
}

/// Extra fields some modes expose for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ModeDetails {
    /// Calendar event summary, location and human-readable range.
    Calendar(CalendarDetails),
    /// Human-readable coordinates.
    Geolocation(GeoDetails),
    /// Wi-Fi network fields.
    Wifi(WifiDetails),
}

/// Calendar event display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDetails {
    /// Summary, `None` when empty.
    #[serde(rename = "calendarsummary")]
    pub summary: Option<String>,
    /// Location, `None` when empty.
    #[serde(rename = "calendarlocation")]
    pub location: Option<String>,
    /// Start label, including the trailing separator when an end label follows.
    #[serde(rename = "calendarstart")]
    pub start: String,
    /// End label, empty for single-day all-day events.
    #[serde(rename = "calendarend")]
    pub end: String,
}

/// Geolocation display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoDetails {
    /// `"<lat>, <lng>"`.
    #[serde(rename = "geocoordinates")]
    pub coordinates: String,
}

/// Wi-Fi display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiDetails {
    /// Network name.
    #[serde(rename = "wifissid")]
    pub ssid: String,
    /// Passkey.
    #[serde(rename = "wifipasskey")]
    pub passkey: String,
    /// Authentication type.
    #[serde(rename = "wifiauthentication")]
    pub authentication: String,
}
