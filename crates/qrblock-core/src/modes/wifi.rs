//! Encodes Wi-Fi credentials.
//!
//! Field values are inserted as-is. `;`, `,`, `:` and `\` are not escaped, so
//! an SSID or passkey containing them produces a payload scanners may misread.

use crate::payload::{DisplayPayload, ModeDetails, WifiDetails};
use crate::strings::{StringSource, PLUGIN_COMPONENT};

/// Input for the Wi-Fi mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiNetwork {
    /// Authentication type (`WPA`, `WEP`, `nopass`).
    pub authentication: String,
    /// Network name.
    pub ssid: String,
    /// Passkey.
    pub passkey: String,
    /// Hidden-network flag as stored.
    pub hidden: String,
}

impl WifiNetwork {
    /// `WIFI:` payload string.
    #[must_use]
    pub fn payload(&self) -> String {
        format!(
            "WIFI:T:{};S:{};P:{};H:{};",
            self.authentication, self.ssid, self.passkey, self.hidden
        )
    }

    /// Builds the payload.
    #[must_use]
    pub fn build(&self, strings: &dyn StringSource) -> DisplayPayload {
        DisplayPayload::content(Some(strings.get_string("wifi", PLUGIN_COMPONENT)), self.payload())
            .with_details(ModeDetails::Wifi(WifiDetails {
                ssid: self.ssid.clone(),
                passkey: self.passkey.clone(),
                authentication: self.authentication.clone(),
            }))
    }
}
