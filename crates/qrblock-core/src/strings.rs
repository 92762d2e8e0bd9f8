//! Localized strings.
//!
//! Strings are looked up by `(id, component)`, mirroring the host's string
//! manager. [`EnglishStrings`] carries the block's own strings, the two core
//! strings it borrows, and the date patterns from `langconfig`.

use std::collections::HashMap;

/// Component holding the block's own strings.
pub const PLUGIN_COMPONENT: &str = "block_qr";

/// Component holding core strings.
pub const CORE_COMPONENT: &str = "moodle";

/// Component holding locale date/time patterns.
pub const LANGCONFIG_COMPONENT: &str = "langconfig";

/// Localization service.
pub trait StringSource {
    /// Localized string for `id` in `component`.
    fn get_string(&self, id: &str, component: &str) -> String;
}

const ENGLISH: &[(&str, &str, &str)] = &[
    (PLUGIN_COMPONENT, "pluginname", "QR code"),
    (PLUGIN_COMPONENT, "thisurl", "This URL"),
    (PLUGIN_COMPONENT, "errormodulenotavailable", "This activity is not available."),
    (PLUGIN_COMPONENT, "errorsectionnotavailable", "This section is not available."),
    (PLUGIN_COMPONENT, "geolocation", "Geolocation"),
    (PLUGIN_COMPONENT, "wifi", "Wi-Fi"),
    (PLUGIN_COMPONENT, "fullscreen", "Show in full screen"),
    (PLUGIN_COMPONENT, "download", "Download"),
    (CORE_COMPONENT, "general", "General"),
    (CORE_COMPONENT, "section", "Section"),
    (LANGCONFIG_COMPONENT, "strftimedate", "%d %B %Y"),
    (LANGCONFIG_COMPONENT, "strftimedatetime", "%d %B %Y, %I:%M %p"),
    (LANGCONFIG_COMPONENT, "strftimetime", "%I:%M %p"),
];

/// Built-in English strings with optional overrides.
#[derive(Debug, Clone, Default)]
pub struct EnglishStrings {
    overrides: HashMap<(String, String), String>,
}

impl EnglishStrings {
    /// English strings without overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces (or adds) a single string.
    #[must_use]
    pub fn with_override(
        mut self,
        component: impl Into<String>,
        id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.overrides
            .insert((component.into(), id.into()), value.into());
        self
    }
}

impl StringSource for EnglishStrings {
    fn get_string(&self, id: &str, component: &str) -> String {
        if let Some(value) = self.overrides.get(&(component.to_string(), id.to_string())) {
            return value.clone();
        }
        ENGLISH
            .iter()
            .find(|(c, i, _)| *c == component && *i == id)
            .map_or_else(
                || {
                    tracing::warn!(id, component, "missing string");
                    format!("[[{id}]]")
                },
                |(_, _, value)| (*value).to_string(),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_and_core_strings() {
        let strings = EnglishStrings::new();
        assert_eq!(strings.get_string("thisurl", PLUGIN_COMPONENT), "This URL");
        assert_eq!(strings.get_string("general", CORE_COMPONENT), "General");
        assert_eq!(strings.get_string("strftimedate", LANGCONFIG_COMPONENT), "%d %B %Y");
    }

    #[test]
    fn test_component_is_part_of_the_key() {
        let strings = EnglishStrings::new();
        assert_eq!(strings.get_string("general", PLUGIN_COMPONENT), "[[general]]");
    }

    #[test]
    fn test_missing_string_marker() {
        let strings = EnglishStrings::new();
        assert_eq!(strings.get_string("nope", PLUGIN_COMPONENT), "[[nope]]");
    }

    #[test]
    fn test_override_wins() {
        let strings = EnglishStrings::new().with_override(CORE_COMPONENT, "section", "Abschnitt");
        assert_eq!(strings.get_string("section", CORE_COMPONENT), "Abschnitt");
        assert_eq!(strings.get_string("general", CORE_COMPONENT), "General");
    }
}
