//! Encodes administrator-supplied free text.

use crate::payload::DisplayPayload;
use crate::urls::is_absolute_url;

/// Input for the free-text mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnContent {
    /// Text to encode, already trimmed.
    pub text: String,
}

impl OwnContent {
    /// Trims surrounding whitespace from the stored value.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self {
            text: raw.trim().to_string(),
        }
    }

    /// Encodes the text verbatim; offers it as a link when it is an absolute URL.
    #[must_use]
    pub fn build(&self) -> DisplayPayload {
        let description = Some(String::new());
        if is_absolute_url(&self.text) {
            DisplayPayload::link(description, self.text.clone())
        } else {
            DisplayPayload::content(description, self.text.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_content_is_link() {
        let payload = OwnContent::new("https://example.com/abc").build();
        assert!(payload.has_link());
        assert_eq!(payload.qr_link(), Some("https://example.com/abc"));
        assert_eq!(payload.description(), Some(""));
    }

    #[test]
    fn test_plain_text_is_not_link() {
        let payload = OwnContent::new("plain text").build();
        assert!(!payload.has_link());
        assert!(payload.qr_link().is_none());
        assert_eq!(payload.qr_content(), "plain text");
    }

    #[test]
    fn test_input_is_trimmed() {
        let payload = OwnContent::new("  https://example.com/abc \n").build();
        assert_eq!(payload.qr_content(), "https://example.com/abc");
        assert!(payload.has_link());
    }

    #[test]
    fn test_empty_content() {
        let payload = OwnContent::new("   ").build();
        assert_eq!(payload.qr_content(), "");
        assert!(!payload.has_link());
    }
}
