//! Encodes the page the block is shown on.

use crate::payload::DisplayPayload;
use crate::strings::{StringSource, PLUGIN_COMPONENT};
use crate::urls::UrlBuilder;

/// Input for the current-URL mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUrl {
    /// URL of the page being rendered, as supplied by the caller.
    pub page_url: String,
}

impl CurrentUrl {
    /// Builds the payload: the cleaned absolute page URL, labelled "This URL".
    #[must_use]
    pub fn build(&self, urls: &UrlBuilder, strings: &dyn StringSource) -> DisplayPayload {
        let href = urls.clean_page_url(&self.page_url);
        DisplayPayload::link(Some(strings.get_string("thisurl", PLUGIN_COMPONENT)), href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strings::EnglishStrings;

    #[test]
    fn test_current_url_is_link() {
        let urls = UrlBuilder::new("https://lms.example.org").unwrap();
        let payload = CurrentUrl {
            page_url: "/my/courses.php?sesskey=abc".into(),
        }
        .build(&urls, &EnglishStrings::new());

        assert!(payload.has_link());
        assert_eq!(payload.qr_content(), "https://lms.example.org/my/courses.php");
        assert_eq!(payload.qr_link(), Some(payload.qr_content()));
        assert_eq!(payload.description(), Some("This URL"));
    }
}
