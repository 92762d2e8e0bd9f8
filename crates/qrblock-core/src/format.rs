//! Course-format strategies for section links.
//!
//! Each course format decides how a section is linked. Strategies are plain
//! functions keyed by format identifier; formats without an entry use the
//! default course-page anchor link.

use std::collections::HashMap;

use url::Url;

use crate::course::SectionInfo;
use crate::urls::UrlBuilder;

/// Builds a navigable URL for a section.
pub type SectionUrlFn = fn(&UrlBuilder, &SectionInfo) -> Url;

/// Format identifier of the tiled layout, which has its own section page.
pub const TILES_FORMAT: &str = "tiles";

/// Registry of section URL strategies keyed by format identifier.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    strategies: HashMap<String, SectionUrlFn>,
    fallback: SectionUrlFn,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRegistry {
    /// Registry with the default strategy and the tiled-layout override.
    #[must_use]
    pub fn new() -> Self {
        Self::empty().register(TILES_FORMAT, section_page_url)
    }

    /// Registry with only the default strategy.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
            fallback: course_view_section_url,
        }
    }

    /// Adds or replaces the strategy for a format.
    #[must_use]
    pub fn register(mut self, format: impl Into<String>, strategy: SectionUrlFn) -> Self {
        self.strategies.insert(format.into(), strategy);
        self
    }

    /// Whether a format has a dedicated strategy.
    #[must_use]
    pub fn has_override(&self, format: &str) -> bool {
        self.strategies.contains_key(format)
    }

    /// Navigable URL for a section of a course in the given format.
    #[must_use]
    pub fn section_url(&self, format: &str, urls: &UrlBuilder, section: &SectionInfo) -> Url {
        let strategy = self.strategies.get(format).copied().unwrap_or(self.fallback);
        strategy(urls, section)
    }
}

/// Default: the course page, anchored at the section (no anchor for section 0).
#[must_use]
pub fn course_view_section_url(urls: &UrlBuilder, section: &SectionInfo) -> Url {
    let mut url = urls.course_view(section.course_id);
    if section.number > 0 {
        url.set_fragment(Some(&format!("section-{}", section.number)));
    }
    url
}

/// Dedicated single-section page.
#[must_use]
pub fn section_page_url(urls: &UrlBuilder, section: &SectionInfo) -> Url {
    urls.section_page(section.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(number: u32) -> SectionInfo {
        SectionInfo {
            id: 31,
            course_id: 7,
            number,
            name: None,
            visible_to_user: true,
        }
    }

    fn urls() -> UrlBuilder {
        UrlBuilder::new("https://lms.example.org").unwrap()
    }

    #[test]
    fn test_default_strategy_anchors_section() {
        let registry = FormatRegistry::new();
        let url = registry.section_url("topics", &urls(), &section(2));
        assert_eq!(
            url.as_str(),
            "https://lms.example.org/course/view.php?id=7#section-2"
        );
    }

    #[test]
    fn test_default_strategy_general_section_has_no_anchor() {
        let registry = FormatRegistry::new();
        let url = registry.section_url("weeks", &urls(), &section(0));
        assert_eq!(url.as_str(), "https://lms.example.org/course/view.php?id=7");
    }

    #[test]
    fn test_tiles_uses_section_page() {
        let registry = FormatRegistry::new();
        assert!(registry.has_override(TILES_FORMAT));
        let url = registry.section_url(TILES_FORMAT, &urls(), &section(2));
        assert_eq!(url.as_str(), "https://lms.example.org/course/section.php?id=31");
    }

    #[test]
    fn test_register_custom_strategy() {
        fn grid(urls: &UrlBuilder, section: &SectionInfo) -> Url {
            let mut url = urls.course_view(section.course_id);
            url.query_pairs_mut()
                .append_pair("section", &section.number.to_string());
            url
        }

        let registry = FormatRegistry::empty().register("grid", grid);
        assert!(!registry.has_override(TILES_FORMAT));
        let url = registry.section_url("grid", &urls(), &section(3));
        assert_eq!(
            url.as_str(),
            "https://lms.example.org/course/view.php?id=7&section=3"
        );
    }
}
