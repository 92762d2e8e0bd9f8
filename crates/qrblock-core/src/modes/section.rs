//! Encodes a link to a course section.

use tracing::debug;

use crate::course::CourseSnapshot;
use crate::format::FormatRegistry;
use crate::payload::DisplayPayload;
use crate::strings::{StringSource, CORE_COMPONENT, PLUGIN_COMPONENT};
use crate::urls::UrlBuilder;

/// Input for an internal-content reference to a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseSection {
    /// Target section id.
    pub section_id: i64,
    /// Whether the viewer has edit rights in the course.
    pub can_edit: bool,
}

impl CourseSection {
    /// Resolves the section and links it the way its course format does.
    #[must_use]
    pub fn build(
        &self,
        snapshot: Option<&CourseSnapshot>,
        formats: &FormatRegistry,
        urls: &UrlBuilder,
        strings: &dyn StringSource,
    ) -> DisplayPayload {
        let section_id = self.section_id;
        let unavailable = || {
            DisplayPayload::unavailable(
                strings.get_string("errorsectionnotavailable", PLUGIN_COMPONENT),
            )
        };

        let Some((snapshot, section)) =
            snapshot.and_then(|s| s.section(section_id).map(|section| (s, section)))
        else {
            debug!(section_id, "section not found");
            return unavailable();
        };
        if !section.visible_to_user && !self.can_edit {
            debug!(section_id, "section hidden from viewer");
            return unavailable();
        }

        let description = match section.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ if section.number == 0 => strings.get_string("general", CORE_COMPONENT),
            _ => format!(
                "{} {}",
                strings.get_string("section", CORE_COMPONENT),
                section.number
            ),
        };

        let url = formats.section_url(&snapshot.format, urls, section);
        DisplayPayload::link(Some(description), url.as_str())
    }
}
