//! Encodes the course page.

use crate::payload::DisplayPayload;
use crate::urls::UrlBuilder;

/// Input for the course-URL mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseUrl {
    /// Course to link to.
    pub course_id: i64,
    /// Optional administrator-supplied description.
    pub description: Option<String>,
}

impl CourseUrl {
    /// Builds the payload for the canonical course view URL.
    #[must_use]
    pub fn build(&self, urls: &UrlBuilder) -> DisplayPayload {
        let url = urls.course_view(self.course_id);
        DisplayPayload::link(self.description.clone(), url.as_str())
    }
}
