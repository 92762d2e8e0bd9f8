//! Per-render request context.
//!
//! Everything the host would otherwise read from global page state (current
//! course, current module, current URL, editing flags) is passed explicitly.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request context derived for a single page render. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
#[schema(example = json!({
    "course_id": 7,
    "module_id": null,
    "section_id": 31,
    "page_url": "https://lms.example.org/course/view.php?id=7",
    "can_edit": false,
    "editing": false
}))]
pub struct RequestContext {
    /// Course the page belongs to.
    pub course_id: Option<i64>,

    /// Course module being viewed, if the page is a module page.
    pub module_id: Option<i64>,

    /// Section being viewed; the module's section on module pages.
    pub section_id: Option<i64>,

    /// URL of the page being rendered (absolute or site-relative).
    pub page_url: String,

    /// Whether the viewer holds the capability to edit the course.
    pub can_edit: bool,

    /// Whether the viewer is currently in page editing mode.
    pub editing: bool,
}

impl RequestContext {
    /// Context for a page outside any course.
    #[must_use]
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            ..Self::default()
        }
    }

    /// Places the page inside a course.
    #[must_use]
    pub const fn in_course(mut self, course_id: i64) -> Self {
        self.course_id = Some(course_id);
        self
    }

    /// Marks the page as a module page; the section follows the module.
    #[must_use]
    pub const fn on_module(mut self, module_id: i64, section_id: i64) -> Self {
        self.module_id = Some(module_id);
        self.section_id = Some(section_id);
        self
    }

    /// Sets the viewer's edit capability.
    #[must_use]
    pub const fn with_edit_rights(mut self, can_edit: bool) -> Self {
        self.can_edit = can_edit;
        self
    }

    /// Sets whether the viewer is editing the page.
    #[must_use]
    pub const fn editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let ctx = RequestContext::new("/mod/page/view.php?id=5")
            .in_course(7)
            .on_module(5, 31)
            .with_edit_rights(true)
            .editing(true);
        assert_eq!(ctx.course_id, Some(7));
        assert_eq!(ctx.module_id, Some(5));
        assert_eq!(ctx.section_id, Some(31));
        assert!(ctx.can_edit && ctx.editing);
    }

    #[test]
    fn test_deserialize_partial() {
        let ctx: RequestContext =
            serde_json::from_str(r#"{"page_url": "/my/courses.php"}"#).unwrap();
        assert_eq!(ctx.page_url, "/my/courses.php");
        assert!(ctx.course_id.is_none());
        assert!(!ctx.can_edit);
    }
}
