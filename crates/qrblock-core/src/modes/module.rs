//! Encodes a link to a course module.

use tracing::debug;

use crate::course::{CourseSnapshot, ModuleRecords};
use crate::payload::DisplayPayload;
use crate::strings::{StringSource, PLUGIN_COMPONENT};
use crate::urls::UrlBuilder;

/// Input for an internal-content reference to a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseModule {
    /// Target module id.
    pub module_id: i64,
    /// Whether the viewer has edit rights in the course.
    pub can_edit: bool,
}

impl CourseModule {
    /// Resolves the module, short-circuiting to "not available" when it is
    /// missing from the snapshot, missing from the record store, being
    /// deleted, or hidden from a viewer without edit rights.
    #[must_use]
    pub fn build(
        &self,
        snapshot: Option<&CourseSnapshot>,
        records: &dyn ModuleRecords,
        urls: &UrlBuilder,
        strings: &dyn StringSource,
    ) -> DisplayPayload {
        let cmid = self.module_id;
        let unavailable = || {
            DisplayPayload::unavailable(
                strings.get_string("errormodulenotavailable", PLUGIN_COMPONENT),
            )
        };

        let Some(snapshot) = snapshot else {
            debug!(cmid, "course not found");
            return unavailable();
        };
        let Some(module) = snapshot.module(cmid) else {
            debug!(cmid, course_id = snapshot.course_id, "module not in course snapshot");
            return unavailable();
        };
        if !records.module_exists(cmid) {
            debug!(cmid, "module record missing, snapshot is stale");
            return unavailable();
        }
        if module.deletion_in_progress {
            debug!(cmid, "module deletion in progress");
            return unavailable();
        }
        if !module.visible_to_user && !self.can_edit {
            debug!(cmid, "module hidden from viewer");
            return unavailable();
        }

        let url = module
            .url
            .as_deref()
            .and_then(|own| urls.absolute(own))
            .unwrap_or_else(|| {
                let mut url = urls.course_view(snapshot.course_id);
                url.set_fragment(Some(&format!("module-{cmid}")));
                url
            });

        DisplayPayload::link(Some(module.name.clone()), url.as_str())
    }
}
