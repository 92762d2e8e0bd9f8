//! Course metadata as seen by the block.
//!
//! The host owns courses, sections and modules. The block only reads a
//! per-viewer snapshot ([`CourseSnapshot`]) through [`CourseMetadata`] and
//! double-checks module existence through [`ModuleRecords`], since a cached
//! snapshot can outlive a deleted module.

use std::collections::BTreeMap;

/// A course module (activity or resource) as visible to the current viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Module id.
    pub id: i64,
    /// Owning course.
    pub course_id: i64,
    /// Owning section id.
    pub section_id: i64,
    /// Display name.
    pub name: String,
    /// The module's own view URL, if it has one (labels do not).
    pub url: Option<String>,
    /// Whether the current viewer may see the module.
    pub visible_to_user: bool,
    /// Whether an asynchronous delete is pending.
    pub deletion_in_progress: bool,
}

/// A course section as visible to the current viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    /// Section id.
    pub id: i64,
    /// Owning course.
    pub course_id: i64,
    /// Position on the course page; 0 is the general section.
    pub number: u32,
    /// Custom name, if one was set.
    pub name: Option<String>,
    /// Whether the current viewer may see the section.
    pub visible_to_user: bool,
}

/// Point-in-time view of one course for one viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseSnapshot {
    /// Course id.
    pub course_id: i64,
    /// Course format identifier (e.g. `topics`, `tiles`).
    pub format: String,
    modules: BTreeMap<i64, ModuleInfo>,
    sections: BTreeMap<i64, SectionInfo>,
}

impl CourseSnapshot {
    /// Empty snapshot for a course in the given format.
    #[must_use]
    pub fn new(course_id: i64, format: impl Into<String>) -> Self {
        Self {
            course_id,
            format: format.into(),
            modules: BTreeMap::new(),
            sections: BTreeMap::new(),
        }
    }

    /// Adds or replaces a section.
    #[must_use]
    pub fn with_section(mut self, section: SectionInfo) -> Self {
        self.sections.insert(section.id, section);
        self
    }

    /// Adds or replaces a module.
    #[must_use]
    pub fn with_module(mut self, module: ModuleInfo) -> Self {
        self.modules.insert(module.id, module);
        self
    }

    /// Looks up a module by id.
    #[must_use]
    pub fn module(&self, id: i64) -> Option<&ModuleInfo> {
        self.modules.get(&id)
    }

    /// Looks up a section by id.
    #[must_use]
    pub fn section(&self, id: i64) -> Option<&SectionInfo> {
        self.sections.get(&id)
    }

    /// All sections in id order.
    pub fn sections(&self) -> impl Iterator<Item = &SectionInfo> {
        self.sections.values()
    }

    /// All modules in id order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleInfo> {
        self.modules.values()
    }
}

/// Course metadata service.
pub trait CourseMetadata {
    /// Snapshot of the course for the current viewer, `None` if it does not exist.
    fn course_snapshot(&self, course_id: i64) -> Option<CourseSnapshot>;
}

/// Persistent record store, consulted to guard against stale snapshots.
pub trait ModuleRecords {
    /// Whether a module record with this id still exists.
    fn module_exists(&self, module_id: i64) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_lookups() {
        let snapshot = CourseSnapshot::new(7, "topics")
            .with_section(SectionInfo {
                id: 31,
                course_id: 7,
                number: 1,
                name: None,
                visible_to_user: true,
            })
            .with_module(ModuleInfo {
                id: 5,
                course_id: 7,
                section_id: 31,
                name: "Testseite".into(),
                url: None,
                visible_to_user: true,
                deletion_in_progress: false,
            });

        assert_eq!(snapshot.module(5).map(|m| m.name.as_str()), Some("Testseite"));
        assert_eq!(snapshot.section(31).map(|s| s.number), Some(1));
        assert!(snapshot.module(6).is_none());
        assert_eq!(snapshot.sections().count(), 1);
        assert_eq!(snapshot.modules().count(), 1);
    }
}
