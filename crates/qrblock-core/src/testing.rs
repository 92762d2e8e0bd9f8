//! Shared fixtures for unit tests.

use std::collections::HashSet;

use crate::course::{CourseMetadata, CourseSnapshot, ModuleInfo, ModuleRecords, SectionInfo};

pub const COURSE_ID: i64 = 7;

pub const GENERAL_SECTION: i64 = 30;
pub const NAMED_SECTION: i64 = 31;
pub const UNNAMED_SECTION: i64 = 32;
pub const HIDDEN_SECTION: i64 = 33;

pub const PAGE_MODULE: i64 = 5;
pub const LABEL_MODULE: i64 = 6;
pub const HIDDEN_MODULE: i64 = 8;

fn section(id: i64, number: u32, name: Option<&str>, visible: bool) -> SectionInfo {
    SectionInfo {
        id,
        course_id: COURSE_ID,
        number,
        name: name.map(str::to_string),
        visible_to_user: visible,
    }
}

fn module(id: i64, section_id: i64, name: &str, url: Option<&str>, visible: bool) -> ModuleInfo {
    ModuleInfo {
        id,
        course_id: COURSE_ID,
        section_id,
        name: name.to_string(),
        url: url.map(str::to_string),
        visible_to_user: visible,
        deletion_in_progress: false,
    }
}

/// A topics-format course with a page, a label and a hidden quiz.
pub fn fixture_snapshot() -> CourseSnapshot {
    CourseSnapshot::new(COURSE_ID, "topics")
        .with_section(section(GENERAL_SECTION, 0, None, true))
        .with_section(section(NAMED_SECTION, 1, Some("Testabschnitt 1"), true))
        .with_section(section(UNNAMED_SECTION, 2, Some(""), true))
        .with_section(section(HIDDEN_SECTION, 3, None, false))
        .with_module(module(
            PAGE_MODULE,
            NAMED_SECTION,
            "Testseite",
            Some("/mod/page/view.php?id=5"),
            true,
        ))
        .with_module(module(LABEL_MODULE, GENERAL_SECTION, "Welcome", None, true))
        .with_module(module(
            HIDDEN_MODULE,
            UNNAMED_SECTION,
            "Hidden quiz",
            Some("/mod/quiz/view.php?id=8"),
            false,
        ))
}

/// Record store that knows every module except the listed ones.
pub struct Records {
    missing: HashSet<i64>,
}

impl Records {
    pub fn all() -> Self {
        Self {
            missing: HashSet::new(),
        }
    }

    pub fn without(ids: &[i64]) -> Self {
        Self {
            missing: ids.iter().copied().collect(),
        }
    }
}

impl ModuleRecords for Records {
    fn module_exists(&self, module_id: i64) -> bool {
        !self.missing.contains(&module_id)
    }
}

/// Course metadata serving [`fixture_snapshot`] for [`COURSE_ID`].
pub struct Courses;

impl CourseMetadata for Courses {
    fn course_snapshot(&self, course_id: i64) -> Option<CourseSnapshot> {
        (course_id == COURSE_ID).then(fixture_snapshot)
    }
}
