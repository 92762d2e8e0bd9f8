//! File-backed course catalog.
//!
//! A single JSON or TOML file (chosen by extension) lists courses with their
//! sections and modules. [`FileCatalog`] serves course snapshots and the
//! module existence check from it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::course::{CourseMetadata, CourseSnapshot, ModuleInfo, ModuleRecords, SectionInfo};

/// Errors raised while reading the catalog.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The catalog file does not exist.
    #[error("catalog not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The catalog file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadError {
        /// Catalog file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The JSON catalog is malformed.
    #[error("invalid JSON in {}: {source}", path.display())]
    JsonError {
        /// Catalog file.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// The TOML catalog is malformed.
    #[error("invalid TOML in {}: {source}", path.display())]
    TomlError {
        /// Catalog file.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },

    /// The file extension is neither `.json` nor `.toml`.
    #[error("unsupported catalog format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Result alias for catalog operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Top-level catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogDocument {
    /// Every known course.
    pub courses: Vec<CourseRecord>,
}

/// A course as stored in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Course id.
    pub id: i64,
    /// Course format identifier.
    #[serde(default = "default_format")]
    pub format: String,
    /// Sections of the course.
    #[serde(default)]
    pub sections: Vec<SectionRecord>,
    /// Modules of the course.
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
}

/// A section as stored in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRecord {
    /// Section id.
    pub id: i64,
    /// Position in the course, `0` for the general section.
    pub number: u32,
    /// Custom name.
    #[serde(default)]
    pub name: Option<String>,
    /// Visible to students.
    #[serde(default = "default_true")]
    pub visible: bool,
}

/// A module as stored in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Module id.
    pub id: i64,
    /// Owning section id.
    pub section_id: i64,
    /// Display name.
    pub name: String,
    /// Direct URL, absolute or site-relative.
    #[serde(default)]
    pub url: Option<String>,
    /// Visible to students.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Scheduled for asynchronous deletion.
    #[serde(default)]
    pub deletion_in_progress: bool,
    /// Already removed from the record store but still in the snapshot.
    #[serde(default)]
    pub purged: bool,
}

fn default_format() -> String {
    "topics".to_string()
}

const fn default_true() -> bool {
    true
}

impl CourseRecord {
    fn snapshot(&self) -> CourseSnapshot {
        let mut snapshot = CourseSnapshot::new(self.id, self.format.clone());
        for section in &self.sections {
            snapshot = snapshot.with_section(SectionInfo {
                id: section.id,
                course_id: self.id,
                number: section.number,
                name: section.name.clone(),
                visible_to_user: section.visible,
            });
        }
        for module in &self.modules {
            let section_visible = self
                .sections
                .iter()
                .find(|section| section.id == module.section_id)
                .map_or(true, |section| section.visible);
            snapshot = snapshot.with_module(ModuleInfo {
                id: module.id,
                course_id: self.id,
                section_id: module.section_id,
                name: module.name.clone(),
                url: module.url.clone(),
                visible_to_user: module.visible && section_visible,
                deletion_in_progress: module.deletion_in_progress,
            });
        }
        snapshot
    }
}

/// Course catalog read from a file.
#[derive(Debug, Clone, Default)]
pub struct FileCatalog {
    path: Option<PathBuf>,
    courses: BTreeMap<i64, CourseRecord>,
}

impl FileCatalog {
    /// Loads a catalog file.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the file is missing, unreadable, or malformed.
    pub fn load(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let courses = index(read_document(&path)?);
        tracing::info!(path = %path.display(), courses = courses.len(), "catalog loaded");
        Ok(Self {
            path: Some(path),
            courses,
        })
    }

    /// In-memory catalog with no backing file.
    #[must_use]
    pub fn from_courses(courses: Vec<CourseRecord>) -> Self {
        Self {
            path: None,
            courses: index(CatalogDocument { courses }),
        }
    }

    /// Catalog without any course.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of courses in the catalog.
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl CourseMetadata for FileCatalog {
    fn course_snapshot(&self, course_id: i64) -> Option<CourseSnapshot> {
        self.courses.get(&course_id).map(CourseRecord::snapshot)
    }
}

impl ModuleRecords for FileCatalog {
    fn module_exists(&self, module_id: i64) -> bool {
        self.courses
            .values()
            .flat_map(|course| &course.modules)
            .any(|module| module.id == module_id && !module.purged)
    }
}

fn index(document: CatalogDocument) -> BTreeMap<i64, CourseRecord> {
    document
        .courses
        .into_iter()
        .map(|course| (course.id, course))
        .collect()
}

fn read_document(path: &Path) -> StorageResult<CatalogDocument> {
    if !path.exists() {
        return Err(StorageError::NotFound(path.to_path_buf()));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let read = || {
        std::fs::read_to_string(path).map_err(|source| StorageError::ReadError {
            path: path.to_path_buf(),
            source,
        })
    };
    match extension.as_deref() {
        Some("json") => serde_json::from_str(&read()?).map_err(|source| StorageError::JsonError {
            path: path.to_path_buf(),
            source,
        }),
        Some("toml") => toml::from_str(&read()?).map_err(|source| StorageError::TomlError {
            path: path.to_path_buf(),
            source,
        }),
        _ => Err(StorageError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Default catalog location.
///
/// On Linux: `/var/lib/qrblock/catalog.json`
/// Elsewhere: the platform data directory.
#[must_use]
pub fn default_catalog_path() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        Some(PathBuf::from("/var/lib/qrblock/catalog.json"))
    }
    #[cfg(not(target_os = "linux"))]
    {
        directories::ProjectDirs::from("", "", "qrblock")
            .map(|dirs| dirs.data_dir().join("catalog.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const JSON_CATALOG: &str = r#"{
        "courses": [{
            "id": 7,
            "format": "tiles",
            "sections": [
                { "id": 30, "number": 0 },
                { "id": 31, "number": 1, "name": "Woche 1", "visible": false }
            ],
            "modules": [
                { "id": 5, "section_id": 30, "name": "Forum", "url": "/mod/forum/view.php?id=5" },
                { "id": 6, "section_id": 31, "name": "Quiz" },
                { "id": 9, "section_id": 30, "name": "Old page", "purged": true }
            ]
        }]
    }"#;

    const TOML_CATALOG: &str = r#"
        [[courses]]
        id = 3

        [[courses.sections]]
        id = 10
        number = 0

        [[courses.modules]]
        id = 11
        section_id = 10
        name = "Label"
        deletion_in_progress = true
    "#;

    fn write_catalog(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_json_catalog() {
        let file = write_catalog(".json", JSON_CATALOG);
        let catalog = FileCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.course_count(), 1);

        let snapshot = catalog.course_snapshot(7).unwrap();
        assert_eq!(snapshot.format, "tiles");
        assert_eq!(snapshot.section(31).unwrap().name.as_deref(), Some("Woche 1"));
        assert!(snapshot.module(5).unwrap().visible_to_user);
        assert!(catalog.course_snapshot(8).is_none());
    }

    #[test]
    fn test_module_in_hidden_section_is_hidden() {
        let file = write_catalog(".json", JSON_CATALOG);
        let catalog = FileCatalog::load(file.path()).unwrap();
        let snapshot = catalog.course_snapshot(7).unwrap();
        assert!(!snapshot.module(6).unwrap().visible_to_user);
    }

    #[test]
    fn test_purged_module_stays_in_snapshot() {
        let file = write_catalog(".json", JSON_CATALOG);
        let catalog = FileCatalog::load(file.path()).unwrap();
        assert!(catalog.course_snapshot(7).unwrap().module(9).is_some());
        assert!(!catalog.module_exists(9));
        assert!(catalog.module_exists(5));
    }

    #[test]
    fn test_load_toml_catalog_with_defaults() {
        let file = write_catalog(".toml", TOML_CATALOG);
        let catalog = FileCatalog::load(file.path()).unwrap();
        let snapshot = catalog.course_snapshot(3).unwrap();
        assert_eq!(snapshot.format, "topics");
        let module = snapshot.module(11).unwrap();
        assert!(module.deletion_in_progress);
        assert!(module.visible_to_user);
        assert!(module.url.is_none());
    }

    #[test]
    fn test_missing_file() {
        let err = FileCatalog::load("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_catalog(".yaml", "courses: []");
        let err = FileCatalog::load(file.path()).unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_malformed_json() {
        let file = write_catalog(".json", "{ not json");
        let err = FileCatalog::load(file.path()).unwrap_err();
        assert!(matches!(err, StorageError::JsonError { .. }));
    }

    #[test]
    fn test_in_memory_catalog() {
        let catalog = FileCatalog::from_courses(vec![CourseRecord {
            id: 1,
            format: default_format(),
            sections: Vec::new(),
            modules: Vec::new(),
        }]);
        assert!(catalog.path().is_none());
        assert!(catalog.course_snapshot(1).is_some());
        assert!(FileCatalog::empty().course_snapshot(1).is_none());
    }
}
