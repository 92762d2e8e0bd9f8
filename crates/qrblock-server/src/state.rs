//! Application state shared across handlers.

use std::sync::Arc;

use chrono_tz::Tz;
use qrblock_core::{
    Collaborators, EnglishStrings, FileCatalog, FormatRegistry, PresentationSettings, QrBlock,
    Settings, UrlBuilder,
};
use tokio::sync::RwLock;

/// Shared application state, guarded for catalog reloads.
pub type SharedState = Arc<RwLock<AppState>>;

/// Everything a block render needs.
#[derive(Debug)]
pub struct AppState {
    /// Process settings as loaded.
    pub settings: Settings,
    /// Site URL builder.
    pub urls: UrlBuilder,
    /// Presentation options derived from the settings.
    pub presentation: PresentationSettings,
    /// Section URL strategies.
    pub formats: FormatRegistry,
    /// Localization.
    pub strings: EnglishStrings,
    /// Display timezone.
    pub timezone: Tz,
    /// Course catalog.
    pub catalog: FileCatalog,
}

impl AppState {
    /// Builds state from loaded settings and catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the site base URL is invalid.
    pub fn new(settings: Settings, catalog: FileCatalog) -> qrblock_core::Result<Self> {
        let urls = UrlBuilder::new(&settings.site.wwwroot)?;
        let presentation = PresentationSettings::from_settings(&settings, &urls);
        let timezone = settings.timezone();

        Ok(Self {
            settings,
            urls,
            presentation,
            formats: FormatRegistry::new(),
            strings: EnglishStrings::new(),
            timezone,
            catalog,
        })
    }

    /// Wraps the state for sharing between handlers.
    #[must_use]
    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    /// Collaborators backed by this state.
    #[must_use]
    pub fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            courses: &self.catalog,
            records: &self.catalog,
            formats: &self.formats,
            strings: &self.strings,
            urls: &self.urls,
            timezone: self.timezone,
        }
    }

    /// A block bound to this state.
    #[must_use]
    pub fn block(&self) -> QrBlock<'_> {
        QrBlock::new(self.collaborators(), &self.presentation)
    }
}
