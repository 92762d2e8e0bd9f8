//! Mode selection and payload resolution.
//!
//! [`select`] maps a stored [`BlockConfiguration`] plus the [`RequestContext`]
//! onto exactly one [`ModeRequest`] without touching any collaborator.
//! [`ModeRequest::build`] then runs the chosen builder. [`resolve`] does both.
//!
//! Every failure here means "render nothing": unknown or missing mode, a
//! malformed internal reference, or a course-scoped mode outside a course.

use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::BlockConfiguration;
use crate::context::RequestContext;
use crate::course::{CourseMetadata, ModuleRecords};
use crate::format::FormatRegistry;
use crate::modes::{
    CalendarEvent, CourseModule, CourseSection, CourseUrl, CurrentUrl, Geolocation, LinkMode,
    OwnContent, WifiNetwork,
};
use crate::payload::DisplayPayload;
use crate::strings::StringSource;
use crate::urls::UrlBuilder;

/// Why a configuration resolved to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No mode is stored.
    #[error("no display mode configured")]
    MissingMode,

    /// The stored mode is not known.
    #[error("unknown display mode '{0}'")]
    UnknownMode(String),

    /// The internal content reference is not `cmid=<id>` or `section=<id>`.
    #[error("malformed internal content reference '{0}'")]
    MalformedReference(String),

    /// The mode needs a course but the page has none.
    #[error("display mode '{0}' requires a course context")]
    MissingCourse(Mode),
}

/// Administrator-selected payload kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The page the block is on.
    CurrentUrl,
    /// The course page.
    CourseUrl,
    /// A module or section of the course.
    InternalContent,
    /// Free text.
    OwnContent,
    /// A calendar event.
    Event,
    /// A geographic position.
    Geolocation,
    /// Wi-Fi credentials.
    Wifi,
}

impl Mode {
    /// Every mode, in settings-form order.
    pub const ALL: [Self; 7] = [
        Self::CurrentUrl,
        Self::CourseUrl,
        Self::InternalContent,
        Self::OwnContent,
        Self::Event,
        Self::Geolocation,
        Self::Wifi,
    ];

    /// Stored name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CurrentUrl => "currenturl",
            Self::CourseUrl => "courseurl",
            Self::InternalContent => "internalcontent",
            Self::OwnContent => "owncontent",
            Self::Event => "event",
            Self::Geolocation => "geolocation",
            Self::Wifi => "wifi",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ResolveError::UnknownMode(s.to_string()))
    }
}

/// Target of the internal-content mode, stored packed as `"<kind>=<id>"`.
///
/// Anything after a second `=` is ignored, so `cmid=5=6` names module 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalReference {
    /// `cmid=<id>`
    Module(i64),
    /// `section=<id>`
    Section(i64),
}

impl FromStr for InternalReference {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ResolveError::MalformedReference(s.to_string());
        let mut parts = s.split('=');
        let kind = parts.next().unwrap_or_default();
        let id = parts.next().ok_or_else(malformed)?;
        let id: i64 = id.trim().parse().map_err(|_| malformed())?;
        match kind {
            "cmid" => Ok(Self::Module(id)),
            "section" => Ok(Self::Section(id)),
            _ => Err(malformed()),
        }
    }
}

impl fmt::Display for InternalReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(id) => write!(f, "cmid={id}"),
            Self::Section(id) => write!(f, "section={id}"),
        }
    }
}

/// The selected builder together with its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeRequest {
    /// Current page URL.
    CurrentUrl(CurrentUrl),
    /// Course page URL.
    CourseUrl(CourseUrl),
    /// Module in a course.
    CourseModule {
        /// Course whose snapshot is consulted.
        course_id: i64,
        /// Builder input.
        module: CourseModule,
    },
    /// Section in a course.
    CourseSection {
        /// Course whose snapshot is consulted.
        course_id: i64,
        /// Builder input.
        section: CourseSection,
    },
    /// Free text.
    OwnContent(OwnContent),
    /// Calendar event.
    Event(CalendarEvent),
    /// Geographic position.
    Geolocation(Geolocation),
    /// Wi-Fi credentials.
    Wifi(WifiNetwork),
}

/// External services a build may consult.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Course metadata service.
    pub courses: &'a dyn CourseMetadata,
    /// Persistent record store.
    pub records: &'a dyn ModuleRecords,
    /// Section URL strategies.
    pub formats: &'a FormatRegistry,
    /// Localization.
    pub strings: &'a dyn StringSource,
    /// Site URL builder.
    pub urls: &'a UrlBuilder,
    /// Timezone for human-readable dates.
    pub timezone: Tz,
}

impl fmt::Debug for Collaborators<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("formats", self.formats)
            .field("urls", self.urls)
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}

impl ModeRequest {
    /// Mode this request was selected for.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self {
            Self::CurrentUrl(_) => Mode::CurrentUrl,
            Self::CourseUrl(_) => Mode::CourseUrl,
            Self::CourseModule { .. } | Self::CourseSection { .. } => Mode::InternalContent,
            Self::OwnContent(_) => Mode::OwnContent,
            Self::Event(_) => Mode::Event,
            Self::Geolocation(_) => Mode::Geolocation,
            Self::Wifi(_) => Mode::Wifi,
        }
    }

    /// Runs the selected builder.
    #[must_use]
    pub fn build(&self, env: &Collaborators<'_>) -> DisplayPayload {
        match self {
            Self::CurrentUrl(input) => input.build(env.urls, env.strings),
            Self::CourseUrl(input) => input.build(env.urls),
            Self::CourseModule { course_id, module } => {
                let snapshot = env.courses.course_snapshot(*course_id);
                module.build(snapshot.as_ref(), env.records, env.urls, env.strings)
            }
            Self::CourseSection { course_id, section } => {
                let snapshot = env.courses.course_snapshot(*course_id);
                section.build(snapshot.as_ref(), env.formats, env.urls, env.strings)
            }
            Self::OwnContent(input) => input.build(),
            Self::Event(input) => input.build(env.strings, env.timezone),
            Self::Geolocation(input) => input.build(env.strings),
            Self::Wifi(input) => input.build(env.strings),
        }
    }
}

/// Selects the builder for a configuration. Pure.
///
/// # Errors
///
/// Returns a [`ResolveError`] when the configuration cannot be shown.
pub fn select(
    config: &BlockConfiguration,
    ctx: &RequestContext,
) -> Result<ModeRequest, ResolveError> {
    let mode: Mode = config
        .mode
        .as_deref()
        .ok_or(ResolveError::MissingMode)?
        .parse()?;
    let course = || ctx.course_id.ok_or(ResolveError::MissingCourse(mode));
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    let request = match mode {
        Mode::CurrentUrl => ModeRequest::CurrentUrl(CurrentUrl {
            page_url: ctx.page_url.clone(),
        }),
        Mode::CourseUrl => ModeRequest::CourseUrl(CourseUrl {
            course_id: course()?,
            description: config.course_url_description.clone(),
        }),
        Mode::InternalContent => {
            let course_id = course()?;
            let reference: InternalReference =
                config.internal.as_deref().unwrap_or_default().parse()?;
            match reference {
                InternalReference::Module(module_id) => ModeRequest::CourseModule {
                    course_id,
                    module: CourseModule {
                        module_id,
                        can_edit: ctx.can_edit,
                    },
                },
                InternalReference::Section(section_id) => ModeRequest::CourseSection {
                    course_id,
                    section: CourseSection {
                        section_id,
                        can_edit: ctx.can_edit,
                    },
                },
            }
        }
        Mode::OwnContent => ModeRequest::OwnContent(OwnContent::new(
            config.own_content.as_deref().unwrap_or_default(),
        )),
        Mode::Event => ModeRequest::Event(CalendarEvent {
            summary: text(&config.event_summary),
            location: text(&config.event_location),
            start: config.event_start.unwrap_or_default(),
            end: config.event_end.unwrap_or_default(),
            all_day: config.all_day == Some(1),
        }),
        Mode::Geolocation => ModeRequest::Geolocation(Geolocation {
            latitude: text(&config.latitude),
            longitude: text(&config.longitude),
            link: LinkMode::from_config(config.link.as_deref()),
        }),
        Mode::Wifi => ModeRequest::Wifi(WifiNetwork {
            authentication: text(&config.wifi_authentication),
            ssid: text(&config.wifi_ssid),
            passkey: text(&config.wifi_passkey),
            hidden: text(&config.wifi_hidden),
        }),
    };

    Ok(request)
}

/// Selects and runs the builder for a configuration.
///
/// # Errors
///
/// Returns a [`ResolveError`] when the block should render nothing.
pub fn resolve(
    config: &BlockConfiguration,
    ctx: &RequestContext,
    env: &Collaborators<'_>,
) -> Result<DisplayPayload, ResolveError> {
    let request = match select(config, ctx) {
        Ok(request) => request,
        Err(ResolveError::MissingMode) => {
            debug!("block has no mode");
            return Err(ResolveError::MissingMode);
        }
        Err(err) => {
            warn!(error = %err, "block configuration cannot be shown");
            return Err(err);
        }
    };
    debug!(mode = %request.mode(), course_id = ?ctx.course_id, "resolving block payload");
    Ok(request.build(env))
}
