//! Logging initialization.
//!
//! [`LogConfig`] is read from the `QRBLOCK_*` environment once at startup:
//!
//! | Variable            | Effect                                          |
//! |---------------------|-------------------------------------------------|
//! | `QRBLOCK_ENV`       | `production` enables the rolling JSON log file  |
//! | `QRBLOCK_LOG_LEVEL` | level for qrblock crates and request traces     |
//! | `QRBLOCK_LOG_DIR`   | overrides the platform log directory            |
//!
//! `RUST_LOG`, when set, replaces the level-derived filter entirely.

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable selecting the log level when `RUST_LOG` is unset.
pub const LOG_LEVEL_ENV: &str = "QRBLOCK_LOG_LEVEL";

/// Environment variable selecting production logging (`production`).
pub const ENV_VAR: &str = "QRBLOCK_ENV";

/// Environment variable overriding the log directory.
pub const LOG_DIR_ENV: &str = "QRBLOCK_LOG_DIR";

/// Prefix of the daily log files.
const LOG_FILE_PREFIX: &str = "qrblock";

/// Writer guards flushed on process exit.
static GUARDS: OnceLock<Vec<WorkerGuard>> = OnceLock::new();

/// Resolved logging options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Rolling JSON file plus plain stdout instead of pretty stdout.
    pub production: bool,
    /// Level for the qrblock crates and `tower_http`.
    pub level: String,
    /// Directory of the rolling log file.
    pub directory: PathBuf,
}

impl LogConfig {
    /// Reads the options from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            production: lookup(ENV_VAR)
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("production")),
            level: lookup(LOG_LEVEL_ENV)
                .map(|level| level.trim().to_ascii_lowercase())
                .filter(|level| !level.is_empty())
                .unwrap_or_else(|| "info".to_string()),
            directory: lookup(LOG_DIR_ENV)
                .filter(|dir| !dir.trim().is_empty())
                .map_or_else(log_directory, PathBuf::from),
        }
    }

    /// Filter applied when `RUST_LOG` is unset: qrblock crates and request
    /// traces at the configured level, everything else at `warn`.
    #[must_use]
    pub fn directives(&self) -> String {
        let level = &self.level;
        format!("warn,qrblock_core={level},qrblock_server={level},tower_http={level}")
    }

    fn filter(&self) -> anyhow::Result<EnvFilter> {
        Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(self.directives()))?)
    }
}

/// Installs the global subscriber.
///
/// Development logs pretty stdout with span open/close events. Production
/// logs compact stdout without colors for the journal, plus JSON lines to a
/// daily rolling file in [`LogConfig::directory`].
///
/// # Errors
///
/// Returns an error if the filter does not parse or the log directory cannot
/// be created.
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    let filter = config.filter()?;
    let mut guards = Vec::new();

    let (stdout, file) = if config.production {
        std::fs::create_dir_all(&config.directory)?;
        let appender =
            RollingFileAppender::new(Rotation::DAILY, &config.directory, LOG_FILE_PREFIX);
        let (file_writer, file_guard) = tracing_appender::non_blocking(appender);
        let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.extend([file_guard, stdout_guard]);

        let stdout = tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(stdout_writer)
            .with_ansi(false)
            .boxed();
        let file = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(file_writer)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        (stdout, Some(file))
    } else {
        let stdout = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
            .boxed();
        (stdout, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout)
        .with(file)
        .init();

    let _ = GUARDS.set(guards);
    tracing::debug!(
        production = config.production,
        level = %config.level,
        directory = %config.directory.display(),
        "logging initialized"
    );
    Ok(())
}

/// Platform log directory.
fn log_directory() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/var/log/qrblock")
    }
    #[cfg(not(target_os = "linux"))]
    {
        directories::ProjectDirs::from("", "", "qrblock")
            .map(|dirs| dirs.data_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("./logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> LogConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        LogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = config_from(&[]);
        assert!(!config.production);
        assert_eq!(config.level, "info");
        assert_eq!(config.directory, log_directory());
    }

    #[test]
    fn test_production_and_overrides() {
        let config = config_from(&[
            (ENV_VAR, "Production"),
            (LOG_LEVEL_ENV, " DEBUG "),
            (LOG_DIR_ENV, "/srv/qrblock/logs"),
        ]);
        assert!(config.production);
        assert_eq!(config.level, "debug");
        assert_eq!(config.directory, PathBuf::from("/srv/qrblock/logs"));
    }

    #[test]
    fn test_other_environments_are_development() {
        assert!(!config_from(&[(ENV_VAR, "staging")]).production);
        assert_eq!(config_from(&[(LOG_LEVEL_ENV, "")]).level, "info");
    }

    #[test]
    fn test_directives_parse() {
        let directives = config_from(&[(LOG_LEVEL_ENV, "trace")]).directives();
        assert!(directives.contains("qrblock_core=trace"));
        assert!(directives.starts_with("warn,"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
