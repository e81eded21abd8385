//! Runtime configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::path::PathBuf;

use crate::error::CommandError;
use crate::output::OutputFormat;
use crate::storage::DEFAULT_DB_PATH;

/// Environment variable overriding the database path.
pub const ENV_DB_PATH: &str = "REMINDERS_DB_PATH";
/// Environment variable overriding the output format.
pub const ENV_FORMAT: &str = "REMINDERS_FORMAT";
/// Environment variable holding a `tracing` filter directive.
pub const ENV_LOG: &str = "REMINDERS_LOG";

/// Default log filter.
const DEFAULT_LOG_FILTER: &str = "warn";
/// Log filter used with `--verbose`.
const VERBOSE_LOG_FILTER: &str = "debug";

/// Resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to the reminders database.
    pub db_path: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// `tracing` filter directive for stderr logging.
    pub log_filter: String,
}

impl Config {
    /// Creates a new builder for `Config`.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Per-user default database location, falling back to [`DEFAULT_DB_PATH`].
#[must_use]
pub fn default_db_path() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(DEFAULT_DB_PATH),
        |dir| dir.join("reminders-cli").join("reminders.db"),
    )
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    db_path: Option<PathBuf>,
    format: Option<String>,
    log_filter: Option<String>,
    verbose: bool,
}

impl ConfigBuilder {
    /// Populates unset fields from the process environment.
    #[must_use]
    pub fn from_env(self) -> Self {
        self.from_lookup(|key| std::env::var(key).ok())
    }

    /// Populates unset fields using `lookup` to read variables.
    #[must_use]
    pub fn from_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.db_path.is_none() {
            self.db_path = lookup(ENV_DB_PATH)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from);
        }
        if self.format.is_none() {
            self.format = lookup(ENV_FORMAT).filter(|v| !v.is_empty());
        }
        if self.log_filter.is_none() {
            self.log_filter = lookup(ENV_LOG).filter(|v| !v.is_empty());
        }
        self
    }

    /// Sets the database path.
    #[must_use]
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Raises the default log filter to `debug`. An explicit filter from the
    /// environment still wins.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidArgument`] if the format is not one of
    /// `plain`, `json` or `lisp`.
    pub fn build(self) -> Result<Config, CommandError> {
        let format = self
            .format
            .as_deref()
            .map(str::parse::<OutputFormat>)
            .transpose()?
            .unwrap_or_default();

        let log_filter = self.log_filter.unwrap_or_else(|| {
            if self.verbose {
                VERBOSE_LOG_FILTER.to_string()
            } else {
                DEFAULT_LOG_FILTER.to_string()
            }
        });

        Ok(Config {
            db_path: self.db_path.unwrap_or_else(default_db_path),
            format,
            log_filter,
        })
    }
}
