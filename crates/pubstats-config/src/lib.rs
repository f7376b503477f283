//! Layered configuration for the publication statistics daemon.
//!
//! Values are resolved by [`ortho_config`] from defaults, an optional TOML
//! file (`--config-path` or `PUBSTATS_CONFIG_PATH`), `PUBSTATS_*` environment
//! variables, and command-line flags, in increasing order of precedence.

mod defaults;
mod logging;

use std::ffi::OsString;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError, normalise_log_filter};

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "PUBSTATS")]
pub struct Config {
    /// Host the RPC listener binds to.
    #[ortho_config(default = defaults::default_host_string())]
    pub host: String,
    /// Port the RPC listener binds to.
    #[ortho_config(default = defaults::DEFAULT_PORT)]
    pub port: u16,
    /// `tracing` filter expression, or one of the classic level names.
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log records.
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
    /// File receiving log records instead of standard error.
    pub log_file: Option<Utf8PathBuf>,
    /// JSON statistics snapshot served by the bundled engine.
    pub snapshot_path: Option<Utf8PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: defaults::default_host_string(),
            port: DEFAULT_PORT,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            log_file: None,
            snapshot_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from the process arguments and environment.
    ///
    /// # Errors
    ///
    /// Returns the loader error when any layer fails to parse.
    pub fn load() -> Result<Self, Arc<OrthoError>> {
        <Self as OrthoConfig>::load()
    }

    /// Loads configuration from an explicit argument list.
    ///
    /// The first item is treated as the program name.
    ///
    /// # Errors
    ///
    /// Returns the loader error when any layer fails to parse.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, Arc<OrthoError>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as OrthoConfig>::load_from_iter(args)
    }

    /// Host the RPC listener binds to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port the RPC listener binds to.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// `host:port` pair suitable for display and address resolution.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Filter expression with classic level names mapped onto `tracing` ones.
    #[must_use]
    pub fn log_filter(&self) -> String {
        normalise_log_filter(&self.log_filter).into_owned()
    }

    /// Output format for log records.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Log file, when logging is redirected away from standard error.
    #[must_use]
    pub fn log_file(&self) -> Option<&Utf8Path> {
        self.log_file.as_deref()
    }

    /// Snapshot served by the bundled engine, if configured.
    #[must_use]
    pub fn snapshot_path(&self) -> Option<&Utf8Path> {
        self.snapshot_path.as_deref()
    }
}
