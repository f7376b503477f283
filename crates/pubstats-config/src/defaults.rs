use crate::logging::LogFormat;

/// Default RPC bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default RPC bind port.
pub const DEFAULT_PORT: u16 = 11600;

/// Default log filter expression used by the daemon.
pub const DEFAULT_LOG_FILTER: &str = "info";

pub(crate) fn default_host_string() -> String {
    DEFAULT_HOST.to_owned()
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
