use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Supported logging output formats.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON suitable for ingestion by logging stacks.
    #[default]
    Json,
    /// Human-readable single line output.
    Compact,
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;

/// Maps the classic level names (`DEBUG`, `INFO`, `WARNING`, `ERROR`,
/// `CRITICAL`) onto `tracing` levels. Any other expression is returned
/// unchanged so full `EnvFilter` directives keep working.
#[must_use]
pub fn normalise_log_filter(filter: &str) -> Cow<'_, str> {
    let level = match filter.trim().to_ascii_uppercase().as_str() {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" | "WARNING" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => return Cow::Borrowed(filter),
    };
    Cow::Borrowed(level)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("DEBUG", "debug")]
    #[case("warning", "warn")]
    #[case("CRITICAL", "error")]
    #[case("pubstatsd=debug,info", "pubstatsd=debug,info")]
    fn normalises_level_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalise_log_filter(input), expected);
    }

    #[test]
    fn parses_log_format_case_insensitively() {
        assert_eq!("COMPACT".parse::<LogFormat>().ok(), Some(LogFormat::Compact));
    }
}
