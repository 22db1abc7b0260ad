use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter { directives: String, source: ParseError },
    AlreadyInitialized(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { directives, .. } => {
                write!(f, "invalid log filter directives '{directives}'")
            }
            TelemetryError::AlreadyInitialized(err) => {
                write!(f, "tracing subscriber not installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInitialized(err) => Some(&**err),
        }
    }
}

/// Filter directives for the scoring service: a bare level from
/// `APP_LOG_LEVEL` applies to our own spans while the HTTP internals stay at
/// `warn`, so per-request noise never drowns the assessment log lines an
/// auditor actually reads. Full directive strings pass through untouched.
fn filter_directives(log_level: &str) -> String {
    let trimmed = log_level.trim();
    if trimmed.contains('=') || trimmed.contains(',') {
        return trimmed.to_string();
    }
    format!("{trimmed},hyper=warn,tower=warn")
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directives = filter_directives(&config.log_level);
            EnvFilter::try_new(&directives).map_err(|source| TelemetryError::InvalidFilter {
                directives,
                source,
            })?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_is_widened_with_quiet_http_internals() {
        assert_eq!(filter_directives("debug"), "debug,hyper=warn,tower=warn");
        assert_eq!(filter_directives(" info "), "info,hyper=warn,tower=warn");
    }

    #[test]
    fn explicit_directive_strings_pass_through() {
        assert_eq!(
            filter_directives("info,hiperfaturometro=trace"),
            "info,hiperfaturometro=trace"
        );
        assert_eq!(filter_directives("hyper=debug"), "hyper=debug");
    }
}
