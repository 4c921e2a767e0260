//! Logging initialization and configuration.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor an explicit level is given.
pub const DEFAULT_FILTER: &str = "course_portal=info";

/// Try to initialize logging from `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Fails if a global subscriber is already set.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    try_init_with_level(None)
}

/// Try to initialize logging with an explicit level or filter directive.
///
/// A bare level such as `debug` is scoped to this crate; anything else is
/// passed to [`EnvFilter`] verbatim.
pub fn try_init_with_level(level: Option<&str>) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(tracing_subscriber::fmt::layer().compact())
        .try_init()
}

fn env_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(filter_directive(level)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

fn filter_directive(level: &str) -> String {
    let level = level.trim();
    match level.to_ascii_lowercase().as_str() {
        "error" | "warn" | "info" | "debug" | "trace" | "off" => {
            format!("course_portal={}", level.to_ascii_lowercase())
        }
        "" => DEFAULT_FILTER.to_string(),
        _ => level.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_bare_level() {
        assert_eq!(filter_directive("debug"), "course_portal=debug");
        assert_eq!(filter_directive("WARN"), "course_portal=warn");
    }

    #[test]
    fn test_filter_directive_passthrough() {
        assert_eq!(
            filter_directive("course_portal=trace,tower_http=debug"),
            "course_portal=trace,tower_http=debug"
        );
        assert_eq!(filter_directive("  "), DEFAULT_FILTER);
    }

    #[test]
    fn test_try_init_idempotent() {
        // Whichever test runs first wins; the rest must not panic.
        let _ = try_init();
        let _ = try_init_with_level(Some("debug"));
    }

    #[test]
    fn test_logging_works() {
        let _ = try_init();

        tracing::info!("test info message");
        tracing::debug!("test debug message");
        tracing::warn!("test warn message");
    }
}
