//! Subscriber installation

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Output flavour chosen by the binary at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable progress lines
    Development,
    /// JSON structured output, one object per line
    Production,
    /// No output; tests install `test_capture` instead
    Test,
}

const DEFAULT_FILTER: &str = "flightgraph=info";

static INSTALLED: Once = Once::new();

/// `RUST_LOG` when set and valid, `flightgraph=info` otherwise
fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber for `profile`
///
/// Only the first call has an effect. A subscriber installed earlier by
/// someone else (a test harness, an embedding binary) is left in place.
///
/// ```
/// use flightgraph_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INSTALLED.call_once(|| {
        match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_target(false)
                .with_env_filter(filter())
                .try_init()
                .ok(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter())
                .try_init()
                .ok(),
            Profile::Test => tracing_subscriber::registry().try_init().ok(),
        };
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
