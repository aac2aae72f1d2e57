//! Redacting wrapper for secrets
//!
//! The store password travels from the CLI flags through `ImportConfig`
//! and the connection manager. Wrapped in [`Sensitive`], it prints as a
//! fixed placeholder wherever a config or credentials value is debugged
//! or logged.

use std::fmt;

const REDACTED: &str = "***REDACTED***";

/// A value that never shows up in Debug or Display output
///
/// ```
/// use flightgraph_core_types::Sensitive;
///
/// let password = Sensitive::new("secret123");
/// assert_eq!(format!("{:?}", password), "***REDACTED***");
/// assert_eq!(password.expose(), &"secret123");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// The real value, for the one place a backend authenticates with it
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl From<String> for Sensitive<String> {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}
