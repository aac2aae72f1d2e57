//! Connection management with bounded retry
//!
//! A store may still be starting when an import begins. The retry loop
//! makes at most `max_attempts` connect-and-verify attempts, sleeping a
//! fixed delay between them, and gives up with a connectivity error that
//! carries the last underlying cause.

use crate::errors::{ExError, ExResult, FlightGraphError};
use crate::{log_op_end, log_op_error, log_op_progress, log_op_start};
use flightgraph_core_types::Sensitive;
use std::time::{Duration, Instant};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 15;
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Store credentials; the password never appears in Debug output
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Sensitive<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Sensitive::new(password.into()),
        }
    }
}

/// Fixed-delay retry budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one attempt
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_DELAY)
    }
}

/// Why a single attempt failed
#[derive(Debug, Clone)]
pub enum ConnectFailure {
    /// Store not reachable yet; worth another attempt
    Unavailable(ExError),
    /// Retrying cannot help (bad URI, not a store, ...)
    Fatal(ExError),
}

/// A backend able to open and verify a connection
pub trait Connector {
    type Connection;

    /// One connect-and-verify cycle
    fn connect(
        &self,
        uri: &str,
        credentials: &Credentials,
    ) -> std::result::Result<Self::Connection, ConnectFailure>;
}

/// Connect, retrying on transient unavailability
///
/// # Errors
///
/// `Connectivity` once `max_attempts` attempts failed (the last cause is
/// attached as source), or immediately on a fatal connect failure.
pub fn connect_with_retry<C: Connector>(
    connector: &C,
    uri: &str,
    credentials: &Credentials,
    policy: RetryPolicy,
) -> ExResult<C::Connection> {
    let start = Instant::now();
    log_op_start!(
        "connect",
        uri = uri,
        user = credentials.username.as_str(),
        max_attempts = policy.max_attempts()
    );

    let mut attempt = 0;
    loop {
        attempt += 1;
        match connector.connect(uri, credentials) {
            Ok(connection) => {
                log_op_end!(
                    "connect",
                    duration_ms = start.elapsed().as_millis() as u64,
                    attempts = attempt
                );
                return Ok(connection);
            }
            Err(ConnectFailure::Fatal(cause)) => {
                let err = exhausted(uri, attempt, cause);
                log_op_error!(
                    "connect",
                    &err,
                    duration_ms = start.elapsed().as_millis() as u64
                );
                return Err(err);
            }
            Err(ConnectFailure::Unavailable(cause)) => {
                if attempt >= policy.max_attempts() {
                    let err = exhausted(uri, attempt, cause);
                    log_op_error!(
                        "connect",
                        &err,
                        duration_ms = start.elapsed().as_millis() as u64
                    );
                    return Err(err);
                }
                log_op_progress!(
                    "connect",
                    format!(
                        "graph store not ready, retrying ({}/{})",
                        attempt,
                        policy.max_attempts()
                    ),
                    attempt = attempt,
                    max_attempts = policy.max_attempts()
                );
                std::thread::sleep(policy.delay());
            }
        }
    }
}

fn exhausted(uri: &str, attempts: u32, cause: ExError) -> ExError {
    ExError::from(FlightGraphError::ConnectionExhausted {
        uri: uri.to_string(),
        attempts,
    })
    .with_source(cause)
}
