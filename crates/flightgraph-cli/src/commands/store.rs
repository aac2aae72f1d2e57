//! Store connection flags shared by every command

use clap::Args;
use flightgraph_core::connection::{Credentials, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use flightgraph_engine::config::DEFAULT_STORE_URI;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Graph store URI (sqlite://<path>, a bare path, or sqlite::memory:)
    #[arg(long, env = "GRAPH_STORE_URI", default_value = DEFAULT_STORE_URI)]
    pub store_uri: String,

    #[arg(long, env = "GRAPH_STORE_USER", default_value = "flightgraph")]
    pub store_user: String,

    #[arg(
        long,
        env = "GRAPH_STORE_PASSWORD",
        default_value = "password",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub store_password: String,

    /// Connection attempts before giving up
    #[arg(long, env = "STORE_CONNECT_RETRIES", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub connect_retries: u32,

    /// Seconds to wait between connection attempts
    #[arg(long, env = "STORE_CONNECT_DELAY", default_value_t = 2.0)]
    pub connect_delay: f64,
}

impl StoreArgs {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.store_user.clone(), self.store_password.clone())
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy, String> {
        let delay = Duration::try_from_secs_f64(self.connect_delay)
            .map_err(|e| format!("invalid --connect-delay {}: {}", self.connect_delay, e))?;
        Ok(RetryPolicy::new(self.connect_retries, delay))
    }
}
