//! Dashboard configuration.
//!
//! Defaults match a proxy running locally; each value can be overridden from
//! the environment and then from the command line.

use std::net::SocketAddr;
use std::time::Duration;

use crate::channel::ChannelConfig;
use crate::error::DashboardError;
use crate::results::poller::{DEFAULT_MAX_BACKOFF, DEFAULT_POLL_INTERVAL};
use crate::results::{PollerConfig, TableOptions};

pub const BACKEND_ENV: &str = "ARENA_DASHBOARD_BACKEND";
pub const LISTEN_ENV: &str = "ARENA_DASHBOARD_LISTEN";
pub const POLL_SECS_ENV: &str = "ARENA_DASHBOARD_POLL_SECS";
pub const MAX_BACKOFF_SECS_ENV: &str = "ARENA_DASHBOARD_MAX_BACKOFF_SECS";
pub const SECURE_ONLY_ENV: &str = "ARENA_DASHBOARD_SECURE_ONLY";
pub const TLS_ENV: &str = "ARENA_DASHBOARD_TLS";

/// Proxy `host:port` used when nothing else is configured.
pub const DEFAULT_BACKEND: &str = "127.0.0.1:8765";

/// Configuration for the whole dashboard.
///
/// # Example
///
/// ```ignore
/// use arena_dashboard::config::DashboardConfig;
///
/// let config = DashboardConfig::from_env()?
///     .with_backend("10.0.0.5:8765")
///     .with_poll_interval(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend `host:port`
    pub backend: String,
    /// Address the page server binds
    pub listen: SocketAddr,
    pub poll_interval: Duration,
    pub max_backoff: Duration,
    /// Refuse `ws://` sockets at construction
    pub secure_only: bool,
    /// Talk to the backend over https; implies secure sockets
    pub tls: bool,
    pub table: TableOptions,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            listen: SocketAddr::from(([127, 0, 0, 1], 3040)),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_backoff: DEFAULT_MAX_BACKOFF,
            secure_only: false,
            tls: false,
            table: TableOptions::default(),
        }
    }
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    pub fn with_listen(mut self, listen: SocketAddr) -> Self {
        self.listen = listen;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    pub fn with_secure_only(mut self, secure_only: bool) -> Self {
        self.secure_only = secure_only;
        self
    }

    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_table_options(mut self, table: TableOptions) -> Self {
        self.table = table;
        self
    }

    /// Read overrides from `ARENA_DASHBOARD_*` variables.
    ///
    /// Unset variables keep their defaults; malformed ones are an error.
    pub fn from_env() -> Result<Self, DashboardError> {
        let mut config = Self::default();

        if let Some(backend) = env_value(BACKEND_ENV) {
            config.backend = backend;
        }
        if let Some(listen) = env_value(LISTEN_ENV) {
            config.listen = listen
                .parse()
                .map_err(|e| invalid(LISTEN_ENV, &listen, e))?;
        }
        if let Some(secs) = env_value(POLL_SECS_ENV) {
            config.poll_interval = parse_secs(POLL_SECS_ENV, &secs)?;
        }
        if let Some(secs) = env_value(MAX_BACKOFF_SECS_ENV) {
            config.max_backoff = parse_secs(MAX_BACKOFF_SECS_ENV, &secs)?;
        }
        if let Some(flag) = env_value(SECURE_ONLY_ENV) {
            config.secure_only = parse_flag(SECURE_ONLY_ENV, &flag)?;
        }
        if let Some(flag) = env_value(TLS_ENV) {
            config.tls = parse_flag(TLS_ENV, &flag)?;
        }

        Ok(config)
    }

    /// `http://host:port` (or https) of the backend.
    pub fn http_base(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{}://{}", scheme, self.backend)
    }

    pub fn results_url(&self) -> String {
        format!("{}/get_results", self.http_base())
    }

    pub fn clear_results_url(&self) -> String {
        format!("{}/clear_results", self.http_base())
    }

    pub fn signout_url(&self) -> String {
        format!("{}/signout", self.http_base())
    }

    /// Backend location of a replay file.
    pub fn replay_url(&self, filename: &str) -> String {
        format!(
            "{}{}{}",
            self.http_base(),
            self.table.replay_route,
            urlencoding::encode(filename)
        )
    }

    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig::new(self.results_url())
            .with_interval(self.poll_interval)
            .with_max_backoff(self.max_backoff)
            .with_table_options(self.table.clone())
    }

    /// Whether `ws://` sockets must be refused at construction.
    ///
    /// A TLS backend cannot answer a plain handshake, so `tls` forces the
    /// channel onto its `wss://` fallback.
    pub fn secure_sockets(&self) -> bool {
        self.secure_only || self.tls
    }

    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig::new(self.backend.clone())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(name: &str, value: &str, reason: impl std::fmt::Display) -> DashboardError {
    DashboardError::Config(format!("{}={:?}: {}", name, value, reason))
}

fn parse_secs(name: &str, value: &str) -> Result<Duration, DashboardError> {
    let secs: u64 = value.parse().map_err(|e| invalid(name, value, e))?;
    if secs == 0 {
        return Err(invalid(name, value, "must be at least 1"));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_flag(name: &str, value: &str) -> Result<bool, DashboardError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(name, value, "expected a boolean")),
    }
}
