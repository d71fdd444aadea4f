//! Process-level configuration of the service hosting Engine instances.
//!
//! This is deployment-scoped configuration (bind address, timeouts, log
//! level) and must not be confused with the per-session `Session
//! configuration` (`id`, `trace_ctx`, `display_manager`) that a caller passes
//! to [`Start`] when spinning up a [`Room`] — that one is request-scoped and
//! lives in [`crate::signalling::conf`].
//!
//! Loaded, in increasing priority: compiled-in [`Default`]s → an optional
//! TOML config file → a `.env` file (via [`dotenv`]) → process environment
//! variables prefixed `RTC_ENGINE_` (double underscore nests, e.g.
//! `RTC_ENGINE_SERVER__BIND_PORT`).
//!
//! [`Start`]: crate::signalling::room::Start
//! [`Room`]: crate::signalling::Room

use std::{net::IpAddr, time::Duration};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use smart_default::SmartDefault;

use crate::log::prelude::*;

/// Top-level process configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Conf {
    pub server: Server,
    pub engine: Engine,
    pub log: Log,
}

impl Conf {
    /// Loads configuration from the optional file at `path`, then overlays
    /// `.env` and process environment variables.
    ///
    /// # Errors
    ///
    /// Errors if the config file exists but cannot be parsed, or if an
    /// environment variable cannot be coerced into its target field type.
    pub fn parse(path: Option<&str>) -> Result<Self, ConfigError> {
        if dotenv::dotenv().is_err() {
            debug!("No `.env` file found, proceeding with process env only");
        }

        let mut cfg = Config::new();
        if let Some(path) = path {
            cfg.merge(File::with_name(path).required(false))?;
        }
        cfg.merge(
            Environment::with_prefix("RTC_ENGINE")
                .separator("__")
                .ignore_empty(true),
        )?;

        cfg.try_into()
    }
}

/// HTTP/WebSocket server bind options.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    #[default(IpAddr::from([0, 0, 0, 0]))]
    pub bind_ip: IpAddr,

    #[default(8080)]
    pub bind_port: u16,
}

/// Engine-wide defaults for timeouts not overridden per-session.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Engine {
    /// How long the Peer Admission Controller waits for an
    /// `AcceptPeer`/`DenyPeer` reply before logging a stuck admission.
    /// Unlike `Subscribe`'s timeout, this is advisory only: the source
    /// specifies no hard cutoff for admission, only for subscription (§5).
    #[default(Duration::from_secs(30))]
    #[serde(with = "humantime_serde")]
    pub admission_warn_after: Duration,

    /// Hard timeout surfaced to `Subscribe` callers as `Timeout`.
    #[default(Duration::from_secs(5))]
    #[serde(with = "humantime_serde")]
    pub subscribe_timeout: Duration,

    /// Keep-alive ping interval used by the demonstration WebSocket
    /// transport.
    #[default(Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub ws_ping_interval: Duration,
}

/// Logging options.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Log {
    #[default(String::from("info"))]
    pub level: String,
}
