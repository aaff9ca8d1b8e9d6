//! Reporter and transport configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// How much diagnostic output the reporter emits.
///
/// Levels are ordered, so `level >= LogLevel::Verbose` holds for debug too.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum LogLevel {
    /// Outcome lines only.
    #[default]
    Normal = 1,
    /// Echoes requests, documents and responses.
    Verbose = 2,
    /// Verbose plus full error renderings and resolved identifiers.
    Debug = 3,
}

impl LogLevel {
    /// Returns whether request and response echoes are enabled.
    pub fn is_verbose(self) -> bool {
        self >= Self::Verbose
    }

    /// Returns whether debug output is enabled.
    pub fn is_debug(self) -> bool {
        self >= Self::Debug
    }
}

/// Configuration for the HTTP transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct TransportConfig {
    /// HTTP request timeout in seconds (unbounded when unset)
    #[cfg_attr(feature = "config", arg(long = "http-timeout", env = "HTTP_TIMEOUT"))]
    #[serde(default)]
    pub http_timeout: Option<u64>,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl TransportConfig {
    /// Returns the timeout as a Duration, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.http_timeout
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    /// Returns the default user agent string.
    fn default_user_agent() -> String {
        format!("cfn-response/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = Some(timeout_secs);
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Configuration for a [`ResponseReporter`](crate::ResponseReporter).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReporterConfig {
    /// Diagnostic output level
    #[cfg_attr(
        feature = "config",
        arg(long = "log-level", env = "CFN_LOG_LEVEL", value_enum, default_value_t = LogLevel::Normal)
    )]
    #[serde(default)]
    pub log_level: LogLevel,

    /// HTTP transport settings.
    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(default)]
    pub transport: TransportConfig,
}

impl ReporterConfig {
    /// Set the log level.
    #[must_use]
    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    /// Set the transport configuration.
    #[must_use]
    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}
