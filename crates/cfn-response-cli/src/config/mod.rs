//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── reporter: ReporterConfig   # Log level, HTTP timeout, user agent
//! └── command: Command
//!     ├── success: SuccessArgs   # Event, physical resource id, data
//!     └── failure: FailureArgs   # Event, reason, log stream, physical resource id
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod command;

use std::process;

use cfn_response::ReporterConfig;
use clap::Parser;
pub use command::{Command, EventArgs, FailureArgs, SuccessArgs};

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "cfn-response")]
#[command(about = "Send CloudFormation custom resource status reports")]
#[command(version)]
pub struct Cli {
    /// Reporter and HTTP transport configuration.
    #[clap(flatten)]
    pub reporter: ReporterConfig,

    /// Report to send.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// .env files are loaded before clap parses arguments, so their variables
    /// act as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Logs configuration at debug level.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            command = self.command.name(),
            log_level = %self.reporter.log_level,
            http_timeout_secs = ?self.reporter.transport.http_timeout,
            user_agent = %self.reporter.transport.effective_user_agent(),
            "Reporter configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
