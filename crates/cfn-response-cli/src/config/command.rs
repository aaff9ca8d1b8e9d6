//! Report subcommands.

use std::convert::Infallible;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde_json::Value;

/// Report to send.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Report that the custom resource operation succeeded.
    Success(SuccessArgs),
    /// Report that the custom resource operation failed.
    Failure(FailureArgs),
}

impl Command {
    /// Subcommand name used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Failure(_) => "failure",
        }
    }

    /// Source of the provisioning event.
    pub fn event(&self) -> &EventArgs {
        match self {
            Self::Success(args) => &args.event,
            Self::Failure(args) => &args.event,
        }
    }
}

/// Where the provisioning event is read from.
#[derive(Debug, Clone, Args)]
pub struct EventArgs {
    /// Path to the event JSON, or `-` for stdin.
    #[arg(short = 'e', long = "event", env = "CFN_EVENT", default_value = "-")]
    pub event: PathBuf,
}

impl EventArgs {
    /// Returns whether the event is read from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.event.as_os_str() == "-"
    }
}

/// Arguments of the `success` subcommand.
#[derive(Debug, Clone, Args)]
pub struct SuccessArgs {
    #[command(flatten)]
    pub event: EventArgs,

    /// Identifier of the provisioned resource.
    #[arg(long)]
    pub physical_resource_id: String,

    /// Output attributes; JSON, or plain text that is sent as a string.
    #[arg(long, value_parser = parse_data)]
    pub data: Option<Value>,
}

/// Arguments of the `failure` subcommand.
#[derive(Debug, Clone, Args)]
pub struct FailureArgs {
    #[command(flatten)]
    pub event: EventArgs,

    /// Why the operation failed.
    #[arg(long)]
    pub reason: Option<String>,

    /// Log stream referenced by the default reason.
    #[arg(long, env = "AWS_LAMBDA_LOG_STREAM_NAME")]
    pub log_stream_name: Option<String>,

    /// Identifier of the resource; defaults to the one in the event.
    #[arg(long)]
    pub physical_resource_id: Option<String>,
}

/// Parses `--data` as JSON, falling back to a plain string.
fn parse_data(raw: &str) -> Result<Value, Infallible> {
    Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned())))
}
