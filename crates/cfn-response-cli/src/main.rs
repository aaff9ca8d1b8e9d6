#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use std::process;

use anyhow::Context;
use cfn_response::{LogContext, Reason, RequestContext, Resolution, ResponseReporter};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::config::{Cli, Command, EventArgs, FailureArgs, SuccessArgs};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "cfn_response_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "cfn_response_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "cfn_response_cli::config";

/// Exit code when the report was delivered with status FAILED.
const EXIT_APPLICATION_FAILURE: i32 = 2;

#[tokio::main]
async fn main() {
    let error = match run().await {
        Ok(code) => {
            tracing::debug!(
                target: TRACING_TARGET_SHUTDOWN,
                exit_code = code,
                "report delivered"
            );
            process::exit(code);
        }
        Err(error) => error,
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "report could not be delivered"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
///
/// Returns the process exit code once the report was delivered.
async fn run() -> anyhow::Result<i32> {
    let cli = Cli::init();

    telemetry::init_tracing()?;
    cli.log();

    let reporter = cfn_response::configure(cli.reporter.clone())
        .context("failed to create the response reporter")?;
    let context = read_event(cli.command.event()).await?;

    let resolution = match cli.command {
        Command::Success(args) => send_success(reporter, &context, args).await?,
        Command::Failure(args) => send_failure(reporter, &context, args).await?,
    };

    print_resolution(&resolution).await?;
    Ok(exit_code(&resolution))
}

/// Reads and parses the provisioning event from a file or stdin.
async fn read_event(args: &EventArgs) -> anyhow::Result<RequestContext> {
    let event = if args.reads_stdin() {
        let mut event = String::new();
        tokio::io::stdin()
            .read_to_string(&mut event)
            .await
            .context("failed to read the event from stdin")?;
        event
    } else {
        tokio::fs::read_to_string(&args.event)
            .await
            .with_context(|| format!("failed to read the event from {}", args.event.display()))?
    };

    RequestContext::from_json(&event).context("failed to parse the provisioning event")
}

async fn send_success(
    reporter: &ResponseReporter,
    context: &RequestContext,
    args: SuccessArgs,
) -> anyhow::Result<Resolution> {
    reporter
        .report_success(args.physical_resource_id, args.data, Some(context))
        .await
        .context("failed to send the SUCCESS report")
}

async fn send_failure(
    reporter: &ResponseReporter,
    context: &RequestContext,
    args: FailureArgs,
) -> anyhow::Result<Resolution> {
    let log_context = args.log_stream_name.map(LogContext::new);

    reporter
        .report_failure(
            args.reason.map(Reason::from),
            Some(context),
            log_context.as_ref(),
            args.physical_resource_id,
        )
        .await
        .context("failed to send the FAILED report")
}

/// Prints the resolved outcome to stdout as a single JSON line.
async fn print_resolution(resolution: &Resolution) -> anyhow::Result<()> {
    let outcome = match resolution {
        Resolution::Succeeded(data) => json!({ "status": "SUCCESS", "data": data }),
        Resolution::Failed(error) => {
            json!({ "status": "FAILED", "reason": error.message().unwrap_or_default() })
        }
    };

    let mut line = serde_json::to_vec(&outcome)?;
    line.push(b'\n');

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&line).await?;
    stdout.flush().await?;
    Ok(())
}

fn exit_code(resolution: &Resolution) -> i32 {
    if resolution.is_success() {
        0
    } else {
        EXIT_APPLICATION_FAILURE
    }
}

#[cfg(test)]
mod tests {
    use cfn_response::Error;

    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(exit_code(&Resolution::Succeeded(None)), 0);

        let failed = Resolution::Failed(Error::application_failure("boom"));
        assert_eq!(exit_code(&failed), EXIT_APPLICATION_FAILURE);
    }
}
