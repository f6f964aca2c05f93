//! cifix CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse arguments** — where to read the event from and how to log.
//! 2. **Wire observability** — configure `tracing-subscriber` with a JSON (or
//!    pretty) layer on stderr and, when `OTEL_EXPORTER_OTLP_ENDPOINT` is set,
//!    an OpenTelemetry OTLP exporter. All `tracing` spans and structured
//!    events emitted by every crate in the workspace flow through this layer.
//! 3. **Load configuration** — resolve [`pipeline::Settings`] from the
//!    environment. Missing settings end the invocation with a configuration
//!    failure result before any network traffic.
//! 4. **Construct infrastructure** — create the `OpenAiClient` and
//!    `SlackWebhookNotifier` and inject them into an `InvocationHandler`.
//! 5. **Run one invocation** — read the event, handle it, and print the
//!    `{"statusCode": .., "body": ..}` result on stdout.
//!
//! The exit code is `0` for 2xx results and `1` otherwise.

mod observability;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use handler::{configuration_failure, InvocationHandler};
use llm::{OpenAiClient, OpenAiConfig};
use pipeline::config::keys;
use pipeline::{ConfigurationError, InvocationEvent, InvocationId, InvocationResult, Settings};
use slack::SlackWebhookNotifier;
use uuid::Uuid;

use crate::observability::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "cifix",
    version,
    about = "Turns a CI/CD failure log into a suggested fix posted to chat"
)]
struct Args {
    /// Path to the event JSON document; `-` or omitted reads standard input.
    #[arg(long, env = "CIFIX_EVENT")]
    event: Option<PathBuf>,

    /// Host-assigned request id to record on the invocation span.
    #[arg(long)]
    invocation_id: Option<Uuid>,

    /// Log filter (env-filter syntax). Defaults to `RUST_LOG`, then `info`.
    #[arg(long)]
    log: Option<String>,

    /// Log line format written to stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let telemetry = observability::init(args.log.as_deref(), args.log_format)?;

    let outcome = run(&args).await;
    telemetry.shutdown();

    let result = outcome?;
    println!("{}", serde_json::to_string(&result)?);
    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

async fn run(args: &Args) -> anyhow::Result<InvocationResult> {
    let event = read_event(args.event.as_deref())?;
    let invocation_id = args
        .invocation_id
        .map(InvocationId::from_uuid)
        .unwrap_or_else(InvocationId::new_random);

    let handler = match Settings::from_lookup(|key| std::env::var(key).ok())
        .and_then(|settings| build_handler(&settings))
    {
        Ok(handler) => handler,
        Err(err) => return Ok(configuration_failure(&err)),
    };

    Ok(handler.handle_with_id(&event, invocation_id).await)
}

fn build_handler(
    settings: &Settings,
) -> Result<InvocationHandler<OpenAiClient, SlackWebhookNotifier>, ConfigurationError> {
    let completion = OpenAiClient::new(OpenAiConfig::from_settings(settings)).map_err(|err| {
        ConfigurationError::Invalid {
            key: keys::OPENAI_API_KEY,
            message: err.to_string(),
        }
    })?;
    let notifier =
        SlackWebhookNotifier::from_settings(settings).map_err(|err| ConfigurationError::Invalid {
            key: keys::SLACK_WEBHOOK,
            message: err.to_string(),
        })?;
    Ok(InvocationHandler::new(
        completion,
        notifier,
        settings.model().clone(),
    ))
}

fn read_event(path: Option<&Path>) -> anyhow::Result<InvocationEvent> {
    let raw = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event file {}", path.display()))?,
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read event from stdin")?;
            raw
        }
    };
    parse_event(&raw)
}

fn parse_event(raw: &str) -> anyhow::Result<InvocationEvent> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("event document is not valid JSON")?;
    Ok(InvocationEvent::new(value))
}
