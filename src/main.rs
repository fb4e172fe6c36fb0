mod models;
mod handlers;
mod services;
mod middleware;
mod harness;
mod config;
mod errors;
mod routes;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use crate::{
    config::Config,
    harness::{BackendRegistry, Harness, HarnessState, RunOutcome, RunReport, StepReport},
    models::{Operation, OperationKind},
    services::{UserClient, UserStore},
};
use tracing_subscriber;

#[derive(Parser)]
#[command(name = "user-directory", about = "In-memory user directory service and its CRUD test harness")]
struct Cli {
    /// Configuration file, in place of config/default
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the /users API (the default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the test suite against a backend
    Harness {
        #[arg(long)]
        backend: Option<String>,
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Id removed by the DELETE USER step of the default suite
        #[arg(long)]
        delete_id: Option<u32>,
        /// Text identifying the deleted record in the default suite
        #[arg(long)]
        delete_marker: Option<String>,
        /// Print the full run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send a single operation to a backend and print the result
    Call {
        #[arg(value_enum)]
        operation: OperationKind,
        #[arg(long)]
        backend: Option<String>,
        #[arg(long)]
        id: Option<u32>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        hours: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path, true),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve { host: None, port: None }) {
        Command::Serve { host, port } => serve(config, host, port).await,
        Command::Harness { backend, delay_ms, delete_id, delete_marker, json } => {
            let mut harness_config = config.harness;
            if let Some(delay_ms) = delay_ms {
                harness_config.step_delay_ms = delay_ms;
            }
            if let Some(delete_id) = delete_id {
                harness_config.delete_target_id = delete_id;
            }
            if let Some(delete_marker) = delete_marker {
                harness_config.delete_target_marker = delete_marker;
            }

            let cases = harness::load_suite(&harness_config)?;
            let runner = Arc::new(Harness::from_config(&harness_config)?);
            if let Some(backend) = backend {
                runner.backends().select(&backend)?;
            }

            let cancel = CancellationToken::new();
            let stop = cancel.clone();
            let watched = Arc::clone(&runner);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    if watched.state() == HarnessState::Running {
                        tracing::info!("Stop requested, finishing current step");
                    }
                    stop.cancel();
                }
            });

            // Progress lines would interleave with the JSON document
            let report = if json {
                runner.run(&cases, &cancel).await?
            } else {
                runner
                    .run_with_progress(&cases, &cancel, |step: &StepReport| {
                        let status = if step.passed() { "PASS" } else { "FAIL" };
                        println!("{}  {}", status, step.name);
                    })
                    .await?
            };
            tracing::debug!("Harness is {:?}", runner.state());

            print_report(&report, json)?;
            if !report.is_success() {
                bail!("Test run did not pass ({})", describe(report.outcome));
            }
            Ok(())
        }
        Command::Call { operation, backend, id, name, hours } => {
            let operation = Operation::from_parts(operation, id, name, hours)
                .map_err(|missing| anyhow!("Cannot build {}: {}", operation, missing))?;

            let backends = BackendRegistry::new(config.harness.backends, &config.harness.selected);
            if let Some(backend) = backend {
                backends.select(&backend)?;
            }
            let (_, base_url) = backends.resolve()?;

            let client = UserClient::new(Duration::from_millis(config.harness.request_timeout_ms))?;
            let result = client
                .send(&base_url, &operation)
                .await
                .with_context(|| format!("Error: request to {} failed", base_url))?;
            println!("{}", result);
            Ok(())
        }
    }
}

async fn serve(config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let host = host.unwrap_or(config.server.host);
    let port = port.unwrap_or(config.server.port);

    // One store for the life of the process
    let store = UserStore::new();
    let app = routes::app(store);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    tracing::info!("Server is running on http://{}:{}", host, port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .context("Server error")
}

fn print_report(report: &RunReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for step in report.failures() {
        println!("{}", step.failure.as_deref().unwrap_or(&step.result));
    }
    println!(
        "Run {} against {} ({}): {}, {} steps, {} failed",
        report.run_id,
        report.backend,
        report.base_url,
        describe(report.outcome),
        report.steps.len(),
        report.failures().count()
    );
    Ok(())
}

fn describe(outcome: RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::Completed => "completed",
        RunOutcome::Cancelled => "stopped by user",
        RunOutcome::TransportFailed => "backend unreachable",
        RunOutcome::BackendUnresolved => "no endpoint for selected backend",
    }
}
