//! rest-executor
//!
//! Sends one JSON request body to the configured endpoint with retries and
//! prints the response.
//!
//! ```text
//!     BODY (arg or stdin)
//!         │
//!         ▼
//!   ┌──────────────┐   attempt    ┌───────────────┐   POST    ┌──────────┐
//!   │ RetryExecutor│─────────────▶│ HttpTransport │──────────▶│ endpoint │
//!   │ classify +   │◀─────────────│ per-call      │◀──────────│          │
//!   │ retry policy │  ok / failure│ timeout       │  response └──────────┘
//!   └──────────────┘              └───────────────┘
//!         │
//!         ▼
//!     stdout (response) / stderr (error chain)
//! ```

use std::error::Error;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rest_executor::config::{load_config, ExecutorConfig};
use rest_executor::config::validation::validate_config;
use rest_executor::observability::logging::init_logging;
use rest_executor::resilience::CancelHandle;
use rest_executor::RetryExecutor;

#[derive(Parser)]
#[command(name = "rest-executor")]
#[command(about = "POST a JSON body to an endpoint, retrying transient failures", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Endpoint URL (overrides the config file).
    #[arg(short, long)]
    url: Option<String>,

    /// Per-attempt timeout in milliseconds (overrides the config file).
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// Total attempts including the first (overrides the config file).
    #[arg(short, long)]
    max_attempts: Option<u32>,

    /// Request body; "-" or absent reads stdin.
    body: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(response) => {
            println!("{}", response);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ExecutorConfig::default(),
    };
    apply_overrides(&mut config, &cli);
    validate_config(&config).map_err(|errors| {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    })?;

    init_logging(&config.observability)?;

    tracing::info!(
        url = %config.endpoint.url,
        timeout_ms = config.endpoint.timeout_ms,
        max_attempts = config.retries.max_attempts,
        "Configuration loaded"
    );

    let body = read_body(cli.body.as_deref())?;
    let executor = RetryExecutor::from_config(&config)?;

    let cancel = CancelHandle::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling");
            interrupt.cancel();
        }
    });

    Ok(executor.execute_request_until(&body, &cancel).await?)
}

fn apply_overrides(config: &mut ExecutorConfig, cli: &Cli) {
    if let Some(url) = &cli.url {
        config.endpoint.url = url.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.endpoint.timeout_ms = timeout_ms;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.retries.max_attempts = max_attempts;
    }
}

fn read_body(arg: Option<&str>) -> std::io::Result<String> {
    match arg {
        Some(body) if body != "-" => Ok(body.to_string()),
        _ => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            Ok(body)
        }
    }
}
