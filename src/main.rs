//! Immutable platform connector CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!   run ──▶ config ──▶ dispatch::table ──▶ ImmutableClient ──▶ REST / JSON-RPC
//!                                │
//!                                └──▶ batch (ordered outputs) ──▶ stdout (JSON)
//!
//!   serve ──▶ config ──▶ WebhookServer ──▶ events::filter ──▶ stdout (JSON lines)
//!                              │
//!                              └──▶ registration (create on start, delete on stop)
//! ```
//!
//! Logs go to stderr; stdout carries only operation output and events.

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::net::TcpListener;

use immutable_connector::blockchain::units;
use immutable_connector::config::{load_config, ConnectorConfig};
use immutable_connector::dispatch::{operations, run_batch, Dispatcher, OperationRequest, Params};
use immutable_connector::observability::{logging, metrics};
use immutable_connector::webhook::{EventSink, RegistrationStore, WebhookServer};
use immutable_connector::Shutdown;

#[derive(Parser)]
#[command(name = "immutable-connector")]
#[command(about = "Immutable platform actions and webhook events", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an operation for one item or for every item of an input file
    Run {
        #[arg(long)]
        resource: String,

        #[arg(long)]
        operation: String,

        /// Item parameter as key=value; applies to every item
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// JSON array of parameter objects, one per item
        #[arg(long)]
        input: Option<PathBuf>,

        /// Record item failures instead of aborting the batch
        #[arg(long)]
        continue_on_error: bool,
    },
    /// Start the webhook listener
    Serve,
    /// List supported operations and their parameters
    Operations,
    /// Test the API key against the platform health endpoint
    CheckCredentials,
    /// Convert between wei and ETH without any network call
    Convert {
        #[arg(value_enum)]
        direction: Direction,
        value: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    WeiToEth,
    EthToWei,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    logging::init_logging(&config.observability.log_filter);
    tracing::debug!(
        path = ?cli.config,
        network = %config.network.id,
        api_key_set = config.credentials.api_key().is_some(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Run {
            resource,
            operation,
            params,
            input,
            continue_on_error,
        } => {
            let base: Map<String, Value> = params
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            let items = match input {
                Some(path) => read_items(&path, &base)?,
                None => vec![Params::from(base)],
            };
            let requests: Vec<_> = items
                .into_iter()
                .map(|p| OperationRequest::new(resource.as_str(), operation.as_str(), p))
                .collect();

            let dispatcher = Dispatcher::from_config(&config)?;
            let continue_on_error = continue_on_error || config.batch.continue_on_error;
            let outputs = run_batch(&dispatcher, &requests, continue_on_error).await?;
            println!("{}", serde_json::to_string_pretty(&outputs)?);
        }
        Commands::Serve => serve(config).await?,
        Commands::Operations => {
            for spec in operations() {
                println!(
                    "{:<14} {:<24} {:<4} {}",
                    spec.resource.as_str(),
                    spec.operation,
                    if spec.requires_rpc() { "rpc" } else { "" },
                    spec.parameters().join(", ")
                );
            }
        }
        Commands::CheckCredentials => {
            let dispatcher = Dispatcher::from_config(&config)?;
            let health = dispatcher.client().check_credentials().await?;
            tracing::info!(network = %config.network.id, "Credentials accepted");
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
        Commands::Convert { direction, value } => {
            let converted = match direction {
                Direction::WeiToEth => units::wei_to_eth(&value)?,
                Direction::EthToWei => units::eth_to_wei(&value)?.to_string(),
            };
            println!("{}", converted);
        }
    }

    Ok(())
}

async fn serve(config: ConnectorConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?);
    }

    let registration = match &config.webhook.state_path {
        Some(path) => RegistrationStore::load_from_file(path)?,
        None => RegistrationStore::in_memory(),
    };

    let listener = TcpListener::bind(&config.webhook.bind_address).await?;
    let server = WebhookServer::new(config.webhook.clone(), EventSink::Stdout, registration);
    server.run(listener, &Shutdown::new()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Items from a JSON array file; `base` fills fields an item leaves out.
fn read_items(
    path: &std::path::Path,
    base: &Map<String, Value>,
) -> Result<Vec<Params>, Box<dyn std::error::Error>> {
    let items: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    items
        .into_iter()
        .map(|item| -> Result<Params, Box<dyn std::error::Error>> {
            let mut merged = base.clone();
            match item {
                Value::Object(fields) => merged.extend(fields),
                other => {
                    return Err(format!("input items must be JSON objects, got {}", other).into())
                }
            }
            Ok(Params::from(merged))
        })
        .collect()
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}
