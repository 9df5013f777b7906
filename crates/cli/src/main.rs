//! Ledger RPC CLI - Command-line client for the ledger RPC daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:5005";
const DEFAULT_ADMIN_URL: &str = "http://127.0.0.1:5006";

#[derive(Parser)]
#[command(name = "ledger-rpc")]
#[command(about = "Ledger node RPC client", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Public RPC listener URL
    #[arg(long, env = "LEDGER_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Admin RPC listener URL (admin-only commands)
    #[arg(long, env = "LEDGER_RPC_ADMIN_URL", default_value = DEFAULT_ADMIN_URL)]
    admin_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue any command and print the raw response
    Call {
        /// Command name (e.g., ledger_current)
        command: String,

        /// Parameters as a JSON object
        #[arg(long)]
        params: Option<String>,

        /// Send through the admin listener
        #[arg(long)]
        admin: bool,
    },

    /// Check that the node answers
    Ping,

    /// Show node status
    ServerInfo,

    /// Show the working ledger index, or the last closed ledger
    Ledger {
        #[arg(long)]
        closed: bool,
    },

    /// Close and validate the working ledger (standalone only)
    Accept,

    /// Show per-command invocation counters
    Perf,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Vec<Value>,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Tabled)]
struct InfoRow {
    field: String,
    value: String,
}

#[derive(Tabled)]
struct PerfRow {
    command: String,
    started: u64,
    finished: u64,
    errored: u64,
    total_ms: u64,
}

/// How the node answered a command
#[derive(Debug, PartialEq)]
enum Outcome {
    Success(Value),
    /// Rejected before the handler ran
    Rejected { token: String, message: String },
    /// Handler ran and failed
    Failed { token: String, message: String },
}

fn error_fields(object: &Value) -> Option<(String, String)> {
    let token = object.get("error")?.as_str()?.to_string();
    let message = object
        .get("error_message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some((token, message))
}

fn classify(response: Value) -> Outcome {
    if let Some((token, message)) = error_fields(&response) {
        return Outcome::Rejected { token, message };
    }
    let result = response.get("result").cloned().unwrap_or(Value::Null);
    if let Some((token, message)) = error_fields(&result) {
        return Outcome::Failed { token, message };
    }
    Outcome::Success(result)
}

async fn call_rpc(url: &str, method: &str, params: Value) -> Result<Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params: vec![params],
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

/// Call a command and unwrap its result, failing on rejection or error
async fn run_command(url: &str, method: &str, params: Value) -> Result<Value> {
    match classify(call_rpc(url, method, params).await?) {
        Outcome::Success(result) => Ok(result),
        Outcome::Rejected { token, message } => {
            anyhow::bail!("{} rejected: {} ({})", method, message, token)
        }
        Outcome::Failed { token, message } => {
            anyhow::bail!("{} failed: {} ({})", method, message, token)
        }
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

fn info_rows(info: &Value) -> Vec<InfoRow> {
    let mut rows = Vec::new();
    if let Value::Object(fields) = info {
        for (field, value) in fields {
            match value {
                Value::Object(nested) => {
                    for (key, inner) in nested {
                        rows.push(InfoRow {
                            field: format!("{field}.{key}"),
                            value: display(inner),
                        });
                    }
                }
                _ => rows.push(InfoRow {
                    field: field.clone(),
                    value: display(value),
                }),
            }
        }
    }
    rows
}

fn perf_rows(methods: &Value) -> Vec<PerfRow> {
    let counter = |entry: &Value, key: &str| entry.get(key).and_then(Value::as_u64).unwrap_or(0);
    methods
        .as_object()
        .map(|methods| {
            methods
                .iter()
                .map(|(command, entry)| PerfRow {
                    command: command.clone(),
                    started: counter(entry, "started"),
                    finished: counter(entry, "finished"),
                    errored: counter(entry, "errored"),
                    total_ms: counter(entry, "total_duration_us") / 1_000,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Call {
            command,
            params,
            admin,
        } => {
            let params: Value = match params {
                Some(raw) => serde_json::from_str(&raw).context("Invalid JSON params")?,
                None => json!({}),
            };
            if !params.is_object() {
                anyhow::bail!("--params must be a JSON object");
            }
            let url = if admin { &cli.admin_url } else { &cli.rpc_url };

            let response = call_rpc(url, &command, params).await?;
            match classify(response.clone()) {
                Outcome::Success(_) => println!("{}", "✓ success".green().bold()),
                Outcome::Rejected { token, .. } => {
                    println!("{}", format!("✗ rejected: {token}").red().bold())
                }
                Outcome::Failed { token, .. } => {
                    println!("{}", format!("✗ failed: {token}").red().bold())
                }
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::Ping => {
            run_command(&cli.rpc_url, "ping", json!({})).await?;
            println!("{}", "✓ Node is responding".green().bold());
        }

        Commands::ServerInfo => {
            let result = run_command(&cli.rpc_url, "server_info", json!({})).await?;
            println!("{}", "Server Info".cyan().bold());
            println!();
            println!("{}", Table::new(info_rows(&result["info"])));
        }

        Commands::Ledger { closed } => {
            if closed {
                let result = run_command(&cli.rpc_url, "ledger_closed", json!({})).await?;
                println!(
                    "{} {}",
                    "Closed ledger:".cyan().bold(),
                    display(&result["ledger_index"])
                );
                println!("{} {}", "Hash:".cyan(), display(&result["ledger_hash"]));
            } else {
                let result = run_command(&cli.rpc_url, "ledger_current", json!({})).await?;
                println!(
                    "{} {}",
                    "Current ledger:".cyan().bold(),
                    display(&result["ledger_current_index"])
                );
            }
        }

        Commands::Accept => {
            let result = run_command(&cli.admin_url, "ledger_accept", json!({})).await?;
            println!(
                "{}",
                format!(
                    "✓ Ledger accepted, working ledger is now {}",
                    display(&result["ledger_current_index"])
                )
                .green()
                .bold()
            );
        }

        Commands::Perf => {
            let result = run_command(&cli.admin_url, "perf_counters", json!({})).await?;
            let rows = perf_rows(&result["methods"]);
            if rows.is_empty() {
                println!("{}", "No commands recorded yet".yellow());
            } else {
                println!("{}", Table::new(rows));
            }
        }
    }

    Ok(())
}
