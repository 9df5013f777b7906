//! Ledger RPC Daemon - Main Entry Point
//! Wires the node adapters into the RPC pipeline and serves JSON-RPC

mod config;

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::DaemonConfig;
use ledger_rpc_api::server::role_for_listener;
use ledger_rpc_api::{builtin_registry, RpcServer, RpcServerConfig};
use ledger_rpc_core::domain::OperatingMode;
use ledger_rpc_core::port::time_provider::SystemTimeProvider;
use ledger_rpc_core::{NodeServices, RpcDispatcher, VERSION};
use ledger_rpc_infra_system::{InFlightJobQueue, LedgerTracker, NetworkState, TracingPerfLog};

const ADMIN_HOST: &str = "127.0.0.1";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    let log_format =
        std::env::var("LEDGER_RPC_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("ledger_rpc=info"))?;

    match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty())
            .init(),
    }

    info!("Ledger RPC daemon v{} starting...", VERSION);

    // 2. Configuration
    let config = DaemonConfig::from_env()?;
    info!(
        standalone = config.rpc.standalone,
        max_job_queue_clients = config.rpc.max_job_queue_clients,
        max_validated_ledger_age_secs = config.rpc.max_validated_ledger_age.as_secs(),
        trust_identity_headers = config.trust_identity_headers,
        "Configuration loaded"
    );

    // 3. Node adapters
    let time_provider = Arc::new(SystemTimeProvider);
    let jobs = Arc::new(InFlightJobQueue::new(config.rpc.slow_command_threshold));
    let network = Arc::new(NetworkState::new(OperatingMode::Disconnected));
    let ledger = Arc::new(LedgerTracker::new(time_provider));
    let perf_log = Arc::new(TracingPerfLog::new());

    if config.rpc.standalone {
        let genesis = ledger.accept_ledger();
        network.set_mode(OperatingMode::Full);
        info!(seq = genesis.seq, hash = %genesis.hash, "Standalone genesis ledger accepted");
    } else {
        warn!("No peer network attached; ledger commands stay unavailable until synced");
    }

    let services = NodeServices::new(
        jobs.clone(),
        network,
        ledger.clone(),
        perf_log.clone(),
        Arc::new(config.rpc.clone()),
    );

    // 4. Pipeline
    let registry = builtin_registry(ledger, perf_log)?;
    info!(commands = ?registry.names(), "Command registry built");
    let dispatcher = Arc::new(RpcDispatcher::new(Arc::new(registry)));

    // 5. Listeners
    let public = RpcServer::new(
        RpcServerConfig {
            host: config.host.clone(),
            port: config.port,
            role: role_for_listener(false),
            trust_identity_headers: config.trust_identity_headers,
        },
        dispatcher.clone(),
        services.clone(),
        jobs.clone(),
    );
    let admin = RpcServer::new(
        RpcServerConfig {
            host: ADMIN_HOST.to_string(),
            port: config.admin_port,
            role: role_for_listener(true),
            trust_identity_headers: false,
        },
        dispatcher,
        services,
        jobs,
    );

    let (public_addr, public_handle) = public.start().await?;
    let (admin_addr, admin_handle) = admin.start().await?;

    info!(public = %public_addr, admin = %admin_addr, "System ready");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    public_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("Public RPC server stop failed: {}", e))?;
    admin_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("Admin RPC server stop failed: {}", e))?;
    public_handle.stopped().await;
    admin_handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}
