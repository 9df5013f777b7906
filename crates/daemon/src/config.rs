//! Daemon configuration from `LEDGER_RPC_*` environment variables

use anyhow::{Context, Result};
use ledger_rpc_core::RpcConfig;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5005;
const DEFAULT_ADMIN_PORT: u16 = 5006;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    pub rpc: RpcConfig,
    pub host: String,
    pub port: u16,
    /// Admin listener, always bound to loopback
    pub admin_port: u16,
    /// Public listener sits behind a proxy that sets `X-User` / `X-Forwarded-For`
    pub trust_identity_headers: bool,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut rpc = RpcConfig::default();

        if let Some(value) = lookup("LEDGER_RPC_STANDALONE") {
            rpc.standalone = parse_flag(&value)
                .with_context(|| format!("LEDGER_RPC_STANDALONE: invalid flag {value:?}"))?;
        }
        if let Some(limit) = parse_var::<usize>(&lookup, "LEDGER_RPC_MAX_JOB_QUEUE_CLIENTS")? {
            rpc.max_job_queue_clients = limit;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "LEDGER_RPC_MAX_LEDGER_AGE_SECS")? {
            rpc.max_validated_ledger_age = Duration::from_secs(secs);
        }
        rpc.validate()?;

        let trust_identity_headers = match lookup("LEDGER_RPC_TRUST_IDENTITY_HEADERS") {
            Some(value) => parse_flag(&value).with_context(|| {
                format!("LEDGER_RPC_TRUST_IDENTITY_HEADERS: invalid flag {value:?}")
            })?,
            None => false,
        };

        let config = Self {
            rpc,
            host: lookup("LEDGER_RPC_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_var(&lookup, "LEDGER_RPC_PORT")?.unwrap_or(DEFAULT_PORT),
            admin_port: parse_var(&lookup, "LEDGER_RPC_ADMIN_PORT")?.unwrap_or(DEFAULT_ADMIN_PORT),
            trust_identity_headers,
        };

        if config.port == config.admin_port && config.port != 0 {
            anyhow::bail!(
                "LEDGER_RPC_PORT and LEDGER_RPC_ADMIN_PORT must differ (both {})",
                config.port
            );
        }
        Ok(config)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .with_context(|| format!("{key}: cannot parse {value:?}"))
        })
        .transpose()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
