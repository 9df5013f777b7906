//! Built-in RPC Commands
//!
//! Command implementations registered with the dispatcher at startup.

use crate::types::{
    ClosedLedgerInfo, LedgerAcceptResponse, LedgerClosedResponse, LedgerCurrentResponse,
    ServerInfo, ValidatedLedgerInfo,
};
use async_trait::async_trait;
use ledger_rpc_core::domain::JobType;
use ledger_rpc_core::{
    Condition, Context, ErrorCode, Handler, HandlerError, HandlerRegistry, JsonObject, LoadType,
    Role, RpcMethod, Status,
};
use ledger_rpc_infra_system::{LedgerTracker, TracingPerfLog};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Merge a serializable response into the result object
fn write_result<T: Serialize>(result: &mut JsonObject, value: &T) -> Result<(), HandlerError> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => {
            result.extend(fields);
            Ok(())
        }
        other => Err(HandlerError::Internal(format!(
            "response serialized to non-object: {other}"
        ))),
    }
}

/// ping
pub struct Ping;

#[async_trait]
impl RpcMethod for Ping {
    async fn call(
        &self,
        _ctx: &mut Context,
        _result: &mut JsonObject,
    ) -> Result<Status, HandlerError> {
        Ok(Status::OK)
    }
}

/// server_info
pub struct ServerInfoMethod {
    started: Instant,
}

impl ServerInfoMethod {
    pub fn new(started: Instant) -> Self {
        Self { started }
    }
}

#[async_trait]
impl RpcMethod for ServerInfoMethod {
    async fn call(
        &self,
        ctx: &mut Context,
        result: &mut JsonObject,
    ) -> Result<Status, HandlerError> {
        let services = &ctx.services;
        let ledger = &services.ledger_master;

        let valid_index = ledger.valid_ledger_index();
        let validated_ledger = (valid_index > 0).then(|| ValidatedLedgerInfo {
            seq: valid_index,
            age: ledger.validated_ledger_age().as_secs(),
        });

        let info = ServerInfo {
            build_version: ledger_rpc_core::VERSION.to_string(),
            server_state: services.network_ops.operating_mode().to_string(),
            standalone: services.config.standalone,
            amendment_blocked: services.network_ops.is_amendment_blocked(),
            uptime_seconds: self.started.elapsed().as_secs(),
            jobs_in_flight: services.job_queue.job_count_ge(JobType::Client),
            validated_ledger,
            closed_ledger: ledger.closed_ledger().map(|closed| ClosedLedgerInfo {
                seq: closed.seq,
                hash: closed.hash,
            }),
            current_ledger_index: ledger.current_ledger_index(),
        };

        result.insert("info".into(), serde_json::to_value(info)?);
        Ok(Status::OK)
    }
}

/// ledger_current
pub struct LedgerCurrent;

#[async_trait]
impl RpcMethod for LedgerCurrent {
    async fn call(
        &self,
        ctx: &mut Context,
        result: &mut JsonObject,
    ) -> Result<Status, HandlerError> {
        let response = LedgerCurrentResponse {
            ledger_current_index: ctx.services.ledger_master.current_ledger_index(),
        };
        write_result(result, &response)?;
        Ok(Status::OK)
    }
}

/// ledger_closed
///
/// An optional `ledger_index` must name the closed ledger itself.
pub struct LedgerClosed;

/// Read an optional ledger sequence parameter
fn requested_index(params: &JsonObject) -> Result<Option<u32>, Status> {
    match params.get("ledger_index") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|seq| u32::try_from(seq).ok())
            .map(Some)
            .ok_or_else(|| {
                Status::with_detail(ErrorCode::InvalidParams, "Invalid field 'ledger_index'.")
            }),
    }
}

#[async_trait]
impl RpcMethod for LedgerClosed {
    async fn call(
        &self,
        ctx: &mut Context,
        result: &mut JsonObject,
    ) -> Result<Status, HandlerError> {
        // Admission saw a closed ledger, but it may have been replaced since
        let requested = match requested_index(&ctx.params) {
            Ok(requested) => requested,
            Err(status) => return Ok(status),
        };
        let Some(closed) = ctx.services.ledger_master.closed_ledger() else {
            return Ok(ErrorCode::NoClosed.into());
        };
        if requested.is_some_and(|seq| seq != closed.seq) {
            return Ok(ErrorCode::LgrNotFound.into());
        }
        let response = LedgerClosedResponse {
            ledger_index: closed.seq,
            ledger_hash: closed.hash,
        };
        write_result(result, &response)?;
        Ok(Status::OK)
    }
}

/// ledger_accept - close and validate the working ledger (standalone only)
pub struct LedgerAccept {
    tracker: Arc<LedgerTracker>,
}

impl LedgerAccept {
    pub fn new(tracker: Arc<LedgerTracker>) -> Self {
        Self { tracker }
    }
}

#[async_trait]
impl RpcMethod for LedgerAccept {
    async fn call(
        &self,
        ctx: &mut Context,
        result: &mut JsonObject,
    ) -> Result<Status, HandlerError> {
        if !ctx.config().standalone {
            return Ok(ErrorCode::NotStandalone.into());
        }
        // Closing a ledger is the most expensive thing a caller can ask for
        ctx.load_type = LoadType::HighBurdenRpc;
        let accepted = self.tracker.accept_ledger();
        info!(seq = accepted.seq, hash = %accepted.hash, "Ledger accepted");

        let response = LedgerAcceptResponse {
            ledger_current_index: ctx.services.ledger_master.current_ledger_index(),
        };
        write_result(result, &response)?;
        Ok(Status::OK)
    }
}

/// perf_counters - per-command invocation counters
pub struct PerfCounters {
    perf_log: Arc<TracingPerfLog>,
}

impl PerfCounters {
    pub fn new(perf_log: Arc<TracingPerfLog>) -> Self {
        Self { perf_log }
    }
}

#[async_trait]
impl RpcMethod for PerfCounters {
    async fn call(
        &self,
        ctx: &mut Context,
        result: &mut JsonObject,
    ) -> Result<Status, HandlerError> {
        ctx.load_type = LoadType::MediumBurdenRpc;
        result.insert("methods".into(), serde_json::to_value(self.perf_log.snapshot())?);
        Ok(Status::OK)
    }
}

/// Registry with every built-in command
pub fn builtin_registry(
    tracker: Arc<LedgerTracker>,
    perf_log: Arc<TracingPerfLog>,
) -> ledger_rpc_core::Result<HandlerRegistry> {
    let registry = HandlerRegistry::builder()
        .register(Handler::new("ping", Role::User, Condition::NO_CONDITION, Ping))?
        .register(Handler::new(
            "server_info",
            Role::User,
            Condition::NO_CONDITION,
            ServerInfoMethod::new(Instant::now()),
        ))?
        .register(Handler::new(
            "ledger_current",
            Role::User,
            Condition::NEEDS_CURRENT_LEDGER,
            LedgerCurrent,
        ))?
        .register(Handler::new(
            "ledger_closed",
            Role::User,
            Condition::NEEDS_CLOSED_LEDGER,
            LedgerClosed,
        ))?
        .register(Handler::new(
            "ledger_accept",
            Role::Admin,
            Condition::NEEDS_CURRENT_LEDGER,
            LedgerAccept::new(tracker),
        ))?
        .register(Handler::new(
            "perf_counters",
            Role::Admin,
            Condition::NO_CONDITION,
            PerfCounters::new(perf_log),
        ))?
        .build();
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_rpc_core::domain::OperatingMode;
    use ledger_rpc_core::port::time_provider::mocks::ManualClock;
    use ledger_rpc_core::{NodeServices, RpcConfig, RpcDispatcher};
    use ledger_rpc_infra_system::{InFlightJobQueue, NetworkState};
    use serde_json::{json, Value};
    use std::time::Duration;

    struct Node {
        tracker: Arc<LedgerTracker>,
        dispatcher: RpcDispatcher,
        services: NodeServices,
    }

    fn node(config: RpcConfig) -> Node {
        let tracker = Arc::new(LedgerTracker::new(Arc::new(ManualClock::new(1_000))));
        let perf_log = Arc::new(TracingPerfLog::new());
        let registry = builtin_registry(tracker.clone(), perf_log.clone()).unwrap();
        let services = NodeServices::new(
            Arc::new(InFlightJobQueue::new(Duration::from_millis(500))),
            Arc::new(NetworkState::new(OperatingMode::Full)),
            tracker.clone(),
            perf_log,
            Arc::new(config),
        );
        Node {
            tracker,
            dispatcher: RpcDispatcher::new(Arc::new(registry)),
            services,
        }
    }

    fn context(node: &Node, request: Value, role: Role) -> Context {
        let Value::Object(params) = request else {
            panic!("request must be an object");
        };
        Context::new(params, role, node.services.clone())
    }

    async fn run(node: &Node, request: Value, role: Role) -> Value {
        let mut ctx = context(node, request, role);
        node.dispatcher.do_command(&mut ctx).await.into_value()
    }

    #[test]
    fn test_builtin_registry_roles() {
        let node = node(RpcConfig::default());
        let registry = node.dispatcher.registry();
        assert_eq!(
            registry.names(),
            vec![
                "ledger_accept",
                "ledger_closed",
                "ledger_current",
                "perf_counters",
                "ping",
                "server_info"
            ]
        );
        assert_eq!(registry.get("ledger_accept").unwrap().role, Role::Admin);
        assert_eq!(registry.get("ping").unwrap().role, Role::User);
    }

    #[tokio::test]
    async fn test_ping() {
        let node = node(RpcConfig::default());
        let response = run(&node, json!({"command": "ping"}), Role::Guest).await;
        assert_eq!(response, json!({"result": {"status": "success"}}));
    }

    #[tokio::test]
    async fn test_standalone_accept_then_closed() {
        let node = node(RpcConfig::standalone());

        let response = run(&node, json!({"command": "ledger_accept"}), Role::Admin).await;
        assert_eq!(response["result"]["ledger_current_index"], 2);

        let response = run(&node, json!({"command": "ledger_closed"}), Role::User).await;
        assert_eq!(response["result"]["ledger_index"], 1);
        assert_eq!(
            response["result"]["ledger_hash"].as_str().unwrap().len(),
            64
        );
    }

    #[tokio::test]
    async fn test_closed_ledger_index_lookup() {
        let node = node(RpcConfig::standalone());
        node.tracker.accept_ledger();

        let response = run(&node, json!({"command": "ledger_closed", "ledger_index": 1}), Role::User).await;
        assert_eq!(response["result"]["ledger_index"], 1);

        let response = run(&node, json!({"command": "ledger_closed", "ledger_index": 7}), Role::User).await;
        assert_eq!(response["result"]["error"], "lgrNotFound");
        assert_eq!(response["result"]["error_code"], 21);

        let response = run(&node, json!({"command": "ledger_closed", "ledger_index": "current"}), Role::User).await;
        assert_eq!(response["result"]["error"], "invalidParams");
        assert_eq!(response["result"]["error_message"], "Invalid field 'ledger_index'.");
    }

    #[tokio::test]
    async fn test_heavy_commands_raise_load_type() {
        let node = node(RpcConfig::standalone());

        let mut ctx = context(&node, json!({"command": "ledger_accept"}), Role::Admin);
        node.dispatcher.do_command(&mut ctx).await;
        assert_eq!(ctx.load_type, LoadType::HighBurdenRpc);
        assert_eq!(ctx.load_type.cost(), 3000);

        let mut ctx = context(&node, json!({"command": "perf_counters"}), Role::Admin);
        node.dispatcher.do_command(&mut ctx).await;
        assert_eq!(ctx.load_type, LoadType::MediumBurdenRpc);

        let mut ctx = context(&node, json!({"command": "ping"}), Role::User);
        node.dispatcher.do_command(&mut ctx).await;
        assert_eq!(ctx.load_type, LoadType::ReferenceRpc);
    }

    #[tokio::test]
    async fn test_accept_requires_standalone() {
        let node = node(RpcConfig::default());
        node.tracker.accept_ledger();

        let response = run(&node, json!({"command": "ledger_accept"}), Role::Admin).await;
        assert_eq!(response["result"]["error"], "notStandalone");
        assert_eq!(response["result"]["status"], "error");
    }

    #[tokio::test]
    async fn test_closed_before_any_close() {
        let node = node(RpcConfig::standalone());
        let response = run(&node, json!({"command": "ledger_closed"}), Role::User).await;
        assert_eq!(response["error"], "noClosed");
    }

    #[tokio::test]
    async fn test_server_info_reports_state() {
        let node = node(RpcConfig::standalone());
        node.tracker.accept_ledger();

        let response = run(&node, json!({"method": "server_info"}), Role::User).await;
        let info = &response["result"]["info"];
        assert_eq!(info["server_state"], "full");
        assert_eq!(info["standalone"], true);
        assert_eq!(info["validated_ledger"]["seq"], 1);
        assert_eq!(info["current_ledger_index"], 2);
        assert!(info.get("amendment_blocked").is_none());
    }

    #[tokio::test]
    async fn test_perf_counters_admin_only() {
        let node = node(RpcConfig::default());
        run(&node, json!({"command": "ping"}), Role::User).await;

        let response = run(&node, json!({"command": "perf_counters"}), Role::User).await;
        assert_eq!(response["error"], "noPermission");

        let response = run(&node, json!({"command": "perf_counters"}), Role::Admin).await;
        assert_eq!(response["result"]["methods"]["ping"]["finished"], 1);
    }
}
