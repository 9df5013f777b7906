//! Node fixture wiring the pipeline to the in-process adapters

#![allow(dead_code)]

use async_trait::async_trait;
use ledger_rpc_api::handler::{LedgerAccept, LedgerClosed, LedgerCurrent, Ping};
use ledger_rpc_core::domain::{JobType, OperatingMode};
use ledger_rpc_core::port::time_provider::mocks::ManualClock;
use ledger_rpc_core::port::PerfLog;
use ledger_rpc_core::{
    CommandResponse, Condition, Context, Handler, HandlerError, HandlerRegistry, JsonObject,
    NodeServices, Role, RpcConfig, RpcDispatcher, RpcMethod, Status,
};
use ledger_rpc_infra_system::{InFlightJobQueue, LedgerTracker, NetworkState, TracingPerfLog};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

pub const START_MILLIS: i64 = 1_700_000_000_000;

/// Panics inside the handler
pub struct Explode;

#[async_trait]
impl RpcMethod for Explode {
    async fn call(
        &self,
        _ctx: &mut Context,
        result: &mut JsonObject,
    ) -> Result<Status, HandlerError> {
        result.insert("partial".into(), Value::Bool(true));
        panic!("ledger state corrupted");
    }
}

/// Waits for a permit before succeeding
pub struct Hold {
    gate: Arc<Semaphore>,
}

#[async_trait]
impl RpcMethod for Hold {
    async fn call(
        &self,
        _ctx: &mut Context,
        _result: &mut JsonObject,
    ) -> Result<Status, HandlerError> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| HandlerError::Unavailable(e.to_string()))?;
        permit.forget();
        Ok(Status::OK)
    }
}

pub struct Node {
    pub clock: Arc<ManualClock>,
    pub jobs: Arc<InFlightJobQueue>,
    pub network: Arc<NetworkState>,
    pub ledger: Arc<LedgerTracker>,
    pub perf_log: Arc<TracingPerfLog>,
    pub gate: Arc<Semaphore>,
    pub dispatcher: Arc<RpcDispatcher>,
    pub services: NodeServices,
}

impl Node {
    pub fn new(config: RpcConfig) -> Self {
        let perf_log = Arc::new(TracingPerfLog::new());
        Self::with_perf_log(config, perf_log.clone(), perf_log)
    }

    /// Route perf events to `sink` while keeping the counters handle
    pub fn with_perf_log(
        config: RpcConfig,
        perf_log: Arc<TracingPerfLog>,
        sink: Arc<dyn PerfLog>,
    ) -> Self {
        let clock = Arc::new(ManualClock::new(START_MILLIS));
        let jobs = Arc::new(InFlightJobQueue::new(Duration::from_millis(500)));
        let network = Arc::new(NetworkState::new(OperatingMode::Full));
        let ledger = Arc::new(LedgerTracker::new(clock.clone()));
        let gate = Arc::new(Semaphore::new(0));

        let registry = HandlerRegistry::builder()
            .register(Handler::new("ping", Role::User, Condition::NO_CONDITION, Ping))
            .and_then(|b| {
                b.register(Handler::new(
                    "ledger_current",
                    Role::User,
                    Condition::NEEDS_CURRENT_LEDGER,
                    LedgerCurrent,
                ))
            })
            .and_then(|b| {
                b.register(Handler::new(
                    "ledger_closed",
                    Role::User,
                    Condition::NEEDS_CLOSED_LEDGER,
                    LedgerClosed,
                ))
            })
            .and_then(|b| {
                b.register(Handler::new(
                    "ledger_accept",
                    Role::Admin,
                    Condition::NEEDS_CURRENT_LEDGER,
                    LedgerAccept::new(ledger.clone()),
                ))
            })
            .and_then(|b| {
                b.register(Handler::new(
                    "peer_status",
                    Role::User,
                    Condition::NEEDS_NETWORK_CONNECTION,
                    Ping,
                ))
            })
            .and_then(|b| {
                b.register(Handler::new("explode", Role::User, Condition::NO_CONDITION, Explode))
            })
            .and_then(|b| {
                b.register(Handler::new(
                    "hold",
                    Role::User,
                    Condition::NO_CONDITION,
                    Hold { gate: gate.clone() },
                ))
            })
            .expect("registry")
            .build();

        let services = NodeServices::new(
            jobs.clone(),
            network.clone(),
            ledger.clone(),
            sink,
            Arc::new(config),
        );

        Self {
            clock,
            jobs,
            network,
            ledger,
            perf_log,
            gate,
            dispatcher: Arc::new(RpcDispatcher::new(Arc::new(registry))),
            services,
        }
    }

    pub fn context(&self, request: Value, role: Role) -> Context {
        let Value::Object(params) = request else {
            panic!("request must be an object");
        };
        Context::new(params, role, self.services.clone())
    }

    /// Run one request the way the transport does: counted as a client job
    pub async fn request(&self, request: Value, role: Role) -> CommandResponse {
        let _job = self.jobs.begin(JobType::Client);
        let mut ctx = self.context(request, role);
        self.dispatcher.do_command(&mut ctx).await
    }
}
