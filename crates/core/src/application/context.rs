// Per-request RPC context

use crate::config::RpcConfig;
use crate::domain::{Headers, JsonObject, LoadType, Role};
use crate::port::{JobQueue, LedgerMaster, NetworkOps, PerfLog};
use std::sync::Arc;

/// Read-only handles to the node services admission and handlers consult
///
/// Cheap to clone; shared by every request.
#[derive(Clone)]
pub struct NodeServices {
    pub job_queue: Arc<dyn JobQueue>,
    pub network_ops: Arc<dyn NetworkOps>,
    pub ledger_master: Arc<dyn LedgerMaster>,
    pub perf_log: Arc<dyn PerfLog>,
    pub config: Arc<RpcConfig>,
}

impl NodeServices {
    pub fn new(
        job_queue: Arc<dyn JobQueue>,
        network_ops: Arc<dyn NetworkOps>,
        ledger_master: Arc<dyn LedgerMaster>,
        perf_log: Arc<dyn PerfLog>,
        config: Arc<RpcConfig>,
    ) -> Self {
        Self {
            job_queue,
            network_ops,
            ledger_master,
            perf_log,
            config,
        }
    }
}

/// State for one RPC request
///
/// Built by the transport, owned by exactly one request and passed by
/// `&mut` through the pipeline. `load_type` only ever moves from reference
/// to exception cost.
pub struct Context {
    pub params: JsonObject,
    pub role: Role,
    pub load_type: LoadType,
    pub headers: Headers,
    pub services: NodeServices,
}

impl Context {
    pub fn new(params: JsonObject, role: Role, services: NodeServices) -> Self {
        Self {
            params,
            role,
            load_type: LoadType::ReferenceRpc,
            headers: Headers::default(),
            services,
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn config(&self) -> &RpcConfig {
        &self.services.config
    }
}
