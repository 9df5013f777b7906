// Shared fixtures for application-layer tests

use super::context::{Context, NodeServices};
use crate::config::RpcConfig;
use crate::domain::{OperatingMode, Role};
use crate::port::job_queue::mocks::MockJobQueue;
use crate::port::ledger_master::mocks::MockLedgerMaster;
use crate::port::network_ops::mocks::MockNetworkOps;
use crate::port::perf_log::mocks::RecordingPerfLog;
use serde_json::Value;
use std::sync::Arc;

/// Mock node in a healthy, fully synced state
pub struct TestNode {
    pub job_queue: Arc<MockJobQueue>,
    pub network_ops: Arc<MockNetworkOps>,
    pub ledger_master: Arc<MockLedgerMaster>,
    pub perf_log: Arc<RecordingPerfLog>,
    pub config: RpcConfig,
}

impl TestNode {
    pub fn new() -> Self {
        Self {
            job_queue: Arc::new(MockJobQueue::new(0)),
            network_ops: Arc::new(MockNetworkOps::new(OperatingMode::Full)),
            ledger_master: Arc::new(MockLedgerMaster::healthy()),
            perf_log: Arc::new(RecordingPerfLog::new()),
            config: RpcConfig::default(),
        }
    }

    pub fn standalone(mut self) -> Self {
        self.config.standalone = true;
        self
    }

    pub fn services(&self) -> NodeServices {
        NodeServices::new(
            self.job_queue.clone(),
            self.network_ops.clone(),
            self.ledger_master.clone(),
            self.perf_log.clone(),
            Arc::new(self.config.clone()),
        )
    }
}

/// Context for `params` (must be a JSON object) from a caller with `role`
pub fn context_with(node: &TestNode, params: Value, role: Role) -> Context {
    let params = match params {
        Value::Object(map) => map,
        other => panic!("test params must be an object, got {other}"),
    };
    Context::new(params, role, node.services())
}
