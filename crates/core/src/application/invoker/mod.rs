//! Instrumented invocation of command entry points
//!
//! Every invocation gets a process-unique correlation id, a `rpc_start`
//! perf event, and exactly one of `rpc_finish` / `rpc_error`. Failures
//! (handler errors and panics alike) stop here and become `internal`.

mod panic_guard;

pub use panic_guard::{execute_guarded_async, PanicGuardResult};

use super::context::Context;
use super::registry::RpcMethod;
use crate::domain::{ErrorCode, JobType, JsonObject, Status};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Monotonic correlation id source
///
/// The first id handed out is 1. Safe to share between tasks.
#[derive(Debug, Default)]
pub struct RequestIdGenerator {
    last: AtomicU64,
}

impl RequestIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Most recently issued id (0 before the first invocation)
    pub fn last_issued(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}

/// Runs handler entry points under instrumentation and failure containment
#[derive(Debug, Clone)]
pub struct Invoker {
    request_ids: Arc<RequestIdGenerator>,
}

impl Invoker {
    pub fn new(request_ids: Arc<RequestIdGenerator>) -> Self {
        Self { request_ids }
    }

    pub fn request_ids(&self) -> &Arc<RequestIdGenerator> {
        &self.request_ids
    }

    /// Execute `method` exactly once
    ///
    /// Returns the handler's own status on normal return. Any failure
    /// escalates `ctx.load_type`, writes the internal error into `result`
    /// and returns `internal`.
    pub async fn call_method(
        &self,
        ctx: &mut Context,
        method: &dyn RpcMethod,
        name: &str,
        result: &mut JsonObject,
    ) -> Status {
        let perf_log = Arc::clone(&ctx.services.perf_log);
        let request_id = self.request_ids.next_id();

        perf_log.rpc_start(name, request_id);
        let load_event = ctx
            .services
            .job_queue
            .make_load_event(JobType::Generic, format!("cmd:{name}"));

        let outcome = execute_guarded_async(method.call(ctx, result)).await;
        drop(load_event);

        let failure = match outcome {
            PanicGuardResult::Success(Ok(status)) => {
                perf_log.rpc_finish(name, request_id);
                return status;
            }
            PanicGuardResult::Success(Err(err)) => err.to_string(),
            PanicGuardResult::Panicked(msg) => msg,
        };

        perf_log.rpc_error(name, request_id);
        info!(command = name, request_id, error = %failure, "Caught throw");

        ctx.load_type.escalate_on_exception();
        let status = Status::new(ErrorCode::Internal);
        status.inject(result);
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::registry::HandlerError;
    use crate::application::test_support::{context_with, TestNode};
    use crate::domain::{LoadType, Role};
    use crate::port::perf_log::mocks::PerfEventKind;
    use async_trait::async_trait;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl RpcMethod for Echo {
        async fn call(
            &self,
            _ctx: &mut Context,
            result: &mut JsonObject,
        ) -> Result<Status, HandlerError> {
            result.insert("echo".into(), json!(true));
            Ok(Status::OK)
        }
    }

    struct Rejects;

    #[async_trait]
    impl RpcMethod for Rejects {
        async fn call(
            &self,
            _ctx: &mut Context,
            _result: &mut JsonObject,
        ) -> Result<Status, HandlerError> {
            Ok(Status::with_detail(ErrorCode::InvalidParams, "bad ledger_index"))
        }
    }

    struct Fails;

    #[async_trait]
    impl RpcMethod for Fails {
        async fn call(
            &self,
            _ctx: &mut Context,
            _result: &mut JsonObject,
        ) -> Result<Status, HandlerError> {
            Err(HandlerError::Unavailable("ledger store".into()))
        }
    }

    struct Panics;

    #[async_trait]
    impl RpcMethod for Panics {
        async fn call(
            &self,
            _ctx: &mut Context,
            _result: &mut JsonObject,
        ) -> Result<Status, HandlerError> {
            panic!("handler bug");
        }
    }

    #[test]
    fn test_request_ids_start_at_one() {
        let ids = RequestIdGenerator::new();
        assert_eq!(ids.last_issued(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.last_issued(), 2);
    }

    #[tokio::test]
    async fn test_success_emits_start_and_finish() {
        let node = TestNode::new();
        let invoker = Invoker::new(Arc::new(RequestIdGenerator::new()));
        let mut ctx = context_with(&node, json!({"command": "echo"}), Role::Guest);
        let mut result = JsonObject::new();

        let status = invoker.call_method(&mut ctx, &Echo, "echo", &mut result).await;

        assert!(status.is_success());
        assert_eq!(result["echo"], true);
        assert_eq!(
            node.perf_log.events_for(1),
            vec![PerfEventKind::Start, PerfEventKind::Finish]
        );
        assert_eq!(ctx.load_type, LoadType::ReferenceRpc);
    }

    #[tokio::test]
    async fn test_handler_status_propagates_unchanged() {
        let node = TestNode::new();
        let invoker = Invoker::new(Arc::new(RequestIdGenerator::new()));
        let mut ctx = context_with(&node, json!({}), Role::Guest);
        let mut result = JsonObject::new();

        let status = invoker.call_method(&mut ctx, &Rejects, "rejects", &mut result).await;

        assert_eq!(status, Status::with_detail(ErrorCode::InvalidParams, "bad ledger_index"));
        // A failing status is a normal return: finish, not error
        assert_eq!(
            node.perf_log.events_for(1),
            vec![PerfEventKind::Start, PerfEventKind::Finish]
        );
        assert_eq!(ctx.load_type, LoadType::ReferenceRpc);
    }

    #[tokio::test]
    async fn test_handler_error_is_contained() {
        let node = TestNode::new();
        let invoker = Invoker::new(Arc::new(RequestIdGenerator::new()));
        let mut ctx = context_with(&node, json!({}), Role::Guest);
        let mut result = JsonObject::new();

        let status = invoker.call_method(&mut ctx, &Fails, "fails", &mut result).await;

        assert_eq!(status.code(), ErrorCode::Internal);
        assert_eq!(result["error"], "internal");
        assert_eq!(result["error_code"], 73);
        assert_eq!(ctx.load_type, LoadType::ExceptionRpc);
        assert_eq!(
            node.perf_log.events_for(1),
            vec![PerfEventKind::Start, PerfEventKind::Error]
        );
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let node = TestNode::new();
        let invoker = Invoker::new(Arc::new(RequestIdGenerator::new()));
        let mut ctx = context_with(&node, json!({}), Role::Guest);
        let mut result = JsonObject::new();

        let status = invoker.call_method(&mut ctx, &Panics, "panics", &mut result).await;

        assert_eq!(status.code(), ErrorCode::Internal);
        assert_eq!(result["error_message"], "Internal error.");
        assert_eq!(ctx.load_type, LoadType::ExceptionRpc);

        let events = node.perf_log.events_for(1);
        assert_eq!(events, vec![PerfEventKind::Start, PerfEventKind::Error]);
        assert!(!events.contains(&PerfEventKind::Finish));
    }

    #[tokio::test]
    async fn test_each_attempt_gets_a_new_id() {
        let node = TestNode::new();
        let ids = Arc::new(RequestIdGenerator::new());
        let invoker = Invoker::new(Arc::clone(&ids));

        for _ in 0..3 {
            let mut ctx = context_with(&node, json!({}), Role::Guest);
            let mut result = JsonObject::new();
            invoker.call_method(&mut ctx, &Fails, "fails", &mut result).await;
        }

        assert_eq!(ids.last_issued(), 3);
        let started: Vec<u64> = node
            .perf_log
            .events()
            .iter()
            .filter(|e| e.kind == PerfEventKind::Start)
            .map(|e| e.request_id)
            .collect();
        assert_eq!(started, vec![1, 2, 3]);
    }
}
