//! Dispatcher - top-level command entry point
//!
//! `do_command` runs admission, then invocation and response assembly.
//! Admission rejections put the error fields at the top level of the
//! response; execution failures nest them under `result`.

use super::admission::fill_handler;
use super::context::Context;
use super::invoker::{Invoker, RequestIdGenerator};
use super::registry::HandlerRegistry;
use super::response::get_result;
use crate::domain::{ErrorCode, JsonObject, Role, Status};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Final status and response document of one command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResponse {
    pub status: Status,
    pub result: JsonObject,
}

impl CommandResponse {
    fn rejected(status: Status) -> Self {
        let mut result = JsonObject::new();
        status.inject(&mut result);
        Self { status, result }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.result)
    }
}

/// Admission + invocation pipeline over a fixed handler registry
#[derive(Debug, Clone)]
pub struct RpcDispatcher {
    registry: Arc<HandlerRegistry>,
    invoker: Invoker,
}

impl RpcDispatcher {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self::with_request_ids(registry, Arc::new(RequestIdGenerator::new()))
    }

    pub fn with_request_ids(
        registry: Arc<HandlerRegistry>,
        request_ids: Arc<RequestIdGenerator>,
    ) -> Self {
        Self {
            registry,
            invoker: Invoker::new(request_ids),
        }
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    pub fn request_ids(&self) -> &Arc<RequestIdGenerator> {
        self.invoker.request_ids()
    }

    /// Execute the command described by `ctx`
    ///
    /// Never fails: every outcome is a status plus a populated document.
    pub async fn do_command(&self, ctx: &mut Context) -> CommandResponse {
        let handler = match fill_handler(ctx, &self.registry) {
            Ok(handler) => handler,
            Err(status) => return CommandResponse::rejected(status),
        };

        let Some(method) = handler.method.clone() else {
            return CommandResponse::rejected(ErrorCode::UnknownCommand.into());
        };

        let mut result = JsonObject::new();
        let status = if ctx.headers.is_identified() {
            debug!(
                command = handler.name,
                user = %ctx.headers.user,
                forwarded_for = %ctx.headers.forwarded_for,
                "start command"
            );
            let status =
                get_result(&self.invoker, ctx, method.as_ref(), handler.name, &mut result).await;
            debug!(
                command = handler.name,
                user = %ctx.headers.user,
                forwarded_for = %ctx.headers.forwarded_for,
                load = %ctx.load_type,
                fee = ctx.load_type.cost(),
                "finish command"
            );
            status
        } else {
            get_result(&self.invoker, ctx, method.as_ref(), handler.name, &mut result).await
        };

        CommandResponse { status, result }
    }

    pub fn role_required(&self, method: &str) -> Role {
        role_required(&self.registry, method)
    }
}

/// Minimum role for `method`, or `Forbid` if no such command exists
///
/// Lets transports gate persistent subscriptions before a full context
/// exists.
pub fn role_required(registry: &HandlerRegistry, method: &str) -> Role {
    registry.get(method).map_or(Role::Forbid, |handler| handler.role)
}
