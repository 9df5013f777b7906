//! Admission - decides whether a request may reach its handler
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. load shedding (limited callers only)
//! 2. command resolution from `command` / `method`
//! 3. registry lookup
//! 4. authorization
//! 5. network connectivity
//! 6. amendment block
//! 7. ledger freshness (skipped in standalone mode)
//! 8. closed ledger availability
//!
//! Authorization precedes every node-state check so unauthorized callers
//! never learn the node's sync state.

use super::context::Context;
use super::registry::{Handler, HandlerRegistry};
use crate::config::MAX_LEDGER_LAG;
use crate::domain::{Condition, ErrorCode, JobType, JsonObject, OperatingMode, Role, Status};
use serde_json::Value;
use tracing::{debug, info, trace};

/// Resolve and vet the handler for `ctx`
///
/// Has no side effects beyond logging.
pub fn fill_handler<'r>(
    ctx: &Context,
    registry: &'r HandlerRegistry,
) -> Result<&'r Handler, Status> {
    let config = ctx.config();

    if !ctx.role.is_unlimited() {
        let job_count = ctx.services.job_queue.job_count_ge(JobType::Client);
        if job_count > config.max_job_queue_clients {
            debug!(job_count, "Too busy for command");
            return Err(ErrorCode::TooBusy.into());
        }
    }

    let command = resolve_command(&ctx.params)?;

    trace!(command = %command, "COMMAND");
    trace!(request = ?ctx.params, "REQUEST");

    let handler = registry
        .get(&command)
        .ok_or_else(|| Status::new(ErrorCode::UnknownCommand))?;

    if handler.role == Role::Admin && ctx.role != Role::Admin {
        return Err(ErrorCode::NoPermission.into());
    }

    if handler.condition.contains(Condition::NEEDS_NETWORK_CONNECTION) {
        let mode = ctx.services.network_ops.operating_mode();
        if mode < OperatingMode::Syncing {
            info!(mode = %mode, "Insufficient network mode for RPC");
            return Err(ErrorCode::NoNetwork.into());
        }
    }

    let needs_ledger = Condition::NEEDS_CURRENT_LEDGER | Condition::NEEDS_CLOSED_LEDGER;
    if ctx.services.network_ops.is_amendment_blocked()
        && handler.condition.intersects(needs_ledger)
    {
        return Err(ErrorCode::AmendmentBlocked.into());
    }

    if !config.standalone && handler.condition.contains(Condition::NEEDS_CURRENT_LEDGER) {
        let ledger_master = &ctx.services.ledger_master;

        if ledger_master.validated_ledger_age() > config.max_validated_ledger_age {
            return Err(ErrorCode::NoCurrent.into());
        }

        let current = ledger_master.current_ledger_index();
        let valid = ledger_master.valid_ledger_index();
        if u64::from(current) + u64::from(MAX_LEDGER_LAG) < u64::from(valid) {
            debug!(
                current_index = current,
                validated_index = valid,
                "Current ledger ID is less than validated ledger ID"
            );
            return Err(ErrorCode::NoCurrent.into());
        }
    }

    if handler.condition.contains(Condition::NEEDS_CLOSED_LEDGER)
        && ctx.services.ledger_master.closed_ledger().is_none()
    {
        return Err(ErrorCode::NoClosed.into());
    }

    Ok(handler)
}

/// Extract the command name from `command` or `method`
///
/// When both are present they must agree; `command` wins otherwise.
pub fn resolve_command(params: &JsonObject) -> Result<String, Status> {
    let command = params.get("command");
    let method = params.get("method");

    let value = match (command, method) {
        (None, None) => return Err(ErrorCode::CommandMissing.into()),
        (Some(command), Some(method)) => {
            let command = command_string(command)?;
            if command != command_string(method)? {
                return Err(ErrorCode::UnknownCommand.into());
            }
            return Ok(command);
        }
        (Some(value), None) | (None, Some(value)) => value,
    };

    command_string(value)
}

/// Scalar values name a command by their string form; containers never do
fn command_string(value: &Value) -> Result<String, Status> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => Err(ErrorCode::UnknownCommand.into()),
    }
}
