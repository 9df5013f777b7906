// Response Assembler - wraps one invocation in a `result` envelope

use super::context::Context;
use super::invoker::Invoker;
use super::registry::RpcMethod;
use crate::domain::{JsonObject, Status};
use serde_json::Value;
use tracing::debug;

/// Request fields never echoed back to the caller
pub const MASKED_FIELDS: [&str; 4] = ["passphrase", "secret", "seed", "seed_hex"];

/// Placeholder written over masked fields
pub const MASK: &str = "<masked>";

/// Invoke `method` and store its output under `object["result"]`
///
/// On success the result gets `status: "success"`. On failure it gets the
/// error fields, `status: "error"` and a redacted copy of the request.
pub async fn get_result(
    invoker: &Invoker,
    ctx: &mut Context,
    method: &dyn RpcMethod,
    name: &str,
    object: &mut JsonObject,
) -> Status {
    let mut result = JsonObject::new();
    let status = invoker.call_method(ctx, method, name, &mut result).await;

    if status.is_success() {
        result.insert("status".into(), Value::from("success"));
    } else {
        debug!(command = name, status = %status, "rpcError");
        status.inject(&mut result);
        result.insert("status".into(), Value::from("error"));
        result.insert(
            "request".into(),
            Value::Object(redact_request(&ctx.params)),
        );
    }

    object.insert("result".into(), Value::Object(result));
    status
}

/// Copy of `params` with secret-bearing fields masked
pub fn redact_request(params: &JsonObject) -> JsonObject {
    let mut request = params.clone();
    for field in MASKED_FIELDS {
        if let Some(value) = request.get_mut(field) {
            *value = Value::from(MASK);
        }
    }
    request
}
