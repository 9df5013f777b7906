// Application Layer - RPC admission, invocation and response assembly

pub mod admission;
pub mod context;
pub mod dispatcher;
pub mod invoker;
pub mod registry;
pub mod response;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use admission::fill_handler;
pub use context::{Context, NodeServices};
pub use dispatcher::{role_required, CommandResponse, RpcDispatcher};
pub use invoker::{Invoker, RequestIdGenerator};
pub use registry::{Handler, HandlerError, HandlerRegistry, HandlerRegistryBuilder, RpcMethod};
pub use response::{get_result, redact_request, MASKED_FIELDS, MASK};
