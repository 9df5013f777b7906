// Ledger RPC Core - Admission, Invocation & Response Pipeline
// NO infrastructure dependencies (hexagonal architecture)

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{
    role_required, CommandResponse, Context, Handler, HandlerError, HandlerRegistry,
    NodeServices, RpcDispatcher, RpcMethod,
};
pub use config::RpcConfig;
pub use domain::{Condition, ErrorCode, JsonObject, LoadType, Role, Status};
pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
