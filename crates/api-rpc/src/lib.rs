//! JSON-RPC API Layer
//!
//! Transport for the ledger RPC gatekeeper: turns JSON-RPC 2.0 calls into
//! per-request contexts, runs them through the dispatcher, and ships the
//! built-in node commands.

pub mod error;
pub mod handler;
pub mod middleware;
pub mod server;
pub mod types;

pub use handler::builtin_registry;
pub use server::{RpcServer, RpcServerConfig};
