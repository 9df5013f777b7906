//! Handler registry
//!
//! Maps command names to [`Handler`] descriptors. Built once at startup
//! through [`HandlerRegistryBuilder`], then shared read-only behind an
//! `Arc`; lookups take no locks.

use super::context::Context;
use crate::domain::{Condition, JsonObject, Role, Status};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Unexpected failure raised by a command implementation
///
/// Expected rejections are reported as a failing [`Status`] instead.
/// The invoker turns any `HandlerError` into `internal`.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Entry point of one command
///
/// Implementations write their output into `result` and return the
/// command's status.
#[async_trait]
pub trait RpcMethod: Send + Sync {
    async fn call(
        &self,
        ctx: &mut Context,
        result: &mut JsonObject,
    ) -> std::result::Result<Status, HandlerError>;
}

/// Registry entry for one command
#[derive(Clone)]
pub struct Handler {
    pub name: &'static str,
    pub role: Role,
    pub condition: Condition,
    pub method: Option<Arc<dyn RpcMethod>>,
}

impl Handler {
    pub fn new(
        name: &'static str,
        role: Role,
        condition: Condition,
        method: impl RpcMethod + 'static,
    ) -> Self {
        Self {
            name,
            role,
            condition,
            method: Some(Arc::new(method)),
        }
    }

    /// Descriptor with no entry point (dispatch answers `unknownCmd`)
    pub fn without_method(name: &'static str, role: Role, condition: Condition) -> Self {
        Self {
            name,
            role,
            condition,
            method: None,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("condition", &self.condition)
            .field("has_method", &self.method.is_some())
            .finish()
    }
}

/// Immutable name-keyed handler table
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, Handler>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered command names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[derive(Default)]
pub struct HandlerRegistryBuilder {
    handlers: HashMap<&'static str, Handler>,
}

impl HandlerRegistryBuilder {
    /// Add a handler; a second registration under the same name is an error
    pub fn register(mut self, handler: Handler) -> Result<Self> {
        if handler.name.is_empty() {
            return Err(AppError::Config("handler name must not be empty".to_string()));
        }
        if self.handlers.contains_key(handler.name) {
            return Err(AppError::DuplicateHandler(handler.name.to_string()));
        }
        debug!(
            command = handler.name,
            role = %handler.role,
            condition = %handler.condition,
            "Registered RPC handler"
        );
        self.handlers.insert(handler.name, handler);
        Ok(self)
    }

    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            handlers: self.handlers,
        }
    }
}
