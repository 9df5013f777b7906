//! JSON-RPC Server
//!
//! Exposes every registered command as a JSON-RPC 2.0 method over HTTP and
//! WebSocket. Each listener has a base caller role: the public listener
//! serves guests, the admin listener serves administrators. Behind a
//! trusted proxy, guests carrying identity headers become `Identified`.

use crate::error::{to_rpc_error, ServerError};
use crate::middleware::{caller_role, CallerHeadersLayer};
use crate::types::request_params;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::ErrorObjectOwned;
use jsonrpsee::RpcModule;
use ledger_rpc_core::domain::{Headers, JobType};
use ledger_rpc_core::{Context, NodeServices, Role, RpcDispatcher};
use ledger_rpc_infra_system::InFlightJobQueue;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 5005;
const DEFAULT_ADMIN_PORT: u16 = 5006;

/// Caller role granted to every request on a listener
pub fn role_for_listener(admin: bool) -> Role {
    if admin {
        Role::Admin
    } else {
        Role::Guest
    }
}

/// RPC Server Configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
    pub role: Role,
    /// Honor `X-User` / `X-Forwarded-For` when assigning the caller role
    pub trust_identity_headers: bool,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            role: role_for_listener(false),
            trust_identity_headers: false,
        }
    }
}

impl RpcServerConfig {
    /// Loopback admin listener
    pub fn admin() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_ADMIN_PORT,
            role: role_for_listener(true),
            trust_identity_headers: false,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    dispatcher: Arc<RpcDispatcher>,
    services: NodeServices,
    jobs: Arc<InFlightJobQueue>,
}

impl RpcServer {
    /// `jobs` must be the queue behind `services.job_queue` so in-flight
    /// requests count toward load shedding.
    pub fn new(
        config: RpcServerConfig,
        dispatcher: Arc<RpcDispatcher>,
        services: NodeServices,
        jobs: Arc<InFlightJobQueue>,
    ) -> Self {
        Self {
            config,
            dispatcher,
            services,
            jobs,
        }
    }

    /// Bind the listener and start serving
    ///
    /// Returns the bound address (useful with port 0) and the handle that
    /// stops the server.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .set_http_middleware(tower::ServiceBuilder::new().layer(CallerHeadersLayer))
            .build(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = server
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        let mut module = RpcModule::new(());
        let role = self.config.role;
        let trust_identity_headers = self.config.trust_identity_headers;

        for name in self.dispatcher.registry().names() {
            let dispatcher = self.dispatcher.clone();
            let services = self.services.clone();
            let jobs = self.jobs.clone();

            module
                .register_async_method(name, move |params, _, extensions| {
                    let dispatcher = dispatcher.clone();
                    let services = services.clone();
                    let jobs = jobs.clone();
                    async move {
                        let raw: Value = params.parse()?;
                        let mut params =
                            request_params(raw).map_err(|status| to_rpc_error(&status))?;
                        params.insert("method".into(), Value::from(name));

                        let headers = extensions.get::<Headers>().cloned().unwrap_or_default();
                        let role = caller_role(role, &headers, trust_identity_headers);

                        let _job = jobs.begin(JobType::Client);
                        let mut ctx = Context::new(params, role, services).with_headers(headers);
                        let response = dispatcher.do_command(&mut ctx).await;
                        debug!(
                            command = name,
                            role = %role,
                            load = %ctx.load_type,
                            fee = ctx.load_type.cost(),
                            "Request charged"
                        );
                        Ok::<Value, ErrorObjectOwned>(response.into_value())
                    }
                })
                .map_err(|e| ServerError::Register {
                    method: name.to_string(),
                    reason: e.to_string(),
                })?;
        }

        info!(
            addr = %local_addr,
            role = %role,
            methods = self.dispatcher.registry().len(),
            "JSON-RPC server started"
        );

        Ok((local_addr, server.start(module)))
    }
}
