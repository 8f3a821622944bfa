//! Irrigation Dashboard
//!
//! Operator console for an irrigation monitoring backend: login gate, live
//! sensor grid, manual watering, crop assignment, schedules and watering
//! history. The backend is reached over HTTP; the console itself is served
//! locally as server-rendered pages.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod io;
pub mod live_update;
pub mod moisture;
pub mod render;
pub mod server;
pub mod state;
pub mod sync;
pub mod view;

pub use config::{load_config, Config};
pub use controller::{Dashboard, Gate};
pub use error::{DashboardError, Result};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::backend::BackendClient;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::sync::Synchronizer;

/// Builder for the dashboard service.
///
/// The HTTP transport and the cancellation token can be injected; otherwise a
/// reqwest client with a cookie store and a fresh token are used.
pub struct DashboardBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    cancel: Option<CancellationToken>,
}

impl DashboardBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            cancel: None,
        }
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Wire the components together and bind the listener
    pub async fn build(self) -> Result<BoundDashboard> {
        self.config.validate()?;
        let http: Arc<dyn HttpClient> = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::new()?),
        };
        let cancel = self.cancel.unwrap_or_default();

        let backend = Arc::new(BackendClient::new(&self.config.backend.base_url, http));
        let sync = Arc::new(Synchronizer::new(
            backend,
            state::new_state_handle(),
            self.config.location,
        ));
        let dashboard = Arc::new(Dashboard::new(
            sync,
            self.config.polling.interval,
            cancel.clone(),
        ));

        let addr = format!(
            "{}:{}",
            self.config.server.bind_address, self.config.server.port
        );
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| DashboardError::Server(format!("Failed to bind {}: {}", addr, e)))?;
        let listen_addr = listener.local_addr()?;

        info!("Backend: {}", self.config.backend.base_url);
        info!("Live update interval: {:?}", self.config.polling.interval);
        println!("Bound irrigation dashboard bound_addr={}", listen_addr);
        info!("Bound irrigation dashboard bound_addr={}", listen_addr);

        Ok(BoundDashboard {
            listener,
            listen_addr,
            dashboard,
            cancel,
        })
    }
}

/// A dashboard whose listener is bound but not yet serving
pub struct BoundDashboard {
    listener: TcpListener,
    listen_addr: SocketAddr,
    dashboard: Arc<Dashboard>,
    cancel: CancellationToken,
}

impl BoundDashboard {
    pub fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
    }

    pub fn dashboard(&self) -> &Arc<Dashboard> {
        &self.dashboard
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Serve until ctrl-c or cancellation, then release the live-update loop
    pub async fn start(self) -> Result<()> {
        let cancel_for_signal = self.cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Shutdown signal received");
                    cancel_for_signal.cancel();
                }
                Err(e) => tracing::warn!("Failed to listen for ctrl-c: {}", e),
            }
        });

        let router = server::build_router(Arc::clone(&self.dashboard));
        info!("Dashboard listening on http://{}", self.listen_addr);

        let cancel = self.cancel.clone();
        let served = axum::serve(self.listener, router)
            .with_graceful_shutdown(async move {
                cancel.cancelled().await;
            })
            .await;

        self.dashboard.shutdown().await;
        info!("Irrigation dashboard stopped");

        served.map_err(|e| DashboardError::Server(e.to_string()))
    }
}
