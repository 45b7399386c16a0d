use std::sync::Arc;

use certchain_registry::Registry;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::router::build_router;

/// Certificate verification server.
pub struct CertServer {
    config: ServerConfig,
    registry: Arc<Registry>,
}

impl CertServer {
    /// Build a server over a fresh registry.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let registry = Arc::new(Registry::new(config.registry.clone())?);
        Ok(Self { config, registry })
    }

    /// Build a server over a registry shared with another surface.
    pub fn with_registry(config: ServerConfig, registry: Arc<Registry>) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.registry))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("certchain server listening on {}", self.config.bind_addr);
        axum::serve(listener, app).await?;
        Ok(())
    }
}
