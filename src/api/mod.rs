//! API module for the playlist analyzer
//!
//! Provides the REST endpoints used by the web UI and the browser extension.

#[cfg(feature = "api")]
use {
    crate::config::Config,
    crate::playlist::PlaylistAggregator,
    anyhow::Result,
    std::sync::Arc,
    tokio::task::JoinHandle,
    tracing::info,
};

pub mod handlers;
pub mod models;
#[cfg(feature = "api")]
pub mod server;

/// API server for handling REST requests
#[cfg(feature = "api")]
pub struct ApiServer {
    aggregator: PlaylistAggregator,
    config: Arc<Config>,
}

#[cfg(feature = "api")]
impl ApiServer {
    /// Create a new API server
    pub fn new(aggregator: PlaylistAggregator, config: Arc<Config>) -> Self {
        Self { aggregator, config }
    }

    /// Start the API server in the background
    pub fn start_background(self) -> JoinHandle<Result<()>> {
        tokio::spawn(async move { self.start().await })
    }

    /// Start the API server
    pub async fn start(self) -> Result<()> {
        info!(
            "🚀 Starting API server on port {} ({} concurrent batches)",
            self.config.server.port, self.config.aggregation.concurrent_batches
        );

        server::start_http_server(self.config, self.aggregator).await
    }
}
