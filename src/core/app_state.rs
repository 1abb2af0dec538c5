use std::sync::Arc;

use super::config::ScanConfig;

#[derive(Clone)]
pub struct AppState {
    pub http_client: reqwest::Client,
    pub config: ScanConfig,
    /// Bounds concurrent outbound fetches across in-flight requests.
    pub outbound_limit: Arc<tokio::sync::Semaphore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("port", &self.config.port)
            .field("outbound_limit", &self.config.outbound_limit)
            .finish()
    }
}

impl AppState {
    pub fn new(http_client: reqwest::Client, config: ScanConfig) -> Self {
        Self {
            http_client,
            outbound_limit: Arc::new(tokio::sync::Semaphore::new(config.outbound_limit)),
            config,
        }
    }
}
