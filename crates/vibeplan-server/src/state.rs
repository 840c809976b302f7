use crate::crawl::FetchTimeouts;
use crate::error::AppError;
use llm_client::{Endpoints, LlmClient, Vendor};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use vibeplan_core::Store;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub store: Arc<Mutex<Store>>,
    pub http: reqwest::Client,
    pub endpoints: Endpoints,
    pub fetch: FetchTimeouts,
}

impl AppState {
    /// Open (creating if needed) the database under `data_dir`.
    pub fn new(data_dir: PathBuf) -> anyhow::Result<Self> {
        let store = Store::open_in(&data_dir)?;
        Ok(Self {
            data_dir,
            store: Arc::new(Mutex::new(store)),
            http: reqwest::Client::new(),
            endpoints: Endpoints::default(),
            fetch: FetchTimeouts::default(),
        })
    }

    /// Point vendor calls somewhere else, e.g. a local mock server.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// A vendor client that shares this state's connection pool.
    pub fn llm(&self, vendor: Vendor, api_key: &str) -> llm_client::Result<LlmClient> {
        Ok(LlmClient::new(vendor, api_key)?
            .with_http(self.http.clone())
            .with_endpoints(self.endpoints.clone()))
    }

    /// Run a blocking store operation off the async runtime.
    pub async fn with_store<F, R>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Store) -> vibeplan_core::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let mut guard = store
                .lock()
                .map_err(|_| AppError(anyhow::anyhow!("store lock poisoned")))?;
            f(&mut guard).map_err(AppError::from)
        })
        .await
        .map_err(AppError::join)?
    }

    /// Run blocking data-directory file I/O off the async runtime.
    pub async fn blocking<F, R>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(PathBuf) -> vibeplan_core::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let data_dir = self.data_dir.clone();
        tokio::task::spawn_blocking(move || f(data_dir).map_err(AppError::from))
            .await
            .map_err(AppError::join)?
    }
}
