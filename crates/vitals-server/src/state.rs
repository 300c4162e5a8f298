use crate::config::ServerConfig;
use crate::report::{DocumentExporter, PdfExporter};
use crate::templates::Templates;
use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<ServerConfig>,
    pub templates: Arc<Templates>,
    pub exporter: Arc<dyn DocumentExporter>,
}

impl AppState {
    /// Create a new app state with the PDF exporter
    pub fn new(pool: SqlitePool, config: ServerConfig) -> Result<Self> {
        Ok(Self {
            pool,
            config: Arc::new(config),
            templates: Arc::new(Templates::new()?),
            exporter: Arc::new(PdfExporter),
        })
    }

    /// Swap the document exporter used by the report download
    pub fn with_exporter(mut self, exporter: Arc<dyn DocumentExporter>) -> Self {
        self.exporter = exporter;
        self
    }

    pub fn session_secret(&self) -> &str {
        &self.config.auth.session_secret
    }
}
