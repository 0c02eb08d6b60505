//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. El fetcher (con sus dos caches adentro)
//! se crea una sola vez en el arranque y vive hasta el final del proceso.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::fetcher::{PageFetcher, PageSource};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub fetcher: Arc<PageFetcher>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, source: Arc<dyn PageSource>) -> Self {
        let fetcher = Arc::new(PageFetcher::new(source, config.cache_ttl()));
        Self { config, fetcher }
    }
}
