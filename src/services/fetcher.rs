//! Fetcher de páginas del sitio del juego
//!
//! Este módulo contiene el cliente HTTP hacia el sitio upstream y la capa
//! de cache sobre él. El sitio expone todo vía query params
//! (`?subtopic=...`) y responde HTML que se parsea aparte.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::RwLock;

use crate::cache::TtlCache;
use crate::utils::errors::{AppError, AppResult};

/// Fuente de páginas crudas. Abstrae el transporte para poder inyectar un
/// mock en los tests (contador de llamadas upstream).
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn guild_page(&self, guild_id: u32) -> AppResult<String>;
    async fn character_page(&self, name: &str) -> AppResult<String>;
}

/// Cliente real contra el sitio del juego. Un solo intento por request;
/// respuesta no-2xx o error de red suben como `AppError::Upstream`.
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// El sitio espera POST con los parámetros en el query string
    async fn post_page(&self, url: String) -> AppResult<String> {
        let response = self.client.post(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "{} respondió {}",
                url,
                response.status()
            )));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageSource for UpstreamClient {
    async fn guild_page(&self, guild_id: u32) -> AppResult<String> {
        let url = format!(
            "{}/?subtopic=guilds&action=show&guild={}",
            self.base_url, guild_id
        );
        self.post_page(url).await
    }

    async fn character_page(&self, name: &str) -> AppResult<String> {
        let url = format!(
            "{}/?subtopic=characters&name={}",
            self.base_url,
            urlencoding::encode(name)
        );
        self.post_page(url).await
    }
}

/// Capa de cache sobre un `PageSource`: consulta el cache, en miss (o
/// expirado) hace el fetch y guarda el body crudo con el TTL fijo.
/// Los caches son instancias explícitas creadas junto al fetcher en el
/// arranque del proceso; se comparten entre requests vía `RwLock`.
/// No hay dedup single-flight: dos misses simultáneos de la misma clave
/// pueden pegar dos veces al upstream, gana la última escritura.
pub struct PageFetcher {
    source: Arc<dyn PageSource>,
    guild_cache: RwLock<TtlCache<u32, String>>,
    character_cache: RwLock<TtlCache<String, String>>,
}

impl PageFetcher {
    pub fn new(source: Arc<dyn PageSource>, ttl: Duration) -> Self {
        Self {
            source,
            guild_cache: RwLock::new(TtlCache::new(ttl)),
            character_cache: RwLock::new(TtlCache::new(ttl)),
        }
    }

    pub async fn guild_page(&self, guild_id: u32) -> AppResult<String> {
        {
            let cache = self.guild_cache.read().await;
            if let Some(html) = cache.get(&guild_id) {
                log::info!("✅ Guild {} encontrada en cache", guild_id);
                return Ok(html);
            }
            if cache.contains_stale(&guild_id) {
                log::info!("⚠️ Guild {} expirada en cache, refetch", guild_id);
            }
        }

        log::info!("🔍 Buscando guild {} en el sitio...", guild_id);
        let html = self.source.guild_page(guild_id).await?;
        log::info!("📥 Guild {} obtenida ({} bytes)", guild_id, html.len());

        self.guild_cache.write().await.insert(guild_id, html.clone());
        Ok(html)
    }

    pub async fn character_page(&self, name: &str) -> AppResult<String> {
        {
            let cache = self.character_cache.read().await;
            if let Some(html) = cache.get(&name.to_string()) {
                log::info!("✅ Personaje {} encontrado en cache", name);
                return Ok(html);
            }
            if cache.contains_stale(&name.to_string()) {
                log::info!("⚠️ Personaje {} expirado en cache, refetch", name);
            }
        }

        log::info!("🔍 Buscando personaje {} en el sitio...", name);
        let html = self.source.character_page(name).await?;
        log::info!("📥 Personaje {} obtenido ({} bytes)", name, html.len());

        self.character_cache
            .write()
            .await
            .insert(name.to_string(), html.clone());
        Ok(html)
    }
}
