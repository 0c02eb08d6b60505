//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::time::Duration;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    /// URL base del sitio del juego (sin slash final)
    pub upstream_base_url: String,
    /// Guild usada cuando el id de la ruta no es numérico
    pub fallback_guild_id: u32,
    pub public_dir: String,
    pub cache_ttl_seconds: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .unwrap_or_else(|_| "https://baiaksp.online".to_string()),
            fallback_guild_id: env::var("FALLBACK_GUILD_ID")
                .unwrap_or_else(|_| "362".to_string())
                .parse()
                .expect("FALLBACK_GUILD_ID must be a valid number"),
            public_dir: env::var("PUBLIC_DIR").unwrap_or_else(|_| "./public".to_string()),
            // 6 minutos, igual para guilds y personajes
            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .unwrap_or_else(|_| "360".to_string())
                .parse()
                .expect("CACHE_TTL_SECONDS must be a valid number"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// TTL de cache como Duration
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}
