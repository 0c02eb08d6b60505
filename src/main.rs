mod cache;
mod config;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
mod utils;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use middleware::cors::cors_middleware;
use services::fetcher::UpstreamClient;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::default();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(if config.is_development() {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    info!("🏰 Guild Roster - Lista de miembros en streaming");
    info!("================================================");

    // Cliente upstream y estado compartido (fetcher + caches)
    let upstream = match UpstreamClient::new(&config.upstream_base_url) {
        Ok(client) => {
            info!("✅ Cliente upstream listo: {}", config.upstream_base_url);
            client
        }
        Err(e) => {
            error!("❌ Error creando el cliente upstream: {}", e);
            return Err(anyhow::anyhow!("Error de cliente HTTP: {}", e));
        }
    };

    let app_state = AppState::new(config.clone(), Arc::new(upstream));

    let app = Router::new()
        .route("/", get(status_endpoint))
        .nest("/public", routes::static_routes::create_static_router())
        .nest("/guilds", routes::guild_routes::create_guild_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware())
        .with_state(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  / - Status del servidor");
    info!("   GET  /public/:file - Archivos estáticos");
    info!("   GET  /guilds/:guildId?sort=resets|vocation|alphabetical - Lista de la guild");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Status simple para chequear que el proceso está vivo
async fn status_endpoint() -> Json<serde_json::Value> {
    Json(json!({ "message": "Server running" }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
