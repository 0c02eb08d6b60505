//! Archivos estáticos
//!
//! `GET /public/:file` sirve un archivo del directorio público con el
//! content-type inferido de la extensión. El parámetro es un nombre de
//! archivo pelado: cualquier componente de path se rechaza como 404.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::path::PathBuf;

use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_static_router() -> Router<AppState> {
    Router::new().route("/:file", get(serve_file))
}

/// Content-type por extensión; extensión desconocida → octet-stream
fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match extension.as_str() {
        "css" => "text/css",
        "js" => "application/javascript",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "html" => "text/html",
        _ => "application/octet-stream",
    }
}

async fn serve_file(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Response, AppError> {
    if file.contains('/') || file.contains('\\') || file.contains("..") {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    let path = PathBuf::from(&state.config.public_dir).join(&file);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound("File not found".to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, content_type_for(&file))],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::environment::EnvironmentConfig;
    use crate::services::fetcher::PageSource;
    use crate::utils::errors::AppResult;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct NoSite;

    #[async_trait]
    impl PageSource for NoSite {
        async fn guild_page(&self, _guild_id: u32) -> AppResult<String> {
            unreachable!()
        }

        async fn character_page(&self, _name: &str) -> AppResult<String> {
            unreachable!()
        }
    }

    fn test_app(label: &str) -> Router {
        let dir = std::env::temp_dir().join(format!(
            "guild_roster_static_{}_{}",
            std::process::id(),
            label
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("styles.css"), "body { margin: 0; }").unwrap();
        std::fs::write(dir.join("notes.xyz"), "raw").unwrap();

        let config = EnvironmentConfig {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            upstream_base_url: "https://baiaksp.online".to_string(),
            fallback_guild_id: 362,
            public_dir: dir.to_string_lossy().into_owned(),
            cache_ttl_seconds: 360,
        };
        let state = AppState::new(config, Arc::new(NoSite));
        Router::new()
            .nest("/public", create_static_router())
            .with_state(state)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        (status, content_type)
    }

    #[tokio::test]
    async fn css_file_is_served_with_its_content_type() {
        let (status, content_type) = get(test_app("css"), "/public/styles.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/css"));
    }

    #[tokio::test]
    async fn unknown_extension_falls_back_to_octet_stream() {
        let (status, content_type) = get(test_app("xyz"), "/public/notes.xyz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/octet-stream"));
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let (status, _) = get(test_app("missing"), "/public/nope.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn path_components_are_rejected() {
        let (status, _) = get(test_app("traversal"), "/public/..%2Fsecret.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn content_type_covers_the_known_extensions() {
        assert_eq!(content_type_for("a.js"), "application/javascript");
        assert_eq!(content_type_for("a.PNG"), "image/png");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a.svg"), "image/svg+xml");
        assert_eq!(content_type_for("a.html"), "text/html");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
