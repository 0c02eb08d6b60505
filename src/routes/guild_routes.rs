//! Ruta de guilds
//!
//! `GET /guilds/:guild_id?sort=<modo>` responde el HTML de la lista de
//! miembros en streaming. Un id no numérico cae en la guild por defecto;
//! un modo de sort desconocido cae en alfabético.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::services::parser;
use crate::services::sort::SortMode;
use crate::services::streaming::{self, StreamContext};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_guild_router() -> Router<AppState> {
    Router::new().route("/:guild_id", get(stream_guild))
}

#[derive(Debug, Deserialize)]
struct GuildQuery {
    sort: Option<String>,
}

async fn stream_guild(
    State(state): State<AppState>,
    Path(guild_id): Path<String>,
    Query(query): Query<GuildQuery>,
) -> Result<Response, AppError> {
    let guild_id: u32 = guild_id
        .parse()
        .unwrap_or(state.config.fallback_guild_id);
    let sort_mode = SortMode::parse(query.sort.as_deref());
    log::info!("🏰 Guild {} pedida con sort={}", guild_id, sort_mode.as_str());

    // El fetch de la guild pasa antes de empezar a responder: si falla,
    // el cliente recibe un error HTTP y nunca un stream cortado a la mitad
    let guild_html = state.fetcher.guild_page(guild_id).await?;
    let guild = parser::parse_guild(guild_id, &guild_html);

    let template_path = format!("{}/list.html", state.config.public_dir);
    let template = tokio::fs::read_to_string(&template_path)
        .await
        .map_err(|e| AppError::Internal(format!("no se pudo leer {}: {}", template_path, e)))?;

    // Split antes de sustituir: el contador {{MEMBERS}} comparte token
    // con el marcador de corte
    let (before, after) = streaming::split_template(&template)?;
    let before = streaming::render_template(&before, &guild);
    let after = streaming::render_template(&after, &guild);

    let body = streaming::stream_guild_page(StreamContext {
        fetcher: Arc::clone(&state.fetcher),
        base_url: state.config.upstream_base_url.clone(),
        guild,
        sort_mode,
        before,
        after,
    });

    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        body,
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
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    const GUILD_PAGE: &str = r##"
        <h1>Bubble Guild</h1>
        <p>A guerra continua.</p>
        <td>2 membros. (Max: 80 Players )</td>
        <div class="TableContentAndRightShadow"><div><table>
          <tr><td>Leader</td>
              <td><a href="#">Zeze</a></td>
              <td>Master Sorcerer</td>
              <td>717</td>
              <td class="onlinestatus"><span class="green">online</span></td></tr>
          <tr><td>Member</td>
              <td><a href="#">Ana</a></td>
              <td>Elder Druid</td>
              <td>312</td>
              <td class="onlinestatus"><span class="red">offline</span></td></tr>
        </table></div></div>"##;

    struct SiteMock {
        guild_calls: AtomicUsize,
    }

    #[async_trait]
    impl PageSource for SiteMock {
        async fn guild_page(&self, guild_id: u32) -> AppResult<String> {
            self.guild_calls.fetch_add(1, Ordering::SeqCst);
            if guild_id == 362 {
                Ok(GUILD_PAGE.to_string())
            } else {
                Err(AppError::Upstream(format!("guild {} no existe", guild_id)))
            }
        }

        async fn character_page(&self, name: &str) -> AppResult<String> {
            if name == "Ana" {
                return Err(AppError::Upstream("timeout".to_string()));
            }
            Ok("<table><tr><td>Resets:</td><td>42</td></tr></table>".to_string())
        }
    }

    fn test_public_dir(label: &str) -> String {
        let dir = std::env::temp_dir().join(format!(
            "guild_roster_routes_{}_{}",
            std::process::id(),
            label
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("list.html"),
            "<html><body><h1>{{GUILD_NAME}}</h1>\
             <div id=\"loading\">Carregando...</div>\
             <div id=\"members\"><!-- {{MEMBERS}} --></body></html>",
        )
        .unwrap();
        dir.to_string_lossy().into_owned()
    }

    fn test_app(label: &str) -> Router {
        let config = EnvironmentConfig {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            upstream_base_url: "https://baiaksp.online".to_string(),
            fallback_guild_id: 362,
            public_dir: test_public_dir(label),
            cache_ttl_seconds: 360,
        };
        let state = AppState::new(
            config,
            Arc::new(SiteMock {
                guild_calls: AtomicUsize::new(0),
            }),
        );
        Router::new()
            .nest("/guilds", create_guild_router())
            .with_state(state)
    }

    async fn body_string(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn streams_header_cards_and_footer_in_order() {
        let (status, body) = body_string(test_app("order"), "/guilds/362").await;
        assert_eq!(status, StatusCode::OK);

        let header_at = body.find("Bubble Guild").unwrap();
        let marker_at = body.find("<!-- {{MEMBERS}} -->").unwrap();
        let first_card = body.find("member-card").unwrap();
        let footer_at = body.find("<footer>").unwrap();
        let tail_at = body.rfind("</body>").unwrap();

        assert!(header_at < marker_at);
        assert!(marker_at < first_card);
        assert!(first_card < footer_at);
        assert!(footer_at < tail_at);
    }

    #[tokio::test]
    async fn failed_member_appears_as_sentinel_card() {
        let (_, body) = body_string(test_app("sentinel"), "/guilds/362").await;

        // Ana falló: card presente con vocación Erro y level 0
        assert!(body.contains("Ana"));
        assert!(body.contains("Lv 0 — Erro"));
        assert!(body.contains("Resets: 0"));
        // Zeze salió bien
        assert!(body.contains("Resets: 42"));
    }

    #[tokio::test]
    async fn footer_lists_all_member_names() {
        let (_, body) = body_string(test_app("footer"), "/guilds/362?sort=alphabetical").await;
        assert!(body.contains("Ana\nZeze"));
    }

    #[tokio::test]
    async fn non_numeric_guild_id_uses_fallback() {
        let (status, body) = body_string(test_app("fallback"), "/guilds/abc").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Bubble Guild"));
    }

    #[tokio::test]
    async fn unknown_sort_falls_back_to_alphabetical() {
        let (status, body) = body_string(test_app("badsort"), "/guilds/362?sort=banana").await;
        assert_eq!(status, StatusCode::OK);
        let ana = body.find("member-name\">Ana").unwrap();
        let zeze = body.find("member-name\">Zeze").unwrap();
        assert!(ana < zeze);
    }

    #[tokio::test]
    async fn resets_sort_orders_cards_descending() {
        let (_, body) = body_string(test_app("resets"), "/guilds/362?sort=resets").await;
        // Zeze (42 resets) antes que Ana (centinela, 0)
        let zeze = body.find("member-name\">Zeze").unwrap();
        let ana = body.find("member-name\">Ana").unwrap();
        assert!(zeze < ana);
    }

    #[tokio::test]
    async fn guild_level_failure_is_a_502_not_a_torn_stream() {
        let (status, body) = body_string(test_app("guildfail"), "/guilds/999").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("UPSTREAM_ERROR"));
        assert!(!body.contains("member-card"));
    }
}
