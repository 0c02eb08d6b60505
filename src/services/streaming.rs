//! Respuesta HTML incremental
//!
//! El template se parte en el marcador de miembros: la primera mitad (con
//! los escalares de la guild ya sustituidos) sale de inmediato para que el
//! cliente tenga first byte rápido y vea el loader; los cards salen recién
//! cuando el enriquecimiento + sort terminaron; al final el loader se
//! remueve, se emite el footer con la lista de nombres y el resto del
//! template, y el stream se cierra una sola vez.
//!
//! El productor escribe fragmentos en un canal y el body del response lo
//! drena: la generación de fragmentos queda desacoplada del timing de
//! escritura del transporte. Si el cliente se desconecta, el canal se
//! cierra y el productor corta en silencio.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use tokio::sync::mpsc;

use crate::models::{Character, Guild};
use crate::services::enrichment::enrich_members;
use crate::services::fetcher::PageFetcher;
use crate::services::sort::{sort_characters, SortMode};
use crate::utils::errors::{AppError, AppResult};

/// Punto de corte del template: todo lo anterior sale antes de los datos
/// de miembros, todo lo posterior sale al final
pub const MEMBER_SECTION_MARKER: &str = "<!-- {{MEMBERS}} -->";

/// Sustituye los escalares de la guild en los placeholders del template
pub fn render_template(template: &str, guild: &Guild) -> String {
    template
        .replace("{{GUILD_ID}}", &guild.id.to_string())
        .replace("{{GUILD_NAME}}", &guild.name)
        .replace("{{GUILD_DESC}}", &guild.description)
        .replace("{{ONLINE}}", &guild.online.to_string())
        .replace("{{MEMBERS}}", &guild.members.to_string())
        .replace("{{MAX_MEMBERS}}", &guild.max_members.to_string())
}

/// Parte el template en el marcador, descartándolo de ambos segmentos.
/// El corte va antes de la sustitución de placeholders: el contador
/// `{{MEMBERS}}` del header comparte el token con el marcador y una
/// sustitución global lo rompería.
pub fn split_template(template: &str) -> AppResult<(String, String)> {
    match template.find(MEMBER_SECTION_MARKER) {
        Some(at) => {
            let before = template[..at].to_string();
            let after = template[at + MEMBER_SECTION_MARKER.len()..].to_string();
            Ok((before, after))
        }
        None => Err(AppError::Internal(format!(
            "template sin el marcador {}",
            MEMBER_SECTION_MARKER
        ))),
    }
}

/// Card autocontenido de un miembro
pub fn render_member_card(character: &Character) -> String {
    format!(
        r#"
        <div class="member-card">
          <div class="member-info">
            <img src="{skin}" alt="{name}" class="skin" width="64" height="64">
            <img src="/public/pedestal.gif" alt="pedestal" class="pedestal" width="64" height="64">
            <div>
              <h3 class="member-name">{name}</h3><br>
              <small>Lv {level} — {vocation}</small><br>
              <small>Resets: {resets}</small>
            </div>
          </div>
          <button class="copy-btn" onclick="navigator.clipboard.writeText('{name}')">Copiar</button>
        </div>
      "#,
        skin = character.skin,
        name = character.name,
        level = character.level,
        vocation = character.vocation,
        resets = character.resets,
    )
}

const LOADER_REMOVAL: &str = r#"<script>
        const loader = document.getElementById('loading');
        if (loader) loader.remove();
      </script>"#;

/// Footer con todos los nombres, uno por línea, para copiar de un saque
fn render_footer(sorted: &[Character]) -> String {
    let names = sorted
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"
        <footer>
          <h2>Lista de membros</h2>
          <textarea readonly rows="8">{}</textarea>
          <br>
          <button onclick="navigator.clipboard.writeText(document.querySelector('textarea').value)">Copiar nomes</button>
        </footer>
      "#,
        names
    )
}

/// Todo lo que el productor necesita para armar el stream de un request
pub struct StreamContext {
    pub fetcher: Arc<PageFetcher>,
    pub base_url: String,
    pub guild: Guild,
    pub sort_mode: SortMode,
    pub before: String,
    pub after: String,
}

/// Body del response: el productor corre como tarea propia y el stream
/// drena el canal hasta que se cierra
pub fn stream_guild_page(ctx: StreamContext) -> Body {
    let (tx, rx) = mpsc::channel::<Bytes>(32);
    tokio::spawn(produce_fragments(ctx, tx));

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv()
            .await
            .map(|chunk| (Ok::<Bytes, Infallible>(chunk), rx))
    });
    Body::from_stream(stream)
}

async fn produce_fragments(ctx: StreamContext, tx: mpsc::Sender<Bytes>) {
    // Header antes de cualquier dato de miembros; el marcador sale tal
    // cual, como referencia visible del punto de inserción
    if send(&tx, ctx.before).await.is_err() {
        return;
    }
    if send(&tx, MEMBER_SECTION_MARKER.to_string()).await.is_err() {
        return;
    }

    // Barrera: enriquecer todos los miembros y recién ahí ordenar
    let mut characters = enrich_members(&ctx.fetcher, &ctx.base_url, &ctx.guild.list).await;
    sort_characters(ctx.sort_mode, &mut characters);

    for character in &characters {
        if send(&tx, render_member_card(character)).await.is_err() {
            log::debug!("Cliente desconectado durante el stream de cards");
            return;
        }
    }

    let _ = send(&tx, LOADER_REMOVAL.to_string()).await;
    let _ = send(&tx, "</div>".to_string()).await;
    let _ = send(&tx, render_footer(&characters)).await;
    let _ = send(&tx, ctx.after).await;
    // El canal se cierra al dropear tx: fin del stream
}

async fn send(tx: &mpsc::Sender<Bytes>, fragment: String) -> Result<(), ()> {
    tx.send(Bytes::from(fragment)).await.map_err(|_| ())
}
