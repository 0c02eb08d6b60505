//! Enriquecimiento concurrente de miembros
//!
//! Fan-out: una tarea por miembro del roster, todas en paralelo y sin tope
//! de concurrencia (el fan-out es el tamaño del roster). Fan-in con
//! `join_all`, que además es la barrera: el resultado recién está
//! disponible cuando todos los fetches terminaron, con éxito o no.

use futures::future::join_all;

use crate::models::{BaseCharacter, Character};
use crate::services::fetcher::PageFetcher;
use crate::services::parser;

/// Busca los detalles de cada miembro y los combina con los datos del
/// roster. Un fallo de fetch de un miembro se convierte en su registro
/// centinela y nunca aborta a los hermanos ni al request. El orden del
/// resultado no es significativo: el llamador debe ordenar.
pub async fn enrich_members(
    fetcher: &PageFetcher,
    base_url: &str,
    roster: &[BaseCharacter],
) -> Vec<Character> {
    log::info!("🔍 Buscando detalles de {} miembros...", roster.len());

    let tasks = roster.iter().map(|member| async move {
        match fetcher.character_page(&member.name).await {
            Ok(html) => Character::from_parts(member, parser::parse_character(base_url, &html)),
            Err(e) => {
                log::warn!("⚠️ Fallo el fetch del personaje {}: {}", member.name, e);
                Character::failed(member)
            }
        }
    });

    let characters = join_all(tasks).await;
    log::info!(
        "📥 {} miembros enriquecidos ({} con fallo)",
        characters.len(),
        characters.iter().filter(|c| c.is_failed()).count()
    );
    characters
}
