//! Ordenamiento de miembros
//!
//! Los tres criterios del query param `sort`. Todos los sorts son estables:
//! claves iguales conservan el orden de entrada.

use crate::models::Character;

/// Orden de prioridad de vocaciones para `sort=vocation`. Vocaciones fuera
/// de la lista van después de todas las conocidas.
const VOCATION_ORDER: [&str; 4] = ["druid", "sorcerer", "paladin", "knight"];

/// Criterio de ordenamiento pedido en el query string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    Resets,
    Vocation,
    Alphabetical,
}

impl SortMode {
    /// Valor desconocido o ausente cae en alfabético
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("resets") => SortMode::Resets,
            Some("vocation") => SortMode::Vocation,
            _ => SortMode::Alphabetical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Resets => "resets",
            SortMode::Vocation => "vocation",
            SortMode::Alphabetical => "alphabetical",
        }
    }
}

fn vocation_rank(vocation: &str) -> usize {
    let vocation = vocation.to_lowercase();
    VOCATION_ORDER
        .iter()
        .position(|known| *known == vocation)
        .unwrap_or(VOCATION_ORDER.len())
}

/// Ordena in-place según el criterio:
/// - `resets`: resets descendente.
/// - `vocation`: druid > sorcerer > paladin > knight, y dentro de la misma
///   vocación resets descendente.
/// - `alphabetical`: nombre ascendente, case-insensitive.
pub fn sort_characters(mode: SortMode, characters: &mut [Character]) {
    match mode {
        SortMode::Resets => {
            characters.sort_by(|a, b| b.resets.cmp(&a.resets));
        }
        SortMode::Vocation => {
            characters.sort_by(|a, b| {
                vocation_rank(&a.vocation)
                    .cmp(&vocation_rank(&b.vocation))
                    .then(b.resets.cmp(&a.resets))
            });
        }
        SortMode::Alphabetical => {
            characters.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
    }
}
