//! Modelos de personaje
//!
//! Un personaje aparece primero en el roster de la guild (datos base) y se
//! completa con los detalles de su propia página (resets y skin).

use serde::{Deserialize, Serialize};

/// Personaje tal como aparece en el roster de la guild
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseCharacter {
    pub name: String,
    pub vocation: String,
    pub level: u32,
    pub online: bool,
}

/// Detalles obtenidos de la página del personaje
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterDetails {
    pub resets: u32,
    pub skin: String,
}

/// Personaje completo: roster + detalles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub vocation: String,
    pub level: u32,
    pub online: bool,
    pub resets: u32,
    pub skin: String,
}

/// Vocación usada en los registros centinela de fallo
pub const FAILED_VOCATION: &str = "Erro";

impl Character {
    /// Combina los datos del roster con los detalles de la página del personaje
    pub fn from_parts(base: &BaseCharacter, details: CharacterDetails) -> Self {
        Self {
            name: base.name.clone(),
            vocation: base.vocation.clone(),
            level: base.level,
            online: base.online,
            resets: details.resets,
            skin: details.skin,
        }
    }

    /// Registro centinela para un miembro cuyo fetch falló. Conserva el
    /// nombre y el estado online del roster; el resto queda en valores
    /// marcadores para que la lista nunca pierda miembros.
    pub fn failed(base: &BaseCharacter) -> Self {
        Self {
            name: base.name.clone(),
            vocation: FAILED_VOCATION.to_string(),
            level: 0,
            online: base.online,
            resets: 0,
            skin: String::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.vocation == FAILED_VOCATION
    }
}
