//! Modelo de guild

use serde::{Deserialize, Serialize};

use super::character::BaseCharacter;

/// Guild con sus campos escalares y el roster de miembros.
/// `list` viene filtrada desde el parser: solo miembros con nombre y
/// vocación no vacíos y level > 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guild {
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Cantidad de miembros online
    pub online: u32,
    pub members: u32,
    pub max_members: u32,
    pub list: Vec<BaseCharacter>,
}
