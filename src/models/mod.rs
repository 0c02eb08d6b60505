//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos extraídos de las páginas
//! del sitio del juego.

pub mod character;
pub mod guild;

pub use character::{BaseCharacter, Character, CharacterDetails};
pub use guild::Guild;
