//! Cache
//!
//! Este módulo contiene el sistema de cache en memoria.

pub mod page_cache;

pub use page_cache::TtlCache;
