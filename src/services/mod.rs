//! Services module
//!
//! Este módulo contiene la lógica de negocio: fetch con cache, parseo de
//! páginas, enriquecimiento concurrente, ordenamiento y armado del stream.

pub mod enrichment;
pub mod fetcher;
pub mod parser;
pub mod sort;
pub mod streaming;
