//! Core folio library (post index loading, view pipeline, rendering, config).

pub mod blog;
pub mod config;
