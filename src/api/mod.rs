//! Surah Provider: models and the equran.id client.

pub mod equran;
pub mod models;

pub use equran::*;
pub use models::*;
