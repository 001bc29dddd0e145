//! Schema module - Configuration and band table types for island generation.

mod bands;
mod config;

pub use bands::*;
pub use config::*;
