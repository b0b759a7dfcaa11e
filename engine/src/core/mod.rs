//! ReelCut Core Engine
//!
//! Timeline model, interaction, tools, commands and the collaborator seams
//! (assets, text generation, export, settings).

pub mod ai;
pub mod assets;
pub mod commands;
pub mod export;
pub mod interaction;
pub mod session;
pub mod settings;
pub mod timeline;
pub mod tools;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;

#[cfg(test)]
mod tests_destructive;
