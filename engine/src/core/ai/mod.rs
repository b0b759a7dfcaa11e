//! Text Generation Module
//!
//! Boundary to the external text-generation service used for subtitles and
//! edit suggestions. Requests run on tokio tasks and report back over a
//! channel so the editing loop never blocks on them.

mod generator;
mod service;

pub use generator::*;
pub use service::*;
