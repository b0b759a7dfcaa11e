//! Timeline Module
//!
//! Tracks, clips, the time-space mapper and the editing model that owns them.

mod model;
mod models;
mod selection;
pub mod snap;
mod viewport;

pub use model::*;
pub use models::*;
pub use selection::*;
pub use viewport::*;
