//! Edit Command System
//!
//! Serializable commands over the Timeline Model operations, their wire
//! payloads, and the executor that runs and logs them.

mod clip;
mod executor;
mod payload;
mod track;
mod traits;
mod view;

pub use clip::*;
pub use executor::*;
pub use payload::*;
pub use track::*;
pub use traits::*;
pub use view::*;
