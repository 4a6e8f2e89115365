//! Parameter definitions with physical units and documented semantics.
//!
//! All tunable numbers live here with:
//! - Physical units (meters, seconds, m/s², etc.)
//! - Documented ranges and meanings
//! - Validation where a bad value would break startup

mod ocean;
mod render;

// Re-export all types
pub use ocean::{OceanParams, PlanStrategy};
pub use render::{RunConfig, TextureConfig};
