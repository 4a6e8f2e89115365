//! FFT ocean: spectrum synthesis, time evolution, inverse transform and publishing.

mod evolve;
mod publish;
mod spectrum;
mod system;
mod transform;

// Re-export public types
pub use evolve::{evolve, signed_wavenumber, Dispersion};
pub use publish::{DisplacementField, DisplacementPublisher, DisplacementSink, FieldStats};
pub use spectrum::{generate, phillips_density, Wind, DENSITY_CLAMP, K_EPSILON};
pub use system::OceanSimulation;
pub use transform::TransformPlan;

use crate::error::{OceanError, Result};

/// Fixed spectrum / displacement grid dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveGrid {
    width: usize,
    height: usize,
}

impl WaveGrid {
    /// Both dimensions must be positive powers of two
    pub fn new(width: usize, height: usize) -> Result<Self> {
        for (name, n) in [("width", width), ("height", height)] {
            if n == 0 {
                return Err(OceanError::config(format!("grid {name} must be positive")));
            }
            if !n.is_power_of_two() {
                return Err(OceanError::config(format!(
                    "grid {name} must be a power of two, got {n}"
                )));
            }
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells (W·H)
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major cell index
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }
}
