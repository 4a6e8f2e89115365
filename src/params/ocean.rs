//! Ocean wave simulation parameters.

use glam::Vec2;

use crate::error::{OceanError, Result};

/// How the inverse transform kernels are planned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanStrategy {
    /// Pick the fastest kernels for this CPU (SIMD when available).
    /// Planning cost is paid once at startup.
    #[default]
    Estimate,

    /// Portable scalar kernels only
    Scalar,
}

/// Ocean wave physics and grid parameters
#[derive(Debug, Clone)]
pub struct OceanParams {
    /// Spectrum columns (frequency bins along x, power of two)
    pub grid_width: usize,

    /// Spectrum rows (frequency bins along y, power of two)
    pub grid_height: usize,

    /// Gravitational acceleration (m/s²)
    pub gravity_m_per_s2: f32,

    /// Wind direction in the XZ plane (normalized on use)
    pub wind_direction: [f32; 2],

    /// Wind speed (m/s). Sets the largest wave length L = V² / g
    pub wind_speed_m_per_s: f32,

    /// Phillips spectrum amplitude constant A (dimensionless)
    pub phillips_scale: f32,

    /// Transform planning strategy
    pub plan_strategy: PlanStrategy,

    /// Phase seed. `None` draws phases from the thread-local generator,
    /// so every run produces a different sea.
    pub seed: Option<u64>,
}

impl Default for OceanParams {
    fn default() -> Self {
        Self {
            grid_width: 128,
            grid_height: 128,
            gravity_m_per_s2: 9.81,
            wind_direction: [1.0, 0.0],
            wind_speed_m_per_s: 20.0,
            phillips_scale: 0.001,
            plan_strategy: PlanStrategy::Estimate,
            seed: None,
        }
    }
}

impl OceanParams {
    /// Square grid with default physics
    pub fn with_grid_size(size: usize) -> Self {
        Self {
            grid_width: size,
            grid_height: size,
            ..Default::default()
        }
    }

    /// Unit wind direction
    pub fn wind_unit(&self) -> Vec2 {
        Vec2::from_array(self.wind_direction).normalize_or_zero()
    }

    /// Largest wave length arising from the wind (meters)
    pub fn largest_wave_m(&self) -> f32 {
        self.wind_speed_m_per_s * self.wind_speed_m_per_s / self.gravity_m_per_s2
    }

    /// Validate physical parameters. Grid dimensions are checked by `WaveGrid::new`.
    pub fn validate(&self) -> Result<()> {
        if !(self.gravity_m_per_s2.is_finite() && self.gravity_m_per_s2 > 0.0) {
            return Err(OceanError::config(format!(
                "gravity must be positive, got {}",
                self.gravity_m_per_s2
            )));
        }
        if !(self.wind_speed_m_per_s.is_finite() && self.wind_speed_m_per_s > 0.0) {
            return Err(OceanError::config(format!(
                "wind speed must be positive, got {}",
                self.wind_speed_m_per_s
            )));
        }
        if !(self.phillips_scale.is_finite() && self.phillips_scale >= 0.0) {
            return Err(OceanError::config(format!(
                "phillips scale must be non-negative, got {}",
                self.phillips_scale
            )));
        }
        if self.wind_unit() == Vec2::ZERO {
            return Err(OceanError::config(format!(
                "wind direction must be non-zero, got {:?}",
                self.wind_direction
            )));
        }
        Ok(())
    }
}
