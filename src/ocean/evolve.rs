//! Time evolution of the base spectrum via the deep-water dispersion relation.

use std::f32::consts::TAU;

use glam::Vec2;
use rustfft::num_complex::Complex32;

use super::WaveGrid;

/// Signed wavenumber for FFT bin `i` of `n` (standard frequency ordering)
#[inline]
pub fn signed_wavenumber(i: usize, n: usize) -> f32 {
    if i < n / 2 {
        TAU * i as f32 / n as f32
    } else {
        -TAU * (n - i) as f32 / n as f32
    }
}

/// Per-bin angular frequencies ω = sqrt(g·|k|)
///
/// ω does not depend on time, so it is computed once and reused every frame.
pub struct Dispersion {
    grid: WaveGrid,
    omega: Vec<f32>,
}

impl Dispersion {
    pub fn new(grid: WaveGrid, gravity: f32) -> Self {
        let mut omega = Vec::with_capacity(grid.len());
        for y in 0..grid.height() {
            let ky = signed_wavenumber(y, grid.height());
            for x in 0..grid.width() {
                let kx = signed_wavenumber(x, grid.width());
                omega.push((gravity * Vec2::new(kx, ky).length()).sqrt());
            }
        }
        Self { grid, omega }
    }

    /// Angular frequency of a bin (rad/s)
    pub fn omega(&self, x: usize, y: usize) -> f32 {
        self.omega[self.grid.index(x, y)]
    }

    /// Write `base · e^{iωt}` into `out`. Magnitudes are unchanged.
    pub fn evolve_into(&self, base: &[Complex32], time_s: f32, out: &mut [Complex32]) {
        assert_eq!(base.len(), self.omega.len(), "base spectrum size mismatch");
        assert_eq!(out.len(), self.omega.len(), "snapshot size mismatch");

        for ((dst, &h0), &w) in out.iter_mut().zip(base).zip(&self.omega) {
            *dst = h0 * Complex32::from_polar(1.0, w * time_s);
        }
    }
}

/// Evolve the base spectrum to `time_s`, returning a fresh snapshot
pub fn evolve(base: &[Complex32], grid: WaveGrid, gravity: f32, time_s: f32) -> Vec<Complex32> {
    let mut snapshot = vec![Complex32::new(0.0, 0.0); grid.len()];
    Dispersion::new(grid, gravity).evolve_into(base, time_s, &mut snapshot);
    snapshot
}
