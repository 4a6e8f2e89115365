//! High-level ocean engine: spectrum → evolve → transform → publish, once per frame.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustfft::num_complex::Complex32;

use super::evolve::Dispersion;
use super::publish::{DisplacementField, DisplacementPublisher};
use super::spectrum::{self, Wind};
use super::transform::TransformPlan;
use super::WaveGrid;
use crate::error::Result;
use crate::params::OceanParams;

/// FFT ocean engine owning every simulation buffer
///
/// Built once by [`OceanSimulation::initialize`], ticked once per frame on the
/// render thread, and consumed by [`OceanSimulation::shutdown`]. Because
/// `shutdown` takes `self`, ticking a shut-down engine does not compile.
pub struct OceanSimulation {
    params: OceanParams,
    grid: WaveGrid,
    /// Base spectrum h0, immutable after initialization
    base: Vec<Complex32>,
    dispersion: Dispersion,
    plan: TransformPlan,
    publisher: DisplacementPublisher,
    frames: u64,
}

impl OceanSimulation {
    /// Validate parameters, synthesize the spectrum and plan the transform
    ///
    /// Phases come from `params.seed` when set, otherwise from the thread-local
    /// generator (a different sea every run).
    pub fn initialize(params: OceanParams) -> Result<Self> {
        let seed = params.seed;
        match seed {
            Some(seed) => Self::initialize_with_rng(params, &mut StdRng::seed_from_u64(seed)),
            None => Self::initialize_with_rng(params, &mut rand::thread_rng()),
        }
    }

    /// Like [`initialize`](Self::initialize) with an explicit phase source
    pub fn initialize_with_rng<R: Rng + ?Sized>(params: OceanParams, rng: &mut R) -> Result<Self> {
        let grid = WaveGrid::new(params.grid_width, params.grid_height)?;
        params.validate()?;

        let wind = Wind {
            direction: params.wind_unit(),
            speed_m_per_s: params.wind_speed_m_per_s,
        };
        let base = spectrum::generate(
            grid,
            &wind,
            params.phillips_scale,
            params.gravity_m_per_s2,
            rng,
        );
        let energy: f32 = base.iter().map(|h| h.norm_sqr()).sum();

        let dispersion = Dispersion::new(grid, params.gravity_m_per_s2);
        let mut plan = TransformPlan::create(grid, params.plan_strategy)?;
        let mut publisher = DisplacementPublisher::new(grid);

        // Populate the field from the base spectrum before the first tick
        plan.load(&base);
        publisher.publish(plan.execute());

        log::info!(
            "Ocean ready: {}x{} grid, wind {:.1} m/s toward ({:.2}, {:.2}), L = {:.1} m, energy {:.3e}",
            grid.width(),
            grid.height(),
            wind.speed_m_per_s,
            wind.direction.x,
            wind.direction.y,
            params.largest_wave_m(),
            energy
        );

        Ok(Self {
            params,
            grid,
            base,
            dispersion,
            plan,
            publisher,
            frames: 0,
        })
    }

    /// Advance to `time_s` (seconds since start) and publish the new field
    pub fn tick(&mut self, time_s: f32) -> &DisplacementField {
        self.dispersion
            .evolve_into(&self.base, time_s, self.plan.input_mut());
        let field = self.publisher.publish(self.plan.execute());
        self.frames += 1;

        if log::log_enabled!(log::Level::Trace) {
            let stats = field.stats();
            log::trace!(
                "Frame {} @ {:.3}s: min {:.4} max {:.4} mean {:.4}",
                self.frames,
                time_s,
                stats.min,
                stats.max,
                stats.mean
            );
        }

        field
    }

    /// Last published field
    pub fn field(&self) -> &DisplacementField {
        self.publisher.field()
    }

    /// Base spectrum h0, row-major
    pub fn base_spectrum(&self) -> &[Complex32] {
        &self.base
    }

    pub fn grid(&self) -> WaveGrid {
        self.grid
    }

    pub fn params(&self) -> &OceanParams {
        &self.params
    }

    /// Number of ticks since initialization
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Release the transform plan and all buffers
    pub fn shutdown(self) {
        log::info!("Ocean shut down after {} frames", self.frames);
        self.plan.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OceanError;

    fn seeded(size: usize) -> OceanParams {
        OceanParams {
            seed: Some(11),
            ..OceanParams::with_grid_size(size)
        }
    }

    #[test]
    fn test_initialize_populates_field() {
        let ocean = OceanSimulation::initialize(seeded(16)).unwrap();
        assert_eq!(ocean.field().len(), 256);
        assert_eq!(ocean.frames(), 0);
        assert!(ocean.field().as_slice().iter().all(|h| h.is_finite()));
        ocean.shutdown();
    }

    #[test]
    fn test_initialize_rejects_bad_config() {
        let params = OceanParams {
            grid_width: 96,
            ..Default::default()
        };
        assert!(matches!(
            OceanSimulation::initialize(params),
            Err(OceanError::Configuration(_))
        ));

        let params = OceanParams {
            wind_speed_m_per_s: 0.0,
            ..OceanParams::with_grid_size(8)
        };
        assert!(OceanSimulation::initialize(params).is_err());
    }

    #[test]
    fn test_tick_at_zero_matches_initial_field() {
        let mut ocean = OceanSimulation::initialize(seeded(32)).unwrap();
        let initial = ocean.field().as_slice().to_vec();
        let ticked = ocean.tick(0.0).as_slice().to_vec();
        assert_eq!(initial, ticked);
        assert_eq!(ocean.frames(), 1);
    }

    #[test]
    fn test_field_changes_over_time() {
        let mut ocean = OceanSimulation::initialize(seeded(32)).unwrap();
        let a = ocean.tick(0.0).as_slice().to_vec();
        let b = ocean.tick(1.5).as_slice().to_vec();
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_seed_same_sea() {
        let mut a = OceanSimulation::initialize(seeded(16)).unwrap();
        let mut b = OceanSimulation::initialize(seeded(16)).unwrap();
        assert_eq!(a.base_spectrum(), b.base_spectrum());
        assert_eq!(a.tick(2.0).as_slice(), b.tick(2.0).as_slice());
    }
}
