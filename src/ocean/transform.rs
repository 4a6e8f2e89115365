//! Inverse 2D transform plan: frequency-domain spectrum → real displacement.

use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner, FftPlannerScalar};

use super::WaveGrid;
use crate::error::{OceanError, Result};
use crate::params::PlanStrategy;

/// Owned inverse transform plan bound to its own input and output buffers
///
/// The plan is created once for a fixed grid and owns every buffer it touches.
/// Buffers are never reallocated, so the plan stays bound to the same memory
/// for its whole lifetime. It is not `Clone`, and `execute` takes `&mut self`,
/// so two executions can never overlap.
///
/// The output is the real part of the unnormalized inverse DFT: it is scaled
/// by W·H relative to a normalized transform.
///
/// This is a full complex-to-complex inverse transform over all W·H bins,
/// not a half-spectrum complex-to-real one. The spectrum is not assumed
/// Hermitian; any imaginary residue is dropped. The field mean is therefore
/// exactly `Re(input[0])`.
pub struct TransformPlan {
    grid: WaveGrid,
    strategy: PlanStrategy,
    row_fft: Arc<dyn Fft<f32>>,
    col_fft: Arc<dyn Fft<f32>>,
    /// Bound input: the frequency snapshot, row-major
    input: Vec<Complex32>,
    /// Row pass result, row-major
    rows: Vec<Complex32>,
    /// Column pass buffer, column-major
    columns: Vec<Complex32>,
    scratch: Vec<Complex32>,
    /// Bound output: real spatial field, row-major
    output: Vec<f32>,
}

impl TransformPlan {
    /// Plan the transform and allocate its buffers
    pub fn create(grid: WaveGrid, strategy: PlanStrategy) -> Result<Self> {
        let (row_fft, col_fft) = match strategy {
            PlanStrategy::Estimate => {
                let mut planner = FftPlanner::<f32>::new();
                (
                    planner.plan_fft_inverse(grid.width()),
                    planner.plan_fft_inverse(grid.height()),
                )
            }
            PlanStrategy::Scalar => {
                let mut planner = FftPlannerScalar::<f32>::new();
                (
                    planner.plan_fft_inverse(grid.width()),
                    planner.plan_fft_inverse(grid.height()),
                )
            }
        };

        let scratch_len = row_fft
            .get_inplace_scratch_len()
            .max(col_fft.get_inplace_scratch_len());

        let zero = Complex32::new(0.0, 0.0);
        let plan = Self {
            grid,
            strategy,
            input: alloc_filled("transform input", grid.len(), zero)?,
            rows: alloc_filled("transform row buffer", grid.len(), zero)?,
            columns: alloc_filled("transform column buffer", grid.len(), zero)?,
            scratch: alloc_filled("transform scratch", scratch_len, zero)?,
            output: alloc_filled("transform output", grid.len(), 0.0)?,
            row_fft,
            col_fft,
        };

        log::debug!(
            "Planned {}x{} inverse transform ({:?}, scratch {} bins)",
            grid.width(),
            grid.height(),
            strategy,
            scratch_len
        );

        Ok(plan)
    }

    pub fn grid(&self) -> WaveGrid {
        self.grid
    }

    pub fn strategy(&self) -> PlanStrategy {
        self.strategy
    }

    /// Bound input buffer, overwritten with each frame's snapshot
    pub fn input_mut(&mut self) -> &mut [Complex32] {
        &mut self.input
    }

    /// Overwrite the bound input with `snapshot`
    ///
    /// # Panics
    /// If `snapshot` does not hold exactly W·H bins.
    pub fn load(&mut self, snapshot: &[Complex32]) {
        assert_eq!(
            snapshot.len(),
            self.input.len(),
            "snapshot has the wrong size"
        );
        self.input.copy_from_slice(snapshot);
    }

    /// Run the inverse transform from the bound input into the bound output
    ///
    /// Blocks until the whole grid is transformed. The input is left intact.
    pub fn execute(&mut self) -> &[f32] {
        let width = self.grid.width();
        let height = self.grid.height();

        // Rows: every row of length W in one call
        self.rows.copy_from_slice(&self.input);
        self.row_fft
            .process_with_scratch(&mut self.rows, &mut self.scratch);

        // Columns: transpose so each column is contiguous
        for y in 0..height {
            for x in 0..width {
                self.columns[x * height + y] = self.rows[y * width + x];
            }
        }
        self.col_fft
            .process_with_scratch(&mut self.columns, &mut self.scratch);

        for y in 0..height {
            for x in 0..width {
                self.output[y * width + x] = self.columns[x * height + y].re;
            }
        }

        &self.output
    }

    /// Bound output buffer from the last execution
    pub fn output(&self) -> &[f32] {
        &self.output
    }

    /// Release the plan's kernels and buffers
    pub fn destroy(self) {
        log::debug!(
            "Destroyed {}x{} transform plan",
            self.grid.width(),
            self.grid.height()
        );
    }
}

/// Fallibly allocate a filled buffer, reporting exhaustion instead of aborting
fn alloc_filled<T: Copy>(what: &'static str, len: usize, value: T) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| OceanError::ResourceExhaustion {
            what,
            bytes: len.saturating_mul(std::mem::size_of::<T>()),
        })?;
    buf.resize(len, value);
    Ok(buf)
}
