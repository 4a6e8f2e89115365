//! Phillips spectrum synthesis of the base wave field.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rustfft::num_complex::Complex32;

use super::WaveGrid;

/// Below this wavenumber the density is zero (avoids the 1/k⁴ singularity)
pub const K_EPSILON: f32 = 1e-4;

/// Upper bound on spectral density
pub const DENSITY_CLAMP: f32 = 1e-3;

/// Wind forcing the spectrum
#[derive(Clone, Copy, Debug)]
pub struct Wind {
    /// Unit direction
    pub direction: Vec2,
    /// Speed (m/s)
    pub speed_m_per_s: f32,
}

/// Directional Phillips density for wavenumber `k`
///
/// `P(k) = A · exp(-1/(|k|L)²) / |k|⁴ · (k̂·ŵ)²` with `L = V²/g`, clamped to
/// [`DENSITY_CLAMP`]. Exactly zero when `|k| < K_EPSILON`.
pub fn phillips_density(k: Vec2, wind: &Wind, scale: f32, gravity: f32) -> f32 {
    let k_len = k.length();
    if k_len < K_EPSILON {
        return 0.0;
    }

    let l = wind.speed_m_per_s * wind.speed_m_per_s / gravity;
    let kl = k_len * l;
    let k_dot_w = (k / k_len).dot(wind.direction);

    let density = scale * (-1.0 / (kl * kl)).exp() / k_len.powi(4) * k_dot_w * k_dot_w;
    density.min(DENSITY_CLAMP)
}

/// Build the base spectrum: one complex amplitude per bin, row-major
///
/// Bins use a centred wavenumber `((x - W/2)/W, (y - H/2)/H)`. Amplitude is
/// the square root of the Phillips density, phase is uniform in `[0, 2π)`.
pub fn generate<R: Rng + ?Sized>(
    grid: WaveGrid,
    wind: &Wind,
    scale: f32,
    gravity: f32,
    rng: &mut R,
) -> Vec<Complex32> {
    let w = grid.width() as f32;
    let h = grid.height() as f32;

    let mut bins = Vec::with_capacity(grid.len());
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let k = Vec2::new((x as f32 - w / 2.0) / w, (y as f32 - h / 2.0) / h);
            let amplitude = phillips_density(k, wind, scale, gravity).sqrt();
            let phase = rng.gen_range(0.0..TAU);
            bins.push(Complex32::from_polar(amplitude, phase));
        }
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn default_wind() -> Wind {
        Wind {
            direction: Vec2::X,
            speed_m_per_s: 20.0,
        }
    }

    #[test]
    fn test_bin_count_and_density_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for size in [32, 64, 128] {
            let grid = WaveGrid::new(size, size).unwrap();
            let bins = generate(grid, &default_wind(), 0.001, 9.81, &mut rng);
            assert_eq!(bins.len(), size * size);
            for bin in &bins {
                let density = bin.norm_sqr();
                assert!(density >= 0.0);
                // norm_sqr of sqrt(clamp) may round a hair above the clamp
                assert!(density <= DENSITY_CLAMP * (1.0 + 1e-5));
            }
        }
    }

    #[test]
    fn test_zero_wavenumber_has_no_energy() {
        assert_eq!(phillips_density(Vec2::ZERO, &default_wind(), 0.001, 9.81), 0.0);
        assert_eq!(
            phillips_density(Vec2::new(5e-5, 0.0), &default_wind(), 0.001, 9.81),
            0.0
        );

        // The centre bin of the grid sits exactly at k = 0
        let grid = WaveGrid::new(32, 32).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let bins = generate(grid, &default_wind(), 0.001, 9.81, &mut rng);
        assert_eq!(bins[grid.index(16, 16)].norm(), 0.0);
    }

    #[test]
    fn test_crosswind_waves_vanish() {
        // k perpendicular to the wind carries no energy
        let density = phillips_density(Vec2::new(0.0, 0.25), &default_wind(), 0.001, 9.81);
        assert!(density.abs() < 1e-12);

        let along = phillips_density(Vec2::new(0.25, 0.0), &default_wind(), 0.001, 9.81);
        assert!(along > 0.0);
    }

    #[test]
    fn test_density_is_clamped() {
        // Small |k| blows up as 1/k⁴ before the clamp
        let density = phillips_density(Vec2::new(0.02, 0.0), &default_wind(), 0.001, 9.81);
        assert_eq!(density, DENSITY_CLAMP);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let grid = WaveGrid::new(16, 16).unwrap();
        let a = generate(grid, &default_wind(), 0.001, 9.81, &mut StdRng::seed_from_u64(42));
        let b = generate(grid, &default_wind(), 0.001, 9.81, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
