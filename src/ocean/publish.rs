//! Normalized displacement field handed to the renderer.

use super::WaveGrid;

/// Renderer-side destination for the published field (e.g. a GPU texture)
pub trait DisplacementSink {
    /// Overwrite the sink with the field contents
    fn upload(&mut self, field: &DisplacementField);
}

/// Min / max / mean of a field
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

/// Row-major grid of height offsets (meters), one per cell
#[derive(Clone, Debug)]
pub struct DisplacementField {
    grid: WaveGrid,
    heights: Vec<f32>,
}

impl DisplacementField {
    fn zeroed(grid: WaveGrid) -> Self {
        Self {
            grid,
            heights: vec![0.0; grid.len()],
        }
    }

    pub fn grid(&self) -> WaveGrid {
        self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.heights
    }

    /// Raw bytes for a single-channel 32-bit float texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.heights)
    }

    /// Height at a cell. Coordinates wrap, like a repeat-addressed texture.
    pub fn get(&self, x: isize, y: isize) -> f32 {
        let w = self.grid.width() as isize;
        let h = self.grid.height() as isize;
        let xi = x.rem_euclid(w) as usize;
        let yi = y.rem_euclid(h) as usize;
        self.heights[self.grid.index(xi, yi)]
    }

    /// Bilinear sample at texture coordinates `(u, v)`, repeat wrap
    ///
    /// Cell centres sit at `(x + 0.5) / W`, matching GPU texel addressing.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let fx = u * self.grid.width() as f32 - 0.5;
        let fy = v * self.grid.height() as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        let top = self.get(x0, y0) * (1.0 - tx) + self.get(x0 + 1, y0) * tx;
        let bottom = self.get(x0, y0 + 1) * (1.0 - tx) + self.get(x0 + 1, y0 + 1) * tx;
        top * (1.0 - ty) + bottom * ty
    }

    pub fn stats(&self) -> FieldStats {
        if self.heights.is_empty() {
            return FieldStats::default();
        }
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        for &h in &self.heights {
            min = min.min(h);
            max = max.max(h);
            sum += h as f64;
        }
        FieldStats {
            min,
            max,
            mean: (sum / self.heights.len() as f64) as f32,
        }
    }
}

/// Normalizes raw transform output into a persistent field
///
/// The field buffer is allocated once and overwritten every frame.
pub struct DisplacementPublisher {
    field: DisplacementField,
}

impl DisplacementPublisher {
    pub fn new(grid: WaveGrid) -> Self {
        Self {
            field: DisplacementField::zeroed(grid),
        }
    }

    /// Divide raw inverse-transform output by W·H and store it
    ///
    /// # Panics
    /// If `raw` does not hold exactly W·H values.
    pub fn publish(&mut self, raw: &[f32]) -> &DisplacementField {
        assert_eq!(
            raw.len(),
            self.field.heights.len(),
            "raw transform output has the wrong size"
        );

        let scale = 1.0 / self.field.grid.len() as f32;
        for (dst, &src) in self.field.heights.iter_mut().zip(raw) {
            *dst = src * scale;
        }
        &self.field
    }

    pub fn field(&self) -> &DisplacementField {
        &self.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_normalizes() {
        let grid = WaveGrid::new(2, 2).unwrap();
        let mut publisher = DisplacementPublisher::new(grid);
        let field = publisher.publish(&[4.0, -8.0, 2.0, 0.0]);
        assert_eq!(field.as_slice(), &[1.0, -2.0, 0.5, 0.0]);
        assert_eq!(field.as_bytes().len(), 16);
    }

    #[test]
    fn test_publish_is_idempotent() {
        let grid = WaveGrid::new(4, 4).unwrap();
        let raw: Vec<f32> = (0..16).map(|i| i as f32 * 0.3 - 2.0).collect();
        let mut publisher = DisplacementPublisher::new(grid);
        let first = publisher.publish(&raw).as_slice().to_vec();
        let second = publisher.publish(&raw).as_slice().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    #[should_panic(expected = "wrong size")]
    fn test_publish_rejects_wrong_length() {
        let grid = WaveGrid::new(4, 4).unwrap();
        DisplacementPublisher::new(grid).publish(&[0.0; 15]);
    }

    #[test]
    fn test_sampling_wraps_and_hits_cell_centres() {
        let grid = WaveGrid::new(2, 2).unwrap();
        let mut publisher = DisplacementPublisher::new(grid);
        let field = publisher.publish(&[0.0, 4.0, 8.0, 12.0]);

        assert_eq!(field.get(-1, 0), field.get(1, 0));
        assert_eq!(field.get(2, 3), field.get(0, 1));

        assert!((field.sample(0.25, 0.25) - 0.0).abs() < 1e-6);
        assert!((field.sample(0.75, 0.75) - 3.0).abs() < 1e-6);
        // Halfway between the two columns of row 0
        assert!((field.sample(0.5, 0.25) - 0.5).abs() < 1e-6);
        // Wraps: u = 1.25 is the same texel as u = 0.25
        assert!((field.sample(1.25, 0.25) - field.sample(0.25, 0.25)).abs() < 1e-6);
    }

    #[test]
    fn test_stats() {
        let grid = WaveGrid::new(2, 2).unwrap();
        let mut publisher = DisplacementPublisher::new(grid);
        let stats = publisher.publish(&[-4.0, 4.0, 8.0, 0.0]).stats();
        assert_eq!(stats.min, -1.0);
        assert_eq!(stats.max, 2.0);
        assert!((stats.mean - 0.5).abs() < 1e-6);
    }
}
