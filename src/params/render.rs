//! Driver run and displacement texture configuration.

/// Headless run configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Simulated duration (seconds)
    pub duration_secs: f32,

    /// Frame rate (FPS). The frame clock advances by 1/fps per tick
    pub fps: u32,

    /// Upload every frame into a GPU texture
    pub use_gpu: bool,

    /// Write the last published field as a grayscale PNG
    pub export_path: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            duration_secs: 5.0,
            fps: 60,
            use_gpu: false,
            export_path: None,
        }
    }
}

impl RunConfig {
    /// Total number of frames to simulate (at least one)
    pub fn total_frames(&self) -> usize {
        ((self.duration_secs * self.fps as f32).ceil() as usize).max(1)
    }

    /// Frame clock value for a frame index (seconds)
    pub fn frame_time_s(&self, frame: usize) -> f32 {
        frame as f32 / self.fps.max(1) as f32
    }
}

/// Displacement texture sampling configuration
#[derive(Debug, Clone)]
pub struct TextureConfig {
    /// Debug label for the GPU texture
    pub label: String,

    /// Prefer linear filtering (needs filterable 32-bit float textures)
    pub prefer_linear: bool,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            label: "Displacement Map".to_string(),
            prefer_linear: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock() {
        let config = RunConfig {
            duration_secs: 1.0,
            fps: 30,
            ..Default::default()
        };
        assert_eq!(config.total_frames(), 30);
        assert_eq!(config.frame_time_s(0), 0.0);
        assert!((config.frame_time_s(15) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_still_runs_one_frame() {
        let config = RunConfig {
            duration_secs: 0.0,
            ..Default::default()
        };
        assert_eq!(config.total_frames(), 1);
    }
}
