//! Command-line argument parsing.

use clap::Parser;

use crate::params::{OceanParams, PlanStrategy, RunConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "wavefield")]
#[command(about = "Headless FFT ocean displacement simulator", long_about = None)]
pub struct Args {
    /// Grid resolution per side (power of two)
    #[arg(long, value_name = "CELLS", default_value = "128")]
    pub grid_size: usize,

    /// Gravitational acceleration (m/s²)
    #[arg(long, value_name = "M_PER_S2", default_value = "9.81")]
    pub gravity: f32,

    /// Wind heading, counter-clockwise from +X (degrees)
    #[arg(long, value_name = "DEGREES", default_value = "0")]
    pub wind_angle_deg: f32,

    /// Wind speed (m/s)
    #[arg(long, value_name = "M_PER_S", default_value = "20")]
    pub wind_speed: f32,

    /// Phillips spectrum amplitude constant
    #[arg(long, value_name = "A", default_value = "0.001")]
    pub scale: f32,

    /// Phase seed for a reproducible sea (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use portable scalar FFT kernels
    #[arg(long)]
    pub scalar_fft: bool,

    /// Simulated duration (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "5")]
    pub duration: f32,

    /// Frames per simulated second
    #[arg(long, default_value = "60")]
    pub fps: u32,

    /// Upload every frame into a GPU texture
    #[arg(long)]
    pub gpu: bool,

    /// Write the final displacement field as a grayscale PNG
    #[arg(long, value_name = "PNG")]
    pub export: Option<String>,
}

impl Args {
    /// Ocean parameters from the command line
    pub fn ocean_params(&self) -> OceanParams {
        let heading = self.wind_angle_deg.to_radians();
        OceanParams {
            grid_width: self.grid_size,
            grid_height: self.grid_size,
            gravity_m_per_s2: self.gravity,
            wind_direction: [heading.cos(), heading.sin()],
            wind_speed_m_per_s: self.wind_speed,
            phillips_scale: self.scale,
            plan_strategy: if self.scalar_fft {
                PlanStrategy::Scalar
            } else {
                PlanStrategy::Estimate
            },
            seed: self.seed,
        }
    }

    /// Run configuration from the command line
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            duration_secs: self.duration,
            fps: self.fps,
            use_gpu: self.gpu,
            export_path: self.export.clone(),
        }
    }
}
