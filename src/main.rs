//! Wavefield - headless FFT ocean driver
//!
//! Runs the spectrum → evolve → transform → publish pipeline at a fixed frame
//! rate, optionally streaming every frame into a GPU texture.

use std::error::Error;
use std::time::Instant;

use clap::Parser;

use wavefield::cli::Args;
use wavefield::ocean::{DisplacementSink, OceanSimulation};
use wavefield::params::TextureConfig;
use wavefield::rendering::{export_heightmap, DisplacementTexture, GpuContext};

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let params = args.ocean_params();
    let run_config = args.run_config();

    let mut ocean = OceanSimulation::initialize(params)?;

    let mut gpu = if run_config.use_gpu {
        let ctx = pollster::block_on(GpuContext::headless())?;
        let texture = DisplacementTexture::new(&ctx, ocean.grid(), &TextureConfig::default());
        Some((ctx, texture))
    } else {
        None
    };

    let total_frames = run_config.total_frames();
    log::info!(
        "Simulating {} frames at {} fps",
        total_frames,
        run_config.fps
    );

    let started = Instant::now();
    for frame in 0..total_frames {
        let field = ocean.tick(run_config.frame_time_s(frame));
        if let Some((_, texture)) = gpu.as_mut() {
            texture.upload(field);
        }
    }
    let elapsed = started.elapsed();

    let stats = ocean.field().stats();
    log::info!(
        "Done in {:.1} ms ({:.3} ms/frame): min {:.4} max {:.4} mean {:.4}",
        elapsed.as_secs_f64() * 1e3,
        elapsed.as_secs_f64() * 1e3 / total_frames as f64,
        stats.min,
        stats.max,
        stats.mean
    );

    if let Some((ctx, texture)) = &gpu {
        let uploaded = texture.read_back(&ctx.device);
        let matches = uploaded == ocean.field().as_slice();
        log::info!("GPU texture matches last field: {}", matches);
    }

    if let Some(path) = &run_config.export_path {
        export_heightmap(ocean.field(), path)?;
        log::info!("Exported heightmap to {}", path);
    }

    ocean.shutdown();
    Ok(())
}
