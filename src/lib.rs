//! Wavefield library - FFT ocean displacement simulation

pub mod cli;
pub mod error;
pub mod ocean;
pub mod params;
pub mod rendering;
