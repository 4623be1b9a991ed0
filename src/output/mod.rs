mod overlay;

pub use overlay::OverlayWriter;

use crate::detect::Outline;
use anyhow::Result;
use image::{RgbImage, RgbaImage};

/// Trait for consumers of detection results.
pub trait OutlineSink {
    /// Hand over one frame and the outlines detected in it.
    fn write(&mut self, frame: &RgbaImage, outlines: &[Outline]) -> Result<()>;

    /// Persist the calibration preview strip. Default is a no-op for sinks
    /// with nowhere to put it.
    fn save_spectrum(&mut self, _spectrum: &RgbImage) -> Result<()> {
        Ok(())
    }
}
