use super::OutlineSink;
use crate::detect::{Outline, Point};
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use std::path::{Path, PathBuf};

const OUTLINE_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Sink that draws each outline onto a copy of the frame and saves numbered
/// PNGs, for inspecting detections offline.
pub struct OverlayWriter {
    out_dir: PathBuf,
    frame_index: u64,
}

impl OverlayWriter {
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Result<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
        Ok(Self {
            out_dir,
            frame_index: 0,
        })
    }
}

impl OutlineSink for OverlayWriter {
    /// Save the calibration preview strip alongside the overlays.
    fn save_spectrum(&mut self, spectrum: &image::RgbImage) -> Result<()> {
        let path = self.out_dir.join("spectrum.png");
        spectrum
            .save(&path)
            .with_context(|| format!("Failed to save spectrum to {}", path.display()))?;
        tracing::info!(path = %path.display(), "spectrum saved");
        Ok(())
    }

    fn write(&mut self, frame: &RgbaImage, outlines: &[Outline]) -> Result<()> {
        let mut canvas = frame.clone();
        for outline in outlines {
            draw_polygon(&mut canvas, &outline.points, OUTLINE_COLOR);
        }
        let path = self.out_dir.join(format!("{:06}.png", self.frame_index));
        canvas
            .save(&path)
            .with_context(|| format!("Failed to save overlay to {}", path.display()))?;
        self.frame_index += 1;
        Ok(())
    }
}

/// Draw a closed polygon edge by edge; the segment drawer clips to the
/// canvas, so out-of-bounds vertices are safe.
fn draw_polygon(img: &mut RgbaImage, points: &[Point], color: Rgba<u8>) {
    if points.is_empty() {
        return;
    }
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        draw_line_segment_mut(
            img,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            color,
        );
    }
}
