mod contour;
mod hull;
mod mask;
mod pyramid;

pub use contour::{Contour, Point};
pub use hull::convex_hull;

use crate::color::{self, Hsv, HsvRange, COLOR_RADIUS};
use image::{GrayImage, RgbImage, RgbaImage};
use std::sync::{Arc, Mutex, PoisonError};

// Two binomial pyramid levels, so contours are found at quarter resolution
// and scaled back up by 4 per axis.
const PYRAMID_LEVELS: u32 = 2;
const PYRAMID_SCALE: i32 = 1 << PYRAMID_LEVELS;

/// Smallest downsampled dimension the pipeline will still process. Frames
/// that shrink below this after two halvings yield no outlines.
const MIN_DOWNSAMPLED_DIM: u32 = 3;

/// Immutable calibration snapshot. Swapped wholesale under the detector's
/// lock so a detect racing a calibrate sees either the whole old state or
/// the whole new state, never a torn range.
#[derive(Debug, Clone)]
pub struct Calibration {
    pub range: HsvRange,
    pub spectrum: RgbImage,
}

/// Convex outline of one detected region, in original frame coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    pub points: Vec<Point>,
}

/// Working buffers reused across calls for allocation efficiency. Every
/// buffer is fully overwritten before it is read on each invocation.
#[derive(Default)]
struct Scratch {
    half: RgbaImage,
    quarter: RgbaImage,
    mask: GrayImage,
    dilated: GrayImage,
}

/// Per-frame color blob detector.
///
/// `calibrate` derives an HSV acceptance range and preview spectrum from a
/// picked color; `detect` returns the convex outlines of the most prominent
/// matching regions of a frame. Both may be called from different threads:
/// calibration state is an atomically swapped snapshot and never blocks
/// behind an in-flight detection.
pub struct ColorBlobDetector {
    calibration: Mutex<Option<Arc<Calibration>>>,
    scratch: Mutex<Scratch>,
}

impl ColorBlobDetector {
    pub fn new() -> Self {
        Self {
            calibration: Mutex::new(None),
            scratch: Mutex::new(Scratch::default()),
        }
    }

    /// Derive the acceptance range and spectrum strip for `target` and make
    /// them the current calibration, replacing any previous one.
    pub fn calibrate(&self, target: Hsv) {
        let range = HsvRange::around(target, COLOR_RADIUS);
        let spectrum = color::spectrum(&range);
        tracing::debug!(?target, ?range, "calibrated acceptance range");
        *self
            .calibration
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(Calibration { range, spectrum }));
    }

    /// Current calibration snapshot, if any.
    pub fn calibration(&self) -> Option<Arc<Calibration>> {
        self.calibration
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current spectrum preview strip, if calibrated.
    pub fn spectrum(&self) -> Option<RgbImage> {
        self.calibration().map(|c| c.spectrum.clone())
    }

    /// Run the detection pipeline on one frame.
    ///
    /// Uncalibrated detectors report no outlines ("no object selected"), as
    /// do frames with no matching pixels and frames too small to survive the
    /// pyramid. None of these are errors.
    pub fn detect(&self, frame: &RgbaImage) -> Vec<Outline> {
        let Some(cal) = self.calibration() else {
            tracing::debug!("detect before calibration, no outlines");
            return Vec::new();
        };

        let (w, h) = frame.dimensions();
        let scale = PYRAMID_SCALE as u32;
        if w.div_ceil(scale) < MIN_DOWNSAMPLED_DIM || h.div_ceil(scale) < MIN_DOWNSAMPLED_DIM {
            tracing::debug!(w, h, "frame too small for two pyramid levels");
            return Vec::new();
        }

        let _span = tracing::debug_span!("detect").entered();
        let mut guard = self.scratch.lock().unwrap_or_else(PoisonError::into_inner);
        let scratch = &mut *guard;

        pyramid::pyr_down(frame, &mut scratch.half);
        pyramid::pyr_down(&scratch.half, &mut scratch.quarter);
        mask::threshold(&scratch.quarter, &cal.range, &mut scratch.mask);
        mask::dilate(&scratch.mask, &mut scratch.dilated);

        let contours = contour::find_external(&scratch.dilated);
        tracing::debug!(contours = contours.len(), "contours extracted");

        let outlines: Vec<Outline> = contour::filter_significant(contours)
            .into_iter()
            .map(|c| {
                let scaled: Vec<Point> = c
                    .points
                    .iter()
                    .map(|p| Point {
                        x: p.x * PYRAMID_SCALE,
                        y: p.y * PYRAMID_SCALE,
                    })
                    .collect();
                Outline {
                    points: hull::convex_hull(&scaled),
                }
            })
            .collect();

        tracing::debug!(outlines = outlines.len(), "detection complete");
        outlines
    }
}

impl Default for ColorBlobDetector {
    fn default() -> Self {
        Self::new()
    }
}
