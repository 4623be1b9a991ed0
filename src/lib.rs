pub mod color;
pub mod detect;
pub mod output;
pub mod source;

pub use color::{Hsv, HsvRange};
pub use detect::{Calibration, ColorBlobDetector, Outline, Point};
