mod image_seq;

pub use image_seq::ImageSequenceSource;

use image::RgbaImage;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no image files found at {}", .0.display())]
    EmptySequence(PathBuf),
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Trait for frame providers feeding the detector.
pub trait FrameSource {
    /// Next frame, or `None` once the sequence is exhausted.
    fn next_frame(&mut self) -> Result<Option<RgbaImage>, SourceError>;

    /// Get the resolution of provided frames
    fn resolution(&self) -> (u32, u32);
}
