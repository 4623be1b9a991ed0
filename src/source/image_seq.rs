use super::{FrameSource, SourceError};
use image::RgbaImage;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Frame source backed by a single image file or a directory of image files
/// played back in sorted order. Stands in for a live camera when exercising
/// the detector offline.
#[derive(Debug)]
pub struct ImageSequenceSource {
    files: Vec<PathBuf>,
    next: usize,
    width: u32,
    height: u32,
}

impl ImageSequenceSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let mut files = if path.is_dir() {
            let entries = std::fs::read_dir(path).map_err(|source| SourceError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let mut files = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|source| SourceError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                let candidate = entry.path();
                if has_image_extension(&candidate) {
                    files.push(candidate);
                }
            }
            files
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        };

        if files.is_empty() {
            return Err(SourceError::EmptySequence(path.to_path_buf()));
        }
        files.sort();

        // Resolution comes from the first file's header, without decoding
        // the whole image.
        let (width, height) =
            image::image_dimensions(&files[0]).map_err(|source| SourceError::Decode {
                path: files[0].clone(),
                source,
            })?;
        tracing::info!(
            frames = files.len(),
            width,
            height,
            input = %path.display(),
            "image sequence opened"
        );
        Ok(Self {
            files,
            next: 0,
            width,
            height,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Option<RgbaImage>, SourceError> {
        let Some(path) = self.files.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        let img = image::open(path).map_err(|source| SourceError::Decode {
            path: path.clone(),
            source,
        })?;
        Ok(Some(img.to_rgba8()))
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
