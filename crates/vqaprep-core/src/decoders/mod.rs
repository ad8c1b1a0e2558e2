//! Image discovery and decoding.
//!
//! Inputs are JPEG or PNG files. Everything is decoded to 8-bit RGB so the
//! stages only ever see one pixel layout.


use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::{ImageReader, RgbImage};

use crate::error::{PipelineError, Result};
use crate::models::TargetSize;

/// Extensions eligible for processing (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Whether `path` has one of `extensions` (case-insensitive).
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

pub fn is_supported_image(path: &Path) -> bool {
    has_extension(path, SUPPORTED_EXTENSIONS)
}

/// List the files in `folder` matching `extensions`, sorted by path.
///
/// The sorted listing is the iteration order used for profiling and
/// processing, so results do not depend on filesystem enumeration order.
pub fn list_images(folder: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(folder).map_err(|e| {
        PipelineError::Config(format!(
            "Failed to read directory {}: {}",
            folder.display(),
            e
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Open `path` with the format sniffed from its leading bytes.
///
/// Downloaded files are often mislabeled (PNG bytes behind a `.jpg` name);
/// the extension is only a fallback when the content is unrecognized.
fn open_reader(path: &Path) -> Result<ImageReader<BufReader<File>>> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| PipelineError::read(path, e))
}

/// Read (height, width) from the file header without decoding pixels.
pub fn read_dimensions(path: &Path) -> Result<TargetSize> {
    let (width, height) = open_reader(path)?
        .into_dimensions()
        .map_err(|e| PipelineError::read(path, e))?;
    TargetSize::new(height, width)
}

/// Decode a file into an 8-bit RGB image.
pub fn read_image(path: &Path) -> Result<RgbImage> {
    let decoded = open_reader(path)?
        .decode()
        .map_err(|e| PipelineError::read(path, e))?;
    let rgb = decoded.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(PipelineError::read(path, "decoded image is empty"));
    }
    Ok(rgb)
}
