//! Output writers.
//!
//! 8-bit results keep the input file name and are encoded by its extension.
//! Normalized results are written as 32-bit float RGB TIFF so [0, 1] values
//! survive exactly; they keep the full input name plus `.tiff`, so `a.jpg`
//! and `a.png` never share a destination. Every write goes to a temporary
//! file in the destination folder and is then linked into place without
//! replacing an existing file, so a destination is either absent or complete.
//! Temporary files carry a fixed prefix and suffix so a later run can sweep
//! the ones a killed process left behind.

use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::Rgb32FImage;
use tempfile::Builder;
use tracing::warn;

use crate::error::{PipelineError, Result};
use crate::models::PreprocessedImage;

/// Extension used for normalized float output.
pub const FLOAT_EXTENSION: &str = "tiff";

/// Name prefix of in-flight temporary files.
pub const PARTIAL_PREFIX: &str = ".vqaprep-";
/// Name suffix of in-flight temporary files.
pub const PARTIAL_SUFFIX: &str = ".part";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg { quality: u8 },
    Png,
    Tiff32F,
}

impl OutputFormat {
    /// Pick the format for `destination`.
    pub fn for_destination(
        destination: &Path,
        normalized: bool,
        jpeg_quality: u8,
    ) -> Result<Self> {
        if normalized {
            return Ok(OutputFormat::Tiff32F);
        }
        let ext = destination
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg {
                quality: jpeg_quality.clamp(1, 100),
            }),
            "png" => Ok(OutputFormat::Png),
            other => Err(PipelineError::write(
                destination,
                format!("unsupported output extension '{}'", other),
            )),
        }
    }
}

/// Where the output for `input` lands in `output_dir`.
///
/// Same file name for 8-bit output; `<name>.tiff` for normalized output.
pub fn destination_path(input: &Path, output_dir: &Path, normalized: bool) -> PathBuf {
    let mut file_name = input
        .file_name()
        .unwrap_or(input.as_os_str())
        .to_os_string();
    if normalized {
        file_name.push(".");
        file_name.push(FLOAT_EXTENSION);
    }
    output_dir.join(file_name)
}

fn is_partial_write(name: &str) -> bool {
    name.starts_with(PARTIAL_PREFIX) && name.ends_with(PARTIAL_SUFFIX)
}

/// Remove temporary files left in `output_dir` by an interrupted run.
///
/// Returns how many were removed. Finished outputs are never touched.
pub fn sweep_partial_writes(output_dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let is_partial = name.to_str().map(is_partial_write).unwrap_or(false);
        if !is_partial || !entry.file_type()?.is_file() {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => warn!("Cannot remove stale {}: {}", entry.path().display(), e),
        }
    }
    Ok(removed)
}

/// Write `image` to `destination` unless something is already there.
///
/// Returns [`PipelineError::AlreadyExists`] when the destination exists; the
/// existing file is never modified.
pub fn write_output(
    image: &PreprocessedImage,
    destination: &Path,
    jpeg_quality: u8,
) -> Result<()> {
    let format = OutputFormat::for_destination(destination, image.is_normalized(), jpeg_quality)?;
    let dir = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = Builder::new()
        .prefix(PARTIAL_PREFIX)
        .suffix(PARTIAL_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| {
            PipelineError::write(destination, format!("cannot create temp file: {}", e))
        })?;

    encode(image, format, temp.as_file_mut())
        .map_err(|reason| PipelineError::write(destination, reason))?;

    temp.persist_noclobber(destination).map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            PipelineError::AlreadyExists(destination.to_path_buf())
        } else {
            PipelineError::write(destination, e.error)
        }
    })?;
    Ok(())
}

fn encode(
    image: &PreprocessedImage,
    format: OutputFormat,
    file: &mut File,
) -> std::result::Result<(), String> {
    let mut writer = BufWriter::new(file);
    match (image, format) {
        (PreprocessedImage::Rgb8(img), OutputFormat::Jpeg { quality }) => {
            img.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))
                .map_err(|e| format!("Failed to encode JPEG: {}", e))?;
        }
        (PreprocessedImage::Rgb8(img), OutputFormat::Png) => {
            img.write_with_encoder(PngEncoder::new(&mut writer))
                .map_err(|e| format!("Failed to encode PNG: {}", e))?;
        }
        (PreprocessedImage::Rgb32F(img), OutputFormat::Tiff32F) => {
            write_tiff32f(img, &mut writer)?;
        }
        (image, format) => {
            return Err(format!(
                "{} image cannot be written as {:?}",
                if image.is_normalized() { "float" } else { "8-bit" },
                format
            ));
        }
    }
    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}

/// 32-bit float RGB TIFF, samples stored as-is.
fn write_tiff32f<W: Write + Seek>(
    image: &Rgb32FImage,
    writer: W,
) -> std::result::Result<(), String> {
    let mut encoder = tiff::encoder::TiffEncoder::new(writer)
        .map_err(|e| format!("Failed to create TIFF encoder: {}", e))?;
    encoder
        .write_image::<tiff::encoder::colortype::RGB32Float>(
            image.width(),
            image.height(),
            image.as_raw(),
        )
        .map_err(|e| format!("Failed to write TIFF image: {}", e))
}
