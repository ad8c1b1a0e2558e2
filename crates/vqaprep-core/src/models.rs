//! Data model shared by the stages and the runner.

use std::fmt;
use std::path::PathBuf;

use image::{Rgb32FImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Output geometry for a whole batch, as (height, width).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetSize {
    pub height: u32,
    pub width: u32,
}

impl TargetSize {
    /// Fallback used when no readable image is available to profile.
    pub const DEFAULT: TargetSize = TargetSize {
        height: 480,
        width: 640,
    };

    /// Create a target size, rejecting zero dimensions.
    pub fn new(height: u32, width: u32) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(PipelineError::InvalidTargetSize { height, width });
        }
        Ok(Self { height, width })
    }

    pub fn validate(&self) -> Result<()> {
        Self::new(self.height, self.width).map(|_| ())
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

/// Where the resized image sits on the padded canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PadAnchor {
    /// Resized image at (0, 0); padding only on the right and bottom.
    #[default]
    TopLeft,
    /// Padding split evenly, the extra pixel going to the right/bottom.
    Center,
}

impl std::str::FromStr for PadAnchor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top-left" | "topleft" | "top_left" => Ok(PadAnchor::TopLeft),
            "center" | "centre" => Ok(PadAnchor::Center),
            other => Err(format!(
                "Unknown pad anchor '{}' (expected top-left or center)",
                other
            )),
        }
    }
}

/// Final output of the per-image pipeline.
///
/// 8-bit unless normalization ran, in which case every sample is in [0, 1].
#[derive(Debug, Clone)]
pub enum PreprocessedImage {
    Rgb8(RgbImage),
    Rgb32F(Rgb32FImage),
}

impl PreprocessedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            PreprocessedImage::Rgb8(img) => img.dimensions(),
            PreprocessedImage::Rgb32F(img) => img.dimensions(),
        }
    }

    pub fn is_normalized(&self) -> bool {
        matches!(self, PreprocessedImage::Rgb32F(_))
    }
}

/// Sub-state of a single image while the runner works on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStage {
    Reading,
    Transforming,
    Writing,
}

impl fmt::Display for ImageStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageStage::Reading => "reading",
            ImageStage::Transforming => "transforming",
            ImageStage::Writing => "writing",
        };
        f.write_str(name)
    }
}

/// Outcome of one image in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessingStatus {
    Succeeded,
    SkippedExists,
    /// Unreadable input, or a stage rejected the decoded buffer.
    FailedUnreadable { stage: ImageStage, reason: String },
    FailedWrite { reason: String },
}

impl ProcessingStatus {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ProcessingStatus::FailedUnreadable { .. } | ProcessingStatus::FailedWrite { .. }
        )
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingStatus::Succeeded => f.write_str("succeeded"),
            ProcessingStatus::SkippedExists => f.write_str("skipped (exists)"),
            ProcessingStatus::FailedUnreadable { stage, reason } => {
                write!(f, "failed while {}: {}", stage, reason)
            }
            ProcessingStatus::FailedWrite { reason } => write!(f, "write failed: {}", reason),
        }
    }
}

/// Per-image record used for reporting only.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    pub source: PathBuf,
    pub destination: PathBuf,
    #[serde(flatten)]
    pub status: ProcessingStatus,
}

/// How the batch target size was decided.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetSource {
    Configured,
    Inferred {
        scanned: usize,
        readable: usize,
        matching: usize,
    },
}

/// Counts per status for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} skipped (exists), {} failed",
            self.succeeded, self.skipped, self.failed
        )
    }
}

/// Everything a finished run reports back.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub target_size: TargetSize,
    pub target_source: TargetSource,
    pub normalized: bool,
    pub results: Vec<ProcessingResult>,
    pub elapsed_secs: f64,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for result in &self.results {
            match result.status {
                ProcessingStatus::Succeeded => summary.succeeded += 1,
                ProcessingStatus::SkippedExists => summary.skipped += 1,
                _ => summary.failed += 1,
            }
        }
        summary
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProcessingResult> {
        self.results.iter().filter(|r| r.status.is_failure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_size_rejects_zero() {
        assert!(TargetSize::new(0, 640).is_err());
        assert!(TargetSize::new(480, 0).is_err());
        assert_eq!(
            TargetSize::new(533, 800).unwrap(),
            TargetSize {
                height: 533,
                width: 800
            }
        );
    }

    #[test]
    fn test_target_size_default() {
        assert_eq!(TargetSize::default(), TargetSize::new(480, 640).unwrap());
        assert_eq!(TargetSize::default().to_string(), "480x640");
    }

    #[test]
    fn test_pad_anchor_parse() {
        assert_eq!("top-left".parse::<PadAnchor>(), Ok(PadAnchor::TopLeft));
        assert_eq!("Center".parse::<PadAnchor>(), Ok(PadAnchor::Center));
        assert!("middle".parse::<PadAnchor>().is_err());
    }

    #[test]
    fn test_batch_summary_counts() {
        let result = |status| ProcessingResult {
            source: PathBuf::from("in.jpg"),
            destination: PathBuf::from("out.jpg"),
            status,
        };
        let report = BatchReport {
            input: PathBuf::from("in"),
            output: PathBuf::from("out"),
            target_size: TargetSize::DEFAULT,
            target_source: TargetSource::Configured,
            normalized: false,
            results: vec![
                result(ProcessingStatus::Succeeded),
                result(ProcessingStatus::Succeeded),
                result(ProcessingStatus::SkippedExists),
                result(ProcessingStatus::FailedUnreadable {
                    stage: ImageStage::Reading,
                    reason: "empty file".to_string(),
                }),
                result(ProcessingStatus::FailedWrite {
                    reason: "disk full".to_string(),
                }),
            ],
            elapsed_secs: 0.0,
        };

        let summary = report.summary();
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.total(), 5);
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    fn test_processing_status_display() {
        let failed = ProcessingStatus::FailedUnreadable {
            stage: ImageStage::Transforming,
            reason: "bad buffer".to_string(),
        };
        assert_eq!(failed.to_string(), "failed while transforming: bad buffer");
        assert_eq!(ProcessingStatus::SkippedExists.to_string(), "skipped (exists)");
        assert!(!ProcessingStatus::SkippedExists.is_failure());
        assert!(failed.is_failure());
    }

    #[test]
    fn test_processing_result_serializes_flat() {
        let result = ProcessingResult {
            source: PathBuf::from("in/a.jpg"),
            destination: PathBuf::from("out/a.jpg"),
            status: ProcessingStatus::FailedWrite {
                reason: "disk full".to_string(),
            },
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "failed_write");
        assert_eq!(value["reason"], "disk full");
        assert_eq!(value["source"], "in/a.jpg");
    }
}
