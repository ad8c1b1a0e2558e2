//! VQAPrep Core Library
//!
//! Normalizes heterogeneous raw images into a uniformly sized, denoised,
//! contrast-corrected and sharpened batch for VQA dataset preparation.

pub mod color;
pub mod config;
pub mod decoders;
pub mod error;
pub mod exporters;
pub mod models;
pub mod pipeline;
pub mod profiler;
pub mod runner;

// Re-export commonly used types
pub use config::{load_config, ConfigHandle, DataDirs, PipelineConfig};
pub use error::{PipelineError, Result};
pub use models::{
    BatchReport, BatchSummary, ImageStage, PadAnchor, PreprocessedImage, ProcessingResult,
    ProcessingStatus, TargetSize, TargetSource,
};
pub use profiler::{SizeProfile, SizeProfiler};
pub use runner::{PipelineRunner, RunnerState};
