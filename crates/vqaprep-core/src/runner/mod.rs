//! Batch and single-image orchestration.
//!
//! One run walks `Idle -> Profiling -> Processing(1..=N) -> Done`; profiling
//! is skipped when the config carries an explicit target size. Each image
//! goes through `Reading -> Transforming -> Writing` and every per-image
//! error is folded into its [`ProcessingResult`]. Only configuration errors
//! and an output folder that rejects the very first write end a run early.

mod state;


pub use state::RunnerState;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::decoders::{self, SUPPORTED_EXTENSIONS};
use crate::error::{PipelineError, Result};
use crate::exporters;
use crate::models::{
    BatchReport, ImageStage, ProcessingResult, ProcessingStatus, TargetSize, TargetSource,
};
use crate::pipeline;
use crate::profiler::SizeProfiler;
use state::WriteHealth;

pub struct PipelineRunner {
    config: PipelineConfig,
    profiler: SizeProfiler,
    state: RunnerState,
}

impl PipelineRunner {
    /// Take ownership of `config`, clamped into valid ranges.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let config = config.sanitize();
        config.validate()?;
        Ok(Self {
            config,
            profiler: SizeProfiler::default(),
            state: RunnerState::Idle,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Process every eligible image in `input` into `output`.
    ///
    /// Fails before touching the filesystem if `input` is missing or holds no
    /// eligible image; the output folder is created only after that.
    pub fn run_batch(&mut self, input: &Path, output: &Path) -> Result<BatchReport> {
        let start = Instant::now();

        if !input.is_dir() {
            return Err(PipelineError::InputMissing(input.to_path_buf()));
        }
        let files = decoders::list_images(input, SUPPORTED_EXTENSIONS)?;
        if files.is_empty() {
            return Err(PipelineError::NoImages(input.to_path_buf()));
        }
        ensure_output_dir(output)?;

        info!(
            "Found {} images in {}, writing to {}",
            files.len(),
            input.display(),
            output.display()
        );

        let (target_size, target_source) = self.resolve_target(&files);
        let results = self.process_files(&files, output, target_size)?;

        Ok(BatchReport {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            target_size,
            target_source,
            normalized: self.config.do_normalize,
            results,
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }

    /// Process one image file into `output_dir`.
    ///
    /// Without a configured target size the image keeps its own geometry.
    pub fn process_single(&mut self, input_file: &Path, output_dir: &Path) -> Result<BatchReport> {
        let start = Instant::now();

        if !input_file.is_file() {
            return Err(PipelineError::InputMissing(input_file.to_path_buf()));
        }
        if !decoders::is_supported_image(input_file) {
            return Err(PipelineError::NoImages(input_file.to_path_buf()));
        }
        ensure_output_dir(output_dir)?;

        let files = [input_file.to_path_buf()];
        let (target_size, target_source) = self.resolve_target(&files);
        let results = self.process_files(&files, output_dir, target_size)?;

        Ok(BatchReport {
            input: input_file.to_path_buf(),
            output: output_dir.to_path_buf(),
            target_size,
            target_source,
            normalized: self.config.do_normalize,
            results,
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }

    fn resolve_target(&mut self, files: &[PathBuf]) -> (TargetSize, TargetSource) {
        if let Some(size) = self.config.target_size {
            info!("Using configured target size {}", size);
            return (size, TargetSource::Configured);
        }

        self.transition(RunnerState::Profiling);
        let profile = self.profiler.profile_files(files);
        (
            profile.target,
            TargetSource::Inferred {
                scanned: profile.scanned,
                readable: profile.readable,
                matching: profile.matching,
            },
        )
    }

    fn process_files(
        &mut self,
        files: &[PathBuf],
        output: &Path,
        target: TargetSize,
    ) -> Result<Vec<ProcessingResult>> {
        let total = files.len();
        let mut results = Vec::with_capacity(total);
        let mut health = WriteHealth::default();

        for (i, source) in files.iter().enumerate() {
            let index = i + 1;
            let destination =
                exporters::destination_path(source, output, self.config.do_normalize);
            let status = self.process_image(index, total, source, &destination, target);

            match &status {
                ProcessingStatus::Succeeded => {
                    health.record_success();
                    info!(
                        "[{}/{}] {} -> {}",
                        index,
                        total,
                        source.display(),
                        destination.display()
                    );
                }
                ProcessingStatus::SkippedExists => {
                    info!("[{}/{}] {} skipped (exists)", index, total, source.display());
                }
                ProcessingStatus::FailedUnreadable { stage, reason } => {
                    warn!(
                        "[{}/{}] {} failed while {}: {}",
                        index,
                        total,
                        source.display(),
                        stage,
                        reason
                    );
                }
                ProcessingStatus::FailedWrite { reason } => {
                    warn!(
                        "[{}/{}] {} failed to write: {}",
                        index,
                        total,
                        source.display(),
                        reason
                    );
                    if health.record_failure() {
                        self.transition(RunnerState::Done);
                        return Err(PipelineError::OutputUnwritable {
                            path: output.to_path_buf(),
                            reason: reason.clone(),
                        });
                    }
                }
            }

            results.push(ProcessingResult {
                source: source.clone(),
                destination,
                status,
            });
        }

        self.transition(RunnerState::Done);
        Ok(results)
    }

    fn process_image(
        &mut self,
        index: usize,
        total: usize,
        source: &Path,
        destination: &Path,
        target: TargetSize,
    ) -> ProcessingStatus {
        // Cheap early skip; the no-clobber write below closes the race
        if destination.exists() {
            return ProcessingStatus::SkippedExists;
        }

        self.enter_stage(index, total, ImageStage::Reading);
        let image = match decoders::read_image(source) {
            Ok(image) => image,
            Err(e) => return failed(ImageStage::Reading, e),
        };

        self.enter_stage(index, total, ImageStage::Transforming);
        let processed = match pipeline::preprocess_rgb(&image, target, &self.config) {
            Ok(processed) => processed,
            Err(e) => return failed(ImageStage::Transforming, e),
        };

        self.enter_stage(index, total, ImageStage::Writing);
        match exporters::write_output(&processed, destination, self.config.jpeg_quality) {
            Ok(()) => ProcessingStatus::Succeeded,
            Err(PipelineError::AlreadyExists(_)) => ProcessingStatus::SkippedExists,
            Err(e) => ProcessingStatus::FailedWrite {
                reason: e.to_string(),
            },
        }
    }

    fn enter_stage(&mut self, index: usize, total: usize, stage: ImageStage) {
        self.transition(RunnerState::Processing {
            index,
            total,
            stage,
        });
    }

    fn transition(&mut self, next: RunnerState) {
        debug!("Runner state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

fn failed(stage: ImageStage, error: PipelineError) -> ProcessingStatus {
    ProcessingStatus::FailedUnreadable {
        stage,
        reason: error.to_string(),
    }
}

/// Create `output` if needed and clear temp files from an interrupted run.
fn ensure_output_dir(output: &Path) -> Result<()> {
    fs::create_dir_all(output).map_err(|source| PipelineError::OutputDir {
        path: output.to_path_buf(),
        source,
    })?;
    match exporters::sweep_partial_writes(output) {
        Ok(0) => {}
        Ok(n) => info!("Removed {} partial files from an interrupted run", n),
        Err(e) => warn!("Cannot sweep {}: {}", output.display(), e),
    }
    Ok(())
}
