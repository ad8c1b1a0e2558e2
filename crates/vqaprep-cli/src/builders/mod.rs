//! Builder functions that merge CLI options with the loaded config.
//!
//! Precedence is always: command-line flag, then config file, then the
//! data-directory defaults.

use std::path::PathBuf;

use vqaprep_core::{ConfigHandle, DataDirs, PipelineConfig};

use crate::args::RunArgs;

/// Input and output locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFolders {
    pub input: PathBuf,
    pub output: PathBuf,
}

pub fn resolve_folders(args: &RunArgs, handle: &ConfigHandle, dirs: &DataDirs) -> ResolvedFolders {
    ResolvedFolders {
        input: handle.input_folder(args.input.clone(), dirs),
        output: handle.output_folder(args.output.clone(), dirs),
    }
}

/// Pipeline config from the file, overridden by any flag that was given.
///
/// `--normalize` can only turn normalization on; a config file that enables
/// it is not overridden by the flag's absence.
pub fn build_pipeline_config(args: &RunArgs, handle: &ConfigHandle) -> PipelineConfig {
    let mut config = handle.config.pipeline.clone();
    if args.normalize {
        config.do_normalize = true;
    }
    if let Some(size) = args.target_size {
        config.target_size = Some(size);
    }
    if let Some(anchor) = args.pad_anchor {
        config.pad_anchor = anchor;
    }
    config
}
