//! Argument structs for CLI commands.

use std::path::PathBuf;

use clap::Args;

use crate::parsers::{parse_pad_anchor, parse_target_size};
use vqaprep_core::{PadAnchor, TargetSize};

/// Options for a normalization run over a folder or a single image.
#[derive(Args, Clone, Debug, Default)]
pub struct RunArgs {
    /// Input folder (or a single image file)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output folder
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Rescale output to floating [0, 1] and write 32-bit float TIFF
    #[arg(long)]
    pub normalize: bool,

    /// Explicit target size as HEIGHTxWIDTH; inferred from the input when absent
    #[arg(long, value_name = "HxW", value_parser = parse_target_size)]
    pub target_size: Option<TargetSize>,

    /// Where the resized image sits on the padded canvas: top-left or center
    #[arg(long, value_name = "ANCHOR", value_parser = parse_pad_anchor)]
    pub pad_anchor: Option<PadAnchor>,

    /// YAML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the batch report as JSON
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}
