//! Shared utilities for vqaprep-cli
//!
//! Argument structs, parsers and the glue that turns command-line values
//! into a core [`vqaprep_core::PipelineConfig`].

pub mod args;
pub mod builders;
pub mod parsers;
pub mod report;

// Re-export commonly used items at the crate root for convenience
pub use args::RunArgs;
pub use builders::{build_pipeline_config, resolve_folders, ResolvedFolders};
pub use parsers::{parse_pad_anchor, parse_target_size};
pub use report::{print_summary, write_report};
