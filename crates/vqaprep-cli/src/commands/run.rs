use anyhow::{Context, Result};
use tracing::info;

use vqaprep_cli::{build_pipeline_config, print_summary, resolve_folders, write_report, RunArgs};
use vqaprep_core::PipelineRunner;

use super::load_settings;

/// Run the pipeline over a folder, or over one file when `--input` is a file.
///
/// Per-image failures are reported in the summary and do not fail the
/// command; only configuration errors do.
pub fn cmd_run(args: RunArgs) -> Result<()> {
    let (dirs, handle) = load_settings(args.config.as_deref())?;
    let folders = resolve_folders(&args, &handle, &dirs);
    let config = build_pipeline_config(&args, &handle);

    let mut runner = PipelineRunner::new(config)?;

    let report = if folders.input.is_file() {
        info!("Processing single image {}", folders.input.display());
        runner.process_single(&folders.input, &folders.output)?
    } else {
        runner.run_batch(&folders.input, &folders.output)?
    };

    print_summary(&report);

    if let Some(path) = &args.report {
        write_report(&report, path).context("Batch finished but the report was not saved")?;
        println!("\nReport written to {}", path.display());
    }

    Ok(())
}
