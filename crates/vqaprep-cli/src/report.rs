//! Operator-facing batch summaries.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use vqaprep_core::{BatchReport, TargetSource};

/// Print the end-of-run summary block.
pub fn print_summary(report: &BatchReport) {
    let summary = report.summary();

    println!("\n========================================");
    println!("BATCH PROCESSING COMPLETE");
    println!("========================================");
    match &report.target_source {
        TargetSource::Configured => {
            println!("  Target size: {} (configured)", report.target_size)
        }
        TargetSource::Inferred {
            scanned, matching, ..
        } => println!(
            "  Target size: {} (inferred, {} of {} images)",
            report.target_size, matching, scanned
        ),
    }
    println!("  Succeeded:   {}", summary.succeeded);
    println!("  Skipped:     {}", summary.skipped);
    println!("  Failed:      {}", summary.failed);
    println!("  Output dir:  {}", report.output.display());
    println!(
        "  Output type: {}",
        if report.normalized {
            "float [0, 1] TIFF"
        } else {
            "8-bit"
        }
    );
    println!("  Total time:  {:.2}s", report.elapsed_secs);

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        println!("\nFailures:");
        for result in failures {
            println!("  {}: {}", result.source.display(), result.status);
        }
    }
}

/// Serialize `report` as pretty JSON to `path`.
pub fn write_report(report: &BatchReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize batch report")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}
