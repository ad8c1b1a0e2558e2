use std::path::PathBuf;

use anyhow::{bail, Result};

use vqaprep_core::SizeProfiler;

use super::load_settings;

/// Print the target size a batch run over `input` would use.
pub fn cmd_profile(input: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let (dirs, handle) = load_settings(config.as_deref())?;
    let folder = handle.input_folder(input, &dirs);

    if !folder.is_dir() {
        bail!("Input folder does not exist: {}", folder.display());
    }

    let profile = SizeProfiler::default().profile_folder(&folder);

    println!("Folder:      {}", folder.display());
    println!("Scanned:     {}", profile.scanned);
    println!("Readable:    {}", profile.readable);
    println!("Target size: {} (height x width)", profile.target);
    println!("Matching:    {}", profile.matching);
    Ok(())
}
