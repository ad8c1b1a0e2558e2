//! Target-size inference for a batch.
//!
//! The most frequent (height, width) among readable inputs becomes the batch
//! geometry. Ties go to the pair seen first in the sorted listing. Only file
//! headers are read.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::decoders::{self, SUPPORTED_EXTENSIONS};
use crate::models::TargetSize;

/// Outcome of profiling a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeProfile {
    pub target: TargetSize,
    /// Files matching the extension filter.
    pub scanned: usize,
    /// Files whose header could be read.
    pub readable: usize,
    /// Readable files already at `target`.
    pub matching: usize,
}

impl SizeProfile {
    fn fallback(scanned: usize) -> Self {
        Self {
            target: TargetSize::DEFAULT,
            scanned,
            readable: 0,
            matching: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SizeProfiler {
    extensions: Vec<String>,
}

impl Default for SizeProfiler {
    fn default() -> Self {
        Self::new(SUPPORTED_EXTENSIONS)
    }
}

impl SizeProfiler {
    pub fn new(extensions: &[&str]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_ascii_lowercase()).collect(),
        }
    }

    /// Profile every eligible file in `folder`.
    ///
    /// Never fails: an unlistable folder profiles like an empty one.
    pub fn profile_folder(&self, folder: &Path) -> SizeProfile {
        let extensions: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        match decoders::list_images(folder, &extensions) {
            Ok(files) => self.profile_files(&files),
            Err(e) => {
                warn!("Cannot list {}: {}", folder.display(), e);
                self.profile_files(&[])
            }
        }
    }

    /// Profile `files` in the given order.
    pub fn profile_files(&self, files: &[PathBuf]) -> SizeProfile {
        // Pair -> (count, first position)
        let mut tally: HashMap<TargetSize, (usize, usize)> = HashMap::new();
        let mut readable = 0;

        for path in files {
            match decoders::read_dimensions(path) {
                Ok(size) => {
                    let order = tally.len();
                    tally.entry(size).or_insert((0, order)).0 += 1;
                    readable += 1;
                }
                Err(e) => warn!("Skipping {} while profiling: {}", path.display(), e),
            }
        }

        let winner = tally
            .into_iter()
            .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
                count_a.cmp(count_b).then(first_b.cmp(first_a))
            });

        let profile = match winner {
            Some((target, (matching, _))) => SizeProfile {
                target,
                scanned: files.len(),
                readable,
                matching,
            },
            None => SizeProfile::fallback(files.len()),
        };

        if profile.readable == 0 {
            info!(
                "Scanned {} images, none readable; using default size {}",
                profile.scanned, profile.target
            );
        } else {
            info!(
                "Scanned {} images, chose size {} shared by {}",
                profile.scanned, profile.target, profile.matching
            );
        }
        profile
    }
}
