//! Application-data directory resolution.

use std::path::{Path, PathBuf};

/// Environment variable overriding the base data directory.
pub const BASE_DIR_ENV: &str = "VQAPREP_BASE_DIR";

const APP_DIR_NAME: &str = "vqaprep";

/// Base data directory and the default folders derived from it.
///
/// Resolved once at startup and passed down explicitly, so tests can point
/// it anywhere without touching the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirs {
    base: PathBuf,
}

impl DataDirs {
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Resolve from the real environment and platform.
    pub fn from_env() -> Self {
        Self::resolve(std::env::var(BASE_DIR_ENV).ok(), dirs::data_dir())
    }

    /// Resolve from injected values: the env override wins when non-empty,
    /// then the platform data directory, then a folder in the working directory.
    pub fn resolve(env_value: Option<String>, platform_data_dir: Option<PathBuf>) -> Self {
        if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
            return Self::with_base(value);
        }
        match platform_data_dir {
            Some(dir) => Self::with_base(dir.join(APP_DIR_NAME)),
            None => Self::with_base(format!("{}-data", APP_DIR_NAME)),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn images_dir(&self) -> PathBuf {
        self.base.join("images")
    }

    pub fn default_input_folder(&self) -> PathBuf {
        self.images_dir().join("raw_images_from_urls")
    }

    pub fn default_output_folder(&self) -> PathBuf {
        self.images_dir().join("preprocessed_url_images")
    }
}
