//! Pipeline configuration management.
//!
//! Holds the per-run [`PipelineConfig`], the optional YAML config file that
//! can seed it, and the application-data directory used for default folders.

mod defaults;
mod paths;

pub use defaults::{ClaheParams, DenoiseParams, SharpenParams};
pub use paths::{DataDirs, BASE_DIR_ENV};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::models::{PadAnchor, TargetSize};

/// Candidate config file names searched in the working directory.
const CONFIG_FILENAMES: &[&str] = &["vqaprep.yml", "vqaprep.yaml"];

/// Processing options for one run. Immutable once the runner owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Explicit output geometry; inferred from the input folder when absent.
    pub target_size: Option<TargetSize>,
    /// Rescale the final image to floating [0, 1].
    pub do_normalize: bool,
    pub denoise: DenoiseParams,
    pub color_correction: ClaheParams,
    pub sharpen: SharpenParams,
    pub pad_anchor: PadAnchor,
    /// Quality for 8-bit JPEG output.
    pub jpeg_quality: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_size: None,
            do_normalize: false,
            denoise: DenoiseParams::default(),
            color_correction: ClaheParams::default(),
            sharpen: SharpenParams::default(),
            pad_anchor: PadAnchor::default(),
            jpeg_quality: 95,
        }
    }
}

impl PipelineConfig {
    /// Clamp every tunable into a range the stages accept.
    pub fn sanitize(mut self) -> Self {
        self.denoise.sanitize();
        self.color_correction.sanitize();
        self.sharpen.sanitize();
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self
    }

    /// Reject values that cannot be clamped into something meaningful.
    pub fn validate(&self) -> Result<()> {
        if let Some(size) = &self.target_size {
            size.validate()?;
        }
        Ok(())
    }
}

/// Folder overrides that can live in the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOverrides {
    pub input_folder: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
}

/// On-disk config file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub paths: PathOverrides,
    pub pipeline: PipelineConfig,
}

impl ConfigFile {
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let parsed: ConfigFile = serde_yaml::from_str(contents)
            .map_err(|e| PipelineError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(ConfigFile {
            paths: parsed.paths,
            pipeline: parsed.pipeline.sanitize(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&contents)
    }
}

/// Loaded configuration together with its source path and any warnings.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    pub config: ConfigFile,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl ConfigHandle {
    /// Folder to read from: explicit value, then config file, then data dir.
    pub fn input_folder(&self, explicit: Option<PathBuf>, dirs: &DataDirs) -> PathBuf {
        explicit
            .or_else(|| self.config.paths.input_folder.clone())
            .unwrap_or_else(|| dirs.default_input_folder())
    }

    pub fn output_folder(&self, explicit: Option<PathBuf>, dirs: &DataDirs) -> PathBuf {
        explicit
            .or_else(|| self.config.paths.output_folder.clone())
            .unwrap_or_else(|| dirs.default_output_folder())
    }
}

/// Load the first readable config file, falling back to built-in defaults.
///
/// An explicitly requested file that fails to load is an error; discovered
/// candidates that fail to parse only produce a warning.
pub fn load_config(custom_path: Option<&Path>, dirs: &DataDirs) -> Result<ConfigHandle> {
    let mut warnings = Vec::new();

    if let Some(path) = custom_path {
        let config = ConfigFile::load(path)?;
        return Ok(ConfigHandle {
            config,
            source: Some(path.to_path_buf()),
            warnings,
        });
    }

    for candidate in config_candidates(dirs) {
        if !candidate.is_file() {
            continue;
        }
        match ConfigFile::load(&candidate) {
            Ok(config) => {
                let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                return Ok(ConfigHandle {
                    config,
                    source: Some(source),
                    warnings,
                });
            }
            Err(err) => warnings.push(format!("{}: {}", candidate.display(), err)),
        }
    }

    Ok(ConfigHandle {
        config: ConfigFile::default(),
        source: None,
        warnings,
    })
}

fn config_candidates(dirs: &DataDirs) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join(name));
            candidates.push(cwd.join("config").join(name));
        }
    }

    for name in CONFIG_FILENAMES {
        candidates.push(dirs.base().join(name));
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_matches_documented_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.target_size, None);
        assert!(!config.do_normalize);
        assert_eq!(config.denoise.strength, 3.0);
        assert_eq!(config.denoise.template_window, 7);
        assert_eq!(config.denoise.search_window, 21);
        assert_eq!(config.color_correction.clip_limit, 2.0);
        assert_eq!(config.color_correction.tile_grid, (8, 8));
        assert_eq!(config.sharpen.amount, 1.5);
        assert_eq!(config.sharpen.sigma, 2.0);
        assert_eq!(config.pad_anchor, PadAnchor::TopLeft);
    }

    #[test]
    fn test_yaml_partial_override() {
        let yaml = r#"
paths:
  input_folder: /data/raw
pipeline:
  do_normalize: true
  target_size:
    height: 533
    width: 800
  sharpen:
    amount: 0.5
  pad_anchor: center
"#;
        let file = ConfigFile::from_yaml(yaml).unwrap();
        assert_eq!(file.paths.input_folder, Some(PathBuf::from("/data/raw")));
        assert_eq!(file.paths.output_folder, None);
        assert!(file.pipeline.do_normalize);
        assert_eq!(
            file.pipeline.target_size,
            Some(TargetSize {
                height: 533,
                width: 800
            })
        );
        assert_eq!(file.pipeline.sharpen.amount, 0.5);
        assert_eq!(file.pipeline.sharpen.sigma, 2.0);
        assert_eq!(file.pipeline.pad_anchor, PadAnchor::Center);
    }

    #[test]
    fn test_yaml_parse_error() {
        let result = ConfigFile::from_yaml("pipeline: [not, a, map]");
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_target() {
        let config = PipelineConfig {
            target_size: Some(TargetSize {
                height: 0,
                width: 10,
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.yml");
        fs::write(&path, "pipeline:\n  jpeg_quality: 80\n").unwrap();

        let dirs = DataDirs::with_base(dir.path());
        let handle = load_config(Some(&path), &dirs).unwrap();
        assert_eq!(handle.source, Some(path));
        assert_eq!(handle.config.pipeline.jpeg_quality, 80);
    }

    #[test]
    fn test_load_config_missing_explicit_path_is_error() {
        let dir = tempdir().unwrap();
        let dirs = DataDirs::with_base(dir.path());
        let result = load_config(Some(&dir.path().join("absent.yml")), &dirs);
        assert!(result.is_err());
    }

    #[test]
    fn test_folder_precedence() {
        let dirs = DataDirs::with_base("/base");
        let handle = ConfigHandle {
            config: ConfigFile {
                paths: PathOverrides {
                    input_folder: Some(PathBuf::from("/from-file")),
                    output_folder: None,
                },
                pipeline: PipelineConfig::default(),
            },
            source: None,
            warnings: Vec::new(),
        };

        assert_eq!(
            handle.input_folder(Some(PathBuf::from("/cli")), &dirs),
            PathBuf::from("/cli")
        );
        assert_eq!(
            handle.input_folder(None, &dirs),
            PathBuf::from("/from-file")
        );
        assert_eq!(
            handle.output_folder(None, &dirs),
            PathBuf::from("/base/images/preprocessed_url_images")
        );
    }
}
