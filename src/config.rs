//! Optional TOML configuration for locating the model artifacts.
//!
//! ```toml
//! [artifacts]
//! model_dir = "models"
//! classifier = "classifier.msgpack"
//! columns = "model_columns.msgpack"
//! decoder = "label_encoder.msgpack"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::artifacts::{ArtifactPaths, CLASSIFIER_FILE, COLUMNS_FILE, DECODER_FILE};
use crate::error::{Error, Result};

pub const DEFAULT_MODEL_DIR: &str = "models";

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub artifacts: ArtifactsConfig,
}

/// Model directory and the file name of each artifact inside it.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub model_dir: PathBuf,
    pub classifier: String,
    pub columns: String,
    pub decoder: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        ArtifactsConfig {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            classifier: CLASSIFIER_FILE.to_string(),
            columns: COLUMNS_FILE.to_string(),
            decoder: DECODER_FILE.to_string(),
        }
    }
}

impl Config {
    /// Reads `path`, or falls back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|reason| Error::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        let a = &self.artifacts;
        ArtifactPaths {
            classifier: a.model_dir.join(&a.classifier),
            columns: a.model_dir.join(&a.columns),
            decoder: a.model_dir.join(&a.decoder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_models_dir() {
        let paths = Config::default().artifact_paths();
        assert_eq!(paths, ArtifactPaths::in_dir("models"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = Config::parse("[artifacts]\nmodel_dir = \"/srv/roles\"\n").unwrap();
        assert_eq!(cfg.artifacts.model_dir, PathBuf::from("/srv/roles"));
        assert_eq!(cfg.artifacts.decoder, DECODER_FILE);
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn malformed_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job-role.toml");
        std::fs::write(&path, "[artifacts\nmodel_dir = 3").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.is_fatal());
    }
}
