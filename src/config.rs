//! Viewer options and the JSON files they can come from.
//!
//! A config file holds any subset of [`ViewerOptions`]; missing fields take
//! their defaults. A features file is either a bare JSON array of annotations
//! or an object with a `features` array.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::model::Annotation;
use crate::rotation::DEFAULT_STEP_RESIDUES;

/// Errors that can occur while reading option or feature files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Construction options of a [`CircularViewer`](crate::viewer::CircularViewer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// Name of the render destination
    pub target: String,
    /// Residues of the circular sequence
    pub sequence: String,
    /// Drawing area width, used by the renderer only
    pub width: u32,
    /// Drawing area height, used by the renderer only
    pub height: u32,
    /// Initial annotations, packed in this order
    pub features: Vec<Annotation>,
    /// Rotation speed multiplier
    pub speed: f64,
    /// Residues turned per tick at speed 1
    pub step_residues: usize,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            target: "circview".to_string(),
            sequence: String::new(),
            width: 500,
            height: 500,
            features: Vec::new(),
            speed: 1.0,
            step_residues: DEFAULT_STEP_RESIDUES,
        }
    }
}

/// Loads options from a JSON config file.
pub fn load_options<P: AsRef<Path>>(path: P) -> ConfigResult<ViewerOptions> {
    let path = path.as_ref();
    let options: ViewerOptions = read_json(path)?;
    info!(path = %path.display(), features = options.features.len(), "loaded viewer options");
    Ok(options)
}

/// Loads annotations from a JSON features file.
pub fn load_features<P: AsRef<Path>>(path: P) -> ConfigResult<Vec<Annotation>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FeatureFile {
        List(Vec<Annotation>),
        Wrapped { features: Vec<Annotation> },
    }

    let path = path.as_ref();
    let file: FeatureFile = read_json(path)?;
    let features = match file {
        FeatureFile::List(features) | FeatureFile::Wrapped { features } => features,
    };
    info!(path = %path.display(), count = features.len(), "loaded features");
    Ok(features)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.display().to_string(),
        source,
    })
}
