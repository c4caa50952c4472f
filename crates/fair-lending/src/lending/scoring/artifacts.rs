use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::super::fairness::ApprovalBaseline;
use super::super::preprocessing::FeatureTransformer;
use super::model::{LogisticModel, ModelError};

/// Errors raised while reading or writing persisted artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to access artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("refusing to persist a feature transformer that has not been fitted")]
    Unfitted,
    #[error("model artifact {path} is invalid: {source}")]
    InvalidModel {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

/// Fitted preprocessing state written by the `prepare` step and loaded by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessorArtifact {
    pub transformer: FeatureTransformer,
    #[serde(default)]
    pub approval_baseline: Option<ApprovalBaseline>,
    pub created_at: DateTime<Utc>,
}

impl PreprocessorArtifact {
    pub fn new(
        transformer: FeatureTransformer,
        approval_baseline: Option<ApprovalBaseline>,
    ) -> Result<Self, ArtifactError> {
        if !transformer.is_fitted() {
            return Err(ArtifactError::Unfitted);
        }
        Ok(Self {
            transformer,
            approval_baseline,
            created_at: Utc::now(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }
        let file = File::create(path).map_err(|source| io_error(path, source))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|source| ArtifactError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(|source| io_error(path, source))
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let artifact: Self = read_json(path)?;
        if !artifact.transformer.is_fitted() {
            return Err(ArtifactError::Unfitted);
        }
        Ok(artifact)
    }
}

/// Load and validate a logistic model artifact.
pub fn load_model(path: &Path) -> Result<LogisticModel, ArtifactError> {
    let model: LogisticModel = read_json(path)?;
    model
        .validate()
        .map_err(|source| ArtifactError::InvalidModel {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(model)
}

pub fn save_model(model: &LogisticModel, path: &Path) -> Result<(), ArtifactError> {
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, model).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| io_error(path, source))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| io_error(path, source))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn io_error(path: &Path, source: std::io::Error) -> ArtifactError {
    ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    }
}
