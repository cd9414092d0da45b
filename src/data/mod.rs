use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::model::{Location, Risk};

/// Compiled-in fixture used when no dataset path is configured.
pub const SEED_JSON: &str = include_str!("../../data/seed.json");

pub const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable risk and location collections supplied at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub locations: Vec<Location>,
    pub risks: Vec<Risk>,
}

/// A dataset plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub source: String,
    pub hash_sha256: String,
}

impl Dataset {
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// Display name for a location reference; dangling ids render as "Unknown".
    pub fn location_name(&self, id: &str) -> &str {
        self.location(id)
            .map(|l| l.name.as_str())
            .unwrap_or(UNKNOWN_LOCATION)
    }

    pub fn risk(&self, id: &str) -> Option<&Risk> {
        self.risks.iter().find(|r| r.id == id)
    }
}

/// Load from `path`, or the seed fixture when no path is given.
pub fn load(path: Option<&Path>) -> Result<LoadedDataset, DataError> {
    match path {
        Some(p) => load_file(p),
        None => seed(),
    }
}

pub fn load_file(path: &Path) -> Result<LoadedDataset, DataError> {
    let bytes = fs::read(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let dataset: Dataset = serde_json::from_slice(&bytes)?;
    Ok(LoadedDataset {
        dataset,
        source: path.display().to_string(),
        hash_sha256: sha256_hex(&bytes),
    })
}

pub fn seed() -> Result<LoadedDataset, DataError> {
    Ok(LoadedDataset {
        dataset: Dataset::from_json_str(SEED_JSON)?,
        source: "seed".to_string(),
        hash_sha256: sha256_hex(SEED_JSON.as_bytes()),
    })
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
