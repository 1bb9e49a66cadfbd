use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::input::{FileSource, SourceTable};
use crate::model::{Contrast, Subject};

pub const DEFAULT_CHANCE_LEVEL: f64 = 0.5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid reporting window: tmin {tmin} > tmax {tmax}")]
    InvalidWindow { tmin: f64, tmax: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFiniteBound { name: &'static str, value: f64 },
    #[error("chance level must be finite, got {0}")]
    InvalidChance(f64),
}

/// Cohort description handed to `run`: who, which contrasts, and where each
/// result file lives. Paths are resolved by the caller; relative ones are
/// taken against the manifest's directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CohortManifest {
    pub cohort: Vec<Subject>,
    pub contrasts: Vec<Contrast>,
    pub sources: BTreeMap<Subject, BTreeMap<Contrast, PathBuf>>,
    #[serde(default)]
    pub chance_level: Option<f64>,
}

impl CohortManifest {
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manifest = Self::from_json(&text, path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        manifest.resolve_paths(base);
        Ok(manifest)
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        for by_contrast in self.sources.values_mut() {
            for p in by_contrast.values_mut() {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        }
    }

    pub fn file_source(&self) -> FileSource {
        let table: SourceTable = self.sources.clone();
        FileSource::new(table)
    }
}

/// Descriptive-statistics window and chance level for the report stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSettings {
    pub chance_level: f64,
    pub tmin: Option<f64>,
    pub tmax: Option<f64>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            chance_level: DEFAULT_CHANCE_LEVEL,
            tmin: None,
            tmax: None,
        }
    }
}

impl ReportSettings {
    /// CLI values win over the manifest; the manifest wins over defaults.
    pub fn resolve(
        cli_chance: Option<f64>,
        manifest_chance: Option<f64>,
        tmin: Option<f64>,
        tmax: Option<f64>,
    ) -> Result<Self, ConfigError> {
        let chance_level = cli_chance
            .or(manifest_chance)
            .unwrap_or(DEFAULT_CHANCE_LEVEL);
        if !chance_level.is_finite() {
            return Err(ConfigError::InvalidChance(chance_level));
        }
        for (name, bound) in [("tmin", tmin), ("tmax", tmax)] {
            if let Some(value) = bound.filter(|v| !v.is_finite()) {
                return Err(ConfigError::NonFiniteBound { name, value });
            }
        }
        if let (Some(lo), Some(hi)) = (tmin, tmax) {
            if lo > hi {
                return Err(ConfigError::InvalidWindow { tmin: lo, tmax: hi });
            }
        }
        Ok(Self {
            chance_level,
            tmin,
            tmax,
        })
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/config/tests.rs"]
mod tests;
