use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod file;
pub mod json;
pub mod memory;
pub mod reader;
pub mod tsv;

pub use file::FileSource;
pub use memory::MemorySource;

use crate::model::curves::{ScoreCurve, TimeAxis};

/// A single subject/contrast result as produced by the upstream decoder: the
/// time vector and the score at each time point.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub times: TimeAxis,
    pub scores: ScoreCurve,
}

impl ScoreRecord {
    pub fn new(times: Vec<f64>, scores: Vec<f64>) -> Self {
        Self {
            times: TimeAxis::new(times),
            scores: ScoreCurve::new(scores),
        }
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("no data for subject {subject} / contrast {contrast}")]
    NotFound { subject: String, contrast: String },
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {path}: {msg}")]
    Parse { path: PathBuf, msg: String },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported score file format: {0}")]
    UnsupportedFormat(PathBuf),
}

impl InputError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        InputError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, msg: impl Into<String>) -> Self {
        InputError::Parse {
            path: path.to_path_buf(),
            msg: msg.into(),
        }
    }
}

/// Access to per-subject decoding results. Implementations own every detail of
/// where the data lives; callers only name the subject and contrast.
pub trait ScoreSource {
    fn fetch(&self, subject: &str, contrast: &str) -> Result<ScoreRecord, InputError>;
}

impl<S: ScoreSource + ?Sized> ScoreSource for &S {
    fn fetch(&self, subject: &str, contrast: &str) -> Result<ScoreRecord, InputError> {
        (**self).fetch(subject, contrast)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreFormat {
    Tsv,
    Json,
}

/// Picks the parser from the file name; a trailing `.gz` is looked through.
pub fn detect_format(path: &Path) -> Option<ScoreFormat> {
    let name = path.file_name()?.to_string_lossy().to_ascii_lowercase();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    if name.ends_with(".tsv") || name.ends_with(".txt") {
        Some(ScoreFormat::Tsv)
    } else if name.ends_with(".json") {
        Some(ScoreFormat::Json)
    } else {
        None
    }
}

pub fn read_score_file(path: &Path) -> Result<ScoreRecord, InputError> {
    match detect_format(path) {
        Some(ScoreFormat::Tsv) => tsv::parse_score_tsv(path),
        Some(ScoreFormat::Json) => json::parse_score_json(path),
        None => Err(InputError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Explicit (subject, contrast) -> path table, as resolved by the caller.
pub type SourceTable = BTreeMap<String, BTreeMap<String, PathBuf>>;

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
