//! Cross-subject aggregation of time-resolved decoding scores.
//!
//! [`ScoreRepository`] loads one score curve per (subject, contrast) and checks
//! that every curve shares the same time axis. [`CohortAggregator`] is a
//! read-only view over a loaded repository that derives the group mean and
//! standard-error curves.

pub mod aggregator;
pub mod repository;

pub use aggregator::{AggregateResult, CohortAggregator, ContrastSummary};
pub use repository::ScoreRepository;

use thiserror::Error;

use crate::input::InputError;

#[derive(Debug, Error)]
pub enum CohortError {
    #[error("missing data for subject {subject} / contrast {contrast}")]
    MissingData {
        subject: String,
        contrast: String,
        #[source]
        source: InputError,
    },
    #[error("shape mismatch for subject {subject} / contrast {contrast}: {detail}")]
    DataShape {
        subject: String,
        contrast: String,
        detail: String,
    },
    #[error("unknown contrast: {0}")]
    UnknownContrast(String),
    #[error("score repository is not loaded")]
    NotLoaded,
    #[error("no subjects available for contrast {0}")]
    EmptyCohort(String),
    #[error("standard error needs at least 2 subjects; contrast {contrast} has {n}")]
    InsufficientSamples { contrast: String, n: usize },
    #[error("subject index {index} out of range for contrast {contrast} ({n} subjects)")]
    IndexOutOfRange {
        contrast: String,
        index: usize,
        n: usize,
    },
    #[error("contrast list is empty")]
    NoContrasts,
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
}
