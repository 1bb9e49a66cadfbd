//! Cross-subject aggregation of time-resolved decoding scores.
//!
//! Load one score curve per subject and contrast into a
//! [`cohort::ScoreRepository`], then query group mean and standard-error
//! curves through [`cohort::CohortAggregator`].

pub mod channels;
pub mod cohort;
pub mod config;
pub mod input;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod stats;
