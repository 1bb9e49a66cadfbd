use serde::Serialize;

use crate::cohort::{CohortError, ScoreRepository};
use crate::model::curves::{MeanCurve, ScoreCurve, StandardErrorCurve};
use crate::model::Contrast;
use crate::stats;

/// Group statistics over a loaded [`ScoreRepository`]. Holds no state of its
/// own; every query recomputes from the repository.
#[derive(Debug, Clone, Copy)]
pub struct CohortAggregator<'a> {
    repo: &'a ScoreRepository,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContrastSummary {
    pub contrast: Contrast,
    pub n_subjects: usize,
    pub mean: MeanCurve,
    /// `None` when the contrast has a single subject.
    pub sem: Option<StandardErrorCurve>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub contrasts: Vec<ContrastSummary>,
}

impl<'a> CohortAggregator<'a> {
    pub fn new(repo: &'a ScoreRepository) -> Result<Self, CohortError> {
        if !repo.is_loaded() {
            return Err(CohortError::NotLoaded);
        }
        Ok(Self { repo })
    }

    pub fn repository(&self) -> &'a ScoreRepository {
        self.repo
    }

    pub fn mean_curve(&self, contrast: &str) -> Result<MeanCurve, CohortError> {
        let curves = self.repo.curves_for(contrast)?;
        if curves.is_empty() {
            return Err(CohortError::EmptyCohort(contrast.to_string()));
        }
        pointwise(curves, stats::mean)
            .ok_or_else(|| CohortError::EmptyCohort(contrast.to_string()))
    }

    pub fn standard_error_curve(&self, contrast: &str) -> Result<StandardErrorCurve, CohortError> {
        let curves = self.repo.curves_for(contrast)?;
        if curves.len() < 2 {
            return Err(CohortError::InsufficientSamples {
                contrast: contrast.to_string(),
                n: curves.len(),
            });
        }
        pointwise(curves, stats::standard_error)
            .ok_or_else(|| CohortError::InsufficientSamples {
                contrast: contrast.to_string(),
                n: curves.len(),
            })
    }

    pub fn subject_curve(
        &self,
        contrast: &str,
        subject_index: usize,
    ) -> Result<&'a ScoreCurve, CohortError> {
        let curves = self.repo.curves_for(contrast)?;
        curves
            .get(subject_index)
            .ok_or_else(|| CohortError::IndexOutOfRange {
                contrast: contrast.to_string(),
                index: subject_index,
                n: curves.len(),
            })
    }

    pub fn summarize(&self, contrast: &str) -> Result<ContrastSummary, CohortError> {
        let mean = self.mean_curve(contrast)?;
        let sem = match self.standard_error_curve(contrast) {
            Ok(sem) => Some(sem),
            Err(CohortError::InsufficientSamples { n, .. }) => {
                tracing::warn!(
                    contrast,
                    n,
                    "standard error undefined for a single subject; omitting SEM"
                );
                None
            }
            Err(e) => return Err(e),
        };
        Ok(ContrastSummary {
            contrast: contrast.to_string(),
            n_subjects: self.repo.curves_for(contrast)?.len(),
            mean,
            sem,
        })
    }

    /// Summaries for every loaded contrast, in load order.
    pub fn aggregate(&self) -> Result<AggregateResult, CohortError> {
        let mut contrasts = Vec::new();
        for contrast in self.repo.contrasts()? {
            contrasts.push(self.summarize(contrast)?);
        }
        Ok(AggregateResult { contrasts })
    }
}

fn pointwise<F>(curves: &[ScoreCurve], reduce: F) -> Option<ScoreCurve>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let n_times = curves.first()?.len();
    let mut column = Vec::with_capacity(curves.len());
    let mut out = Vec::with_capacity(n_times);
    for t in 0..n_times {
        column.clear();
        for curve in curves {
            column.push(curve.as_slice()[t]);
        }
        out.push(reduce(&column)?);
    }
    Some(ScoreCurve::new(out))
}

#[cfg(test)]
#[path = "../../tests/src_inline/cohort/aggregator.rs"]
mod tests;
