use std::collections::{BTreeMap, BTreeSet};

use crate::cohort::CohortError;
use crate::input::{InputError, ScoreRecord, ScoreSource};
use crate::model::curves::{ScoreCurve, TimeAxis};
use crate::model::{Contrast, Subject};

#[derive(Debug, Clone)]
struct Loaded {
    cohort: Vec<Subject>,
    contrasts: Vec<Contrast>,
    time_axis: TimeAxis,
    curves: BTreeMap<Contrast, Vec<ScoreCurve>>,
}

/// One score curve per (subject, contrast), all on a shared time axis.
///
/// Starts empty; [`ScoreRepository::load`] either loads the full
/// cohort x contrast matrix or fails and leaves the previous state untouched.
#[derive(Debug, Clone, Default)]
pub struct ScoreRepository {
    state: Option<Loaded>,
}

impl ScoreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_source<S: ScoreSource + ?Sized>(
        cohort: &[Subject],
        contrasts: &[Contrast],
        source: &S,
    ) -> Result<Self, CohortError> {
        let mut repo = Self::new();
        repo.load(cohort, contrasts, source)?;
        Ok(repo)
    }

    pub fn load<S: ScoreSource + ?Sized>(
        &mut self,
        cohort: &[Subject],
        contrasts: &[Contrast],
        source: &S,
    ) -> Result<(), CohortError> {
        check_ids(cohort, contrasts)?;

        let mut time_axis: Option<TimeAxis> = None;
        let mut curves: BTreeMap<Contrast, Vec<ScoreCurve>> = contrasts
            .iter()
            .map(|c| (c.clone(), Vec::with_capacity(cohort.len())))
            .collect();

        for subject in cohort {
            for contrast in contrasts {
                let record = source
                    .fetch(subject, contrast)
                    .map_err(|e| missing(subject, contrast, e))?;
                if time_axis.is_none() {
                    validate_axis(subject, contrast, &record.times)?;
                }
                let canonical = time_axis.get_or_insert_with(|| record.times.clone());
                let curve = validate_record(subject, contrast, record, canonical)?;
                if let Some(list) = curves.get_mut(contrast) {
                    list.push(curve);
                }
            }
        }

        let time_axis = time_axis.ok_or(CohortError::NotLoaded)?;
        tracing::info!(
            subjects = cohort.len(),
            contrasts = contrasts.len(),
            n_times = time_axis.len(),
            "loaded decoding scores"
        );

        self.state = Some(Loaded {
            cohort: cohort.to_vec(),
            contrasts: contrasts.to_vec(),
            time_axis,
            curves,
        });
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    pub fn time_axis(&self) -> Result<&TimeAxis, CohortError> {
        Ok(&self.loaded()?.time_axis)
    }

    pub fn curves_for(&self, contrast: &str) -> Result<&[ScoreCurve], CohortError> {
        self.loaded()?
            .curves
            .get(contrast)
            .map(Vec::as_slice)
            .ok_or_else(|| CohortError::UnknownContrast(contrast.to_string()))
    }

    pub fn cohort(&self) -> Result<&[Subject], CohortError> {
        Ok(&self.loaded()?.cohort)
    }

    pub fn contrasts(&self) -> Result<&[Contrast], CohortError> {
        Ok(&self.loaded()?.contrasts)
    }

    pub fn subject_count(&self) -> Result<usize, CohortError> {
        Ok(self.loaded()?.cohort.len())
    }

    fn loaded(&self) -> Result<&Loaded, CohortError> {
        self.state.as_ref().ok_or(CohortError::NotLoaded)
    }
}

fn check_ids(cohort: &[Subject], contrasts: &[Contrast]) -> Result<(), CohortError> {
    if contrasts.is_empty() {
        return Err(CohortError::NoContrasts);
    }
    if cohort.is_empty() {
        return Err(CohortError::EmptyCohort(contrasts.join(",")));
    }
    check_unique("subject", cohort)?;
    check_unique("contrast", contrasts)
}

fn check_unique(kind: &'static str, ids: &[String]) -> Result<(), CohortError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(CohortError::DuplicateId {
                kind,
                id: id.clone(),
            });
        }
    }
    Ok(())
}

fn missing(subject: &str, contrast: &str, source: InputError) -> CohortError {
    CohortError::MissingData {
        subject: subject.to_string(),
        contrast: contrast.to_string(),
        source,
    }
}

fn shape_error(subject: &str, contrast: &str, detail: &str) -> CohortError {
    CohortError::DataShape {
        subject: subject.to_string(),
        contrast: contrast.to_string(),
        detail: detail.to_string(),
    }
}

/// Checks run once, on the record that establishes the canonical axis.
fn validate_axis(subject: &str, contrast: &str, axis: &TimeAxis) -> Result<(), CohortError> {
    if axis.is_empty() {
        return Err(shape_error(subject, contrast, "empty time axis"));
    }
    if !axis.is_strictly_increasing() {
        return Err(shape_error(
            subject,
            contrast,
            "time axis is not strictly increasing",
        ));
    }
    Ok(())
}

fn validate_record(
    subject: &str,
    contrast: &str,
    record: ScoreRecord,
    canonical: &TimeAxis,
) -> Result<ScoreCurve, CohortError> {
    let shape = |detail: String| shape_error(subject, contrast, &detail);

    if record.scores.len() != record.times.len() {
        return Err(shape(format!(
            "{} scores for {} time points",
            record.scores.len(),
            record.times.len()
        )));
    }
    if record.scores.len() != canonical.len() {
        return Err(shape(format!(
            "{} time points, expected {}",
            record.scores.len(),
            canonical.len()
        )));
    }
    if let Some(idx) = record.times.first_mismatch(canonical) {
        return Err(shape(format!(
            "time axis differs at index {}: {} vs {}",
            idx,
            record.times.as_slice()[idx],
            canonical.as_slice()[idx]
        )));
    }

    Ok(record.scores)
}

#[cfg(test)]
#[path = "../../tests/src_inline/cohort/repository.rs"]
mod tests;
