use crate::cohort::{AggregateResult, CohortAggregator, CohortError, ContrastSummary};
use crate::config::ReportSettings;
use crate::model::curves::TimeAxis;
use crate::model::peaks::find_peak;
use crate::report::{ContrastReport, SubjectPeak};

#[derive(Debug, Clone)]
pub struct Stage2Output {
    pub aggregate: AggregateResult,
    pub reports: Vec<ContrastReport>,
    /// Requested peak window in seconds, with open ends filled from the axis.
    pub window: Option<(f64, f64)>,
}

pub fn run_stage2(
    agg: &CohortAggregator<'_>,
    settings: &ReportSettings,
) -> Result<Stage2Output, CohortError> {
    let repo = agg.repository();
    let axis = repo.time_axis()?;
    let cohort = repo.cohort()?;

    let window_idx = axis.window(settings.tmin, settings.tmax);
    if window_idx.is_none() {
        tracing::warn!(
            tmin = ?settings.tmin,
            tmax = ?settings.tmax,
            "peak window contains no time points; peaks will be empty"
        );
    }

    let aggregate = agg.aggregate()?;
    let mut reports = Vec::with_capacity(aggregate.contrasts.len());
    for summary in &aggregate.contrasts {
        let mut subject_peaks = Vec::with_capacity(cohort.len());
        for (idx, subject) in cohort.iter().enumerate() {
            let curve = agg.subject_curve(&summary.contrast, idx)?;
            subject_peaks.push(SubjectPeak {
                subject: subject.clone(),
                peak: window_idx.and_then(|w| find_peak(axis, curve.as_slice(), w)),
            });
        }
        reports.push(contrast_report(
            axis,
            summary,
            window_idx,
            settings.chance_level,
            subject_peaks,
        ));
    }

    Ok(Stage2Output {
        aggregate,
        reports,
        window: requested_window(axis, settings),
    })
}

fn contrast_report(
    axis: &TimeAxis,
    summary: &ContrastSummary,
    window_idx: Option<(usize, usize)>,
    chance_level: f64,
    subject_peaks: Vec<SubjectPeak>,
) -> ContrastReport {
    let mean_peak = window_idx.and_then(|w| find_peak(axis, summary.mean.as_slice(), w));
    let sem_at_peak = mean_peak.and_then(|p| summary.sem.as_ref().and_then(|s| s.get(p.index)));
    if let Some(p) = mean_peak {
        tracing::debug!(
            contrast = %summary.contrast,
            time = p.time,
            value = p.value,
            "group peak"
        );
    }
    ContrastReport {
        contrast: summary.contrast.clone(),
        n_subjects: summary.n_subjects,
        mean_peak,
        sem_at_peak,
        margin_above_chance: mean_peak.map(|p| p.value - chance_level),
        subject_peaks,
    }
}

fn requested_window(axis: &TimeAxis, settings: &ReportSettings) -> Option<(f64, f64)> {
    if settings.tmin.is_none() && settings.tmax.is_none() {
        return None;
    }
    let times = axis.as_slice();
    let lo = settings.tmin.or_else(|| times.first().copied())?;
    let hi = settings.tmax.or_else(|| times.last().copied())?;
    Some((lo, hi))
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_aggregate.rs"]
mod tests;
