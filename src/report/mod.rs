use serde::Serialize;

use crate::cohort::AggregateResult;
use crate::model::curves::TimeAxis;
use crate::model::peaks::Peak;

pub mod json;
pub mod text;

#[derive(Debug, Clone, Serialize)]
pub struct SubjectPeak {
    pub subject: String,
    pub peak: Option<Peak>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContrastReport {
    pub contrast: String,
    pub n_subjects: usize,
    pub mean_peak: Option<Peak>,
    pub sem_at_peak: Option<f64>,
    pub margin_above_chance: Option<f64>,
    pub subject_peaks: Vec<SubjectPeak>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool_name: String,
    pub tool_version: String,
    pub chance_level: f64,
    pub window: Option<(f64, f64)>,
    pub cohort: Vec<String>,
    pub times: TimeAxis,
    pub reports: Vec<ContrastReport>,
    pub aggregate: AggregateResult,
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn format_opt_f64_6(v: Option<f64>) -> String {
    match v {
        Some(v) => format_f64_6(v),
        None => "NA".to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
