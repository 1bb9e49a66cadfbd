use serde::Serialize;
use serde_json::{Value, json};

use crate::report::{ContrastReport, SummaryData};

#[derive(Serialize)]
struct ToolMeta<'a> {
    name: &'a str,
    version: &'a str,
}

/// `summary.json`. Non-finite numbers serialize as `null`.
pub fn render_summary_json(data: &SummaryData) -> Result<String, serde_json::Error> {
    let contrasts = data
        .reports
        .iter()
        .map(|report| contrast_value(data, report))
        .collect::<Vec<_>>();

    let tool = ToolMeta {
        name: &data.tool_name,
        version: &data.tool_version,
    };
    let window = data.window.map(|(tmin, tmax)| json!({ "tmin": tmin, "tmax": tmax }));

    let value = json!({
        "tool": tool,
        "input": {
            "n_subjects": data.cohort.len(),
            "cohort": data.cohort,
            "n_times": data.times.len(),
            "chance_level": data.chance_level,
            "window": window,
        },
        "times": data.times,
        "contrasts": contrasts,
    });
    serde_json::to_string_pretty(&value)
}

fn contrast_value(data: &SummaryData, report: &ContrastReport) -> Value {
    let summary = data
        .aggregate
        .contrasts
        .iter()
        .find(|c| c.contrast == report.contrast);
    json!({
        "name": report.contrast,
        "n_subjects": report.n_subjects,
        "mean": summary.map(|s| &s.mean),
        "sem": summary.and_then(|s| s.sem.as_ref()),
        "peak": report.mean_peak,
        "sem_at_peak": report.sem_at_peak,
        "margin_above_chance": report.margin_above_chance,
        "subject_peaks": report.subject_peaks,
    })
}
