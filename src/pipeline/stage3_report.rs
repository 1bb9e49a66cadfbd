use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::channels::ChannelEntry;
use crate::cohort::{CohortError, ScoreRepository};
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;
use crate::report::{SummaryData, format_f64_6, format_opt_f64_6};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render summary.json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Cohort(#[from] CohortError),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ReportError + '_ {
    move |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub fn write_reports(
    summary: &SummaryData,
    repo: &ScoreRepository,
    out_dir: &Path,
) -> Result<(), ReportError> {
    fs::create_dir_all(out_dir).map_err(io_err(out_dir))?;

    let curves_path = out_dir.join("curves.tsv");
    write_curves_tsv(summary, &curves_path).map_err(io_err(&curves_path))?;

    let subjects_path = out_dir.join("subject_curves.tsv");
    let rows = subject_curve_columns(repo)?;
    write_subject_curves_tsv(summary, &rows, &subjects_path).map_err(io_err(&subjects_path))?;

    let summary_path = out_dir.join("summary.json");
    let json = render_summary_json(summary)?;
    write_text(&summary_path, &json).map_err(io_err(&summary_path))?;

    let report_path = out_dir.join("report.txt");
    let report = render_report_text(summary);
    write_text(&report_path, &report).map_err(io_err(&report_path))?;

    tracing::info!(out_dir = %out_dir.display(), "wrote reports");
    Ok(())
}

/// Group mean, SEM, and the mean -/+ SEM band per contrast.
fn write_curves_tsv(summary: &SummaryData, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);

    let mut header = vec!["time".to_string()];
    for c in &summary.aggregate.contrasts {
        for suffix in ["mean", "sem", "lower", "upper"] {
            header.push(format!("{}_{}", c.contrast, suffix));
        }
    }
    writeln!(w, "{}", header.join("\t"))?;

    for (t, &time) in summary.times.as_slice().iter().enumerate() {
        let mut row = vec![format_f64_6(time)];
        for c in &summary.aggregate.contrasts {
            let mean = c.mean.as_slice()[t];
            let sem = c.sem.as_ref().and_then(|s| s.get(t));
            row.push(format_f64_6(mean));
            row.push(format_opt_f64_6(sem));
            row.push(format_opt_f64_6(sem.map(|s| mean - s)));
            row.push(format_opt_f64_6(sem.map(|s| mean + s)));
        }
        writeln!(w, "{}", row.join("\t"))?;
    }
    w.flush()
}

fn subject_curve_columns(repo: &ScoreRepository) -> Result<Vec<(String, &[f64])>, CohortError> {
    let mut columns = Vec::new();
    for subject_idx in 0..repo.subject_count()? {
        let subject = &repo.cohort()?[subject_idx];
        for contrast in repo.contrasts()? {
            let curve = &repo.curves_for(contrast)?[subject_idx];
            columns.push((format!("{}:{}", subject, contrast), curve.as_slice()));
        }
    }
    Ok(columns)
}

/// Wide table behind the per-subject diagnostic grid: one column per
/// `subject:contrast`, subjects in cohort order.
fn write_subject_curves_tsv(
    summary: &SummaryData,
    columns: &[(String, &[f64])],
    path: &Path,
) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);

    let mut header = vec!["time".to_string()];
    header.extend(columns.iter().map(|(name, _)| name.clone()));
    writeln!(w, "{}", header.join("\t"))?;

    for (t, &time) in summary.times.as_slice().iter().enumerate() {
        let mut row = Vec::with_capacity(columns.len() + 1);
        row.push(format_f64_6(time));
        for (_, values) in columns {
            row.push(format_f64_6(values[t]));
        }
        writeln!(w, "{}", row.join("\t"))?;
    }
    w.flush()
}

pub fn write_channel_table(entries: &[ChannelEntry], out_dir: &Path) -> Result<(), ReportError> {
    fs::create_dir_all(out_dir).map_err(io_err(out_dir))?;
    let path = out_dir.join("channels.tsv");
    let mut text = String::from("channel\tstatus\n");
    for e in entries {
        text.push_str(&e.name);
        text.push('\t');
        text.push_str(e.status.as_str());
        text.push('\n');
    }
    write_text(&path, &text).map_err(io_err(&path))?;
    tracing::info!(path = %path.display(), "wrote channel table");
    Ok(())
}

fn write_text(path: &Path, text: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(text.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_report.rs"]
mod tests;
