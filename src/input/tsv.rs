use std::path::Path;

use crate::input::reader::open_maybe_gz;
use crate::input::{InputError, ScoreRecord};

/// Two tab-separated columns, `time` and `score`. A first row whose time column
/// is non-numeric is treated as a header; `#` lines and blank lines are skipped.
pub fn parse_score_tsv(path: &Path) -> Result<ScoreRecord, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();
    let mut times = Vec::new();
    let mut scores = Vec::new();
    let mut line_no = 0usize;
    let mut seen_row = false;

    loop {
        buf.clear();
        let read = reader
            .read_line(&mut buf)
            .map_err(|e| InputError::io(path, e))?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let cols: Vec<&str> = line.split('\t').map(str::trim).collect();
        if cols.len() < 2 {
            return Err(InputError::parse(
                path,
                format!("line {} has <2 columns", line_no),
            ));
        }
        let parsed = (parse_value(cols[0]), parse_value(cols[1]));
        match parsed {
            (Some(t), Some(s)) => {
                times.push(t);
                scores.push(s);
            }
            (None, _) if !seen_row => {
                tracing::debug!(path = %path.display(), "skipping header line");
            }
            _ => {
                return Err(InputError::parse(
                    path,
                    format!("line {}: non-numeric value", line_no),
                ));
            }
        }
        seen_row = true;
    }

    if times.is_empty() {
        return Err(InputError::parse(path, "score file has no rows"));
    }

    Ok(ScoreRecord::new(times, scores))
}

fn parse_value(raw: &str) -> Option<f64> {
    match raw.to_ascii_lowercase().as_str() {
        "nan" | "na" => Some(f64::NAN),
        "inf" | "+inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        _ => raw.parse::<f64>().ok(),
    }
}
