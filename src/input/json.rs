use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::input::reader::open_maybe_gz;
use crate::input::{InputError, ScoreRecord};

#[derive(Debug, Deserialize)]
struct ScoreFile {
    times: Vec<Option<f64>>,
    scores: Vec<Option<f64>>,
}

/// `{"times": [...], "scores": [...]}`. JSON has no NaN literal, so `null`
/// scores load as NaN.
pub fn parse_score_json(path: &Path) -> Result<ScoreRecord, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| InputError::io(path, e))?;
    let file: ScoreFile = serde_json::from_str(&text).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut times = Vec::with_capacity(file.times.len());
    for (idx, t) in file.times.iter().enumerate() {
        match t {
            Some(v) => times.push(*v),
            None => {
                return Err(InputError::parse(
                    path,
                    format!("times[{}] is null", idx),
                ));
            }
        }
    }
    let scores = file
        .scores
        .iter()
        .map(|s| s.unwrap_or(f64::NAN))
        .collect::<Vec<_>>();

    Ok(ScoreRecord::new(times, scores))
}
