use serde::Serialize;

/// Shared time samples, in seconds, for one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeAxis(Vec<f64>);

impl TimeAxis {
    pub fn new(times: Vec<f64>) -> Self {
        Self(times)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn is_strictly_increasing(&self) -> bool {
        self.0.windows(2).all(|w| w[0] < w[1])
    }

    /// Index of the first sample that differs from `other`, if any.
    /// Lengths are checked by the caller.
    pub fn first_mismatch(&self, other: &TimeAxis) -> Option<usize> {
        self.0.iter().zip(other.0.iter()).position(|(a, b)| a != b)
    }

    /// Inclusive index range covering `[tmin, tmax]`; `None` when no sample
    /// falls inside the window.
    pub fn window(&self, tmin: Option<f64>, tmax: Option<f64>) -> Option<(usize, usize)> {
        let lo = tmin.unwrap_or(f64::NEG_INFINITY);
        let hi = tmax.unwrap_or(f64::INFINITY);
        let start = self.0.iter().position(|&t| t >= lo)?;
        let end = self.0.iter().rposition(|&t| t <= hi)?;
        if start > end {
            return None;
        }
        Some((start, end))
    }
}

/// One value per time point. Used for raw per-subject scores as well as the
/// derived group curves.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Curve(Vec<f64>);

pub type ScoreCurve = Curve;
pub type MeanCurve = Curve;
pub type StandardErrorCurve = Curve;

impl Curve {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, idx: usize) -> Option<f64> {
        self.0.get(idx).copied()
    }
}

impl From<Vec<f64>> for Curve {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/curves.rs"]
mod tests;
