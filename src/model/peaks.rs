use serde::Serialize;

use crate::model::curves::TimeAxis;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    pub index: usize,
    pub time: f64,
    pub value: f64,
}

/// Maximum of `values` inside the inclusive index window. Non-finite points are
/// skipped; ties keep the earliest sample.
pub fn find_peak(axis: &TimeAxis, values: &[f64], window: (usize, usize)) -> Option<Peak> {
    let (start, end) = window;
    let times = axis.as_slice();
    if end >= values.len() || end >= times.len() || start > end {
        return None;
    }
    let mut best: Option<Peak> = None;
    for idx in start..=end {
        let v = values[idx];
        if !v.is_finite() {
            continue;
        }
        match best {
            Some(p) if p.value >= v => {}
            _ => {
                best = Some(Peak {
                    index: idx,
                    time: times[idx],
                    value: v,
                })
            }
        }
    }
    best
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/peaks.rs"]
mod tests;
