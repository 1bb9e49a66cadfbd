//! Point-wise reductions used by the cohort aggregator. Summation order is
//! fixed (input order), so repeated calls are bit-identical.

#[inline]
pub fn sum_f64(values: &[f64]) -> f64 {
    let mut sum = 0f64;
    for &v in values {
        sum += v;
    }
    sum
}

/// Arithmetic mean; `None` for an empty slice.
#[inline]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(sum_f64(values) / values.len() as f64)
}

/// Sample standard deviation (ddof = 1); `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    let mut ss = 0f64;
    for &v in values {
        let d = v - m;
        ss += d * d;
    }
    Some((ss / (n - 1) as f64).sqrt())
}

/// Standard error of the mean, `sample_std / sqrt(n)`.
pub fn standard_error(values: &[f64]) -> Option<f64> {
    let sd = sample_std(values)?;
    Some(sd / (values.len() as f64).sqrt())
}

#[cfg(test)]
#[path = "../tests/src_inline/stats.rs"]
mod tests;
