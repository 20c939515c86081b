//! Moment statistics over return samples.
//!
//! Every function skips undefined (`NaN`) observations and reports `None` when
//! the statistic is undefined for the remaining sample.

use statrs::statistics::Statistics;

/// Second central moments below this are treated as zero variance.
const ZERO_VARIANCE: f64 = 1e-14;

/// The defined observations of `values`.
pub fn defined(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Arithmetic mean of the defined observations.
pub fn mean(values: &[f64]) -> Option<f64> {
    let sample = defined(values);
    if sample.is_empty() {
        return None;
    }
    Some(sample.iter().mean())
}

/// Sample standard deviation (`n - 1` denominator) of the defined observations.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let sample = defined(values);
    if sample.len() < 2 {
        return None;
    }
    Some(sample.iter().std_dev())
}

/// Adjusted Fisher-Pearson skewness (G1). Needs three observations and non-zero variance.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let sample = defined(values);
    let n = sample.len() as f64;
    if sample.len() < 3 {
        return None;
    }
    let (m2, m3, _) = central_moments(&sample);
    if m2 < ZERO_VARIANCE {
        return None;
    }
    let g1 = m3 / m2.powf(1.5);
    Some(g1 * (n * (n - 1.0)).sqrt() / (n - 2.0))
}

/// Bias-corrected excess kurtosis (G2). Needs four observations and non-zero variance.
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let sample = defined(values);
    let n = sample.len() as f64;
    if sample.len() < 4 {
        return None;
    }
    let (m2, _, m4) = central_moments(&sample);
    if m2 < ZERO_VARIANCE {
        return None;
    }
    let g2 = m4 / (m2 * m2) - 3.0;
    Some(((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0)))
}

/// Population central moments `(m2, m3, m4)`.
fn central_moments(sample: &[f64]) -> (f64, f64, f64) {
    let n = sample.len() as f64;
    let mu = sample.iter().mean();
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for x in sample {
        let d = x - mu;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}
