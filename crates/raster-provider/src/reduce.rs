//! Percentile reduction over region samples.

use climate_common::{ClimateError, ClimateResult};

use crate::provider::PercentilePair;

/// Percentile of ascending `sorted` values by linear interpolation between
/// the closest ranks. `p` is in percent.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    let frac = rank - below as f64;
    Some(sorted[below] + (sorted[above] - sorted[below]) * frac)
}

/// Reject percentile pairs outside 0..=100 or out of order.
pub fn check_percentiles(percentiles: [f64; 2]) -> ClimateResult<()> {
    let [lo, hi] = percentiles;
    if !(0.0..=100.0).contains(&lo) || !(0.0..=100.0).contains(&hi) || lo > hi {
        return Err(ClimateError::numeric_domain(format!(
            "percentiles must satisfy 0 <= lo <= hi <= 100, got [{}, {}]",
            lo, hi
        )));
    }
    Ok(())
}

/// Two percentiles of an unsorted sample. NaNs must already be removed.
pub fn percentiles_of(mut values: Vec<f64>, percentiles: [f64; 2]) -> ClimateResult<PercentilePair> {
    check_percentiles(percentiles)?;
    values.sort_unstable_by(|a, b| a.total_cmp(b));

    match (
        percentile(&values, percentiles[0]),
        percentile(&values, percentiles[1]),
    ) {
        (Some(lo), Some(hi)) => Ok(PercentilePair::new(lo, hi)),
        _ => Err(ClimateError::EmptyRegion(
            "no samples to reduce".to_string(),
        )),
    }
}

/// Keep every k-th index so that at most `max` remain.
pub fn stride_subsample(indices: Vec<usize>, max: usize) -> Vec<usize> {
    if max == 0 || indices.len() <= max {
        return indices;
    }
    let stride = indices.len().div_ceil(max);
    indices.into_iter().step_by(stride).collect()
}
