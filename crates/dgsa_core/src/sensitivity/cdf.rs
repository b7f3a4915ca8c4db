//! Empirical inverse CDFs and the L1 distance between them

/// Inverse CDFs are evaluated at the percentiles 1, 2, ..., 99
pub const N_PERCENTILES: usize = 99;

/// Percentile `p` (0..=100) of already sorted values, interpolating linearly
/// between the closest order statistics.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        len => {
            let pos = (p / 100.0).clamp(0.0, 1.0) * (len - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + frac * (sorted[hi] - sorted[lo])
        }
    }
}

/// Percentile `p` of unsorted values
pub fn percentile(values: &[f64], p: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, p)
}

/// Inverse CDF of `values` at percentiles 1..=99. The buffer is sorted in place.
pub fn inverse_cdf(values: &mut [f64]) -> [f64; N_PERCENTILES] {
    values.sort_by(f64::total_cmp);
    let mut out = [0.0; N_PERCENTILES];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = percentile_sorted(values, (i + 1) as f64);
    }
    out
}

/// Sum of absolute differences between two inverse CDFs
pub fn cdf_distance(a: &[f64; N_PERCENTILES], b: &[f64; N_PERCENTILES]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}
