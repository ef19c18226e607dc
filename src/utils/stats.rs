/// Convert a count to f64 for ratio calculations
#[inline]
#[must_use]
pub fn count_to_f64(count: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// `numerator / denominator` in floating point: `0 / 0` is NaN, `n / 0` is infinite
#[must_use]
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    count_to_f64(numerator) / count_to_f64(denominator)
}

/// Maximum of the non-NaN values, NaN if there are none
#[must_use]
pub fn nan_max<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, |acc, v| if acc.is_nan() || v > acc { v } else { acc })
}
