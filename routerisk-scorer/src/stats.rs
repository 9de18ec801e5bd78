//! Small descriptive statistics over `f64` slices.

#[expect(
    clippy::cast_precision_loss,
    reason = "sample counts stay far below 2^52"
)]
pub(crate) const fn count_f64(count: usize) -> f64 {
    count as f64
}

/// Arithmetic mean, or `None` for an empty slice.
#[expect(clippy::float_arithmetic, reason = "mean divides a sum by a count")]
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / count_f64(values.len()))
}

/// Population standard deviation around `centre`.
#[expect(clippy::float_arithmetic, reason = "variance needs squared deviations")]
pub(crate) fn population_std(values: &[f64], centre: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values
        .iter()
        .map(|v| (v - centre).powi(2))
        .sum::<f64>()
        / count_f64(values.len());
    variance.sqrt()
}

/// Pearson correlation of two equally long columns.
///
/// Returns `None` when either column is constant, where the coefficient is
/// undefined.
#[expect(clippy::float_arithmetic, reason = "correlation is covariance over spread")]
pub(crate) fn pearson(lhs: &[f64], rhs: &[f64]) -> Option<f64> {
    let lhs_mean = mean(lhs)?;
    let rhs_mean = mean(rhs)?;
    let lhs_std = population_std(lhs, lhs_mean);
    let rhs_std = population_std(rhs, rhs_mean);
    if lhs_std <= 0.0 || rhs_std <= 0.0 {
        return None;
    }
    let covariance = lhs
        .iter()
        .zip(rhs)
        .map(|(a, b)| (a - lhs_mean) * (b - rhs_mean))
        .sum::<f64>()
        / count_f64(lhs.len());
    Some((covariance / (lhs_std * rhs_std)).clamp(-1.0, 1.0))
}
