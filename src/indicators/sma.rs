// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================

/// Mean of the last `period` values.
///
/// Returns `None` when `period == 0`, there are fewer than `period` values, or
/// the mean is non-finite.
pub fn calculate_sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }

    let window = &values[values.len() - period..];
    let mean = window.iter().sum::<f64>() / period as f64;

    if mean.is_finite() {
        Some(mean)
    } else {
        None
    }
}
