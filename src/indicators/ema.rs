// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
//   multiplier = 2 / (period + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The first EMA value is seeded with the SMA of the first `period` values.
// MACD uses both the strict form (fast/slow lines) and the partially-seeded
// form (signal line over a short MACD history).
// =============================================================================

/// EMA series over `values` (oldest first).
///
/// Output element `i` corresponds to input index `period - 1 + i`.  Empty when
/// `period == 0` or `values.len() < period`.  A non-finite step truncates the
/// series at the last finite value.
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &value in &values[period..] {
        let ema = value * multiplier + prev * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev = ema;
    }

    result
}

/// Like [`calculate_ema`], but when fewer than `period` values exist the seed
/// is the mean of everything available, giving a single-element series.
///
/// Empty only for empty input, `period == 0`, or a non-finite seed.
pub fn calculate_ema_partial_seed(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.is_empty() {
        return Vec::new();
    }
    if values.len() >= period {
        return calculate_ema(values, period);
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean.is_finite() {
        vec![mean]
    } else {
        Vec::new()
    }
}
