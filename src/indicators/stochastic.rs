// =============================================================================
// Stochastic Oscillator
// =============================================================================
//
//   %K = 100 * (close - lowest_low(period)) / (highest_high(period) - lowest_low(period))
//   %D = SMA(signal) of %K
//
// %D averages whatever %K history exists when fewer than `signal` values are
// available.  A zero high/low range makes %K undefined; the whole reading is
// then `None` rather than a fabricated midpoint.
// =============================================================================

use serde::Serialize;

/// Latest `%K` / `%D` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StochasticValue {
    pub k: f64,
    pub d: f64,
}

pub fn calculate_stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
    signal: usize,
) -> Option<StochasticValue> {
    let n = high.len().min(low.len()).min(close.len());
    if period == 0 || signal == 0 || n < period {
        return None;
    }

    let available = n - period + 1;
    let used = signal.min(available);

    let mut ks = Vec::with_capacity(used);
    for end in (n - used)..n {
        let start = end + 1 - period;
        let highest = high[start..=end].iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lowest = low[start..=end].iter().copied().fold(f64::INFINITY, f64::min);

        let range = highest - lowest;
        if range <= 0.0 || !range.is_finite() {
            return None;
        }
        ks.push(100.0 * (close[end] - lowest) / range);
    }

    let k = *ks.last()?;
    let d = ks.iter().sum::<f64>() / ks.len() as f64;

    if k.is_finite() && d.is_finite() {
        Some(StochasticValue { k, d })
    } else {
        None
    }
}
