// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
//   MACD line = EMA(fast) - EMA(slow), aligned on the slow EMA's first value
//   Signal    = EMA(signal) of the MACD line
//   Histogram = MACD line - Signal
//
// The slow EMA needs `slow` closes, so a window of exactly `slow` closes holds a
// single MACD value.  The signal line is therefore partially seeded (mean of
// whatever MACD history exists) rather than waiting `signal - 1` more bars.
// =============================================================================

use serde::Serialize;

use super::ema::{calculate_ema, calculate_ema_partial_seed};

/// Latest MACD triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Latest MACD value for `closes` (oldest first).
///
/// Returns `None` when any period is zero, `fast >= slow`, there are fewer
/// than `slow` closes, or a result is non-finite.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Option<MacdValue> {
    if fast == 0 || signal == 0 || fast >= slow || closes.len() < slow {
        return None;
    }

    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);
    if slow_ema.is_empty() {
        return None;
    }

    // fast_ema[0] sits at close index fast-1, slow_ema[0] at slow-1.
    let offset = slow - fast;
    if fast_ema.len() < offset + slow_ema.len() {
        return None;
    }

    let macd_line: Vec<f64> = slow_ema
        .iter()
        .enumerate()
        .map(|(i, s)| fast_ema[i + offset] - s)
        .collect();

    let macd = *macd_line.last()?;
    let signal = *calculate_ema_partial_seed(&macd_line, signal).last()?;
    let histogram = macd - signal;

    if macd.is_finite() && signal.is_finite() && histogram.is_finite() {
        Some(MacdValue {
            macd,
            signal,
            histogram,
        })
    } else {
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn macd_rejects_bad_parameters() {
        let closes = ascending(40);
        assert!(calculate_macd(&closes, 0, 26, 9).is_none());
        assert!(calculate_macd(&closes, 12, 26, 0).is_none());
        assert!(calculate_macd(&closes, 26, 12, 9).is_none());
    }

    #[test]
    fn macd_needs_slow_period_closes() {
        assert!(calculate_macd(&ascending(25), 12, 26, 9).is_none());
        assert!(calculate_macd(&ascending(26), 12, 26, 9).is_some());
    }

    #[test]
    fn macd_single_value_window() {
        // 1..=26: slow EMA seed = 13.5, fast EMA of 1..=26 at the end.
        let closes = ascending(26);
        let value = calculate_macd(&closes, 12, 26, 9).unwrap();

        let fast = *calculate_ema(&closes, 12).last().unwrap();
        assert!((value.macd - (fast - 13.5)).abs() < 1e-10);
        // Only one MACD value exists, so the signal is that value.
        assert!((value.signal - value.macd).abs() < 1e-12);
        assert!(value.histogram.abs() < 1e-12);
    }

    #[test]
    fn macd_rising_market_is_positive() {
        let value = calculate_macd(&ascending(26), 12, 26, 9).unwrap();
        assert!(value.macd > 0.0);
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.4).sin() * 5.0)
            .collect();
        let value = calculate_macd(&closes, 12, 26, 9).unwrap();
        assert!((value.histogram - (value.macd - value.signal)).abs() < 1e-12);
    }

    #[test]
    fn macd_flat_market_is_zero() {
        let value = calculate_macd(&[42.0; 30], 12, 26, 9).unwrap();
        assert!(value.macd.abs() < 1e-12);
        assert!(value.signal.abs() < 1e-12);
    }
}
