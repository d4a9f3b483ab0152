// =============================================================================
// Parabolic Stop-And-Reverse (PSAR)
// =============================================================================
//
// Wilder's trailing stop.  Each bar:
//   SAR_next = SAR + AF * (EP - SAR)
// clamped so it never crosses the previous two bars' lows (long) or highs
// (short).  EP is the extreme point of the current trend; AF starts at `step`
// and grows by `step` on every new extreme, capped at `max`.  The EP is
// updated before the reversal check.  When price pierces the SAR the trend
// flips: SAR jumps to the EP, EP becomes the current bar's opposite extreme
// and AF resets.
//
// The first bar starts long with SAR = low[0], EP = high[0].
// =============================================================================

/// PSAR series, one value per bar (oldest first).
///
/// Empty when there are fewer than two bars, `step <= 0`, or `max < step`.
pub fn calculate_psar(high: &[f64], low: &[f64], step: f64, max: f64) -> Vec<f64> {
    let n = high.len().min(low.len());
    if n < 2 || step.is_nan() || step <= 0.0 || max < step {
        return Vec::new();
    }

    let mut is_long = true;
    let mut af = step;
    let mut ep = high[0];
    let mut sar = low[0];

    let mut result = Vec::with_capacity(n);
    result.push(sar);

    for i in 1..n {
        let mut next = sar + af * (ep - sar);

        if is_long {
            next = next.min(low[i - 1]);
            if i >= 2 {
                next = next.min(low[i - 2]);
            }

            if high[i] > ep {
                ep = high[i];
                af = (af + step).min(max);
            }
            if low[i] < next {
                is_long = false;
                next = ep;
                ep = low[i];
                af = step;
            }
        } else {
            next = next.max(high[i - 1]);
            if i >= 2 {
                next = next.max(high[i - 2]);
            }

            if low[i] < ep {
                ep = low[i];
                af = (af + step).min(max);
            }
            if high[i] > next {
                is_long = true;
                next = ep;
                ep = high[i];
                af = step;
            }
        }

        if !next.is_finite() {
            break;
        }
        sar = next;
        result.push(sar);
    }

    result
}

/// Most recent PSAR value, `None` when the series is empty.
pub fn latest_psar(high: &[f64], low: &[f64], step: f64, max: f64) -> Option<f64> {
    calculate_psar(high, low, step, max).last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn psar_needs_two_bars() {
        assert!(latest_psar(&[10.0], &[9.0], 0.25, 1.0).is_none());
        assert!(latest_psar(&[10.0, 11.0], &[9.0, 10.0], 0.25, 1.0).is_some());
    }

    #[test]
    fn psar_rejects_bad_parameters() {
        let high = [10.0, 11.0, 12.0];
        let low = [9.0, 10.0, 11.0];
        assert!(calculate_psar(&high, &low, 0.0, 1.0).is_empty());
        assert!(calculate_psar(&high, &low, 0.5, 0.25).is_empty());
        assert!(calculate_psar(&high, &low, f64::NAN, 1.0).is_empty());
    }

    #[test]
    fn psar_two_bar_value() {
        // SAR = 9 + 0.25 * (10 - 9) = 9.25, clamped to the prior low 9.
        assert_eq!(latest_psar(&[10.0, 11.0], &[9.0, 10.0], 0.25, 1.0), Some(9.0));
    }

    #[test]
    fn psar_flips_on_breakdown() {
        let high = [10.0, 11.0, 12.0, 9.0];
        let low = [9.0, 10.0, 11.0, 7.0];
        let series = calculate_psar(&high, &low, 0.25, 1.0);
        assert_eq!(series.len(), 4);
        // The breakdown bar reverses the trend: SAR jumps to the prior EP.
        assert_eq!(series[3], 12.0);
        assert!(series[3] > high[3]);
    }

    #[test]
    fn psar_outside_bar_reverses_to_its_own_high() {
        // Bar 3 makes a new high (14) and breaks the SAR (10) in one bar.
        // The EP moves to 14 first, so the reversed SAR is 14, not 12.
        let high = [10.0, 11.0, 12.0, 14.0];
        let low = [9.0, 10.0, 11.0, 7.0];
        let series = calculate_psar(&high, &low, 0.25, 1.0);
        assert_eq!(series, vec![9.0, 9.0, 9.0, 14.0]);
    }

    #[test]
    fn psar_trails_below_rising_market() {
        let high: Vec<f64> = (0..26).map(|i| 101.0 + i as f64).collect();
        let low: Vec<f64> = (0..26).map(|i| 99.0 + i as f64).collect();
        let series = calculate_psar(&high, &low, 0.25, 1.0);
        for (i, sar) in series.iter().enumerate() {
            assert!(*sar <= low[i], "bar {i}: SAR {sar} above low {}", low[i]);
        }
    }

    #[test]
    fn psar_acceleration_is_capped() {
        // With max == step the AF never grows; SAR moves a fixed fraction.
        let high = [10.0, 20.0, 30.0];
        let low = [9.0, 19.0, 29.0];
        let series = calculate_psar(&high, &low, 0.1, 0.1);
        // bar 1: 9 + 0.1 * (10 - 9) = 9.1 -> clamp to low[0] = 9.0
        // bar 2: 9 + 0.1 * (20 - 9) = 10.1 -> clamp to min(19, 9) = 9.0
        assert_eq!(series, vec![9.0, 9.0, 9.0]);
    }
}
