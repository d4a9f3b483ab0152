// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// Calculation pipeline:
//   1. +DM / -DM per bar-to-bar transition.
//   2. True Range (TR) per transition.
//   3. Wilder's smoothing (period) of +DM, -DM and TR.
//   4. +DI = smoothed(+DM) / smoothed(TR) * 100
//      -DI = smoothed(-DM) / smoothed(TR) * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   6. ADX = Wilder's smoothed average of DX.
//
// The ADX seed is the mean of the first `period` DX values.  A 26-bar window
// only yields 12 DX values for period 14, so when fewer than `period` exist the
// seed is the mean of all of them.  One DX needs `period + 1` bars.
// =============================================================================

/// Most recent ADX value from oldest-first high/low/close slices.
///
/// The slices are truncated to their common length.
///
/// Returns `None` when:
/// - `period` is zero.
/// - There are fewer than `period + 1` bars.
/// - The smoothed true range is zero (no price movement at all).
/// - Any intermediate value is non-finite.
pub fn calculate_adx(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Option<f64> {
    let n = high.len().min(low.len()).min(close.len());
    if period == 0 || n < period + 1 {
        return None;
    }

    let period_f = period as f64;
    let transitions = n - 1;

    // ------------------------------------------------------------------
    // Steps 1 & 2
    // ------------------------------------------------------------------
    let mut plus_dm = Vec::with_capacity(transitions);
    let mut minus_dm = Vec::with_capacity(transitions);
    let mut tr_vals = Vec::with_capacity(transitions);

    for i in 1..n {
        let tr = (high[i] - low[i])
            .max((high[i] - close[i - 1]).abs())
            .max((low[i] - close[i - 1]).abs());

        let up_move = high[i] - high[i - 1];
        let down_move = low[i - 1] - low[i];

        plus_dm.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
        tr_vals.push(tr);
    }

    // ------------------------------------------------------------------
    // Steps 3-5
    // ------------------------------------------------------------------
    let mut smooth_plus_dm: f64 = plus_dm[..period].iter().sum();
    let mut smooth_minus_dm: f64 = minus_dm[..period].iter().sum();
    let mut smooth_tr: f64 = tr_vals[..period].iter().sum();

    let mut dx_values: Vec<f64> = Vec::with_capacity(transitions - period + 1);
    dx_values.push(compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr)?);

    for i in period..transitions {
        smooth_plus_dm = smooth_plus_dm - smooth_plus_dm / period_f + plus_dm[i];
        smooth_minus_dm = smooth_minus_dm - smooth_minus_dm / period_f + minus_dm[i];
        smooth_tr = smooth_tr - smooth_tr / period_f + tr_vals[i];

        dx_values.push(compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr)?);
    }

    // ------------------------------------------------------------------
    // Step 6
    // ------------------------------------------------------------------
    let seed_len = period.min(dx_values.len());
    let mut adx = dx_values[..seed_len].iter().sum::<f64>() / seed_len as f64;
    if !adx.is_finite() {
        return None;
    }

    for &dx in &dx_values[seed_len..] {
        adx = (adx * (period_f - 1.0) + dx) / period_f;
        if !adx.is_finite() {
            return None;
        }
    }

    Some(adx)
}

/// DX from smoothed +DM, -DM and TR.  `None` on a zero true range.
fn compute_dx(smooth_plus_dm: f64, smooth_minus_dm: f64, smooth_tr: f64) -> Option<f64> {
    if smooth_tr == 0.0 {
        return None;
    }

    let plus_di = (smooth_plus_dm / smooth_tr) * 100.0;
    let minus_di = (smooth_minus_dm / smooth_tr) * 100.0;

    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        return Some(0.0);
    }

    let dx = ((plus_di - minus_di).abs() / di_sum) * 100.0;
    dx.is_finite().then_some(dx)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    struct Bars {
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    }

    fn bars(n: usize, f: impl Fn(usize) -> (f64, f64, f64)) -> Bars {
        let mut out = Bars {
            high: Vec::new(),
            low: Vec::new(),
            close: Vec::new(),
        };
        for i in 0..n {
            let (h, l, c) = f(i);
            out.high.push(h);
            out.low.push(l);
            out.close.push(c);
        }
        out
    }

    #[test]
    fn adx_period_zero() {
        let b = bars(30, |_| (2.0, 0.5, 1.5));
        assert!(calculate_adx(&b.high, &b.low, &b.close, 0).is_none());
    }

    #[test]
    fn adx_insufficient_data() {
        let b = bars(14, |i| (i as f64 + 1.0, i as f64, i as f64 + 0.5));
        assert!(calculate_adx(&b.high, &b.low, &b.close, 14).is_none());
    }

    #[test]
    fn adx_minimum_bars_exact() {
        let b = bars(15, |i| {
            let base = 100.0 + i as f64;
            (base + 1.0, base - 0.5, base + 0.5)
        });
        assert!(calculate_adx(&b.high, &b.low, &b.close, 14).is_some());
        assert!(calculate_adx(&b.high[..14], &b.low[..14], &b.close[..14], 14).is_none());
    }

    #[test]
    fn adx_strong_uptrend_inside_window() {
        let b = bars(26, |i| {
            let base = 100.0 + i as f64 * 2.0;
            (base + 1.5, base - 0.5, base + 1.0)
        });
        let value = calculate_adx(&b.high, &b.low, &b.close, 14).unwrap();
        assert!(value > 25.0, "expected ADX > 25 for strong trend, got {value}");
    }

    #[test]
    fn adx_flat_market() {
        let b = bars(60, |_| (101.0, 99.0, 100.0));
        let value = calculate_adx(&b.high, &b.low, &b.close, 14).unwrap();
        assert!(value < 1.0, "expected ADX near 0 for flat market, got {value}");
    }

    #[test]
    fn adx_zero_range_is_none() {
        let b = bars(26, |_| (100.0, 100.0, 100.0));
        assert!(calculate_adx(&b.high, &b.low, &b.close, 14).is_none());
    }

    #[test]
    fn adx_result_range() {
        let b = bars(100, |i| {
            let base = 50.0 + (i as f64 * 0.3).sin() * 10.0;
            (base + 1.0, base - 1.0, base + 0.5)
        });
        let value = calculate_adx(&b.high, &b.low, &b.close, 14).unwrap();
        assert!((0.0..=100.0).contains(&value), "ADX {value} out of [0,100] range");
    }

    #[test]
    fn adx_full_seed_once_enough_dx_values() {
        // 29 bars => 28 transitions => 15 DX values: seed uses 14, one smoothing step.
        let b = bars(29, |i| {
            let base = 100.0 + (i as f64 * 0.5).cos() * 4.0 + i as f64;
            (base + 1.0, base - 1.0, base)
        });
        assert!(calculate_adx(&b.high, &b.low, &b.close, 14).is_some());
    }
}
