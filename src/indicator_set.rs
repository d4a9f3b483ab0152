// =============================================================================
// Indicator Set — per-indicator policy over the rolling OHLC window
// =============================================================================
//
// Every configured indicator declares its own minimum lookback and whether it
// keeps a trailing log of recent results.  The set as a whole is gated on the
// largest lookback: until the close series reaches it, `refresh` produces
// nothing and the caller keeps whatever it published before.  Once the gate
// opens every indicator is recomputed from the full window on every call.
//
// A missing value from the numerical layer is never an error.  It becomes
// `Reading::InsufficientData` for that one indicator only.
// =============================================================================

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::indicators::{adx, macd, psar, rsi, sma, stochastic, MacdValue, StochasticValue};
use crate::market_data::{PriceWindow, RollingSeries};

/// Wire marker for a reading that has no value yet.
pub const INSUFFICIENT_DATA: &str = "insufficient_data";

// =============================================================================
// Parameters
// =============================================================================

/// Indicator parameters.  Fixed for the lifetime of the process; read once when
/// the [`IndicatorSet`] is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorParams {
    pub sma_period: usize,
    pub psar_step: f64,
    pub psar_max: f64,
    pub adx_period: usize,
    pub rsi_long_period: usize,
    pub rsi_short_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub stochastic_period: usize,
    pub stochastic_signal: usize,
    /// Depth of the SMA / PSAR trailing logs.
    pub trail_kept: usize,
    /// How many of the newest trailing-log entries are published.
    pub trail_exposed: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_period: 3,
            psar_step: 0.25,
            psar_max: 1.0,
            adx_period: 14,
            rsi_long_period: 14,
            rsi_short_period: 4,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            stochastic_period: 14,
            stochastic_signal: 3,
            trail_kept: 10,
            trail_exposed: 5,
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// The natural output shape of one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorOutput {
    Scalar(f64),
    Macd(MacdValue),
    Stochastic(StochasticValue),
}

/// Either a concrete value or an explicit "not yet" marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Concrete(IndicatorOutput),
    InsufficientData,
}

impl Reading {
    pub fn is_concrete(&self) -> bool {
        matches!(self, Reading::Concrete(_))
    }

    #[cfg(test)]
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Reading::Concrete(IndicatorOutput::Scalar(v)) => Some(*v),
            _ => None,
        }
    }
}

impl From<Option<IndicatorOutput>> for Reading {
    fn from(value: Option<IndicatorOutput>) -> Self {
        value.map_or(Reading::InsufficientData, Reading::Concrete)
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Concrete(output) => output.serialize(serializer),
            Reading::InsufficientData => serializer.serialize_str(INSUFFICIENT_DATA),
        }
    }
}

/// What one indicator publishes: its latest reading, or a short trail of the
/// most recent readings (oldest first).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Latest(Reading),
    Trail(Vec<Reading>),
}

impl IndicatorValue {
    /// True when nothing concrete is being published.
    pub fn is_insufficient(&self) -> bool {
        match self {
            IndicatorValue::Latest(reading) => !reading.is_concrete(),
            IndicatorValue::Trail(readings) => readings.iter().all(|r| !r.is_concrete()),
        }
    }

    /// The newest reading, if any.
    #[cfg(test)]
    pub fn latest(&self) -> Option<&Reading> {
        match self {
            IndicatorValue::Latest(reading) => Some(reading),
            IndicatorValue::Trail(readings) => readings.last(),
        }
    }
}

/// Indicator name to published value.
pub type IndicatorValues = BTreeMap<String, IndicatorValue>;

// =============================================================================
// Indicator kinds
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorKind {
    Sma { period: usize },
    Psar { step: f64, max: f64 },
    Adx { period: usize },
    Rsi { period: usize },
    Macd { fast: usize, slow: usize, signal: usize },
    Stochastic { period: usize, signal: usize },
}

impl IndicatorKind {
    /// Minimum number of samples this indicator asks for.
    pub fn lookback(&self) -> usize {
        match *self {
            IndicatorKind::Sma { period } => period,
            IndicatorKind::Psar { .. } => 2,
            IndicatorKind::Adx { period } => period,
            IndicatorKind::Rsi { period } => period,
            IndicatorKind::Macd { slow, .. } => slow,
            IndicatorKind::Stochastic { period, .. } => period,
        }
    }

    /// Compute the latest value over `window`.
    pub fn compute(&self, window: &PriceWindow<'_>) -> Option<IndicatorOutput> {
        match *self {
            IndicatorKind::Sma { period } => {
                sma::calculate_sma(window.close, period).map(IndicatorOutput::Scalar)
            }
            IndicatorKind::Psar { step, max } => {
                psar::latest_psar(window.high, window.low, step, max).map(IndicatorOutput::Scalar)
            }
            IndicatorKind::Adx { period } => {
                adx::calculate_adx(window.high, window.low, window.close, period)
                    .map(IndicatorOutput::Scalar)
            }
            IndicatorKind::Rsi { period } => {
                rsi::latest_rsi(window.close, period).map(IndicatorOutput::Scalar)
            }
            IndicatorKind::Macd { fast, slow, signal } => {
                macd::calculate_macd(window.close, fast, slow, signal).map(IndicatorOutput::Macd)
            }
            IndicatorKind::Stochastic { period, signal } => stochastic::calculate_stochastic(
                window.high,
                window.low,
                window.close,
                period,
                signal,
            )
            .map(IndicatorOutput::Stochastic),
        }
    }
}

// =============================================================================
// Trailing log
// =============================================================================

/// Bounded FIFO of recent readings; only the newest `exposed` are published.
#[derive(Debug, Clone)]
pub struct TrailingLog {
    log: RollingSeries<Reading>,
    exposed: usize,
}

impl TrailingLog {
    pub fn new(kept: usize, exposed: usize) -> Self {
        Self {
            log: RollingSeries::new(kept),
            exposed: exposed.min(kept),
        }
    }

    pub fn record(&mut self, reading: Reading) {
        self.log.append(reading);
    }

    pub fn exposed(&self) -> Vec<Reading> {
        self.log.tail(self.exposed)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.log.len()
    }
}

// =============================================================================
// IndicatorSet
// =============================================================================

#[derive(Debug, Clone)]
struct TrackedIndicator {
    name: String,
    kind: IndicatorKind,
    trail: Option<TrailingLog>,
}

/// The configured indicators plus their trailing logs.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    indicators: Vec<TrackedIndicator>,
    max_lookback: usize,
}

impl IndicatorSet {
    pub fn new(params: &IndicatorParams) -> Self {
        let trail = || Some(TrailingLog::new(params.trail_kept, params.trail_exposed));

        let indicators = vec![
            TrackedIndicator {
                name: "SMA".to_string(),
                kind: IndicatorKind::Sma {
                    period: params.sma_period,
                },
                trail: trail(),
            },
            TrackedIndicator {
                name: "PSAR".to_string(),
                kind: IndicatorKind::Psar {
                    step: params.psar_step,
                    max: params.psar_max,
                },
                trail: trail(),
            },
            TrackedIndicator {
                name: "ADX".to_string(),
                kind: IndicatorKind::Adx {
                    period: params.adx_period,
                },
                trail: None,
            },
            TrackedIndicator {
                name: format!("RSI_{}", params.rsi_long_period),
                kind: IndicatorKind::Rsi {
                    period: params.rsi_long_period,
                },
                trail: None,
            },
            TrackedIndicator {
                name: format!("RSI_{}", params.rsi_short_period),
                kind: IndicatorKind::Rsi {
                    period: params.rsi_short_period,
                },
                trail: None,
            },
            TrackedIndicator {
                name: "MACD".to_string(),
                kind: IndicatorKind::Macd {
                    fast: params.macd_fast,
                    slow: params.macd_slow,
                    signal: params.macd_signal,
                },
                trail: None,
            },
            TrackedIndicator {
                name: "Stochastic".to_string(),
                kind: IndicatorKind::Stochastic {
                    period: params.stochastic_period,
                    signal: params.stochastic_signal,
                },
                trail: None,
            },
        ];

        let max_lookback = indicators
            .iter()
            .map(|ind| ind.kind.lookback())
            .max()
            .unwrap_or(0);

        Self {
            indicators,
            max_lookback,
        }
    }

    /// The aggregate gate: largest lookback across all indicators.  Also the
    /// capacity of the price series feeding this set.
    pub fn max_lookback(&self) -> usize {
        self.max_lookback
    }

    pub fn is_ready(&self, available: usize) -> bool {
        available >= self.max_lookback
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.indicators.iter().map(|ind| ind.name.as_str())
    }

    /// Values published before the gate first opens: every indicator is
    /// explicitly insufficient.
    pub fn pending(&self) -> IndicatorValues {
        self.names()
            .map(|name| {
                (
                    name.to_string(),
                    IndicatorValue::Latest(Reading::InsufficientData),
                )
            })
            .collect()
    }

    /// Recompute every indicator over `window`.
    ///
    /// Returns `None` without touching any trailing log while the close series
    /// is shorter than [`max_lookback`](Self::max_lookback).
    pub fn refresh(&mut self, window: &PriceWindow<'_>) -> Option<IndicatorValues> {
        if !self.is_ready(window.close.len()) {
            return None;
        }

        let mut values = IndicatorValues::new();
        for ind in &mut self.indicators {
            let output = ind.kind.compute(window);
            if output.is_none() {
                debug!(
                    indicator = %ind.name,
                    samples = window.close.len(),
                    "indicator produced no value"
                );
            }
            let reading = Reading::from(output);

            let value = match ind.trail.as_mut() {
                Some(trail) => {
                    trail.record(reading);
                    IndicatorValue::Trail(trail.exposed())
                }
                None => IndicatorValue::Latest(reading),
            };
            values.insert(ind.name.clone(), value);
        }

        Some(values)
    }
}
