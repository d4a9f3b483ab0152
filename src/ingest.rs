// =============================================================================
// Ingestion Gate — the single mutation path
// =============================================================================
//
// `ingest` validates a raw observation, then under one mutex:
//   1. appends it to the OHLC rolling series,
//   2. refreshes the indicator set (gated on the largest lookback),
//   3. builds a new snapshot and publishes it to the store.
//
// Validation happens before the lock is taken, so a malformed sample never
// touches the series or the store.  Publishing happens while the lock is still
// held, so snapshots reach the store in ingestion order.
// =============================================================================

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info};

use crate::indicator_set::{IndicatorParams, IndicatorSet, IndicatorValues};
use crate::market_data::PriceSeries;
use crate::snapshot::{Snapshot, SnapshotStore};
use crate::types::{RawSample, Sample};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed sample: field `{field}` {reason}")]
    MalformedSample { field: &'static str, reason: String },
}

impl IngestError {
    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedSample {
            field,
            reason: reason.into(),
        }
    }
}

/// State only the gate may touch.
struct GateState {
    series: PriceSeries,
    indicators: IndicatorSet,
    last_values: IndicatorValues,
    sequence: u64,
}

pub struct IngestionGate {
    state: Mutex<GateState>,
    store: Arc<SnapshotStore>,
}

impl IngestionGate {
    /// Build a gate whose series capacity equals the indicator set's largest
    /// lookback.
    pub fn new(params: &IndicatorParams, store: Arc<SnapshotStore>) -> Self {
        let indicators = IndicatorSet::new(params);
        let series = PriceSeries::new(indicators.max_lookback());
        let last_values = indicators.pending();

        Self {
            state: Mutex::new(GateState {
                series,
                indicators,
                last_values,
                sequence: 0,
            }),
            store,
        }
    }

    /// Validate and apply one observation, returning the snapshot it produced.
    pub fn ingest(&self, raw: RawSample) -> Result<Arc<Snapshot>, IngestError> {
        let sample = Sample::try_from(raw)?;
        Ok(self.apply(sample))
    }

    /// Apply an already-validated sample.
    pub fn apply(&self, sample: Sample) -> Arc<Snapshot> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        state.series.push(&sample);
        let window = state.series.window();
        if let Some(values) = state.indicators.refresh(&window) {
            state.last_values = values;
        }
        state.sequence += 1;

        let snapshot = Arc::new(Snapshot {
            sequence: state.sequence,
            latest_ohlc: sample,
            indicator_values: state.last_values.clone(),
        });
        self.store.publish(Arc::clone(&snapshot));

        info!(
            sequence = snapshot.sequence,
            close = snapshot.latest_ohlc.close,
            samples = state.series.len(),
            ready = state.indicators.is_ready(state.series.len()),
            insufficient = snapshot
                .indicator_values
                .values()
                .filter(|v| v.is_insufficient())
                .count(),
            "sample ingested"
        );
        debug!(values = ?snapshot.indicator_values, "indicator values");

        snapshot
    }

    /// Current close-series length.
    pub fn series_len(&self) -> usize {
        self.state.lock().series.len()
    }

    /// Capacity of the rolling series (the aggregate lookback gate).
    pub fn series_capacity(&self) -> usize {
        self.state.lock().series.capacity()
    }

    #[cfg(test)]
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }
}
