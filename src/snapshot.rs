// =============================================================================
// Snapshot Store — last published (latest OHLC, indicator values) pair
// =============================================================================
//
// A `Snapshot` is immutable once built.  The store holds an
// `Option<Arc<Snapshot>>` behind a `parking_lot::RwLock`; publishing swaps the
// `Arc` wholesale and readers clone the `Arc` out, so a reader only ever holds
// a complete snapshot from a single ingestion cycle.  Write-lock hold time is
// one pointer assignment.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::indicator_set::IndicatorValues;
use crate::types::Sample;

/// One ingestion cycle's output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// 1-based ingestion cycle that produced this snapshot.
    pub sequence: u64,
    #[serde(rename = "latestOHLC")]
    pub latest_ohlc: Sample,
    #[serde(rename = "indicatorValues")]
    pub indicator_values: IndicatorValues,
}

/// Holder of the most recently published snapshot.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Arc<Snapshot>>>,
    published: AtomicU64,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held snapshot.
    pub fn publish(&self, snapshot: Arc<Snapshot>) {
        *self.current.write() = Some(snapshot);
        self.published.fetch_add(1, Ordering::SeqCst);
    }

    /// The most recently published snapshot, `None` before the first
    /// ingestion.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.read().clone()
    }

    /// How many snapshots have been published so far.
    pub fn version(&self) -> u64 {
        self.published.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::indicator_set::{IndicatorOutput, IndicatorValue, Reading};

    fn snapshot(sequence: u64, close: f64) -> Arc<Snapshot> {
        let mut values = IndicatorValues::new();
        values.insert(
            "RSI_14".to_string(),
            IndicatorValue::Latest(Reading::Concrete(IndicatorOutput::Scalar(close))),
        );
        Arc::new(Snapshot {
            sequence,
            latest_ohlc: Sample {
                open: close,
                high: close,
                low: close,
                close,
                timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            },
            indicator_values: values,
        })
    }

    #[test]
    fn empty_before_first_publish() {
        let store = SnapshotStore::new();
        assert!(store.current().is_none());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn publish_replaces_wholesale() {
        let store = SnapshotStore::new();
        store.publish(snapshot(1, 10.0));
        store.publish(snapshot(2, 20.0));

        let current = store.current().unwrap();
        assert_eq!(current.sequence, 2);
        assert_eq!(current.latest_ohlc.close, 20.0);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn held_snapshot_survives_later_publish() {
        let store = SnapshotStore::new();
        store.publish(snapshot(1, 10.0));
        let held = store.current().unwrap();
        store.publish(snapshot(2, 20.0));

        assert_eq!(held.sequence, 1);
        assert_eq!(held.latest_ohlc.close, 10.0);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let json = serde_json::to_value(snapshot(3, 1.5).as_ref()).unwrap();
        assert_eq!(json["sequence"], 3);
        assert_eq!(json["latestOHLC"]["close"], 1.5);
        assert_eq!(json["latestOHLC"]["timestamp"], "2024-05-01T00:00:00Z");
        assert_eq!(json["indicatorValues"]["RSI_14"], 1.5);
    }
}
