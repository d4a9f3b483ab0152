// =============================================================================
// Central Application State
// =============================================================================
//
// Ties the ingestion gate, the snapshot store and the loaded configuration
// together for the HTTP handlers.  Shared across tasks as `Arc<AppState>`.
//
// The gate is the only writer; handlers that only read go straight to the
// store and never contend with ingestion for the gate's mutex.
// =============================================================================

use std::sync::Arc;
use std::time::Instant;

use crate::indicator_set::IndicatorParams;
use crate::ingest::IngestionGate;
use crate::runtime_config::RuntimeConfig;
use crate::snapshot::SnapshotStore;

pub struct AppState {
    pub config: RuntimeConfig,
    pub gate: IngestionGate,
    pub store: Arc<SnapshotStore>,
    /// Used for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig, params: &IndicatorParams) -> Self {
        let store = Arc::new(SnapshotStore::new());
        let gate = IngestionGate::new(params, Arc::clone(&store));

        Self {
            config,
            gate,
            store,
            start_time: Instant::now(),
        }
    }
}
