use std::sync::Arc;

use chrono::Utc;
use crawlgate_core::{AccessDecision, ProvenanceRecord};
use tracing::info;

use crate::{LogSink, StoreError};

/// Stamps access decisions and appends them to a [`LogSink`].
///
/// Every decision is recorded, allowed or not. A failed append is returned to
/// the caller rather than logged and dropped.
#[derive(Clone)]
pub struct ProvenanceRecorder {
    sink: Arc<dyn LogSink>,
}

impl ProvenanceRecorder {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    pub fn record(
        &self,
        decision: &AccessDecision,
        url: &str,
    ) -> Result<ProvenanceRecord, StoreError> {
        let record = ProvenanceRecord::from_decision(decision, url, Utc::now());
        self.sink.append(&record)?;
        info!(
            url = %record.url,
            allowed = record.allowed,
            reason = %decision.reason,
            "provenance recorded"
        );
        Ok(record)
    }
}
