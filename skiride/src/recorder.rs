use crate::sink::RecordSink;
use metrics_util::AtomicBucket;
use skiride_core::{LatencyRecord, RequestOutcome};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use time::OffsetDateTime;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

/// Marks the logical start of a request/retry cycle.
#[derive(Clone, Copy, Debug)]
pub struct RequestStart {
    started_at: OffsetDateTime,
    instant: Instant,
}

impl RequestStart {
    pub fn now() -> Self {
        Self {
            started_at: OffsetDateTime::now_utc(),
            instant: Instant::now(),
        }
    }

    pub fn finish(self, outcome: RequestOutcome) -> LatencyRecord {
        LatencyRecord::new(self.started_at, self.instant.elapsed(), outcome)
    }
}

/// Shared sink for completed requests.
///
/// Cloned into every worker. Appends are lock-free; reading back is only meaningful once every
/// worker has finished.
#[derive(Clone)]
pub struct LatencyRecorder {
    records: Arc<AtomicBucket<LatencyRecord>>,
    success: Arc<AtomicU64>,
    failure: Arc<AtomicU64>,
    sink: Option<Arc<dyn RecordSink>>,
    method: &'static str,
}

impl LatencyRecorder {
    pub fn new(sink: Option<Arc<dyn RecordSink>>, method: &'static str) -> Self {
        Self {
            records: Arc::new(AtomicBucket::new()),
            success: Arc::new(AtomicU64::new(0)),
            failure: Arc::new(AtomicU64::new(0)),
            sink,
            method,
        }
    }

    /// Tally `record`, write it to the sink off the runtime threads, then append it.
    pub async fn record(&self, record: LatencyRecord) {
        if record.outcome.is_success() {
            self.success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failure.fetch_add(1, Ordering::Relaxed);
        }

        #[cfg(feature = "metrics")]
        {
            metrics::histogram!("skiride.latency").record(record.latency.as_nanos() as f64);
            if record.outcome.is_success() {
                metrics::counter!("skiride.success").increment(1);
            } else {
                metrics::counter!("skiride.failure").increment(1);
            }
        }

        if let Some(sink) = &self.sink {
            let sink = sink.clone();
            let method = self.method;
            let line = record.clone();
            let written = tokio::task::spawn_blocking(move || sink.append(&line, method))
                .await
                .unwrap_or_else(|err| Err(err.into()));
            if let Err(err) = written {
                error!("Error writing latency record: {err}");
            }
        }

        self.records.push(record);
    }

    pub fn successes(&self) -> u64 {
        self.success.load(Ordering::Acquire)
    }

    pub fn failures(&self) -> u64 {
        self.failure.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        let mut len = 0;
        self.records.data_with(|block| len += block.len());
        len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every record appended so far, in no particular order.
    pub fn records(&self) -> Vec<LatencyRecord> {
        self.records.data()
    }

    /// Latencies of every record in whole milliseconds.
    pub fn latencies_ms(&self) -> Vec<u64> {
        let mut latencies = vec![];
        self.records.data_with(|block| {
            latencies.extend(block.iter().map(LatencyRecord::latency_ms));
        });
        latencies
    }
}
