//! Concurrent load-test harness for the skiride lift-ride ingestion endpoint.
//!
//! A [`LoadTest`] splits a fixed number of requests across a fixed pool of workers. Each worker
//! posts random [`RideEvent`](skiride_core::RideEvent)s, retrying up to a bound, and records the
//! latency and outcome of every request. Once every worker has finished, the recorded latencies
//! are reduced into a [`RunSummary`](skiride_core::RunSummary).
pub mod client;
pub mod error;
pub mod pool;
pub mod probe;
pub mod recorder;
pub mod retry;
pub mod sink;

pub use load_test::LoadTest;

pub mod prelude {
    pub use crate::client::{ClientError, HttpRideClient, RideClient};
    pub use crate::error::HarnessError;
    pub use crate::load_test::LoadTest;
    pub use crate::probe::probe;
    pub use crate::sink::{CsvFileSink, RecordSink};

    pub use skiride_core::{HarnessConfig, ProbeSummary, RideEvent, RunSummary};
}
