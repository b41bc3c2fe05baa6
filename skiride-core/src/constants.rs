use std::time::Duration;

/// Default number of concurrent workers.
pub const DEFAULT_WORKERS: usize = 32;

/// Default number of requests each worker sends.
pub const DEFAULT_REQUESTS_PER_WORKER: usize = 1000;

/// Default number of retries after the first failed attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// How long the pool is given to wind down before remaining workers are aborted.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Number of requests issued by the sequential probe.
pub const DEFAULT_PROBE_REQUESTS: usize = 500;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/v1/skiers/liftRideEvent";

pub const DEFAULT_SINK_PATH: &str = "latencies.csv";

pub const DEFAULT_SEASON_ID: u32 = 2022;

pub const DEFAULT_DAY_ID: u32 = 1;

/// The only status the ingestion endpoint returns for an accepted event.
pub const STATUS_CREATED: u16 = 201;

/// Status written for a request that never got a `201` back.
pub const EXHAUSTED_STATUS: i32 = -1;
