use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Summary of a completed load-test run.
///
/// Latency figures are whole milliseconds, matching what is written to the record sink. They
/// cover every request, including the ones that exhausted their retries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_requests: usize,
    pub successes: u64,
    pub failures: u64,
    pub wall_time_ms: u64,
    /// Requests per second over the whole run.
    pub throughput: f64,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p99_ms: u64,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl RunSummary {
    pub fn new(mut latencies_ms: Vec<u64>, successes: u64, failures: u64, wall: Duration) -> Self {
        latencies_ms.sort_unstable();
        let total_requests = latencies_ms.len();

        Self {
            total_requests,
            successes,
            failures,
            wall_time_ms: u64::try_from(wall.as_millis()).unwrap_or(u64::MAX),
            throughput: throughput(total_requests, wall),
            mean_ms: mean(&latencies_ms),
            median_ms: median(&latencies_ms),
            p99_ms: percentile_99(&latencies_ms),
            min_ms: latencies_ms.first().copied().unwrap_or(0),
            max_ms: latencies_ms.last().copied().unwrap_or(0),
        }
    }

    pub fn wall_time(&self) -> Duration {
        Duration::from_millis(self.wall_time_ms)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Successful requests:   {}", self.successes)?;
        writeln!(f, "Unsuccessful requests: {}", self.failures)?;
        writeln!(
            f,
            "Total run time:        {} ({} ms)",
            humantime::format_duration(self.wall_time()),
            self.wall_time_ms
        )?;
        writeln!(f, "Throughput:            {:.2} requests/s", self.throughput)?;
        writeln!(f, "Mean response time:    {:.2} ms", self.mean_ms)?;
        writeln!(f, "Median response time:  {:.2} ms", self.median_ms)?;
        writeln!(f, "p99 response time:     {} ms", self.p99_ms)?;
        writeln!(f, "Min response time:     {} ms", self.min_ms)?;
        write!(f, "Max response time:     {} ms", self.max_ms)
    }
}

/// Result of the sequential, retry-free latency probe.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProbeSummary {
    pub requests: usize,
    pub successes: u64,
    pub failures: u64,
    pub total_ms: u64,
    pub mean_latency_ms: f64,
}

impl ProbeSummary {
    pub fn new(requests: usize, successes: u64, failures: u64, total: Duration) -> Self {
        let total_ms = u64::try_from(total.as_millis()).unwrap_or(u64::MAX);
        let mean_latency_ms = if requests == 0 {
            0.
        } else {
            total_ms as f64 / requests as f64
        };

        Self {
            requests,
            successes,
            failures,
            total_ms,
            mean_latency_ms,
        }
    }
}

impl fmt::Display for ProbeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Successful requests:   {}", self.successes)?;
        writeln!(f, "Unsuccessful requests: {}", self.failures)?;
        write!(f, "Average latency:       {:.2} ms", self.mean_latency_ms)
    }
}

pub fn throughput(total_requests: usize, wall: Duration) -> f64 {
    let secs = wall.as_secs_f64();
    if secs > 0. {
        total_requests as f64 / secs
    } else {
        0.
    }
}

pub fn mean(latencies_ms: &[u64]) -> f64 {
    if latencies_ms.is_empty() {
        return 0.;
    }
    statistical::mean(&as_f64(latencies_ms))
}

/// Median of an ascending slice; the two middle values are averaged for even lengths.
pub fn median(sorted_ms: &[u64]) -> f64 {
    let n = sorted_ms.len();
    match n {
        0 => 0.,
        _ if n % 2 == 0 => (sorted_ms[n / 2 - 1] + sorted_ms[n / 2]) as f64 / 2.,
        _ => sorted_ms[n / 2] as f64,
    }
}

/// Value at index `ceil(0.99 * n) - 1` of an ascending slice.
pub fn percentile_99(sorted_ms: &[u64]) -> u64 {
    match p99_index(sorted_ms.len()) {
        Some(idx) => sorted_ms[idx],
        None => 0,
    }
}

pub fn p99_index(count: usize) -> Option<usize> {
    // ceil(99n / 100) in integers so 0.99 never picks up float error.
    (count > 0).then(|| (99 * count).div_ceil(100) - 1)
}

fn as_f64(values: &[u64]) -> Vec<f64> {
    values.iter().map(|v| *v as f64).collect()
}
