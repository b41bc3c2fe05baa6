use crate::client::RideClient;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use skiride_core::{ProbeSummary, RideEvent, STATUS_CREATED};
use std::time::{Duration, Instant};
#[allow(unused)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Send `requests` events one after another, without retries, and average their latency.
///
/// A `201` counts as a success. A transport error or a `4xx`/`5xx` status counts as a failure.
/// Any other status counts as neither but still contributes its latency.
#[instrument(name = "probe", skip(client))]
pub async fn probe<C>(client: &C, requests: usize, season_id: u32, day_id: u32) -> ProbeSummary
where
    C: RideClient,
{
    let mut rng = SmallRng::from_entropy();
    let mut successes = 0;
    let mut failures = 0;
    let mut total = Duration::ZERO;

    for _ in 0..requests {
        let event = RideEvent::random(&mut rng, season_id, day_id);

        let start = Instant::now();
        match client.post_event(&event).await {
            Ok(status) if status == STATUS_CREATED => successes += 1,
            Ok(status) if status >= 400 => {
                debug!("Probe request rejected with status {status}");
                failures += 1;
            }
            Ok(status) => debug!("Probe request answered with status {status}"),
            Err(err) => {
                debug!("Probe request failed: {err}");
                failures += 1;
            }
        }
        total += start.elapsed();
    }

    let summary = ProbeSummary::new(requests, successes, failures, total);
    info!(
        "Probe complete: {} succeeded, {} failed, {:.2} ms average",
        summary.successes, summary.failures, summary.mean_latency_ms
    );
    summary
}
