use crate::client::RideClient;
use skiride_core::{RequestOutcome, RideEvent, STATUS_CREATED};
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

/// Post `event` until the endpoint answers `201 Created` or `max_retries + 1` attempts failed.
///
/// Transport errors and non-201 statuses are treated alike. Retries are immediate.
pub async fn send_with_retry<C>(client: &C, event: &RideEvent, max_retries: u32) -> RequestOutcome
where
    C: RideClient,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        match client.post_event(event).await {
            Ok(status) if status == STATUS_CREATED => {
                return RequestOutcome::Created { status, attempts };
            }
            Ok(status) => {
                debug!("Attempt {attempts} answered with status {status}");
            }
            Err(err) => {
                debug!("Attempt {attempts} failed: {err}");
            }
        }

        if attempts > max_retries {
            return RequestOutcome::Exhausted { attempts };
        }

        #[cfg(feature = "metrics")]
        metrics::counter!("skiride.retry").increment(1);
    }
}
