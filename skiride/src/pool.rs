//! Fixed-size worker pool joined at a countdown barrier
use crate::client::RideClient;
use crate::error::HarnessError;
use crate::recorder::{LatencyRecorder, RequestStart};
use crate::retry::send_with_retry;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use skiride_core::{HarnessConfig, RideEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinSet;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn, Instrument};

/// Counter that releases its waiters once it has been counted down to zero.
#[derive(Debug)]
pub struct Countdown {
    remaining: AtomicUsize,
    notify: Notify,
}

impl Countdown {
    pub fn new(count: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(count),
            notify: Notify::new(),
        }
    }

    pub fn count_down(&self) {
        let prev = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        match prev {
            Ok(1) => self.notify.notify_waiters(),
            Ok(_) => {}
            Err(_) => warn!("Countdown decremented past zero"),
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // NOTE: Register before checking so a count_down in between is not missed.
            notified.as_mut().enable();

            if self.remaining() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Runs every worker to completion and shuts the pool down.
///
/// Each worker owns one share from [`HarnessConfig::shares`] and counts the barrier down once per
/// request, whatever the outcome.
pub(crate) async fn run_workers<C>(
    client: Arc<C>,
    config: &HarnessConfig,
    recorder: &LatencyRecorder,
) -> Result<(), HarnessError>
where
    C: RideClient,
{
    let countdown = Arc::new(Countdown::new(config.total_requests));
    let mut tasks = JoinSet::new();

    for (worker, share) in config.shares().into_iter().enumerate() {
        let client = client.clone();
        let recorder = recorder.clone();
        let countdown = countdown.clone();
        let max_retries = config.max_retries;
        let (season_id, day_id) = (config.season_id, config.day_id);

        tasks.spawn(
            async move {
                let mut rng = SmallRng::from_entropy();
                for _ in 0..share {
                    let event = RideEvent::random(&mut rng, season_id, day_id);
                    let start = RequestStart::now();
                    let outcome = send_with_retry(client.as_ref(), &event, max_retries).await;
                    recorder.record(start.finish(outcome)).await;
                    countdown.count_down();
                }
                trace!("Worker {worker} finished {share} requests");
            }
            .in_current_span(),
        );
    }

    debug!("Spawned {} workers", tasks.len());

    loop {
        tokio::select! {
            _ = countdown.wait() => break,
            Some(res) = tasks.join_next() => res?,
        }
    }

    shutdown(tasks, config.shutdown_grace).await
}

/// Wait up to `grace` for the remaining workers, then abort whatever is left.
pub(crate) async fn shutdown(
    mut tasks: JoinSet<()>,
    grace: Duration,
) -> Result<(), HarnessError> {
    let graceful = tokio::time::timeout(grace, async {
        while let Some(res) = tasks.join_next().await {
            res?;
        }
        Ok::<_, HarnessError>(())
    })
    .await;

    match graceful {
        Ok(res) => res,
        Err(_) => {
            warn!(
                "{} workers still running after {}; aborting",
                tasks.len(),
                humantime::format_duration(grace)
            );
            tasks.shutdown().await;
            Ok(())
        }
    }
}
