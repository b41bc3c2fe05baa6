use crate::{
    DEFAULT_DAY_ID, DEFAULT_MAX_RETRIES, DEFAULT_REQUESTS_PER_WORKER, DEFAULT_SEASON_ID,
    DEFAULT_SHUTDOWN_GRACE, DEFAULT_WORKERS,
};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("At least one worker is required")]
    NoWorkers,

    #[error("At least one request is required")]
    NoRequests,
}

/// Shape of a single load-test run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    pub total_requests: usize,
    pub workers: usize,
    pub max_retries: u32,
    pub shutdown_grace: Duration,
    pub season_id: u32,
    pub day_id: u32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            total_requests: DEFAULT_WORKERS * DEFAULT_REQUESTS_PER_WORKER,
            workers: DEFAULT_WORKERS,
            max_retries: DEFAULT_MAX_RETRIES,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            season_id: DEFAULT_SEASON_ID,
            day_id: DEFAULT_DAY_ID,
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.total_requests == 0 {
            return Err(ConfigError::NoRequests);
        }
        Ok(())
    }

    /// Split `total_requests` into one disjoint share per worker.
    ///
    /// Every worker gets `total / workers`; the remainder goes one apiece to the first workers,
    /// so the shares always add up to the total.
    pub fn shares(&self) -> Vec<usize> {
        if self.workers == 0 {
            return vec![];
        }

        let base = self.total_requests / self.workers;
        let remainder = self.total_requests % self.workers;
        (0..self.workers)
            .map(|idx| if idx < remainder { base + 1 } else { base })
            .collect()
    }
}
