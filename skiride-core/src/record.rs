use crate::EXHAUSTED_STATUS;
use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// How a request/retry cycle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The endpoint answered `201 Created` on attempt number `attempts`.
    Created { status: u16, attempts: u32 },
    /// Every attempt failed.
    Exhausted { attempts: u32 },
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Created { attempts, .. } | Self::Exhausted { attempts } => *attempts,
        }
    }

    /// Status as written to the record sink; `-1` for an exhausted request.
    pub fn status_code(&self) -> i32 {
        match self {
            Self::Created { status, .. } => i32::from(*status),
            Self::Exhausted { .. } => EXHAUSTED_STATUS,
        }
    }
}

/// Timing and outcome of one completed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatencyRecord {
    pub started_at: OffsetDateTime,
    pub latency: Duration,
    pub outcome: RequestOutcome,
}

impl LatencyRecord {
    pub fn new(started_at: OffsetDateTime, latency: Duration, outcome: RequestOutcome) -> Self {
        Self {
            started_at,
            latency,
            outcome,
        }
    }

    /// Latency truncated to whole milliseconds.
    pub fn latency_ms(&self) -> u64 {
        u64::try_from(self.latency.as_millis()).unwrap_or(u64::MAX)
    }

    /// `<start>,<method>,<latency-ms>,<status>` with the start time in RFC 3339.
    pub fn to_csv_line(&self, method: &str) -> Result<String, time::error::Format> {
        let started_at = self.started_at.format(&Rfc3339)?;
        Ok(format!(
            "{started_at},{method},{},{}\n",
            self.latency_ms(),
            self.outcome.status_code()
        ))
    }
}
