use skiride_core::ConfigError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("Worker was cancelled before finishing")]
    WorkerCancelled,
}

impl From<JoinError> for HarnessError {
    fn from(err: JoinError) -> Self {
        if err.is_panic() {
            Self::WorkerPanicked(err.to_string())
        } else {
            Self::WorkerCancelled
        }
    }
}
