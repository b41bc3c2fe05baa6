//! Single-shot HTTP facade for the ingestion endpoint
use skiride_core::RideEvent;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failure; an HTTP response of any status is not a `ClientError`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Posts one ride event and reports the status code the endpoint answered with.
pub trait RideClient: Send + Sync + 'static {
    fn post_event(
        &self,
        event: &RideEvent,
    ) -> impl Future<Output = Result<u16, ClientError>> + Send;

    /// HTTP method written to the record sink.
    fn method(&self) -> &'static str {
        "POST"
    }
}

/// `reqwest`-backed client posting JSON to a fixed URL.
#[derive(Clone, Debug)]
pub struct HttpRideClient {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpRideClient {
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        Self::build(endpoint, None)
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, ClientError> {
        Self::build(endpoint, Some(timeout))
    }

    fn build(endpoint: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|err| ClientError::Transport(format!("Invalid endpoint {endpoint}: {err}")))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

impl RideClient for HttpRideClient {
    async fn post_event(&self, event: &RideEvent) -> Result<u16, ClientError> {
        let res = self
            .client
            .post(self.endpoint.clone())
            .json(event)
            .send()
            .await?;
        Ok(res.status().as_u16())
    }
}
