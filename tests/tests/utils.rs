use mock_service::{EventCount, MockState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::OnceLock;
use tokio::net::TcpListener;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_panic(info);
            error!("Panic occurred: {info:?}");
        }));

        let _ = FmtSubscriber::builder()
            .with_env_filter("skiride=debug,mock_service=info")
            .with_test_writer()
            .try_init();
    });
}

/// A mock ingestion service on an ephemeral port, private to one test.
#[allow(unused)]
pub struct MockServer {
    pub addr: SocketAddr,
    pub state: MockState,
}

#[allow(unused)]
impl MockServer {
    pub async fn spawn() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = MockState::default();

        let served = state.clone();
        tokio::spawn(async move {
            if let Err(err) = mock_service::serve(listener, served).await {
                error!("Mock service stopped: {err}");
            }
        });

        Ok(Self { addr, state })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn event_url(&self) -> String {
        self.url(mock_service::EVENT_PATH)
    }

    pub async fn accepted_over_http(&self) -> anyhow::Result<u64> {
        let count: EventCount = reqwest::get(self.url("/events/count")).await?.json().await?;
        Ok(count.accepted)
    }
}

#[allow(unused)]
pub fn temp_csv() -> PathBuf {
    std::env::temp_dir().join(format!("skiride-{}.csv", uuid::Uuid::new_v4()))
}
