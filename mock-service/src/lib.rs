//! Stand-in for the ride ingestion endpoint, used to exercise the load-test harness.
use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use metrics::counter;
use serde::{Deserialize, Serialize};
use skiride_core::RideEvent;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::{
    num::NonZeroU32,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub const EVENT_PATH: &str = "/v1/skiers/liftRideEvent";

#[derive(Clone, Default)]
pub struct MockState {
    accepted: Arc<AtomicU64>,
    limiters: Arc<Mutex<HashMap<u32, Arc<DefaultDirectRateLimiter>>>>,
}

impl MockState {
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Acquire)
    }

    fn accept(&self) -> StatusCode {
        self.accepted.fetch_add(1, Ordering::AcqRel);
        counter!("mock-service.accepted").increment(1);
        StatusCode::CREATED
    }

    fn limiter(&self, max_tps: NonZeroU32) -> Arc<DefaultDirectRateLimiter> {
        let mut limiters = self.limiters.lock().unwrap_or_else(PoisonError::into_inner);
        limiters
            .entry(max_tps.get())
            .or_insert_with(|| Arc::new(rate_limiter(max_tps)))
            .clone()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventCount {
    pub accepted: u64,
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route(EVENT_PATH, post(create))
        .route("/status/:code/v1/skiers/liftRideEvent", post(fixed_status))
        .route("/max/:max_tps/v1/skiers/liftRideEvent", post(max))
        .route("/events/count", get(count))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    serve(listener, MockState::default()).await
}

pub async fn serve(listener: TcpListener, state: MockState) -> anyhow::Result<()> {
    debug!("Mock service listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[debug_handler]
async fn create(State(state): State<MockState>, Json(event): Json<RideEvent>) -> StatusCode {
    if !is_valid(&event) {
        return StatusCode::BAD_REQUEST;
    }
    state.accept()
}

#[debug_handler]
async fn fixed_status(Path(code): Path<u16>, Json(_event): Json<RideEvent>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Accepts up to `max_tps` events per second and answers 503 above that.
#[debug_handler]
async fn max(
    State(state): State<MockState>,
    Path(max_tps): Path<u32>,
    Json(event): Json<RideEvent>,
) -> StatusCode {
    let Some(max_tps) = NonZeroU32::new(max_tps) else {
        return StatusCode::BAD_REQUEST;
    };
    if !is_valid(&event) {
        return StatusCode::BAD_REQUEST;
    }

    match state.limiter(max_tps).check() {
        Ok(_) => state.accept(),
        Err(_) => {
            debug!("Rate limited at {max_tps} TPS");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[debug_handler]
async fn count(State(state): State<MockState>) -> Json<EventCount> {
    Json(EventCount {
        accepted: state.accepted(),
    })
}

fn is_valid(event: &RideEvent) -> bool {
    event.skier_id > 0
        && event.resort_id > 0
        && event.lift_id > 0
        && event.season_id > 0
        && event.day_id > 0
}

pub fn rate_limiter(tps: NonZeroU32) -> DefaultDirectRateLimiter {
    RateLimiter::direct(Quota::per_second(tps))
}
