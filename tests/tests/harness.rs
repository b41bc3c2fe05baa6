mod utils;
#[allow(unused)]
use utils::*;

use skiride::prelude::*;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(60_000)]
async fn every_request_lands() {
    init();
    let server = MockServer::spawn().await.unwrap();
    let path = temp_csv();

    let summary = LoadTest::http(&server.event_url())
        .unwrap()
        .workers(8)
        .requests_per_worker(25)
        .sink(&path)
        .await
        .unwrap();

    assert_eq!(summary.total_requests, 200);
    assert_eq!(summary.successes, 200);
    assert_eq!(summary.failures, 0);
    assert_eq!(server.state.accepted(), 200);
    assert_eq!(server.accepted_over_http().await.unwrap(), 200);
    assert!(summary.min_ms as f64 <= summary.median_ms && summary.median_ms <= summary.max_ms as f64);
    assert!(summary.p99_ms <= summary.max_ms);

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 200);
    for line in lines {
        let fields: Vec<_> = line.split(',').collect();
        assert_eq!(fields.len(), 4, "{line}");
        assert_eq!(fields[1], "POST");
        assert!(fields[2].parse::<u64>().is_ok(), "{line}");
        assert_eq!(fields[3], "201");
    }

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(60_000)]
async fn server_errors_exhaust_retries() {
    init();
    let server = MockServer::spawn().await.unwrap();
    let path = temp_csv();
    let endpoint = server.url(&format!("/status/500{}", mock_service::EVENT_PATH));

    let summary = LoadTest::http(&endpoint)
        .unwrap()
        .workers(4)
        .total_requests(10)
        .max_retries(2)
        .sink(&path)
        .await
        .unwrap();

    assert_eq!(summary.total_requests, 10);
    assert_eq!(summary.successes, 0);
    assert_eq!(summary.failures, 10);
    assert_eq!(server.state.accepted(), 0);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 10);
    assert!(contents
        .lines()
        .all(|l| l.contains(",POST,") && l.ends_with(",-1")));

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(60_000)]
async fn rate_limited_endpoint_accounts_for_every_request() {
    init();
    let server = MockServer::spawn().await.unwrap();
    let endpoint = server.url(&format!("/max/50{}", mock_service::EVENT_PATH));

    let summary = LoadTest::http(&endpoint)
        .unwrap()
        .workers(8)
        .total_requests(100)
        .no_sink()
        .await
        .unwrap();

    assert_eq!(summary.total_requests, 100);
    assert_eq!(summary.successes + summary.failures, 100);
    assert_eq!(server.state.accepted(), summary.successes);
}

#[tokio::test]
#[ntest::timeout(60_000)]
async fn refused_connections_are_failures() {
    init();

    let client = HttpRideClient::with_timeout(
        "http://127.0.0.1:9/v1/skiers/liftRideEvent",
        Duration::from_secs(2),
    )
    .unwrap();
    let summary = LoadTest::new(client)
        .workers(2)
        .total_requests(4)
        .max_retries(1)
        .no_sink()
        .await
        .unwrap();

    assert_eq!(summary.total_requests, 4);
    assert_eq!(summary.failures, 4);
}

#[tokio::test]
#[ntest::timeout(60_000)]
async fn probe_against_mock() {
    init();
    let server = MockServer::spawn().await.unwrap();
    let client = HttpRideClient::new(&server.event_url()).unwrap();

    let summary = probe(&client, 20, 2022, 1).await;

    assert_eq!(summary.requests, 20);
    assert_eq!(summary.successes, 20);
    assert_eq!(summary.failures, 0);
    assert_eq!(server.state.accepted(), 20);
}

#[cfg(feature = "integration")]
mod full_run {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    #[ntest::timeout(600_000)]
    async fn default_run_against_mock() {
        init();
        let server = MockServer::spawn().await.unwrap();
        let path = temp_csv();

        let summary = LoadTest::http(&server.event_url())
            .unwrap()
            .sink(&path)
            .await
            .unwrap();

        assert_eq!(summary.total_requests, 32_000);
        assert_eq!(summary.successes, 32_000);
        assert_eq!(server.accepted_over_http().await.unwrap(), 32_000);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap().lines().count(),
            32_000
        );
        assert!(summary.throughput > 0.);

        std::fs::remove_file(&path).unwrap();
    }
}
