use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use skiride::prelude::*;
use skiride_core::{
    DEFAULT_DAY_ID, DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_PROBE_REQUESTS,
    DEFAULT_REQUESTS_PER_WORKER, DEFAULT_SEASON_ID, DEFAULT_SINK_PATH, DEFAULT_WORKERS,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(version, about = "Load test for the skiride lift-ride ingestion endpoint")]
struct Cli {
    /// Ingestion endpoint to post ride events to
    #[arg(short, long, default_value = DEFAULT_ENDPOINT, global = true)]
    endpoint: String,

    /// Per-request timeout, e.g. `5s`; unset leaves the client default
    #[arg(long, global = true)]
    timeout: Option<humantime::Duration>,

    #[arg(long, default_value_t = DEFAULT_SEASON_ID, global = true)]
    season: u32,

    #[arg(long, default_value_t = DEFAULT_DAY_ID, global = true)]
    day: u32,

    /// Print the summary as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Serve Prometheus metrics on this address while the run is in progress
    #[arg(long, global = true)]
    prometheus: Option<SocketAddr>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Concurrent run across a fixed worker pool, with retries
    Run(RunArgs),

    /// Sequential requests without retries, reporting the average latency
    Probe {
        #[arg(short = 'n', long, default_value_t = DEFAULT_PROBE_REQUESTS)]
        requests: usize,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    #[arg(short = 'n', long, default_value_t = DEFAULT_REQUESTS_PER_WORKER)]
    requests_per_worker: usize,

    /// Total request count; overrides `--requests-per-worker`
    #[arg(long)]
    total_requests: Option<usize>,

    /// Retries after the first failed attempt
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_RETRIES)]
    max_retries: u32,

    /// Time allowed for workers to wind down before they are aborted
    #[arg(long, default_value = "10s")]
    shutdown_grace: humantime::Duration,

    /// CSV file receiving one line per completed request
    #[arg(long, default_value = DEFAULT_SINK_PATH)]
    sink: PathBuf,

    /// Do not write latency records anywhere
    #[arg(long)]
    no_sink: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("skiride=info,skiride_loadtest=info")),
        )
        .init();

    let cli = Cli::parse();

    if let Some(addr) = cli.prometheus {
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!("Serving metrics on {addr}");
    }

    let client = match cli.timeout {
        Some(timeout) => HttpRideClient::with_timeout(&cli.endpoint, *timeout),
        None => HttpRideClient::new(&cli.endpoint),
    }
    .with_context(|| format!("Failed to create client for {}", cli.endpoint))?;

    match cli.command {
        Command::Run(args) => {
            let test = load_test(client, &args, cli.season, cli.day);
            let summary = test.await.context("Load test failed")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
            }
        }
        Command::Probe { requests } => {
            let summary = probe(&client, requests, cli.season, cli.day).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
            }
        }
    }

    Ok(())
}

fn load_test(
    client: HttpRideClient,
    args: &RunArgs,
    season: u32,
    day: u32,
) -> LoadTest<HttpRideClient> {
    let mut test = LoadTest::new(client)
        .workers(args.workers)
        .max_retries(args.max_retries)
        .shutdown_grace(*args.shutdown_grace)
        .season(season)
        .day(day);

    test = match args.total_requests {
        Some(total) => test.total_requests(total),
        None => test.requests_per_worker(args.requests_per_worker),
    };

    if args.no_sink {
        test.no_sink()
    } else {
        test.sink(&args.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::time::Duration;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults() {
        let cli = Cli::parse_from(["skiride-loadtest", "run"]);
        assert_eq!(cli.endpoint, DEFAULT_ENDPOINT);
        assert!(!cli.json);

        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.workers, 32);
        assert_eq!(args.requests_per_worker, 1_000);
        assert_eq!(args.max_retries, 5);
        assert_eq!(*args.shutdown_grace, Duration::from_secs(10));
        assert_eq!(args.sink, PathBuf::from("latencies.csv"));

        let client = HttpRideClient::new(&cli.endpoint).unwrap();
        let config = load_test(client, &args, cli.season, cli.day).resolved_config();
        assert_eq!(config.total_requests, 32_000);
        assert_eq!(config.season_id, 2022);
        assert_eq!(config.day_id, 1);
    }

    #[test]
    fn run_overrides() {
        let cli = Cli::parse_from([
            "skiride-loadtest",
            "run",
            "-w",
            "4",
            "--total-requests",
            "10",
            "--max-retries",
            "2",
            "--shutdown-grace",
            "500ms",
            "--no-sink",
            "--endpoint",
            "http://127.0.0.1:3002/v1/skiers/liftRideEvent",
            "--json",
        ]);
        assert!(cli.json);

        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let client = HttpRideClient::new(&cli.endpoint).unwrap();
        let config = load_test(client, &args, cli.season, cli.day).resolved_config();
        assert_eq!(config.workers, 4);
        assert_eq!(config.total_requests, 10);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.shutdown_grace, Duration::from_millis(500));
    }

    #[test]
    fn probe_defaults() {
        let cli = Cli::parse_from(["skiride-loadtest", "probe"]);
        let Command::Probe { requests } = cli.command else {
            panic!("expected probe");
        };
        assert_eq!(requests, 500);
    }
}
