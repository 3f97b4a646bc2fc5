use std::str::FromStr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use departure_board::api::{
    DEFAULT_BASE_URL, DepartureRepository, FixtureRepository, HttpDepartureRepository,
    RepositoryConfig,
};
use departure_board::board::{BoardConfig, BoardController, BoardState, DEFAULT_STATION, board_rows};
use departure_board::domain::TimeOfDay;

/// Read an environment variable, falling back to a default.
fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Read and parse an environment variable, warning on bad values.
fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(var = name, value = %raw, "Ignoring unparseable environment variable");
            default
        }),
        Err(_) => default,
    }
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let board_config = BoardConfig::new(env_or("BOARD_STATION", DEFAULT_STATION))
        .with_refresh_interval(Duration::from_secs(env_parse("BOARD_REFRESH_SECS", 60)));

    // Fixture mode serves boards from disk instead of the departure service
    if let Ok(dir) = std::env::var("BOARD_FIXTURE_DIR") {
        let repo = FixtureRepository::new(&dir).expect("Failed to load fixtures");
        info!(
            dir = %dir,
            stations = repo.available_stations().await.len(),
            "Serving departures from fixtures"
        );
        let reload = FixtureReload {
            repo: repo.clone(),
            dir,
        };
        run(BoardController::new(repo, &board_config), &board_config, Some(reload)).await;
        return;
    }

    let repo_config = RepositoryConfig::new(env_or("BOARD_API_URL", DEFAULT_BASE_URL))
        .with_timeout(env_parse("BOARD_TIMEOUT_SECS", 30));
    info!(url = %repo_config.base_url, "Using departure service");
    let repo = HttpDepartureRepository::new(repo_config).expect("Failed to create HTTP client");

    if let Err(e) = repo.health().await {
        warn!(error = %e, "Departure service health check failed");
    }
    match repo.available_stations().await {
        Ok(stations) => info!(count = stations.len(), "Loaded available stations"),
        Err(e) => warn!(error = %e, "Failed to list available stations"),
    }

    run(BoardController::new(repo, &board_config), &board_config, None).await;
}

/// Fixture directory re-read before a manual refresh.
struct FixtureReload {
    repo: FixtureRepository,
    dir: String,
}

impl FixtureReload {
    async fn reload(&self) {
        match self.repo.reload(&self.dir).await {
            Ok(count) => info!(dir = %self.dir, stations = count, "Reloaded fixtures"),
            Err(e) => {
                warn!(dir = %self.dir, error = %e, "Failed to reload fixtures, keeping previous")
            }
        }
    }
}

/// Refresh on an interval and switch stations on stdin input.
///
/// Each line read from stdin is a station id; an empty line refreshes the
/// current station, re-reading fixtures first when serving from disk.
async fn run<R: DepartureRepository>(
    controller: BoardController<R>,
    config: &BoardConfig,
    fixtures: Option<FixtureReload>,
) {
    println!("Departure board for {}", controller.station_id());
    println!("Type a station id and press enter to switch; empty line refreshes.");

    let mut ticker = tokio::time::interval(config.refresh_interval);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                controller.refresh().await;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    let station_id = line.trim();
                    if station_id.is_empty() {
                        if let Some(fixtures) = &fixtures {
                            fixtures.reload().await;
                        }
                        controller.refresh().await;
                    } else {
                        controller.set_station(station_id).await;
                        ticker.reset();
                    }
                }
                Ok(None) => {
                    stdin_open = false;
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin, station switching disabled");
                    stdin_open = false;
                    continue;
                }
            },
        }

        print_board(&controller.station_id(), &controller.state(), TimeOfDay::now_local());
    }
}

fn print_board(station_id: &str, state: &BoardState, now: TimeOfDay) {
    println!();
    match state {
        BoardState::Loading { .. } => println!("== {station_id} @ {now} (updating)"),
        BoardState::Success { .. } => println!("== {station_id} @ {now}"),
        BoardState::Error { cause, .. } => println!("== {station_id} @ {now} (error: {cause})"),
    }

    let Some(snapshot) = state.value() else {
        println!("   no departures loaded yet");
        return;
    };

    if snapshot.is_empty() {
        println!("   no departures");
        return;
    }

    for row in board_rows(snapshot, now) {
        println!(
            "{:<10} {:<16} {:<24} {}  {:>4} min",
            row.rank_label(),
            row.label,
            row.departure.destination().display_name(),
            row.departure.depart_at(),
            row.minutes_until,
        );

        for chain in &row.chains {
            let mut line = String::from("           ");
            for step in chain {
                if let Some(transfer) = step.transfer {
                    line.push_str(&format!(
                        " -- {} +{}min -- ",
                        transfer.station.name(),
                        transfer.minutes_from_chain_start
                    ));
                }
                line.push_str(&format!("[{} → {}]", step.label, step.leg.to_station().name()));
            }
            println!("{line}");
        }
    }
}
