use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crowns_ledger::api::state::AppState;
use crowns_ledger::calculate::{self, StatsContext, StatsSnapshot};
use crowns_ledger::config::AppConfig;
use crowns_ledger::models::{
    GameId, GameRecord, GeneralFacts, LowestScore, MonthCount, PlayerCountDuration,
};
use crowns_ledger::storage::{GameLog, StorageConfig};
use crowns_ledger::validate::{admit_game_record, candidate_documents, validate_game_record};

#[derive(Parser)]
#[command(name = "crowns-ledger")]
#[command(about = "Five Crowns score log and statistics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print every statistic for the log
    Stats,

    /// List known players
    Players,

    /// Print one leaderboard
    Leaderboard {
        #[arg(long, value_enum, default_value_t = Board::Wins)]
        board: Board,
    },

    /// Print summary facts
    Facts,

    /// Print game history, newest first
    History {
        /// Only show this many games
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the cumulative games-played series
    Trend,

    /// Print the final-score distribution
    Histogram,

    /// Check a game record without storing it
    Validate {
        /// File to read (stdin when absent)
        file: Option<PathBuf>,
    },

    /// Add game records to the log
    Import {
        /// File to read (stdin when absent)
        file: Option<PathBuf>,

        /// Check records but don't store them
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Board {
    Wins,
    GoOuts,
    HighHands,
    AvgScore,
}

#[derive(Serialize)]
struct FactsOutput {
    general: GeneralFacts,
    durations_by_player_count: Vec<PlayerCountDuration>,
    lowest_score: Option<LowestScore>,
    games_by_month: Vec<MonthCount>,
}

#[derive(Serialize)]
struct ValidateOutput {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<GameId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<GameRecord>,
    violations: Vec<String>,
}

#[derive(Serialize)]
struct Rejection {
    index: usize,
    error: String,
}

#[derive(Serialize)]
struct ImportOutput {
    candidates: usize,
    accepted: usize,
    rejected: Vec<Rejection>,
    written: usize,
    dry_run: bool,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone();
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let (plain, json) = if cli.json_logs {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr);
        (None, Some(layer))
    } else {
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();

    tracing::info!("Starting crowns-ledger v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());
    let log = GameLog::open(&storage);
    let offset = config.stats.offset();

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let state = AppState {
                storage: Arc::new(storage),
                offset,
                cors_origin: config.server.cors_origin.clone(),
            };
            let app = crowns_ledger::api::build_router(state);
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            tracing::info!("Serving stats on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Stats => {
            let games = log.load()?;
            print_json(&StatsSnapshot::compute(&games, &StatsContext::at_offset(offset)))?;
        }
        Commands::Players => {
            print_json(&calculate::derive_players(&log.load()?))?;
        }
        Commands::Leaderboard { board } => {
            let games = log.load()?;
            match board {
                Board::Wins => print_json(&calculate::win_loss_leaderboard(&games))?,
                Board::GoOuts => print_json(&calculate::go_outs_leaderboard(&games))?,
                Board::HighHands => print_json(&calculate::high_hand_leaderboard(&games))?,
                Board::AvgScore => print_json(&calculate::avg_score_leaderboard(&games))?,
            }
        }
        Commands::Facts => {
            let games = log.load()?;
            let ctx = StatsContext::at_offset(offset);
            print_json(&FactsOutput {
                general: calculate::general_facts(&games, &ctx),
                durations_by_player_count: calculate::durations_by_player_count(&games),
                lowest_score: calculate::lowest_winning_score(&games, &ctx),
                games_by_month: calculate::games_by_month(&games, &ctx),
            })?;
        }
        Commands::History { limit } => {
            let games = log.load()?;
            let mut history = calculate::game_history(&games, &StatsContext::at_offset(offset));
            if let Some(limit) = limit {
                history.truncate(limit);
            }
            print_json(&history)?;
        }
        Commands::Trend => {
            let games = log.load()?;
            print_json(&calculate::games_played_trend(
                &games,
                &StatsContext::at_offset(offset),
            ))?;
        }
        Commands::Histogram => {
            print_json(&calculate::score_histogram(&log.load()?))?;
        }
        Commands::Validate { file } => {
            let text = read_input(file.as_deref())?;
            let output = match validate_game_record(&text) {
                Ok(record) => ValidateOutput {
                    valid: true,
                    id: Some(record.id()),
                    violations: record
                        .check_invariants()
                        .err()
                        .map(|e| e.0)
                        .unwrap_or_default(),
                    record: Some(record),
                },
                Err(e) => ValidateOutput {
                    valid: false,
                    id: None,
                    record: None,
                    violations: vec![e.to_string()],
                },
            };
            print_json(&output)?;
            if !output.valid || !output.violations.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Import { file, dry_run } => {
            let text = read_input(file.as_deref())?;
            let candidates = candidate_documents(&text);

            let mut accepted = Vec::new();
            let mut rejected = Vec::new();
            for (index, candidate) in candidates.iter().enumerate() {
                match admit_game_record(candidate) {
                    Ok(record) => accepted.push(record),
                    Err(e) => {
                        tracing::warn!("Rejected record {}: {}", index + 1, e);
                        rejected.push(Rejection {
                            index: index + 1,
                            error: e.to_string(),
                        });
                    }
                }
            }

            let written = if dry_run {
                tracing::info!("Dry run, {} records not stored", accepted.len());
                0
            } else {
                log.append_new(&accepted)?
            };

            print_json(&ImportOutput {
                candidates: candidates.len(),
                accepted: accepted.len(),
                rejected,
                written,
                dry_run,
            })?;
        }
    }

    Ok(())
}
