use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{load_games, ApiError, Pagination, PaginationMeta};
use crate::calculate::{self, StatsSnapshot, BIN_WIDTH};
use crate::models::{
    AvgScoreEntry, GameRecord, GamesTrend, GeneralFacts, GoOutsEntry, HighHandEntry, HistogramBin,
    HistoryEntry, LeaderboardEntry, LowestScore, MonthCount, PlayerCountDuration,
};
use crate::storage::GameLog;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Records that parse, the same count every stats endpoint sees
    pub games: usize,
    /// Non-blank lines in the log, unreadable ones included
    pub log_lines: usize,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let games = load_games(&state)?.len();
    let log_lines = GameLog::open(&state.storage).count()?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        games,
        log_lines,
    }))
}

#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub players: Vec<String>,
}

pub async fn players(State(state): State<AppState>) -> Result<Json<PlayersResponse>, ApiError> {
    let games = load_games(&state)?;
    Ok(Json(PlayersResponse {
        players: calculate::derive_players(&games),
    }))
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse<T> {
    pub entries: Vec<T>,
    pub total_games: usize,
}

fn leaderboard<T>(
    state: &AppState,
    build: fn(&[GameRecord]) -> Vec<T>,
) -> Result<Json<LeaderboardResponse<T>>, ApiError> {
    let games = load_games(state)?;
    Ok(Json(LeaderboardResponse {
        entries: build(&games),
        total_games: games.len(),
    }))
}

pub async fn wins_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse<LeaderboardEntry>>, ApiError> {
    leaderboard(&state, calculate::win_loss_leaderboard)
}

pub async fn go_outs_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse<GoOutsEntry>>, ApiError> {
    leaderboard(&state, calculate::go_outs_leaderboard)
}

pub async fn high_hands_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse<HighHandEntry>>, ApiError> {
    leaderboard(&state, calculate::high_hand_leaderboard)
}

pub async fn avg_score_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse<AvgScoreEntry>>, ApiError> {
    leaderboard(&state, calculate::avg_score_leaderboard)
}

#[derive(Debug, Serialize)]
pub struct FactsResponse {
    pub general: GeneralFacts,
    pub durations_by_player_count: Vec<PlayerCountDuration>,
    pub lowest_score: Option<LowestScore>,
    pub games_by_month: Vec<MonthCount>,
}

pub async fn facts(State(state): State<AppState>) -> Result<Json<FactsResponse>, ApiError> {
    let games = load_games(&state)?;
    let ctx = state.context();
    Ok(Json(FactsResponse {
        general: calculate::general_facts(&games, &ctx),
        durations_by_player_count: calculate::durations_by_player_count(&games),
        lowest_score: calculate::lowest_winning_score(&games, &ctx),
        games_by_month: calculate::games_by_month(&games, &ctx),
    }))
}

pub async fn trend_chart(State(state): State<AppState>) -> Result<Json<GamesTrend>, ApiError> {
    let games = load_games(&state)?;
    Ok(Json(calculate::games_played_trend(&games, &state.context())))
}

#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    pub bin_width: u64,
    pub bins: Vec<HistogramBin>,
}

pub async fn scores_chart(
    State(state): State<AppState>,
) -> Result<Json<ScoresResponse>, ApiError> {
    let games = load_games(&state)?;
    Ok(Json(ScoresResponse {
        bin_width: BIN_WIDTH,
        bins: calculate::score_histogram(&games),
    }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub games: Vec<HistoryEntry>,
    pub pagination: PaginationMeta,
}

pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let games = load_games(&state)?;
    let all = calculate::game_history(&games, &state.context());
    let pagination = Pagination::new(params.page, params.page_size);

    Ok(Json(HistoryResponse {
        games: pagination.apply(&all),
        pagination: PaginationMeta::new(&pagination, all.len() as u32),
    }))
}

pub async fn snapshot(State(state): State<AppState>) -> Result<Json<StatsSnapshot>, ApiError> {
    let games = load_games(&state)?;
    Ok(Json(StatsSnapshot::compute(&games, &state.context())))
}
