use axum::Json;
use serde::Serialize;
use tracing::debug;

use crate::api::ApiError;
use crate::models::{GameId, GameRecord};
use crate::validate::validate_game_record;

#[derive(Debug, Serialize)]
pub struct ValidatedGame {
    pub id: GameId,
    pub record: GameRecord,
    /// Semantic problems that would keep the record out of the log
    pub violations: Vec<String>,
}

/// Check pasted game text without storing it.
///
/// Shape failures are a 400. A well-formed record comes back parsed,
/// together with any invariant violations.
pub async fn validate_game(body: String) -> Result<Json<ValidatedGame>, ApiError> {
    let record = validate_game_record(&body)?;
    let violations = match record.check_invariants() {
        Ok(()) => Vec::new(),
        Err(e) => e.0,
    };
    debug!(
        "Validated game won by {} with {} violation(s)",
        record.winner,
        violations.len()
    );

    Ok(Json(ValidatedGame {
        id: record.id(),
        record,
        violations,
    }))
}
