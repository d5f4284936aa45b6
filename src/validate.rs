//! Validation of game records arriving from outside the log.
//!
//! Shared games arrive as raw text (usually pasted from the clipboard).
//! [`validate_game_record`] only checks structure; [`admit_game_record`]
//! adds the semantic checks a record must pass before it is appended.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::models::{GameRecord, InvariantError};

/// Structural rejection of a candidate record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid game record shape: {0}")]
    InvalidShape(String),
}

/// Rejection at the log boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdmissionError {
    #[error(transparent)]
    Shape(#[from] ValidationError),

    #[error(transparent)]
    Invariants(#[from] InvariantError),
}

/// Parse text into a [`GameRecord`], checking field presence, types and
/// the `[name, [rounds...]]` tuple shape.
///
/// Text that is not JSON at all is checked as an empty object, so every
/// failure comes back as the same shape error.
pub fn validate_game_record(input: &str) -> Result<GameRecord, ValidationError> {
    let value = serde_json::from_str::<Value>(input).unwrap_or_else(|e| {
        debug!("Candidate record is not JSON ({}), checking as empty object", e);
        Value::Object(Map::new())
    });

    serde_json::from_value(value).map_err(|e| ValidationError::InvalidShape(e.to_string()))
}

/// Split import text into one candidate per JSON document.
///
/// Handles a single (possibly pretty-printed) record as well as one record
/// per line. Text that does not tokenize as JSON comes back whole so the
/// Validator can report on it.
pub fn candidate_documents(input: &str) -> Vec<String> {
    let documents: Result<Vec<Value>, _> = serde_json::Deserializer::from_str(input)
        .into_iter::<Value>()
        .collect();

    match documents {
        Ok(values) if !values.is_empty() => values.iter().map(Value::to_string).collect(),
        _ => vec![input.to_string()],
    }
}

/// Structural validation followed by the record invariants.
pub fn admit_game_record(input: &str) -> Result<GameRecord, AdmissionError> {
    let record = validate_game_record(input)?;
    record.check_invariants()?;
    Ok(record)
}
