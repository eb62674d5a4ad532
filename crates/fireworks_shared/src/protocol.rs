//! Inbound score protocol.
//!
//! The embedding page posts a structured message whenever a quiz result is
//! known:
//!
//! ```text
//! { "type": "H5P_SCORE_RESULT", "score": 10, "maxScore": 10 }
//! ```
//!
//! Only messages with that `type` carry a score. Everything else (other
//! message types, missing or non-numeric fields, non-object payloads) is
//! rejected with a [`ProtocolError`] that hosts log and drop.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::constants::SCORE_MESSAGE_TYPE;

/// Errors produced while decoding an inbound message.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Payload is not valid JSON.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Payload is valid JSON but not an object.
    #[error("message is not an object")]
    NotAnObject,

    /// Message has a `type` other than the score result.
    #[error("unrelated message type: {0}")]
    UnrelatedType(String),

    /// A required field is absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A required field is present but not a number.
    #[error("field is not a number: {0}")]
    NotANumber(&'static str),
}

/// Result type for protocol decoding.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// A decoded score result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Points achieved.
    pub score: f64,
    /// Points available.
    #[serde(rename = "maxScore")]
    pub max_score: f64,
}

impl ScoreReport {
    /// Creates a report.
    #[must_use]
    pub const fn new(score: f64, max_score: f64) -> Self {
        Self { score, max_score }
    }

    /// Decodes an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is not a score result message.
    pub fn from_value(value: &Value) -> ProtocolResult<Self> {
        let object = value.as_object().ok_or(ProtocolError::NotAnObject)?;

        let kind = object
            .get("type")
            .ok_or(ProtocolError::MissingField("type"))?;
        if kind.as_str() != Some(SCORE_MESSAGE_TYPE) {
            return Err(ProtocolError::UnrelatedType(kind.to_string()));
        }

        let score = number_field(object, "score")?;
        let max_score = number_field(object, "maxScore")?;

        Ok(Self { score, max_score })
    }
}

/// Decodes a raw JSON message into a [`ScoreReport`].
///
/// # Errors
///
/// Returns an error for malformed JSON and for any message that is not a
/// complete `H5P_SCORE_RESULT`.
pub fn decode_score_message(raw: &str) -> ProtocolResult<ScoreReport> {
    let value: Value = serde_json::from_str(raw)?;
    ScoreReport::from_value(&value)
}

fn number_field(
    object: &serde_json::Map<String, Value>,
    name: &'static str,
) -> ProtocolResult<f64> {
    object
        .get(name)
        .ok_or(ProtocolError::MissingField(name))?
        .as_f64()
        .ok_or(ProtocolError::NotANumber(name))
}
