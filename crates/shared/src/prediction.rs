//! Prediction payloads and their boundary decoding.
//!
//! The prediction endpoints are loosely typed on the wire: a value can be a
//! bare number, a full object, an `{"error": ...}` object, or a warm-up
//! sentinel while the service is still building its model. Everything here
//! turns those shapes into explicit enums right after transport so callers
//! never inspect raw JSON again.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::models::{de_opt_flex_id, PlayerId, TeamId};

/// A reply from an endpoint that may still be warming up.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceReply<T> {
    Ready(T),
    WarmingUp,
}

impl<T> ServiceReply<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ServiceReply<U> {
        match self {
            ServiceReply::Ready(value) => ServiceReply::Ready(f(value)),
            ServiceReply::WarmingUp => ServiceReply::WarmingUp,
        }
    }

    pub fn ready(self) -> Option<T> {
        match self {
            ServiceReply::Ready(value) => Some(value),
            ServiceReply::WarmingUp => None,
        }
    }
}

/// Per-item prediction result.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum PredictionOutcome<T> {
    Ok(T),
    SoftError(String),
}

impl<T> PredictionOutcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            PredictionOutcome::Ok(value) => Some(value),
            PredictionOutcome::SoftError(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PredictionOutcome::Ok(_) => None,
            PredictionOutcome::SoftError(message) => Some(message),
        }
    }
}

/// Win probability for one team in one of today's games.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamPrediction {
    pub win_probability: f64,
    #[serde(default)]
    pub predicted_team_points: Option<f64>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub is_home: Option<bool>,
}

/// Predicted points for one player, with the context the model reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerPointsPrediction {
    #[serde(default, deserialize_with = "de_opt_flex_id")]
    pub player_id: Option<PlayerId>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    pub predicted_points: f64,
    #[serde(default)]
    pub recent_avg: Option<f64>,
    #[serde(default)]
    pub season_avg: Option<f64>,
    #[serde(default)]
    pub games_played: Option<u32>,
    #[serde(default)]
    pub last_5_games: Vec<f64>,
}

impl PlayerPointsPrediction {
    pub fn points_only(predicted_points: f64) -> Self {
        Self {
            player_id: None,
            player_name: None,
            team_id: None,
            predicted_points,
            recent_avg: None,
            season_avg: None,
            games_played: None,
            last_5_games: Vec::new(),
        }
    }
}

pub type BatchPredictions = BTreeMap<PlayerId, PredictionOutcome<PlayerPointsPrediction>>;

/// Whether a body is the service's "model still computing" sentinel.
pub fn is_warmup_sentinel(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    if obj.get("warming_up").and_then(Value::as_bool) == Some(true) {
        return true;
    }
    obj.get("status")
        .and_then(Value::as_str)
        .map(|s| s.eq_ignore_ascii_case("warming_up") || s.eq_ignore_ascii_case("warming"))
        .unwrap_or(false)
}

fn soft_error(value: &Value) -> Option<String> {
    value
        .as_object()?
        .get("error")
        .map(|e| match e {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

/// Decode a body from `/api/nba/predictions/today/`.
pub fn decode_team_prediction(value: Value) -> Result<ServiceReply<TeamPrediction>, ApiError> {
    if is_warmup_sentinel(&value) {
        return Ok(ServiceReply::WarmingUp);
    }
    if let Some(message) = soft_error(&value) {
        return Err(ApiError::SoftPrediction(message));
    }
    Ok(ServiceReply::Ready(serde_json::from_value(value)?))
}

/// Decode a body from `/api/nba/predictions/player/today/`.
pub fn decode_player_prediction(
    value: Value,
) -> Result<ServiceReply<PlayerPointsPrediction>, ApiError> {
    if is_warmup_sentinel(&value) {
        return Ok(ServiceReply::WarmingUp);
    }
    match decode_player_outcome(value)? {
        PredictionOutcome::Ok(prediction) => Ok(ServiceReply::Ready(prediction)),
        PredictionOutcome::SoftError(message) => Err(ApiError::SoftPrediction(message)),
    }
}

/// A single batch entry: a bare number, a full prediction, or `{"error": ...}`.
fn decode_player_outcome(value: Value) -> Result<PredictionOutcome<PlayerPointsPrediction>, ApiError> {
    if let Some(message) = soft_error(&value) {
        return Ok(PredictionOutcome::SoftError(message));
    }
    if let Some(points) = value.as_f64() {
        return Ok(PredictionOutcome::Ok(PlayerPointsPrediction::points_only(points)));
    }
    Ok(PredictionOutcome::Ok(serde_json::from_value(value)?))
}

#[derive(Deserialize)]
struct BatchBody {
    #[serde(default)]
    predictions: BTreeMap<String, Value>,
}

/// Decode a body from `/api/nba/predictions/players/batch/`.
pub fn decode_batch_predictions(value: Value) -> Result<ServiceReply<BatchPredictions>, ApiError> {
    if is_warmup_sentinel(&value) {
        return Ok(ServiceReply::WarmingUp);
    }
    if let Some(message) = soft_error(&value) {
        return Err(ApiError::SoftPrediction(message));
    }
    let body: BatchBody = serde_json::from_value(value)?;
    let mut out = BatchPredictions::new();
    for (key, entry) in body.predictions {
        let player_id: PlayerId = key
            .trim()
            .parse()
            .map_err(|_| ApiError::Deserialize(format!("invalid player id key {key:?}")))?;
        // Undecodable entries stay per player.
        let outcome = decode_player_outcome(entry)
            .unwrap_or_else(|e| PredictionOutcome::SoftError(e.to_string()));
        out.insert(player_id, outcome);
    }
    Ok(ServiceReply::Ready(out))
}

/// Decode a `/health` body into a liveness flag.
pub fn decode_health(value: &Value) -> bool {
    match value {
        Value::Bool(alive) => *alive,
        Value::Object(obj) => {
            if let Some(ok) = obj.get("ok").or_else(|| obj.get("healthy")).and_then(Value::as_bool) {
                return ok;
            }
            obj.get("status")
                .and_then(Value::as_str)
                .map(|s| s.eq_ignore_ascii_case("ok") || s.eq_ignore_ascii_case("healthy"))
                .unwrap_or(false)
        }
        _ => false,
    }
}
