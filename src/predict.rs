//! Optional winner-prediction advisory.
//!
//! A predictor is a read-only, best-effort collaborator: it looks at the
//! game log and the players and guesses who will win. Its output never gates
//! settlement and its failures never touch game state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::entities::{GameLogEntry, PlayerId, Players};

/// Errors from a prediction backend.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum PredictError {
    #[error("no predictor configured")]
    NotConfigured,
    #[error("prediction unavailable: {0}")]
    Unavailable(String),
}

/// A best-effort winner guess.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct WinnerPrediction {
    pub predicted_winner: PlayerId,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    pub reasoning: String,
}

/// A prediction backend, e.g. a remote model endpoint.
#[async_trait]
pub trait WinnerPredictor: Send + Sync {
    async fn predict(
        &self,
        game_log: &[GameLogEntry],
        players: &Players,
    ) -> Result<WinnerPrediction, PredictError>;
}
