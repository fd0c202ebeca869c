//! Async room service: the operation surface exposed to callers.
//!
//! Every operation runs as one transaction against the backing
//! [`RoomStore`]: snapshot the room and all players, compute the full
//! transition in memory with the pure logic in [`crate::game`], and commit
//! the replacement values atomically. Write conflicts are retried against a
//! fresh snapshot, bounded by [`MAX_TXN_RETRIES`]; validation failures abort
//! with zero writes.

use std::sync::Arc;

use crate::game::actions::{self, Action, SideShowResolution, Transition};
use crate::game::entities::{PlayerId, Players, Room, RoomCode};
use crate::game::errors::{GameError, GameResult};
use crate::game::round;
use crate::predict::{PredictError, WinnerPrediction, WinnerPredictor};
use crate::store::{RoomStore, RoomWrite, StoreError};

/// Upper bound on transparent write-conflict retries per operation.
pub const MAX_TXN_RETRIES: u32 = 5;

/// Uniform success shape returned by every operation.
#[derive(Clone, Debug)]
pub struct ActionOutcome {
    pub message: String,
}

/// The operation surface over a room store. One instance serves any number
/// of rooms and concurrent callers.
pub struct RoomService<S> {
    store: Arc<S>,
    predictor: Option<Arc<dyn WinnerPredictor>>,
}

impl<S: RoomStore> RoomService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            predictor: None,
        }
    }

    /// Attach an optional winner-prediction backend.
    #[must_use]
    pub fn with_predictor(mut self, predictor: Arc<dyn WinnerPredictor>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    /// Perform one betting action as the room's current-turn player.
    ///
    /// An external turn timer calls this with [`Action::Pack`] on behalf of
    /// an unresponsive player; there is no separate timeout path.
    pub async fn perform_action(
        &self,
        code: &RoomCode,
        player_id: &PlayerId,
        action: Action,
    ) -> GameResult<ActionOutcome> {
        log::debug!("room {code}: {player_id} attempts {action}");
        self.transact(code, |room, players| {
            actions::apply_action(room, players, player_id, action)
        })
        .await
    }

    /// Start a round (host only).
    pub async fn start_round(
        &self,
        code: &RoomCode,
        host_id: &PlayerId,
    ) -> GameResult<ActionOutcome> {
        self.transact(code, |room, players| {
            round::start_round(room, players, host_id)
        })
        .await
    }

    /// Settle a round awaiting winner declaration (host only).
    pub async fn declare_winner(
        &self,
        code: &RoomCode,
        host_id: &PlayerId,
        winner_id: &PlayerId,
    ) -> GameResult<ActionOutcome> {
        self.transact(code, |room, players| {
            round::declare_winner(room, players, host_id, winner_id)
        })
        .await
    }

    /// Resolve a pending side show (target player or host).
    pub async fn resolve_side_show(
        &self,
        code: &RoomCode,
        responder_id: &PlayerId,
        resolution: SideShowResolution,
    ) -> GameResult<ActionOutcome> {
        self.transact(code, |room, players| {
            actions::resolve_side_show(room, players, responder_id, resolution)
        })
        .await
    }

    /// Voluntarily switch a blind player to seen, even out of turn.
    pub async fn switch_to_seen(
        &self,
        code: &RoomCode,
        player_id: &PlayerId,
    ) -> GameResult<ActionOutcome> {
        self.transact(code, |room, players| {
            actions::switch_to_seen(room, players, player_id)
        })
        .await
    }

    /// Best-effort winner prediction from the configured backend. Read-only;
    /// never affects game state.
    pub async fn predict_winner(&self, code: &RoomCode) -> Result<WinnerPrediction, PredictError> {
        let predictor = self
            .predictor
            .as_ref()
            .ok_or(PredictError::NotConfigured)?;
        let snapshot = self
            .store
            .snapshot(code)
            .await
            .map_err(|err| PredictError::Unavailable(err.to_string()))?;
        predictor
            .predict(&snapshot.room.game_log, &snapshot.players)
            .await
    }

    async fn transact<F>(&self, code: &RoomCode, op: F) -> GameResult<ActionOutcome>
    where
        F: Fn(&Room, &Players) -> GameResult<Transition>,
    {
        for attempt in 1..=MAX_TXN_RETRIES {
            let snapshot = self.store.snapshot(code).await.map_err(map_not_found)?;
            let transition = op(&snapshot.room, &snapshot.players)?;
            let write = RoomWrite {
                room: transition.room,
                players: transition.players,
            };
            match self.store.commit(code, snapshot.version, write).await {
                Ok(()) => {
                    return Ok(ActionOutcome {
                        message: transition.message,
                    });
                }
                Err(StoreError::Conflict) => {
                    log::warn!("room {code}: write conflict, retrying ({attempt}/{MAX_TXN_RETRIES})");
                }
                Err(err) => return Err(map_not_found(err)),
            }
        }
        Err(GameError::Store(StoreError::RetriesExhausted))
    }
}

fn map_not_found(err: StoreError) -> GameError {
    match err {
        StoreError::RoomNotFound => GameError::RoomNotFound,
        other => GameError::Store(other),
    }
}
