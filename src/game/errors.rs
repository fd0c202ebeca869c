//! Error taxonomy for room and betting operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::Chips;
use crate::store::StoreError;

/// Errors that can occur while validating or applying a room operation.
///
/// Every variant aborts the enclosing transaction with zero writes; the
/// `#[error]` messages double as the human-readable failure strings shown
/// to callers.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("room does not exist")]
    RoomNotFound,
    #[error("player does not exist")]
    PlayerNotFound,
    #[error("game is not active")]
    GameNotActive,
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("it's not your turn")]
    NotYourTurn,
    #[error("you have already packed")]
    AlreadyPacked,
    #[error("not among the active players")]
    NotAmongActive,
    #[error("you are seen; can't bet blind")]
    AlreadySeen,
    #[error("you are blind; switch to seen first")]
    StillBlind,
    #[error("need {required} chips")]
    InsufficientChips { required: Chips },
    #[error("raise must exceed {minimum}")]
    RaiseTooSmall { minimum: Chips },
    #[error("pot has reached its limit")]
    PotLimitExceeded,
    #[error("no eligible player for a side show")]
    NoSideShowTarget,
    #[error("a side show is awaiting resolution")]
    SideShowPending,
    #[error("no side show to resolve")]
    NoPendingSideShow,
    #[error("only the side show target or the host can resolve it")]
    NotSideShowResponder,
    #[error("showdown only when 2 players remain")]
    ShowRequiresTwoPlayers,
    #[error("only the host can do that")]
    NotHost,
    #[error("need 2+ ready players")]
    NotEnoughReadyPlayers,
    #[error("no winner declaration pending")]
    NotAwaitingWinner,
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for room and betting operations.
pub type GameResult<T> = Result<T, GameError>;
