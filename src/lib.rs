//! # ChipStack
//!
//! A turn-based betting engine for multiplayer card-game rooms, in the Teen
//! Patti family: players join a shared room, bet blind or seen, raise, pack,
//! request side shows, and call showdowns, with a pot settled to a winner at
//! round end. Card dealing and hand evaluation are deliberately absent;
//! showdowns are adjudicated by the host.
//!
//! The engine is built around two ideas:
//!
//! - **Pure transitions**: every operation is computed as a whole-value
//!   transition over the room document and its player documents
//!   ([`game::actions`], [`game::round`]), with no shared mutable state.
//! - **Optimistic transactions**: [`service::RoomService`] snapshots the
//!   room from a [`store::RoomStore`], applies the pure transition, and
//!   commits with compare-and-swap, retrying on conflict. Many concurrent
//!   clients can safely drive the same room.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use chipstack::{
//!     Action, MemoryRoomStore, Player, PlayerId, Room, RoomCode, RoomService, RoomSettings,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), chipstack::GameError> {
//! let store = Arc::new(MemoryRoomStore::new());
//! let code = RoomCode::generate();
//! let host = PlayerId::new("host");
//! let settings = RoomSettings::default();
//! store
//!     .create_room(
//!         Room::new(code.clone(), host.clone(), settings.clone()),
//!         Player::host(host.clone(), "dealer", "🤖", settings.starting_chips),
//!     )
//!     .map_err(chipstack::GameError::from)?;
//! let guest = PlayerId::new("guest");
//! let mut player = Player::new(guest.clone(), "guest", "🦊", settings.starting_chips);
//! player.status = chipstack::PlayerStatus::Ready;
//! store.join_room(&code, player).map_err(chipstack::GameError::from)?;
//!
//! let service = RoomService::new(store);
//! service.start_round(&code, &host).await?;
//! service.perform_action(&code, &host, Action::BlindBet).await?;
//! # Ok(())
//! # }
//! ```

/// Core game logic, entities, and the action state machine.
pub mod game;
pub use game::{
    Action, GameError, GameResult, SideShowResolution,
    entities::{
        Chips, GameLogEntry, GameLogKind, Player, PlayerId, PlayerStatus, Players, Room, RoomCode,
        RoomSettings, RoomStatus, SideShowRequest,
    },
};

/// Transactional room storage.
pub mod store;
pub use store::{MemoryRoomStore, RoomStore, StoreError};

/// The async operation surface over a store.
pub mod service;
pub use service::{ActionOutcome, MAX_TXN_RETRIES, RoomService};

/// Optional winner-prediction advisory.
pub mod predict;
pub use predict::{PredictError, WinnerPrediction, WinnerPredictor};
