use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};
use uuid::Uuid;

/// Type alias for whole chips. All bets, pots, and player balances are
/// represented as whole chips.
///
/// If the total chips in a room ever surpasses ~4.2 billion, then we may
/// have a problem.
pub type Chips = u32;

/// Number of consecutive blind bets after which a player is forced seen.
pub const MAX_BLIND_TURNS: u32 = 4;

const ROOM_CODE_LEN: usize = 6;
const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Short, human-shareable room identifier.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct RoomCode(String);

impl RoomCode {
    pub fn new(s: &str) -> Self {
        Self(s.trim().to_ascii_uppercase())
    }

    /// Generate a fresh room code. The alphabet omits easily-confused
    /// characters (0/O, 1/I/L).
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let code = (0..ROOM_CODE_LEN)
            .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for RoomCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<&str> for RoomCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Stable player identity, unique within a room. Re-joins reuse the same
/// identity, so a `PlayerId` is valid for the room's whole lifetime.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    /// Generate a fresh random identity.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Room lifecycle states. Governs which operations are legal.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Between rounds; players ready up here.
    Lobby,
    /// A betting round is in progress.
    InGame,
    /// A showdown or pot limit was reached; the host must declare a winner.
    AwaitingWinner,
    /// The configured number of rounds has been played.
    RoundEnd,
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Lobby => "lobby",
            Self::InGame => "in_game",
            Self::AwaitingWinner => "awaiting_winner_declaration",
            Self::RoundEnd => "round_end",
        };
        write!(f, "{repr}")
    }
}

/// Per-player states within a room.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// In the room but not signed up for the next round.
    Waiting,
    /// Signed up for the next round.
    Ready,
    /// Contesting the current round's pot.
    Playing,
    /// Folded out of the current round.
    Packed,
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Waiting => "waiting",
            Self::Ready => "ready",
            Self::Playing => "playing",
            Self::Packed => "packed",
        };
        write!(f, "{repr}")
    }
}

pub const DEFAULT_STARTING_CHIPS: Chips = 1000;
pub const DEFAULT_BOOT_AMOUNT: Chips = 10;

/// Room configuration, immutable while a round is in progress.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RoomSettings {
    /// Chips each player starts with.
    pub starting_chips: Chips,
    /// The fixed ante every participating player contributes at round start.
    /// Also the minimum unit bet.
    pub boot_amount: Chips,
    /// Pot cap; 0 means unlimited.
    pub max_pot_limit: Chips,
    /// Number of rounds before the game ends; `None` means unlimited.
    pub num_rounds: Option<u32>,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            starting_chips: DEFAULT_STARTING_CHIPS,
            boot_amount: DEFAULT_BOOT_AMOUNT,
            max_pot_limit: 0,
            num_rounds: None,
        }
    }
}

impl RoomSettings {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.boot_amount == 0 {
            return Err("Boot amount must be greater than zero".to_string());
        }
        if self.boot_amount > self.starting_chips {
            return Err("Boot amount cannot exceed starting chips".to_string());
        }
        if self.max_pot_limit > 0 && self.max_pot_limit < self.boot_amount * 2 {
            return Err("Pot limit too small for even one seen bet".to_string());
        }
        if self.num_rounds == Some(0) {
            return Err("Number of rounds must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Kinds of entries in a room's game log. Some kinds are only ever written
/// by the room-management layer outside this crate; they are listed so every
/// persisted entry deserializes.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameLogKind {
    GameStart,
    Action,
    StatusChange,
    Event,
    RoundEnd,
    RoundEndByPack,
    WinnerDeclared,
    GameOver,
    Error,
    PlayerStatusChange,
    PlayerKicked,
    SettingsChange,
    ChipsChange,
}

/// One immutable entry in a room's append-only game log. Append order is
/// the canonical event order; entries are never reordered or mutated.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameLogEntry {
    #[serde(rename = "type")]
    pub kind: GameLogKind,
    pub message: String,
    pub player_id: Option<PlayerId>,
    pub timestamp: DateTime<Utc>,
}

impl GameLogEntry {
    pub fn new(kind: GameLogKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            player_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn for_player(kind: GameLogKind, message: impl Into<String>, player_id: PlayerId) -> Self {
        Self {
            kind,
            message: message.into(),
            player_id: Some(player_id),
            timestamp: Utc::now(),
        }
    }
}

/// A pending side-show: `requester` paid to privately compare hands with
/// `target`. Turn advancement is paused until it is resolved.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SideShowRequest {
    pub requester: PlayerId,
    pub target: PlayerId,
}

/// The shared room document.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Room {
    pub code: RoomCode,
    pub host_id: PlayerId,
    pub status: RoomStatus,
    /// Chips accumulated this round. Owned exclusively by the active round;
    /// zeroed at round start and at settlement.
    pub current_pot: Chips,
    /// The blind-equivalent last bet: the amount a still-blind player must
    /// match. A seen player's bet is stored here halved, since seen bets are
    /// double the blind bet.
    pub last_bet: Chips,
    /// Count of rounds started. Monotonically non-decreasing.
    pub round_count: u32,
    /// Whose action is currently legal, if any.
    pub current_turn: Option<PlayerId>,
    pub settings: RoomSettings,
    /// Explicit turn rotation, persisted at round start. Store enumeration
    /// order is never consulted.
    pub player_order: Vec<PlayerId>,
    pub side_show: Option<SideShowRequest>,
    pub game_log: Vec<GameLogEntry>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn new(code: RoomCode, host_id: PlayerId, settings: RoomSettings) -> Self {
        Self {
            code,
            host_id,
            status: RoomStatus::Lobby,
            current_pot: 0,
            last_bet: 0,
            round_count: 0,
            current_turn: None,
            settings,
            player_order: Vec::new(),
            side_show: None,
            game_log: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append an entry to the game log.
    pub fn log(&mut self, entry: GameLogEntry) {
        self.game_log.push(entry);
    }
}

/// A player's document within a room.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,
    pub avatar: String,
    pub chips: Chips,
    pub is_host: bool,
    pub status: PlayerStatus,
    /// True while betting blind; blind bets cost half a seen bet.
    pub is_blind: bool,
    /// Consecutive blind bets made this round.
    pub blind_turns: u32,
    /// Advisory liveness timestamp.
    pub last_seen: DateTime<Utc>,
}

impl Player {
    /// A freshly joined player, waiting in the lobby.
    pub fn new(id: PlayerId, nickname: &str, avatar: &str, chips: Chips) -> Self {
        Self {
            id,
            nickname: nickname.to_string(),
            avatar: avatar.to_string(),
            chips,
            is_host: false,
            status: PlayerStatus::Waiting,
            is_blind: true,
            blind_turns: 0,
            last_seen: Utc::now(),
        }
    }

    /// The room's host. Hosts start ready.
    pub fn host(id: PlayerId, nickname: &str, avatar: &str, chips: Chips) -> Self {
        Self {
            is_host: true,
            status: PlayerStatus::Ready,
            ..Self::new(id, nickname, avatar, chips)
        }
    }

    /// Reset to the between-rounds baseline after a settlement.
    pub fn reset_for_next_round(&mut self) {
        self.status = PlayerStatus::Waiting;
        self.is_blind = true;
        self.blind_turns = 0;
    }
}

/// All player documents in a room, keyed by identity.
pub type Players = BTreeMap<PlayerId, Player>;
