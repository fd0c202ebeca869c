//! The betting action state machine.
//!
//! [`apply_action`] computes one player action end-to-end as a pure value
//! transition: validation, bet computation, mutation, termination check, turn
//! advancement, and log append, in that order. It never touches shared state;
//! [`crate::service::RoomService`] wraps it in a store transaction so the
//! whole transition commits atomically or not at all.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entities::{
    Chips, GameLogEntry, GameLogKind, MAX_BLIND_TURNS, PlayerId, PlayerStatus, Players, Room,
    RoomStatus, SideShowRequest,
};
use super::errors::{GameError, GameResult};
use super::rules;
use super::turns;

/// A player action. `Raise` is the only action that carries an amount.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    BlindBet,
    Chaal,
    Raise { amount: Chips },
    Pack,
    SideShow,
    Show,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::BlindBet => "blind_bet",
            Self::Chaal => "chaal",
            Self::Raise { .. } => "raise",
            Self::Pack => "pack",
            Self::SideShow => "side_show",
            Self::Show => "show",
        };
        write!(f, "{repr}")
    }
}

/// How a pending side show was settled. Hand comparison happens off-device;
/// the responder reports its outcome.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SideShowResolution {
    /// The target refused the comparison; play resumes unchanged.
    Decline,
    /// The requester had the worse hand and packs.
    RequesterFolds,
    /// The target had the worse hand and packs.
    TargetFolds,
}

/// The full post-state of one operation: new room and player values that
/// replace the old documents wholesale, plus the caller-facing message.
#[derive(Clone, Debug)]
pub struct Transition {
    pub room: Room,
    pub players: Players,
    pub message: String,
}

/// Apply one action by the room's current-turn player.
///
/// Any error leaves the inputs untouched; on success the returned
/// [`Transition`] holds the complete new state.
pub fn apply_action(
    room: &Room,
    players: &Players,
    actor_id: &PlayerId,
    action: Action,
) -> GameResult<Transition> {
    if room.status != RoomStatus::InGame {
        return Err(GameError::GameNotActive);
    }
    if room.side_show.is_some() {
        return Err(GameError::SideShowPending);
    }
    if room.current_turn.as_ref() != Some(actor_id) {
        return Err(GameError::NotYourTurn);
    }
    let actor = players.get(actor_id).ok_or(GameError::PlayerNotFound)?;
    if actor.status == PlayerStatus::Packed {
        return Err(GameError::AlreadyPacked);
    }
    let active = turns::active_in_order(&room.player_order, players);
    // Pack is tolerated even for an actor missing from the active order, so
    // a stuck room can always be unblocked by folding.
    if !active.contains(actor_id) && action != Action::Pack {
        return Err(GameError::NotAmongActive);
    }

    let actor_is_blind = actor.is_blind;
    let actor_chips = actor.chips;
    let actor_nickname = actor.nickname.clone();
    let settings = room.settings.clone();

    let mut room = room.clone();
    let mut players = players.clone();

    let message = match action {
        Action::BlindBet => {
            if !actor_is_blind {
                return Err(GameError::AlreadySeen);
            }
            let bet = rules::apply_pot_limit(
                rules::blind_bet_amount(&settings, room.last_bet),
                room.current_pot,
                settings.max_pot_limit,
            )?;
            rules::check_affordable(actor_chips, bet)?;

            let actor = players.get_mut(actor_id).ok_or(GameError::PlayerNotFound)?;
            actor.chips -= bet;
            actor.blind_turns += 1;
            let forced_seen = actor.blind_turns >= MAX_BLIND_TURNS && actor.is_blind;
            if forced_seen {
                actor.is_blind = false;
            }
            room.current_pot += bet;
            room.last_bet = rules::next_last_bet(bet, true);

            let message = format!("{actor_nickname} bets {bet} (blind)");
            room.log(GameLogEntry::for_player(
                GameLogKind::Action,
                message.clone(),
                actor_id.clone(),
            ));
            if forced_seen {
                room.log(GameLogEntry::for_player(
                    GameLogKind::StatusChange,
                    format!("{actor_nickname} is now seen after {MAX_BLIND_TURNS} blind turns"),
                    actor_id.clone(),
                ));
            }
            message
        }
        Action::Chaal => {
            if actor_is_blind {
                return Err(GameError::StillBlind);
            }
            let bet = rules::apply_pot_limit(
                rules::chaal_amount(&settings, room.last_bet),
                room.current_pot,
                settings.max_pot_limit,
            )?;
            rules::check_affordable(actor_chips, bet)?;

            let actor = players.get_mut(actor_id).ok_or(GameError::PlayerNotFound)?;
            actor.chips -= bet;
            room.current_pot += bet;
            room.last_bet = rules::next_last_bet(bet, false);

            let message = format!("{actor_nickname} bets {bet} (chaal)");
            room.log(GameLogEntry::for_player(
                GameLogKind::Action,
                message.clone(),
                actor_id.clone(),
            ));
            message
        }
        Action::Raise { amount } => {
            let minimum = rules::minimum_raise(&settings, room.last_bet, actor_is_blind);
            if amount <= minimum {
                return Err(GameError::RaiseTooSmall { minimum });
            }
            let bet = rules::apply_pot_limit(amount, room.current_pot, settings.max_pot_limit)?;
            rules::check_affordable(actor_chips, bet)?;

            let actor = players.get_mut(actor_id).ok_or(GameError::PlayerNotFound)?;
            actor.chips -= bet;
            if actor_is_blind {
                actor.is_blind = false;
            }
            room.current_pot += bet;
            room.last_bet = rules::next_last_bet(bet, actor_is_blind);

            let message = if bet < amount {
                format!("{actor_nickname} raises with {bet} (capped by pot limit)")
            } else {
                format!("{actor_nickname} raises by betting {bet}")
            };
            room.log(GameLogEntry::for_player(
                GameLogKind::Action,
                message.clone(),
                actor_id.clone(),
            ));
            if actor_is_blind {
                room.log(GameLogEntry::for_player(
                    GameLogKind::StatusChange,
                    format!("{actor_nickname} is now seen after raising"),
                    actor_id.clone(),
                ));
            }
            message
        }
        Action::Pack => {
            let actor = players.get_mut(actor_id).ok_or(GameError::PlayerNotFound)?;
            actor.status = PlayerStatus::Packed;

            let message = format!("{actor_nickname} packed");
            room.log(GameLogEntry::for_player(
                GameLogKind::Action,
                message.clone(),
                actor_id.clone(),
            ));
            message
        }
        Action::SideShow => {
            if actor_is_blind {
                return Err(GameError::StillBlind);
            }
            let target_id = turns::side_show_target(&room.player_order, &players, actor_id)
                .ok_or(GameError::NoSideShowTarget)?;
            let bet = rules::apply_pot_limit(
                rules::side_show_or_show_amount(&settings, room.last_bet),
                room.current_pot,
                settings.max_pot_limit,
            )?;
            rules::check_affordable(actor_chips, bet)?;

            let target_nickname = players
                .get(&target_id)
                .map(|p| p.nickname.clone())
                .unwrap_or_default();
            let actor = players.get_mut(actor_id).ok_or(GameError::PlayerNotFound)?;
            actor.chips -= bet;
            room.current_pot += bet;
            room.side_show = Some(SideShowRequest {
                requester: actor_id.clone(),
                target: target_id.clone(),
            });
            room.current_turn = None;

            let message =
                format!("{actor_nickname} paid {bet} and requests a side show with {target_nickname}");
            room.log(GameLogEntry::for_player(
                GameLogKind::Action,
                message.clone(),
                actor_id.clone(),
            ));
            // Turn advancement pauses until the side show is resolved.
            return Ok(Transition {
                room,
                players,
                message,
            });
        }
        Action::Show => {
            if active.len() != 2 {
                return Err(GameError::ShowRequiresTwoPlayers);
            }
            let bet = rules::apply_pot_limit(
                rules::side_show_or_show_amount(&settings, room.last_bet),
                room.current_pot,
                settings.max_pot_limit,
            )?;
            rules::check_affordable(actor_chips, bet)?;

            let actor = players.get_mut(actor_id).ok_or(GameError::PlayerNotFound)?;
            actor.chips -= bet;
            if actor_is_blind {
                actor.is_blind = false;
            }
            room.current_pot += bet;
            room.status = RoomStatus::AwaitingWinner;
            room.current_turn = None;

            let message = format!("{actor_nickname} paid {bet} and calls for a showdown");
            room.log(GameLogEntry::for_player(
                GameLogKind::Action,
                message.clone(),
                actor_id.clone(),
            ));
            // Showdown bypasses the pot-limit and survivor checks entirely.
            return Ok(Transition {
                room,
                players,
                message,
            });
        }
    };

    if matches!(
        action,
        Action::BlindBet | Action::Chaal | Action::Raise { .. }
    ) && settings.max_pot_limit > 0
        && room.current_pot >= settings.max_pot_limit
    {
        room.status = RoomStatus::AwaitingWinner;
        room.current_turn = None;
        room.log(GameLogEntry::new(
            GameLogKind::Event,
            format!(
                "Pot limit of {} reached. Showdown!",
                settings.max_pot_limit
            ),
        ));
        return Ok(Transition {
            room,
            players,
            message,
        });
    }

    finish_or_advance(&mut room, &mut players, actor_id, action == Action::Pack);
    Ok(Transition {
        room,
        players,
        message,
    })
}

/// Resolve a pending side show. Only the target player or the host may
/// respond; afterwards the normal termination check and turn advancement run
/// from the requester's seat.
pub fn resolve_side_show(
    room: &Room,
    players: &Players,
    responder_id: &PlayerId,
    resolution: SideShowResolution,
) -> GameResult<Transition> {
    if room.status != RoomStatus::InGame {
        return Err(GameError::GameNotActive);
    }
    let pending = room.side_show.clone().ok_or(GameError::NoPendingSideShow)?;
    if *responder_id != pending.target && *responder_id != room.host_id {
        return Err(GameError::NotSideShowResponder);
    }
    let requester_nickname = players
        .get(&pending.requester)
        .ok_or(GameError::PlayerNotFound)?
        .nickname
        .clone();
    let target_nickname = players
        .get(&pending.target)
        .ok_or(GameError::PlayerNotFound)?
        .nickname
        .clone();

    let mut room = room.clone();
    let mut players = players.clone();
    room.side_show = None;

    let (folded, message) = match resolution {
        SideShowResolution::Decline => (
            None,
            format!("{target_nickname} declined the side show"),
        ),
        SideShowResolution::RequesterFolds => (
            Some(pending.requester.clone()),
            format!("{requester_nickname} lost the side show and packs"),
        ),
        SideShowResolution::TargetFolds => (
            Some(pending.target.clone()),
            format!("{target_nickname} lost the side show and packs"),
        ),
    };
    if let Some(loser_id) = &folded
        && let Some(loser) = players.get_mut(loser_id)
    {
        loser.status = PlayerStatus::Packed;
    }
    room.log(GameLogEntry::for_player(
        GameLogKind::Event,
        message.clone(),
        pending.target.clone(),
    ));

    finish_or_advance(&mut room, &mut players, &pending.requester, folded.is_some());
    Ok(Transition {
        room,
        players,
        message,
    })
}

/// A blind player may voluntarily become seen at any point of a round, even
/// out of turn. Seen players cannot revert.
pub fn switch_to_seen(
    room: &Room,
    players: &Players,
    player_id: &PlayerId,
) -> GameResult<Transition> {
    if room.status != RoomStatus::InGame {
        return Err(GameError::GameNotActive);
    }
    let player = players.get(player_id).ok_or(GameError::PlayerNotFound)?;
    if !player.is_blind {
        return Err(GameError::AlreadySeen);
    }
    let nickname = player.nickname.clone();

    let mut room = room.clone();
    let mut players = players.clone();
    if let Some(player) = players.get_mut(player_id) {
        player.is_blind = false;
        player.blind_turns = 0;
    }
    let message = format!("{nickname} switched to seen");
    room.log(GameLogEntry::for_player(
        GameLogKind::StatusChange,
        message.clone(),
        player_id.clone(),
    ));
    Ok(Transition {
        room,
        players,
        message,
    })
}

/// Post-action control flow shared by actions and side-show resolution:
/// settle a single survivor, degrade defensively on contradictions, or hand
/// the turn to the next active player after `after`.
pub(super) fn finish_or_advance(
    room: &mut Room,
    players: &mut Players,
    after: &PlayerId,
    by_pack: bool,
) {
    if let Some(winner_id) = turns::sole_survivor(players) {
        settle_sole_survivor(room, players, &winner_id, by_pack);
        return;
    }
    if turns::survivor_count(players) == 0 {
        degrade_to_lobby(room, "no active players remain");
        return;
    }
    match turns::next_after(&room.player_order, players, after) {
        Some(next) => {
            log::debug!("room {}: turn passes to {next}", room.code);
            room.current_turn = Some(next);
        }
        None => degrade_to_lobby(room, "could not determine the next player"),
    }
}

fn settle_sole_survivor(
    room: &mut Room,
    players: &mut Players,
    winner_id: &PlayerId,
    by_pack: bool,
) {
    let pot = room.current_pot;
    let round = room.round_count;
    let Some(winner) = players.get_mut(winner_id) else {
        degrade_to_lobby(room, "winner vanished during settlement");
        return;
    };
    winner.chips += pot;
    let winner_nickname = winner.nickname.clone();
    for player in players.values_mut() {
        if matches!(
            player.status,
            PlayerStatus::Playing | PlayerStatus::Packed
        ) {
            player.reset_for_next_round();
        }
    }

    room.status = RoomStatus::Lobby;
    room.current_pot = 0;
    room.last_bet = 0;
    room.current_turn = None;
    room.side_show = None;
    let kind = if by_pack {
        GameLogKind::RoundEndByPack
    } else {
        GameLogKind::RoundEnd
    };
    room.log(GameLogEntry::for_player(
        kind,
        format!("{winner_nickname} wins round {round} with {pot} chips!"),
        winner_id.clone(),
    ));
    log::debug!("room {}: round {round} settled, {pot} chips to {winner_id}", room.code);
}

/// Defensive fallback for internal contradictions: keep the room usable by
/// returning it to the lobby, and make the occurrence observable in both the
/// game log and the process log. The acting player still sees success.
fn degrade_to_lobby(room: &mut Room, reason: &str) {
    log::error!("room {}: invariant violation: {reason}", room.code);
    room.status = RoomStatus::Lobby;
    room.current_turn = None;
    room.side_show = None;
    room.log(GameLogEntry::new(
        GameLogKind::Error,
        format!("Internal inconsistency ({reason}); room returned to lobby."),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{Player, Players, RoomCode, RoomSettings};

    const BOOT: Chips = 10;

    #[test]
    fn actions_serialize_as_tagged_documents() {
        let value = serde_json::to_value(Action::Raise { amount: 40 }).unwrap();
        assert_eq!(value["type"], "raise");
        assert_eq!(value["amount"], 40);
        let value = serde_json::to_value(Action::BlindBet).unwrap();
        assert_eq!(value["type"], "blind_bet");
    }

    /// A room mid-round: `n` players in seat order p1..pn, each holding 90
    /// chips after paying the boot, p1 to act.
    fn fixture(n: usize) -> (Room, Players) {
        let settings = RoomSettings {
            starting_chips: 100,
            boot_amount: BOOT,
            ..RoomSettings::default()
        };
        let mut room = Room::new(
            RoomCode::new("TEST42"),
            PlayerId::new("p1"),
            settings,
        );
        let mut players = Players::new();
        for i in 1..=n {
            let id = PlayerId::new(&format!("p{i}"));
            let mut player = Player::new(id.clone(), &format!("player{i}"), "🤖", 100 - BOOT);
            player.status = PlayerStatus::Playing;
            room.player_order.push(id.clone());
            players.insert(id, player);
        }
        room.status = RoomStatus::InGame;
        room.round_count = 1;
        room.current_pot = BOOT * n as Chips;
        room.last_bet = BOOT;
        room.current_turn = Some(PlayerId::new("p1"));
        (room, players)
    }

    fn total_chips(room: &Room, players: &Players) -> Chips {
        room.current_pot + players.values().map(|p| p.chips).sum::<Chips>()
    }

    #[test]
    fn rejects_action_when_game_not_active() {
        let (mut room, players) = fixture(3);
        room.status = RoomStatus::Lobby;
        let err = apply_action(&room, &players, &PlayerId::new("p1"), Action::BlindBet);
        assert_eq!(err.unwrap_err(), GameError::GameNotActive);
    }

    #[test]
    fn rejects_out_of_turn_action() {
        let (room, players) = fixture(3);
        let err = apply_action(&room, &players, &PlayerId::new("p2"), Action::BlindBet);
        assert_eq!(err.unwrap_err(), GameError::NotYourTurn);
    }

    #[test]
    fn blind_bet_matches_last_bet_and_advances_turn() {
        let (room, players) = fixture(3);
        let t = apply_action(&room, &players, &PlayerId::new("p1"), Action::BlindBet).unwrap();
        assert_eq!(t.players[&PlayerId::new("p1")].chips, 80);
        assert_eq!(t.room.current_pot, 40);
        assert_eq!(t.room.last_bet, BOOT);
        assert_eq!(t.room.current_turn, Some(PlayerId::new("p2")));
        assert_eq!(total_chips(&t.room, &t.players), total_chips(&room, &players));
    }

    #[test]
    fn seen_player_cannot_bet_blind() {
        let (room, mut players) = fixture(2);
        players.get_mut(&PlayerId::new("p1")).unwrap().is_blind = false;
        let err = apply_action(&room, &players, &PlayerId::new("p1"), Action::BlindBet);
        assert_eq!(err.unwrap_err(), GameError::AlreadySeen);
    }

    #[test]
    fn blind_player_cannot_chaal() {
        let (room, players) = fixture(2);
        let err = apply_action(&room, &players, &PlayerId::new("p1"), Action::Chaal);
        assert_eq!(err.unwrap_err(), GameError::StillBlind);
    }

    #[test]
    fn chaal_halves_into_last_bet() {
        let (room, mut players) = fixture(3);
        players.get_mut(&PlayerId::new("p1")).unwrap().is_blind = false;
        let t = apply_action(&room, &players, &PlayerId::new("p1"), Action::Chaal).unwrap();
        // Seen call costs double the blind bet, stored halved.
        assert_eq!(t.players[&PlayerId::new("p1")].chips, 70);
        assert_eq!(t.room.last_bet, BOOT);
    }

    #[test]
    fn fourth_blind_bet_forces_seen() {
        let (room, mut players) = fixture(2);
        players.get_mut(&PlayerId::new("p1")).unwrap().blind_turns = 3;
        let t = apply_action(&room, &players, &PlayerId::new("p1"), Action::BlindBet).unwrap();
        let p1 = &t.players[&PlayerId::new("p1")];
        assert!(!p1.is_blind);
        assert_eq!(p1.blind_turns, 4);
        let last = t.room.game_log.last().unwrap();
        assert_eq!(last.kind, GameLogKind::StatusChange);
    }

    #[test]
    fn raise_must_strictly_exceed_minimum() {
        let (mut room, mut players) = fixture(3);
        room.last_bet = 0;
        players.get_mut(&PlayerId::new("p1")).unwrap().is_blind = false;
        let err = apply_action(
            &room,
            &players,
            &PlayerId::new("p1"),
            Action::Raise { amount: 20 },
        );
        assert_eq!(err.unwrap_err(), GameError::RaiseTooSmall { minimum: 20 });
        let t = apply_action(
            &room,
            &players,
            &PlayerId::new("p1"),
            Action::Raise { amount: 21 },
        )
        .unwrap();
        assert_eq!(t.players[&PlayerId::new("p1")].chips, 69);
        assert_eq!(t.room.last_bet, 10);
    }

    #[test]
    fn blind_raise_forces_seen() {
        let (room, players) = fixture(3);
        let t = apply_action(
            &room,
            &players,
            &PlayerId::new("p1"),
            Action::Raise { amount: 30 },
        )
        .unwrap();
        let p1 = &t.players[&PlayerId::new("p1")];
        assert!(!p1.is_blind);
        // Blind raise sets the full amount as the blind-equivalent bet.
        assert_eq!(t.room.last_bet, 30);
    }

    #[test]
    fn insufficient_chips_mutates_nothing() {
        let (room, mut players) = fixture(2);
        players.get_mut(&PlayerId::new("p1")).unwrap().chips = 5;
        let err = apply_action(&room, &players, &PlayerId::new("p1"), Action::BlindBet);
        assert_eq!(
            err.unwrap_err(),
            GameError::InsufficientChips { required: BOOT }
        );
    }

    #[test]
    fn pack_hands_turn_to_next_active_player() {
        let (room, players) = fixture(3);
        let t = apply_action(&room, &players, &PlayerId::new("p1"), Action::Pack).unwrap();
        assert_eq!(t.players[&PlayerId::new("p1")].status, PlayerStatus::Packed);
        assert_eq!(t.room.status, RoomStatus::InGame);
        assert_eq!(t.room.current_turn, Some(PlayerId::new("p2")));
    }

    #[test]
    fn pack_leaving_one_survivor_settles_the_round() {
        let (mut room, mut players) = fixture(3);
        players.get_mut(&PlayerId::new("p2")).unwrap().status = PlayerStatus::Packed;
        room.current_pot = 30;
        let t = apply_action(&room, &players, &PlayerId::new("p1"), Action::Pack).unwrap();
        let winner = &t.players[&PlayerId::new("p3")];
        assert_eq!(winner.chips, 90 + 30);
        assert_eq!(winner.status, PlayerStatus::Waiting);
        assert_eq!(t.room.status, RoomStatus::Lobby);
        assert_eq!(t.room.current_pot, 0);
        assert_eq!(t.room.last_bet, 0);
        assert_eq!(t.room.current_turn, None);
        assert_eq!(
            t.room.game_log.last().unwrap().kind,
            GameLogKind::RoundEndByPack
        );
    }

    #[test]
    fn pot_limit_reached_triggers_showdown() {
        let (mut room, players) = fixture(2);
        room.settings.max_pot_limit = 40;
        room.current_pot = 25;
        let t = apply_action(&room, &players, &PlayerId::new("p1"), Action::BlindBet).unwrap();
        // Bet capped from 10 to... 10 fits; pot hits 35 < 40, play continues.
        assert_eq!(t.room.status, RoomStatus::InGame);

        let mut room = room;
        room.current_pot = 35;
        let t = apply_action(&room, &players, &PlayerId::new("p1"), Action::BlindBet).unwrap();
        // Bet capped to 5; pot hits the limit exactly and the round stops.
        assert_eq!(t.players[&PlayerId::new("p1")].chips, 85);
        assert_eq!(t.room.current_pot, 40);
        assert_eq!(t.room.status, RoomStatus::AwaitingWinner);
        assert_eq!(t.room.current_turn, None);
        assert_eq!(t.room.game_log.last().unwrap().kind, GameLogKind::Event);
    }

    #[test]
    fn oversized_raise_is_capped_or_rejected_never_wrapped() {
        // Finite limit: a raise near Chips::MAX is capped to the headroom and
        // triggers the showdown.
        let (mut room, players) = fixture(2);
        room.settings.max_pot_limit = 40;
        let t = apply_action(
            &room,
            &players,
            &PlayerId::new("p1"),
            Action::Raise { amount: Chips::MAX },
        )
        .unwrap();
        assert_eq!(t.room.current_pot, 40);
        assert_eq!(t.room.status, RoomStatus::AwaitingWinner);
        assert_eq!(t.players[&PlayerId::new("p1")].chips, 70);

        // Unlimited pot: the same raise fails the affordability check.
        let (room, players) = fixture(2);
        let err = apply_action(
            &room,
            &players,
            &PlayerId::new("p1"),
            Action::Raise { amount: Chips::MAX },
        );
        assert_eq!(
            err.unwrap_err(),
            GameError::InsufficientChips {
                required: Chips::MAX
            }
        );
    }

    #[test]
    fn show_requires_exactly_two_active_players() {
        let (room, players) = fixture(3);
        let err = apply_action(&room, &players, &PlayerId::new("p1"), Action::Show);
        assert_eq!(err.unwrap_err(), GameError::ShowRequiresTwoPlayers);
    }

    #[test]
    fn show_moves_room_to_awaiting_winner() {
        let (room, players) = fixture(2);
        let t = apply_action(&room, &players, &PlayerId::new("p1"), Action::Show).unwrap();
        assert_eq!(t.room.status, RoomStatus::AwaitingWinner);
        assert_eq!(t.room.current_turn, None);
        // Show is paid at the seen rate and forces the caller seen.
        assert_eq!(t.players[&PlayerId::new("p1")].chips, 70);
        assert!(!t.players[&PlayerId::new("p1")].is_blind);
    }

    #[test]
    fn side_show_requires_a_seen_target() {
        let (room, mut players) = fixture(3);
        players.get_mut(&PlayerId::new("p1")).unwrap().is_blind = false;
        let err = apply_action(&room, &players, &PlayerId::new("p1"), Action::SideShow);
        assert_eq!(err.unwrap_err(), GameError::NoSideShowTarget);
    }

    #[test]
    fn side_show_pauses_the_turn_until_resolved() {
        let (mut room, mut players) = fixture(3);
        for id in ["p1", "p2", "p3"] {
            players.get_mut(&PlayerId::new(id)).unwrap().is_blind = false;
        }
        room.current_turn = Some(PlayerId::new("p2"));
        let t = apply_action(&room, &players, &PlayerId::new("p2"), Action::SideShow).unwrap();
        assert_eq!(
            t.room.side_show,
            Some(SideShowRequest {
                requester: PlayerId::new("p2"),
                target: PlayerId::new("p1"),
            })
        );
        assert_eq!(t.room.current_turn, None);

        // Nobody can act while the side show is pending.
        let err = apply_action(&t.room, &t.players, &PlayerId::new("p3"), Action::Chaal);
        assert_eq!(err.unwrap_err(), GameError::SideShowPending);

        // Only the target or host can resolve it.
        let err = resolve_side_show(
            &t.room,
            &t.players,
            &PlayerId::new("p3"),
            SideShowResolution::Decline,
        );
        assert_eq!(err.unwrap_err(), GameError::NotSideShowResponder);

        let resolved = resolve_side_show(
            &t.room,
            &t.players,
            &PlayerId::new("p1"),
            SideShowResolution::Decline,
        )
        .unwrap();
        assert_eq!(resolved.room.side_show, None);
        assert_eq!(resolved.room.current_turn, Some(PlayerId::new("p3")));
    }

    #[test]
    fn side_show_fold_can_end_the_round() {
        let (mut room, mut players) = fixture(2);
        for id in ["p1", "p2"] {
            players.get_mut(&PlayerId::new(id)).unwrap().is_blind = false;
        }
        room.current_turn = Some(PlayerId::new("p2"));
        let t = apply_action(&room, &players, &PlayerId::new("p2"), Action::SideShow).unwrap();
        let resolved = resolve_side_show(
            &t.room,
            &t.players,
            &PlayerId::new("p1"),
            SideShowResolution::TargetFolds,
        )
        .unwrap();
        assert_eq!(resolved.room.status, RoomStatus::Lobby);
        assert_eq!(
            resolved.room.game_log.last().unwrap().kind,
            GameLogKind::RoundEndByPack
        );
        // Requester takes the whole pot, including their own side-show fee.
        assert_eq!(resolved.players[&PlayerId::new("p2")].chips, 90 - 20 + 40);
    }

    #[test]
    fn switch_to_seen_is_one_way() {
        let (room, players) = fixture(2);
        let t = switch_to_seen(&room, &players, &PlayerId::new("p2")).unwrap();
        let p2 = &t.players[&PlayerId::new("p2")];
        assert!(!p2.is_blind);
        assert_eq!(p2.blind_turns, 0);
        let err = switch_to_seen(&t.room, &t.players, &PlayerId::new("p2"));
        assert_eq!(err.unwrap_err(), GameError::AlreadySeen);
    }

    #[test]
    fn chip_totals_are_conserved_by_every_action() {
        let (room, players) = fixture(3);
        let before = total_chips(&room, &players);
        for action in [
            Action::BlindBet,
            Action::Raise { amount: 25 },
            Action::Pack,
        ] {
            let t = apply_action(&room, &players, &PlayerId::new("p1"), action).unwrap();
            assert_eq!(total_chips(&t.room, &t.players), before, "{action}");
        }
    }
}
