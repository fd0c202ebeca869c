//! Room-level round lifecycle: starting a round and settling it after a
//! host-adjudicated showdown.

use super::actions::Transition;
use super::entities::{
    GameLogEntry, GameLogKind, PlayerId, PlayerStatus, Players, Room, RoomStatus,
};
use super::errors::{GameError, GameResult};

/// Start a new round: collect the boot from every ready player, fix the turn
/// rotation, and hand the first turn out.
///
/// Only the host may start; at least two players must be ready, and each of
/// them must be able to afford the boot.
pub fn start_round(room: &Room, players: &Players, host_id: &PlayerId) -> GameResult<Transition> {
    if *host_id != room.host_id {
        return Err(GameError::NotHost);
    }
    if matches!(
        room.status,
        RoomStatus::InGame | RoomStatus::AwaitingWinner
    ) {
        return Err(GameError::RoundInProgress);
    }
    room.settings.validate().map_err(GameError::InvalidSettings)?;

    let ready_order = ready_in_join_order(room, players);
    if ready_order.len() < 2 {
        return Err(GameError::NotEnoughReadyPlayers);
    }
    let boot = room.settings.boot_amount;
    for id in &ready_order {
        if players
            .get(id)
            .is_none_or(|p| p.chips < boot)
        {
            return Err(GameError::InsufficientChips { required: boot });
        }
    }

    let mut room = room.clone();
    let mut players = players.clone();

    room.status = RoomStatus::InGame;
    room.round_count += 1;
    room.current_pot = boot * ready_order.len() as u32;
    room.last_bet = boot;
    room.side_show = None;
    room.player_order = ready_order.clone();
    room.current_turn = ready_order.first().cloned();

    for player in players.values_mut() {
        if player.status == PlayerStatus::Ready {
            player.chips -= boot;
            player.status = PlayerStatus::Playing;
            player.is_blind = true;
            player.blind_turns = 0;
        } else {
            player.status = PlayerStatus::Waiting;
        }
    }

    let message = format!(
        "Round {} started with {} players. Boot: {boot}",
        room.round_count,
        ready_order.len()
    );
    room.log(GameLogEntry::new(GameLogKind::GameStart, message.clone()));
    log::debug!(
        "room {}: round {} started, pot {}",
        room.code,
        room.round_count,
        room.current_pot
    );

    Ok(Transition {
        room,
        players,
        message,
    })
}

/// Settle a round awaiting winner declaration: the host names the winner, the
/// pot is credited, and everyone who contested the round returns to the
/// between-rounds baseline.
pub fn declare_winner(
    room: &Room,
    players: &Players,
    host_id: &PlayerId,
    winner_id: &PlayerId,
) -> GameResult<Transition> {
    if *host_id != room.host_id {
        return Err(GameError::NotHost);
    }
    if room.status != RoomStatus::AwaitingWinner {
        return Err(GameError::NotAwaitingWinner);
    }
    let winner_nickname = players
        .get(winner_id)
        .ok_or(GameError::PlayerNotFound)?
        .nickname
        .clone();

    let mut room = room.clone();
    let mut players = players.clone();

    let pot = room.current_pot;
    if let Some(winner) = players.get_mut(winner_id) {
        winner.chips += pot;
    }
    for player in players.values_mut() {
        if matches!(
            player.status,
            PlayerStatus::Playing | PlayerStatus::Packed
        ) {
            player.reset_for_next_round();
        }
    }

    let round = room.round_count;
    let game_over = room
        .settings
        .num_rounds
        .is_some_and(|limit| round >= limit);

    room.current_pot = 0;
    room.last_bet = 0;
    room.current_turn = None;
    room.side_show = None;
    room.status = if game_over {
        RoomStatus::RoundEnd
    } else {
        RoomStatus::Lobby
    };

    let message = format!("{winner_nickname} won round {round} and {pot} chips!");
    room.log(GameLogEntry::for_player(
        GameLogKind::WinnerDeclared,
        message.clone(),
        winner_id.clone(),
    ));
    if game_over {
        room.log(GameLogEntry::new(
            GameLogKind::GameOver,
            format!("Game over after {round} rounds."),
        ));
    }
    log::debug!("room {}: round {round} settled by declaration, {pot} chips to {winner_id}", room.code);

    Ok(Transition {
        room,
        players,
        message,
    })
}

/// Ready players in the rotation fixed by join order. Ready players that
/// somehow never made it into the persisted order are appended in identity
/// order so the rotation stays deterministic.
fn ready_in_join_order(room: &Room, players: &Players) -> Vec<PlayerId> {
    let mut order: Vec<PlayerId> = room
        .player_order
        .iter()
        .filter(|id| {
            players
                .get(*id)
                .is_some_and(|p| p.status == PlayerStatus::Ready)
        })
        .cloned()
        .collect();
    for (id, player) in players {
        if player.status == PlayerStatus::Ready && !order.contains(id) {
            order.push(id.clone());
        }
    }
    order
}
