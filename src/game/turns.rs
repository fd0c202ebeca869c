//! Turn sequencing over a room's persisted player order.
//!
//! The rotation is always the room's explicit `player_order`, fixed at round
//! start. Only players whose status is `Playing` are eligible turn-holders;
//! packed and lobby-state players are skipped but never removed.

use super::entities::{Player, PlayerId, PlayerStatus, Players};

/// Identities of players still contesting the pot, in turn order.
#[must_use]
pub fn active_in_order(order: &[PlayerId], players: &Players) -> Vec<PlayerId> {
    order
        .iter()
        .filter(|id| is_playing(players.get(*id)))
        .cloned()
        .collect()
}

/// Count of players still contesting the pot.
#[must_use]
pub fn survivor_count(players: &Players) -> usize {
    players.values().filter(|p| playing(p)).count()
}

/// The sole remaining active player, if exactly one survives.
#[must_use]
pub fn sole_survivor(players: &Players) -> Option<PlayerId> {
    let mut survivors = players.values().filter(|p| playing(p));
    match (survivors.next(), survivors.next()) {
        (Some(winner), None) => Some(winner.id.clone()),
        _ => None,
    }
}

/// The next active player after `current`, scanning the rotation circularly
/// at most once around. `None` when nobody else is active or `current` is
/// not part of the rotation.
#[must_use]
pub fn next_after(order: &[PlayerId], players: &Players, current: &PlayerId) -> Option<PlayerId> {
    let start = order.iter().position(|id| id == current)?;
    (1..=order.len())
        .map(|offset| &order[(start + offset) % order.len()])
        .find(|id| *id != current && is_playing(players.get(*id)))
        .cloned()
}

/// The nearest active seen player preceding `requester` in the rotation,
/// scanning backwards circularly. This is whose bet the requester is
/// matching, and therefore the side-show target.
#[must_use]
pub fn side_show_target(
    order: &[PlayerId],
    players: &Players,
    requester: &PlayerId,
) -> Option<PlayerId> {
    let start = order.iter().position(|id| id == requester)?;
    (1..=order.len())
        .map(|offset| &order[(start + order.len() - offset) % order.len()])
        .find(|id| {
            *id != requester
                && players
                    .get(*id)
                    .is_some_and(|p| playing(p) && !p.is_blind)
        })
        .cloned()
}

fn playing(player: &Player) -> bool {
    player.status == PlayerStatus::Playing
}

fn is_playing(player: Option<&Player>) -> bool {
    player.is_some_and(playing)
}
