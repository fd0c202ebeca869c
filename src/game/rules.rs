//! Pure betting arithmetic.
//!
//! Every function here is a side-effect-free computation over room settings,
//! the blind-equivalent last bet, and a player's blind/seen state. All state
//! mutation happens in [`super::actions`] after these computations.

use super::entities::{Chips, RoomSettings};
use super::errors::{GameError, GameResult};

/// Cost of a blind bet: the boot if nobody has bet yet, otherwise the
/// blind-equivalent last bet.
#[must_use]
pub fn blind_bet_amount(settings: &RoomSettings, last_bet: Chips) -> Chips {
    if last_bet == 0 {
        settings.boot_amount
    } else {
        last_bet
    }
}

/// Cost of a chaal (a seen player's call): double the blind bet.
#[must_use]
pub fn chaal_amount(settings: &RoomSettings, last_bet: Chips) -> Chips {
    blind_bet_amount(settings, last_bet) * 2
}

/// Cost of requesting a side show or calling a showdown. Same as a chaal.
#[must_use]
pub fn side_show_or_show_amount(settings: &RoomSettings, last_bet: Chips) -> Chips {
    chaal_amount(settings, last_bet)
}

/// The amount a raise must strictly exceed: the actor's own call cost.
#[must_use]
pub fn minimum_raise(settings: &RoomSettings, last_bet: Chips, is_blind: bool) -> Chips {
    if is_blind {
        blind_bet_amount(settings, last_bet)
    } else {
        chaal_amount(settings, last_bet)
    }
}

/// Cap a proposed bet so the pot never exceeds a finite `max_pot_limit`.
///
/// Returns the (possibly reduced) bet, or `PotLimitExceeded` when no chips
/// can legally enter the pot at all.
pub fn apply_pot_limit(
    proposed_bet: Chips,
    current_pot: Chips,
    max_pot_limit: Chips,
) -> GameResult<Chips> {
    if max_pot_limit == 0 {
        return Ok(proposed_bet);
    }
    // Compare against the remaining headroom rather than summing, so a
    // caller-supplied bet near `Chips::MAX` cannot overflow.
    if current_pot >= max_pot_limit {
        return Err(GameError::PotLimitExceeded);
    }
    Ok(proposed_bet.min(max_pot_limit - current_pot))
}

/// The blind-equivalent last bet produced by a bet of `bet_amount`.
///
/// A seen player's bet is double a blind bet, so it is stored halved. Integer
/// division truncates odd seen bets; `minimum_raise` keeps them playable.
#[must_use]
pub fn next_last_bet(bet_amount: Chips, actor_was_blind: bool) -> Chips {
    if actor_was_blind {
        bet_amount
    } else {
        bet_amount / 2
    }
}

/// Affordability check shared by every betting action.
pub fn check_affordable(chips: Chips, required: Chips) -> GameResult<()> {
    if chips < required {
        return Err(GameError::InsufficientChips { required });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(boot: Chips, limit: Chips) -> RoomSettings {
        RoomSettings {
            boot_amount: boot,
            max_pot_limit: limit,
            ..RoomSettings::default()
        }
    }

    #[test]
    fn blind_bet_falls_back_to_boot() {
        let s = settings(10, 0);
        assert_eq!(blind_bet_amount(&s, 0), 10);
        assert_eq!(blind_bet_amount(&s, 25), 25);
    }

    #[test]
    fn chaal_is_double_the_blind_bet() {
        let s = settings(10, 0);
        assert_eq!(chaal_amount(&s, 0), 20);
        assert_eq!(chaal_amount(&s, 25), 50);
        assert_eq!(
            side_show_or_show_amount(&s, 25),
            chaal_amount(&s, 25)
        );
    }

    #[test]
    fn minimum_raise_depends_on_blind_state() {
        let s = settings(10, 0);
        assert_eq!(minimum_raise(&s, 0, true), 10);
        assert_eq!(minimum_raise(&s, 0, false), 20);
        assert_eq!(minimum_raise(&s, 15, true), 15);
        assert_eq!(minimum_raise(&s, 15, false), 30);
    }

    #[test]
    fn pot_limit_caps_to_remaining_headroom() {
        assert_eq!(apply_pot_limit(50, 80, 100).unwrap(), 20);
        assert_eq!(apply_pot_limit(20, 80, 100).unwrap(), 20);
        assert_eq!(apply_pot_limit(50, 80, 0).unwrap(), 50);
        assert_eq!(
            apply_pot_limit(50, 100, 100),
            Err(GameError::PotLimitExceeded)
        );
    }

    #[test]
    fn huge_bets_cannot_overflow_the_cap() {
        assert_eq!(apply_pot_limit(Chips::MAX, 30, 60).unwrap(), 30);
        assert_eq!(apply_pot_limit(Chips::MAX, 0, 0).unwrap(), Chips::MAX);
        assert_eq!(
            apply_pot_limit(Chips::MAX, 60, 60),
            Err(GameError::PotLimitExceeded)
        );
    }

    #[test]
    fn seen_bets_are_stored_halved() {
        assert_eq!(next_last_bet(30, true), 30);
        assert_eq!(next_last_bet(30, false), 15);
        // Odd seen bets truncate.
        assert_eq!(next_last_bet(31, false), 15);
    }

    #[test]
    fn affordability_is_strict() {
        assert!(check_affordable(20, 20).is_ok());
        assert_eq!(
            check_affordable(19, 20),
            Err(GameError::InsufficientChips { required: 20 })
        );
    }
}
