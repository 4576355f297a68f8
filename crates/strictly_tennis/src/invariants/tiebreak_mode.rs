//! Tiebreak mode invariant: tiebreak counters only live inside a tiebreak.

use super::Invariant;
use crate::types::{GAMES_PER_SET, MAX_SETS};
use crate::{MatchState, Mode};

/// Invariant: the mode agrees with the rest of the score.
///
/// - regular play keeps tiebreak points at zero
/// - a tiebreak only runs at six games all
/// - a super tiebreak only runs in the third set of a match configured for it
/// - a finished match is back in regular mode
pub struct TiebreakModeInvariant;

impl Invariant<MatchState> for TiebreakModeInvariant {
    fn holds(state: &MatchState) -> bool {
        match state.mode {
            Mode::Regular => state.tiebreak_points == [0, 0],
            Mode::Tiebreak => {
                state.winner.is_none()
                    && state.current_games() == [GAMES_PER_SET, GAMES_PER_SET]
            }
            Mode::SuperTiebreak => {
                state.winner.is_none()
                    && state.config.super_tiebreak_final_set
                    && state.current_set == MAX_SETS - 1
            }
        }
    }

    fn description() -> &'static str {
        "Tiebreak mode is consistent with games, sets and configuration"
    }
}
