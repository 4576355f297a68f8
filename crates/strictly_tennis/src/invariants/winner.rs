//! Winner invariant: the match is decided exactly when a side holds two sets.

use super::Invariant;
use crate::types::SETS_TO_WIN;
use crate::{MatchState, Side};

/// Invariant: no side exceeds two sets, and `winner` names the side holding
/// two sets (or is empty when neither does).
pub struct WinnerDecidedInvariant;

impl Invariant<MatchState> for WinnerDecidedInvariant {
    fn holds(state: &MatchState) -> bool {
        let [a, b] = state.sets;
        let expected = match (a >= SETS_TO_WIN, b >= SETS_TO_WIN) {
            (false, false) => None,
            (true, false) => Some(Side::A),
            (false, true) => Some(Side::B),
            (true, true) => return false,
        };
        a <= SETS_TO_WIN && b <= SETS_TO_WIN && state.winner == expected
    }

    fn description() -> &'static str {
        "Winner is set exactly when a side has won two sets"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchConfig;

    #[test]
    fn test_undecided_match_holds() {
        let state = MatchState::new(MatchConfig::default());
        assert!(WinnerDecidedInvariant::holds(&state));
    }

    #[test]
    fn test_winner_without_sets_violates() {
        let mut state = MatchState::new(MatchConfig::default());
        state.winner = Some(Side::A);
        assert!(!WinnerDecidedInvariant::holds(&state));
    }

    #[test]
    fn test_two_sets_without_winner_violates() {
        let mut state = MatchState::new(MatchConfig::default());
        state.sets = [0, 2];
        assert!(!WinnerDecidedInvariant::holds(&state));
        state.winner = Some(Side::B);
        assert!(WinnerDecidedInvariant::holds(&state));
    }
}
