//! Set progress invariant: the current set index follows the sets played.

use super::Invariant;
use crate::MatchState;
use crate::types::MAX_SETS;

/// Invariant: `current_set` counts completed sets, staying on the final set
/// once the match is decided.
pub struct SetProgressInvariant;

impl Invariant<MatchState> for SetProgressInvariant {
    fn holds(state: &MatchState) -> bool {
        let played = usize::from(state.sets[0]) + usize::from(state.sets[1]);
        let expected = if state.winner.is_some() {
            played.saturating_sub(1)
        } else {
            played
        };
        state.current_set < MAX_SETS && state.current_set == expected
    }

    fn description() -> &'static str {
        "Current set index matches the number of completed sets"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchConfig, Side, apply_game};

    #[test]
    fn test_set_index_advances_with_sets() {
        let mut state = MatchState::new(MatchConfig::default());
        for _ in 0..6 {
            state = apply_game(&state, Side::A).unwrap().into_state();
        }
        assert_eq!(state.current_set(), 1);
        assert!(SetProgressInvariant::holds(&state));
    }

    #[test]
    fn test_skipped_set_violates() {
        let mut state = MatchState::new(MatchConfig::default());
        state.current_set = 1;
        assert!(!SetProgressInvariant::holds(&state));
    }
}
