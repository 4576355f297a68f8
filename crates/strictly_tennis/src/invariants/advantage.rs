//! Advantage invariant: advantage only exists at deuce.

use super::Invariant;
use crate::MatchState;
use crate::types::FORTY;

/// Invariant: game points stay within 0..=40, and advantage is held only when
/// both sides stand on 40.
pub struct AdvantageAtDeuceInvariant;

impl Invariant<MatchState> for AdvantageAtDeuceInvariant {
    fn holds(state: &MatchState) -> bool {
        let [a, b] = state.points;
        if a > FORTY || b > FORTY {
            return false;
        }
        state.deuce_advantage.is_none() || (a >= FORTY && b >= FORTY)
    }

    fn description() -> &'static str {
        "Advantage is only held at deuce"
    }
}
