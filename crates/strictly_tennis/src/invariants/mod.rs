//! First-class invariants for match scoring.
//!
//! Invariants are properties every reachable [`MatchState`] satisfies. The
//! engine checks them after each transition in debug builds, and the
//! scoreboard checks them when loading a state from storage.
//!
//! [`MatchState`]: crate::MatchState

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of up to five invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);
impl_invariant_set!(I1, I2, I3, I4, I5);

mod advantage;
mod game_count;
mod set_progress;
mod tiebreak_mode;
mod winner;

pub use advantage::AdvantageAtDeuceInvariant;
pub use game_count::GameCountInvariant;
pub use set_progress::SetProgressInvariant;
pub use tiebreak_mode::TiebreakModeInvariant;
pub use winner::WinnerDecidedInvariant;

/// All scoring invariants as a composable set.
pub type TennisInvariants = (
    AdvantageAtDeuceInvariant,
    WinnerDecidedInvariant,
    TiebreakModeInvariant,
    SetProgressInvariant,
    GameCountInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchConfig, MatchState, Side, apply_point};

    #[test]
    fn test_invariant_set_holds_for_new_match() {
        let state = MatchState::new(MatchConfig::default());
        assert!(TennisInvariants::check_all(&state).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_through_a_full_match() {
        let mut state = MatchState::new(MatchConfig::new(false));
        // Side B takes three points in every five, with deuces along the way.
        for i in 0..200 {
            let side = if i % 5 < 2 { Side::A } else { Side::B };
            state = apply_point(&state, side).into_state();
            assert!(TennisInvariants::check_all(&state).is_ok(), "violated after point {}", i);
        }
        assert!(state.is_finished());
    }

    #[test]
    fn test_invariant_set_reports_every_violation() {
        let mut state = MatchState::new(MatchConfig::default());
        state.deuce_advantage = Some(Side::A);
        state.winner = Some(Side::B);

        let violations = TennisInvariants::check_all(&state).unwrap_err();
        assert!(violations.len() >= 2);
    }

    #[test]
    fn test_two_invariants_as_set() {
        let state = MatchState::new(MatchConfig::default());
        type Pair = (AdvantageAtDeuceInvariant, WinnerDecidedInvariant);
        assert!(Pair::check_all(&state).is_ok());
    }
}
