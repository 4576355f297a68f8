//! Postconditions for scoring transitions.
//!
//! A transition is correct when the new state satisfies every
//! [`TennisInvariants`] member and the score only moved forward:
//! games and sets never decrease, and closed sets never change.

use tracing::{instrument, warn};

use crate::invariants::{InvariantSet, TennisInvariants};
use crate::{MatchState, ScoringError};

/// Contract checked between the state before and after a transition.
pub struct ScoringContract;

impl ScoringContract {
    /// Checks that `after` is a valid successor of `before`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvariantViolation`] describing every failed
    /// check.
    #[instrument(skip_all)]
    pub fn post(before: &MatchState, after: &MatchState) -> Result<(), ScoringError> {
        let mut failures = match TennisInvariants::check_all(after) {
            Ok(()) => Vec::new(),
            Err(violations) => violations.into_iter().map(|v| v.description).collect(),
        };

        if !ScoreMonotonic::holds(before, after) {
            failures.push("Games and sets only move forward".to_string());
        }

        if failures.is_empty() {
            Ok(())
        } else {
            warn!(?failures, "Scoring postcondition failed");
            Err(ScoringError::InvariantViolation(failures.join("; ")))
        }
    }
}

/// Two-state property: score counters only increase and closed sets freeze.
pub struct ScoreMonotonic;

impl ScoreMonotonic {
    /// Returns true if no counter went backwards between the two states.
    pub fn holds(before: &MatchState, after: &MatchState) -> bool {
        let sets_forward = (0..2).all(|i| after.sets[i] >= before.sets[i]);
        let set_forward = after.current_set >= before.current_set;
        let games_forward = before
            .games
            .iter()
            .zip(after.games.iter())
            .all(|(b, a)| a[0] >= b[0] && a[1] >= b[1]);
        let closed_frozen = (0..before.current_set).all(|set| before.games[set] == after.games[set]);
        let winner_kept = before.winner.is_none() || before.winner == after.winner;

        sets_forward && set_forward && games_forward && closed_frozen && winner_kept
    }
}

/// Asserts the transition contract in debug builds.
pub(crate) fn assert_transition(before: &MatchState, after: &MatchState) {
    if cfg!(debug_assertions) {
        if let Err(e) = ScoringContract::post(before, after) {
            panic!("{}", e);
        }
    }
}
