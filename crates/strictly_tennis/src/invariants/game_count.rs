//! Game count invariant: every set holds a score reachable in play.

use super::Invariant;
use crate::types::{GAMES_PER_SET, MAX_SETS, WINNING_MARGIN};
use crate::{MatchState, Mode, Side};

/// Invariant: game counts stay within what tennis allows.
///
/// - a closed set ends 6-x with a two game lead, 7-5 or 7-6
/// - a decisive super tiebreak leaves its set at 0-0
/// - closed set winners add up to the sets won
/// - the set in progress has not already closed, and sits at 6-6 only
///   during its tiebreak
/// - sets not yet reached are 0-0
pub struct GameCountInvariant;

/// Returns the side that won a set ending on `games`, or `None` if the score
/// is not a legal final score.
fn closed_set_winner(games: [u8; 2]) -> Option<Side> {
    let side = if games[0] > games[1] { Side::A } else { Side::B };
    let won = games[side.index()];
    let lost = games[side.opponent().index()];

    let six_with_lead = won == GAMES_PER_SET && u32::from(lost) + WINNING_MARGIN <= u32::from(won);
    let seven_five_or_six =
        won == GAMES_PER_SET + 1 && (lost == GAMES_PER_SET - 1 || lost == GAMES_PER_SET);
    (six_with_lead || seven_five_or_six).then_some(side)
}

/// True if the set in progress is still open at `games`.
fn open_set_is_legal(state: &MatchState, games: [u8; 2]) -> bool {
    match state.mode {
        Mode::Tiebreak => games == [GAMES_PER_SET, GAMES_PER_SET],
        Mode::SuperTiebreak => games == [0, 0],
        Mode::Regular => {
            games[0] <= GAMES_PER_SET
                && games[1] <= GAMES_PER_SET
                && games != [GAMES_PER_SET, GAMES_PER_SET]
                && closed_set_winner(games).is_none()
        }
    }
}

impl Invariant<MatchState> for GameCountInvariant {
    fn holds(state: &MatchState) -> bool {
        let completed = usize::from(state.sets[0]) + usize::from(state.sets[1]);
        if completed > MAX_SETS || state.current_set >= MAX_SETS {
            return false;
        }

        let mut set_wins = [0u8; 2];
        for set in 0..completed {
            let games = state.games[set];
            let decided_by_super_tiebreak = set == MAX_SETS - 1
                && state.config.super_tiebreak_final_set
                && games == [0, 0];
            let winner = if decided_by_super_tiebreak {
                state.winner
            } else {
                closed_set_winner(games)
            };
            match winner {
                Some(side) => set_wins[side.index()] += 1,
                None => return false,
            }
        }
        if set_wins != state.sets {
            return false;
        }

        let first_untouched = if state.winner.is_some() {
            completed
        } else {
            if !open_set_is_legal(state, state.games[state.current_set]) {
                return false;
            }
            state.current_set + 1
        };
        state.games[first_untouched.min(MAX_SETS)..]
            .iter()
            .all(|games| *games == [0, 0])
    }

    fn description() -> &'static str {
        "Game counts form legal set scores that agree with sets won"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchConfig, apply_game};

    #[test]
    fn test_legal_final_scores() {
        assert_eq!(closed_set_winner([6, 4]), Some(Side::A));
        assert_eq!(closed_set_winner([5, 7]), Some(Side::B));
        assert_eq!(closed_set_winner([7, 6]), Some(Side::A));
        assert_eq!(closed_set_winner([6, 5]), None);
        assert_eq!(closed_set_winner([7, 4]), None);
        assert_eq!(closed_set_winner([8, 6]), None);
    }

    #[test]
    fn test_six_all_outside_tiebreak_violates() {
        let mut state = MatchState::new(MatchConfig::default());
        state.games[0] = [6, 6];
        assert!(!GameCountInvariant::holds(&state));

        state.mode = Mode::Tiebreak;
        assert!(GameCountInvariant::holds(&state));
    }

    #[test]
    fn test_runaway_game_count_violates() {
        let mut state = MatchState::new(MatchConfig::default());
        state.games[0] = [255, 0];
        assert!(!GameCountInvariant::holds(&state));
    }

    #[test]
    fn test_sets_without_matching_games_violate() {
        let mut state = MatchState::new(MatchConfig::default());
        state.sets = [1, 0];
        state.current_set = 1;
        assert!(!GameCountInvariant::holds(&state));

        state.games[0] = [6, 3];
        assert!(GameCountInvariant::holds(&state));
    }

    #[test]
    fn test_games_in_unreached_set_violate() {
        let mut state = MatchState::new(MatchConfig::default());
        state.games[2] = [1, 0];
        assert!(!GameCountInvariant::holds(&state));
    }

    #[test]
    fn test_holds_for_finished_match() {
        let mut state = MatchState::new(MatchConfig::default());
        for _ in 0..12 {
            state = apply_game(&state, Side::B).unwrap().into_state();
        }
        assert!(state.is_finished());
        assert!(GameCountInvariant::holds(&state));
    }
}
