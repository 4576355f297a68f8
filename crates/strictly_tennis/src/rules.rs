//! Scoring transitions: point, game, set and match.
//!
//! Every public entry point borrows a [`MatchState`] and returns a freshly
//! built one. The cascade helpers below operate on that private copy only.

use tracing::{debug, info, instrument};

use crate::contracts::assert_transition;
use crate::types::{
    FORTY, GAMES_PER_SET, MatchState, Mode, SETS_TO_WIN, SUPER_TIEBREAK_TARGET, Side,
    TIEBREAK_TARGET, WINNING_MARGIN,
};
use crate::ScoringError;

/// Result of submitting a point or a game to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The score changed.
    Applied(MatchState),
    /// The match was already decided; the state is returned untouched.
    NoEffect(MatchState),
}

impl Transition {
    /// Returns the resulting state, whether or not anything changed.
    pub fn into_state(self) -> MatchState {
        match self {
            Transition::Applied(state) | Transition::NoEffect(state) => state,
        }
    }

    /// Borrows the resulting state.
    pub fn state(&self) -> &MatchState {
        match self {
            Transition::Applied(state) | Transition::NoEffect(state) => state,
        }
    }

    /// Returns true if the score changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied(_))
    }
}

/// Records one point won by `side`.
///
/// A finished match absorbs further points: the input comes back as
/// [`Transition::NoEffect`].
#[instrument(skip(state), fields(mode = %state.mode, current_set = state.current_set))]
pub fn apply_point(state: &MatchState, side: Side) -> Transition {
    if let Some(winner) = state.winner {
        debug!(%winner, "Match already decided, ignoring point");
        return Transition::NoEffect(state.clone());
    }

    let mut next = state.clone();
    match next.mode {
        Mode::SuperTiebreak => score_super_tiebreak_point(&mut next, side),
        Mode::Tiebreak => score_tiebreak_point(&mut next, side),
        Mode::Regular => score_regular_point(&mut next, side),
    }

    assert_transition(state, &next);
    Transition::Applied(next)
}

/// Awards a whole game to `side` without point-by-point detail.
///
/// # Errors
///
/// Returns [`ScoringError::TiebreakInProgress`] while either tiebreak mode is
/// active; a tiebreak has no single-game shortcut.
#[instrument(skip(state), fields(mode = %state.mode, current_set = state.current_set))]
pub fn apply_game(state: &MatchState, side: Side) -> Result<Transition, ScoringError> {
    if let Some(winner) = state.winner {
        debug!(%winner, "Match already decided, ignoring game");
        return Ok(Transition::NoEffect(state.clone()));
    }

    if state.mode != Mode::Regular {
        debug!(mode = %state.mode, "Rejecting game shortcut during tiebreak");
        return Err(ScoringError::TiebreakInProgress);
    }

    let mut next = state.clone();
    next.points = [0, 0];
    next.deuce_advantage = None;
    win_game(&mut next, side);

    assert_transition(state, &next);
    Ok(Transition::Applied(next))
}

fn score_regular_point(state: &mut MatchState, side: Side) {
    let other = side.opponent();
    let won = state.points[side.index()];
    let conceded = state.points[other.index()];

    if won >= FORTY && conceded >= FORTY {
        match state.deuce_advantage {
            Some(holder) if holder == side => win_game(state, side),
            Some(_) => {
                debug!("Back to deuce");
                state.deuce_advantage = None;
            }
            None => {
                debug!(%side, "Advantage");
                state.deuce_advantage = Some(side);
            }
        }
    } else if won >= FORTY {
        win_game(state, side);
    } else {
        state.points[side.index()] += 1;
    }
}

fn score_tiebreak_point(state: &mut MatchState, side: Side) {
    record_tiebreak_point(state, side);

    if has_closed(state.tiebreak_points, side, TIEBREAK_TARGET) {
        info!(%side, points = ?state.tiebreak_points, "Tiebreak won");
        state.games[state.current_set][side.index()] += 1;
        state.mode = Mode::Regular;
        state.tiebreak_points = [0, 0];
        win_set(state, side);
    }
}

fn score_super_tiebreak_point(state: &mut MatchState, side: Side) {
    record_tiebreak_point(state, side);

    if has_closed(state.tiebreak_points, side, SUPER_TIEBREAK_TARGET) {
        info!(%side, points = ?state.tiebreak_points, "Super tiebreak won, match over");
        state.sets[side.index()] += 1;
        state.mode = Mode::Regular;
        state.tiebreak_points = [0, 0];
        state.winner = Some(side);
    }
}

/// Counts a tiebreak point and hands over serve after the first point, then
/// after every second point.
fn record_tiebreak_point(state: &mut MatchState, side: Side) {
    state.tiebreak_points[side.index()] += 1;
    let total = state.tiebreak_points[0] + state.tiebreak_points[1];

    if total == 1 || (total > 1 && (total - 1) % 2 == 0) {
        state.serving = state.serving.opponent();
    }
}

fn has_closed(points: [u32; 2], side: Side, target: u32) -> bool {
    let won = points[side.index()];
    let conceded = points[side.opponent().index()];
    won >= target && won >= conceded + WINNING_MARGIN
}

fn win_game(state: &mut MatchState, side: Side) {
    let set = state.current_set;
    state.games[set][side.index()] += 1;
    state.points = [0, 0];
    state.deuce_advantage = None;

    let games = state.games[set];
    let won = games[side.index()];
    let conceded = games[side.opponent().index()];
    debug!(%side, games = ?games, set, "Game won");

    if won == GAMES_PER_SET && conceded == GAMES_PER_SET {
        info!(set, "Six games all, starting tiebreak");
        state.mode = Mode::Tiebreak;
        state.tiebreak_points = [0, 0];
    } else if won >= GAMES_PER_SET && u32::from(won) >= u32::from(conceded) + WINNING_MARGIN {
        win_set(state, side);
    } else {
        state.serving = state.serving.opponent();
    }
}

fn win_set(state: &mut MatchState, side: Side) {
    state.sets[side.index()] += 1;
    state.points = [0, 0];
    info!(%side, sets = ?state.sets, set = state.current_set, "Set won");

    if state.sets[side.index()] >= SETS_TO_WIN {
        info!(%side, "Match won");
        state.winner = Some(side);
        return;
    }

    state.current_set += 1;

    if state.current_set == 2 && state.config.super_tiebreak_final_set {
        info!("Decisive set played as super tiebreak");
        state.mode = Mode::SuperTiebreak;
        state.tiebreak_points = [0, 0];
    } else {
        state.serving = state.serving.opponent();
    }
}
