//! Display-oriented projection of a match state.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::types::{FORTY, MAX_SETS};
use crate::{MatchState, Side};

const POINT_NAMES: [&str; 4] = ["0", "15", "30", "40"];

/// Point labels for both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointLabels {
    /// Label for side A.
    pub a: String,
    /// Label for side B.
    pub b: String,
}

/// Read-only scoreboard view of a [`MatchState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Sets won per side.
    pub sets: [u8; 2],
    /// Games per side in every set.
    pub games: [[u8; 2]; MAX_SETS],
    /// Formatted current points.
    pub points: PointLabels,
    /// Side currently serving.
    pub serving: Side,
    /// Standard tiebreak in progress.
    pub is_tiebreak: bool,
    /// Super tiebreak in progress.
    pub is_super_tiebreak: bool,
    /// Zero-based set in progress.
    pub current_set: usize,
    /// Match winner, once decided.
    pub winner: Option<Side>,
}

impl From<&MatchState> for ScoreSummary {
    #[instrument(skip_all)]
    fn from(state: &MatchState) -> Self {
        let [a, b] = point_labels(state);
        Self {
            sets: state.sets(),
            games: *state.games(),
            points: PointLabels { a, b },
            serving: state.serving(),
            is_tiebreak: state.is_tiebreak(),
            is_super_tiebreak: state.is_super_tiebreak(),
            current_set: state.current_set(),
            winner: state.winner(),
        }
    }
}

/// Formats the current points for both sides.
///
/// Tiebreaks show raw counts; deuce shows "40"/"40" or "AD"/"-"; otherwise
/// 0/15/30/40.
pub fn point_labels(state: &MatchState) -> [String; 2] {
    if state.is_tiebreak() || state.is_super_tiebreak() {
        let [a, b] = state.tiebreak_points();
        return [a.to_string(), b.to_string()];
    }

    let [a, b] = state.points();
    if a >= FORTY && b >= FORTY {
        let (a, b) = match state.deuce_advantage() {
            Some(Side::A) => ("AD", "-"),
            Some(Side::B) => ("-", "AD"),
            None => ("40", "40"),
        };
        return [a.to_string(), b.to_string()];
    }

    [
        POINT_NAMES[usize::from(a.min(FORTY))].to_string(),
        POINT_NAMES[usize::from(b.min(FORTY))].to_string(),
    ]
}
