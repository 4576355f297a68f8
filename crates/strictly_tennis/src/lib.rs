//! Strictly Tennis - pure match scoring engine
//!
//! Scores a best-of-3 tennis match point by point: 0/15/30/40 with deuce and
//! advantage, tiebreaks at six games all, an optional super tiebreak in
//! place of the third set, and server rotation.
//!
//! # Architecture
//!
//! - **Types**: [`MatchState`] is a plain value describing one match at one
//!   instant; [`Mode`] makes regular play and both tiebreak kinds mutually
//!   exclusive.
//! - **Rules**: [`apply_point`] and [`apply_game`] borrow a state and return
//!   a new one. Nothing is mutated in place and nothing is stored.
//! - **Summary**: [`ScoreSummary`] projects a state for scoreboards.
//! - **Invariants**: checked after every transition in debug builds.
//!
//! # Example
//!
//! ```
//! use strictly_tennis::{MatchConfig, MatchState, ScoreSummary, Side, apply_point};
//!
//! let state = MatchState::new(MatchConfig::default());
//! let state = apply_point(&state, Side::A).into_state();
//! let summary = ScoreSummary::from(&state);
//! assert_eq!(summary.points.a, "15");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod contracts;
mod error;
pub mod invariants;
mod rules;
mod summary;
mod types;

pub use contracts::{ScoreMonotonic, ScoringContract};
pub use error::ScoringError;
pub use rules::{Transition, apply_game, apply_point};
pub use summary::{PointLabels, ScoreSummary, point_labels};
pub use types::{
    FORTY, GAMES_PER_SET, MAX_SETS, MatchConfig, MatchState, Mode, SETS_TO_WIN,
    SUPER_TIEBREAK_TARGET, Side, TIEBREAK_TARGET, WINNING_MARGIN,
};
