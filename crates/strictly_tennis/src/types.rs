//! Core domain types for tennis scoring.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::ScoringError;

/// Sets a side must win to take a best-of-3 match.
pub const SETS_TO_WIN: u8 = 2;

/// Number of sets tracked in the game table.
pub const MAX_SETS: usize = 3;

/// Games needed to win a set (with a two-game margin).
pub const GAMES_PER_SET: u8 = 6;

/// Points needed to win a standard tiebreak (with a two-point margin).
pub const TIEBREAK_TARGET: u32 = 7;

/// Points needed to win a super tiebreak (with a two-point margin).
pub const SUPER_TIEBREAK_TARGET: u32 = 10;

/// Minimum lead required to close a game, tiebreak or set.
pub const WINNING_MARGIN: u32 = 2;

/// Game points at which a side stands on 40.
pub const FORTY: u8 = 3;

/// One of the two competing sides (a player in singles, a team in doubles).
///
/// Serialized as its index (`0` or `1`), matching the wire format used by
/// scorers and viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(try_from = "i64", into = "u8")]
pub enum Side {
    /// Side 0 (team A).
    #[strum(serialize = "A")]
    A,
    /// Side 1 (team B).
    #[strum(serialize = "B")]
    B,
}

impl Side {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Returns the array index for this side.
    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

impl TryFrom<i64> for Side {
    type Error = ScoringError;

    #[instrument]
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Side::A),
            1 => Ok(Side::B),
            other => Err(ScoringError::InvalidSide(other)),
        }
    }
}

impl From<Side> for u8 {
    fn from(side: Side) -> Self {
        side.index() as u8
    }
}

/// Which kind of play is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    /// Ordinary game: 0/15/30/40 with deuce and advantage.
    #[default]
    Regular,
    /// Tiebreak at 6-6, first to 7 by two.
    Tiebreak,
    /// Decisive-set super tiebreak, first to 10 by two.
    SuperTiebreak,
}

/// Per-match rule options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Play the third set as a single super tiebreak.
    pub super_tiebreak_final_set: bool,
}

impl MatchConfig {
    /// Creates a configuration.
    pub fn new(super_tiebreak_final_set: bool) -> Self {
        Self {
            super_tiebreak_final_set,
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Complete score of one match at one instant.
///
/// Values are never modified once handed out: [`crate::apply_point`] and
/// [`crate::apply_game`] build a new state from a borrowed one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchState {
    pub(crate) config: MatchConfig,
    pub(crate) points: [u8; 2],
    pub(crate) games: [[u8; 2]; MAX_SETS],
    pub(crate) sets: [u8; 2],
    pub(crate) current_set: usize,
    pub(crate) serving: Side,
    pub(crate) mode: Mode,
    pub(crate) tiebreak_points: [u32; 2],
    pub(crate) winner: Option<Side>,
    pub(crate) deuce_advantage: Option<Side>,
}

impl MatchState {
    /// Creates the zero state: nothing scored, regular game, side A serving.
    #[instrument]
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            points: [0, 0],
            games: [[0, 0]; MAX_SETS],
            sets: [0, 0],
            current_set: 0,
            serving: Side::A,
            mode: Mode::Regular,
            tiebreak_points: [0, 0],
            winner: None,
            deuce_advantage: None,
        }
    }

    /// Returns the rule options this match was created with.
    pub fn config(&self) -> MatchConfig {
        self.config
    }

    /// Returns the current game points (0..=3 for 0/15/30/40).
    pub fn points(&self) -> [u8; 2] {
        self.points
    }

    /// Returns games won per side in every set.
    pub fn games(&self) -> &[[u8; 2]; MAX_SETS] {
        &self.games
    }

    /// Returns games won per side in the set being played.
    pub fn current_games(&self) -> [u8; 2] {
        self.games[self.current_set]
    }

    /// Returns sets won per side.
    pub fn sets(&self) -> [u8; 2] {
        self.sets
    }

    /// Returns the zero-based index of the set in progress.
    pub fn current_set(&self) -> usize {
        self.current_set
    }

    /// Returns the side currently serving.
    pub fn serving(&self) -> Side {
        self.serving
    }

    /// Returns the kind of play in progress.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns true while a standard tiebreak is being played.
    pub fn is_tiebreak(&self) -> bool {
        self.mode == Mode::Tiebreak
    }

    /// Returns true while the decisive super tiebreak is being played.
    pub fn is_super_tiebreak(&self) -> bool {
        self.mode == Mode::SuperTiebreak
    }

    /// Returns the tiebreak point counts (zero outside tiebreaks).
    pub fn tiebreak_points(&self) -> [u32; 2] {
        self.tiebreak_points
    }

    /// Returns the match winner once decided.
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Returns true once the match has a winner.
    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Returns the side holding advantage at deuce, if any.
    pub fn deuce_advantage(&self) -> Option<Side> {
        self.deuce_advantage
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}
