//! Match records: who is playing, the live score and its undo history.

use chrono::{NaiveDateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strictly_tennis::{MatchConfig, MatchState};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::db::DbError;
use crate::undo::UndoLog;

/// Number of sets the scoring engine plays.
pub const SUPPORTED_BEST_OF: u8 = 3;

/// Length of spectator share codes.
const SHARE_CODE_LEN: usize = 8;

/// Singles or doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// One player per side.
    #[default]
    Singles,
    /// Two players per side.
    Doubles,
}

impl MatchType {
    /// Converts the match type to the string stored in the database.
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Singles => "singles",
            Self::Doubles => "doubles",
        }
    }

    /// Parses the match type from the string stored in the database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the string is not a known match type.
    #[instrument(skip(s), fields(s = %s))]
    pub fn from_db_string(s: &str) -> Result<Self, DbError> {
        match s {
            "singles" => Ok(Self::Singles),
            "doubles" => Ok(Self::Doubles),
            _ => Err(DbError::new(format!("Invalid match type: '{}'", s))),
        }
    }
}

fn default_team_a() -> String {
    "Team A".to_string()
}

fn default_team_b() -> String {
    "Team B".to_string()
}

fn default_best_of() -> u8 {
    SUPPORTED_BEST_OF
}

fn default_super_tiebreak() -> bool {
    true
}

/// Request to create a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMatch {
    /// Singles or doubles.
    #[serde(default)]
    pub match_type: MatchType,
    /// Display name of side A.
    #[serde(default = "default_team_a")]
    pub team_a_name: String,
    /// Display name of side B.
    #[serde(default = "default_team_b")]
    pub team_b_name: String,
    /// First player of side A.
    #[serde(default)]
    pub player_a1: Option<String>,
    /// First player of side B.
    #[serde(default)]
    pub player_b1: Option<String>,
    /// Second player of side A (doubles).
    #[serde(default)]
    pub player_a2: Option<String>,
    /// Second player of side B (doubles).
    #[serde(default)]
    pub player_b2: Option<String>,
    /// Sets in the match; only best of 3 is played.
    #[serde(default = "default_best_of")]
    pub best_of: u8,
    /// Play the third set as a super tiebreak.
    #[serde(default = "default_super_tiebreak")]
    pub super_tiebreak_final_set: bool,
}

impl Default for NewMatch {
    fn default() -> Self {
        Self {
            match_type: MatchType::default(),
            team_a_name: default_team_a(),
            team_b_name: default_team_b(),
            player_a1: None,
            player_b1: None,
            player_a2: None,
            player_b2: None,
            best_of: default_best_of(),
            super_tiebreak_final_set: default_super_tiebreak(),
        }
    }
}

/// A match with its live score and undo history.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MatchRecord {
    pub(crate) id: String,
    pub(crate) share_code: String,
    pub(crate) match_type: MatchType,
    pub(crate) team_a_name: String,
    pub(crate) team_b_name: String,
    pub(crate) player_a1: Option<String>,
    pub(crate) player_b1: Option<String>,
    pub(crate) player_a2: Option<String>,
    pub(crate) player_b2: Option<String>,
    pub(crate) best_of: u8,
    pub(crate) state: MatchState,
    pub(crate) history: UndoLog,
    pub(crate) created_at: NaiveDateTime,
    pub(crate) updated_at: NaiveDateTime,
    pub(crate) finished_at: Option<NaiveDateTime>,
}

impl MatchRecord {
    /// Creates a record with a fresh id, share code and zero score.
    #[instrument(skip(new), fields(match_type = ?new.match_type))]
    pub fn create(new: NewMatch, history_limit: usize) -> Self {
        let now = now();
        let id = Uuid::new_v4().to_string();
        let share_code: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(SHARE_CODE_LEN)
            .collect();
        let config = MatchConfig::new(new.super_tiebreak_final_set);

        info!(match_id = %id, share_code = %share_code, "Creating match record");
        Self {
            id,
            share_code,
            match_type: new.match_type,
            team_a_name: new.team_a_name,
            team_b_name: new.team_b_name,
            player_a1: new.player_a1,
            player_b1: new.player_b1,
            player_a2: new.player_a2,
            player_b2: new.player_b2,
            best_of: new.best_of,
            state: MatchState::new(config),
            history: UndoLog::new(history_limit),
            created_at: now,
            updated_at: now,
            finished_at: None,
        }
    }

    /// Replaces the score, keeping the previous one for undo.
    #[instrument(skip(self, next), fields(match_id = %self.id))]
    pub(crate) fn advance(&mut self, next: MatchState) {
        let previous = std::mem::replace(&mut self.state, next);
        self.history.push(previous);
        self.touch();
        if self.state.is_finished() && self.finished_at.is_none() {
            info!(winner = ?self.state.winner(), "Match finished");
            self.finished_at = Some(self.updated_at);
        }
    }

    /// Restores the most recent previous score. Returns false if there is
    /// nothing to undo.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub(crate) fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.state = previous;
                self.finished_at = None;
                self.touch();
                debug!(remaining = self.history.len(), "Score restored");
                true
            }
            None => false,
        }
    }

    /// Starts the score over and forgets all history.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub(crate) fn reset(&mut self) {
        self.state = MatchState::new(self.state.config());
        self.history.clear();
        self.finished_at = None;
        self.touch();
    }

    /// Whether the third set is played as a super tiebreak.
    pub fn super_tiebreak_final_set(&self) -> bool {
        self.state.config().super_tiebreak_final_set
    }

    fn touch(&mut self) {
        self.updated_at = now();
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Wire representation of a match, as sent to scorers and viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    /// Match id.
    pub id: String,
    /// Spectator share code.
    pub share_code: String,
    /// Singles or doubles.
    pub match_type: MatchType,
    /// Display name of side A.
    pub team_a_name: String,
    /// Display name of side B.
    pub team_b_name: String,
    /// First player of side A.
    pub player_a1: Option<String>,
    /// First player of side B.
    pub player_b1: Option<String>,
    /// Second player of side A.
    pub player_a2: Option<String>,
    /// Second player of side B.
    pub player_b2: Option<String>,
    /// Live score.
    pub score_state: MatchState,
    /// Sets in the match.
    pub best_of: u8,
    /// Third set played as a super tiebreak.
    pub super_tiebreak_final_set: bool,
    /// Number of scores that can be undone.
    pub undo_available: usize,
    /// Creation time (UTC).
    pub created_at: NaiveDateTime,
    /// Last score change (UTC).
    pub updated_at: NaiveDateTime,
    /// When the match was decided (UTC).
    pub finished_at: Option<NaiveDateTime>,
}

impl From<&MatchRecord> for MatchView {
    fn from(record: &MatchRecord) -> Self {
        Self {
            id: record.id.clone(),
            share_code: record.share_code.clone(),
            match_type: record.match_type,
            team_a_name: record.team_a_name.clone(),
            team_b_name: record.team_b_name.clone(),
            player_a1: record.player_a1.clone(),
            player_b1: record.player_b1.clone(),
            player_a2: record.player_a2.clone(),
            player_b2: record.player_b2.clone(),
            score_state: record.state.clone(),
            best_of: record.best_of,
            super_tiebreak_final_set: record.super_tiebreak_final_set(),
            undo_available: record.history.len(),
            created_at: record.created_at,
            updated_at: record.updated_at,
            finished_at: record.finished_at,
        }
    }
}
