//! Database models and conversions to match records.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use diesel::prelude::*;
use strictly_tennis::MatchState;
use strictly_tennis::invariants::{InvariantSet, TennisInvariants};
use tracing::{instrument, warn};

use crate::db::{DbError, schema};
use crate::record::{MatchRecord, MatchType};
use crate::undo::UndoLog;

/// One row of the `matches` table.
///
/// The score and its undo history are stored as JSON text.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Getters)]
#[diesel(table_name = schema::matches)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MatchRow {
    id: String,
    share_code: String,
    match_type: String,
    team_a_name: String,
    team_b_name: String,
    player_a1: Option<String>,
    player_b1: Option<String>,
    player_a2: Option<String>,
    player_b2: Option<String>,
    best_of: i32,
    super_tiebreak_final_set: bool,
    score_state: String,
    history: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    finished_at: Option<NaiveDateTime>,
}

impl TryFrom<&MatchRecord> for MatchRow {
    type Error = DbError;

    #[instrument(skip(record), fields(match_id = %record.id))]
    fn try_from(record: &MatchRecord) -> Result<Self, Self::Error> {
        let history: Vec<&MatchState> = record.history.iter().collect();
        Ok(Self {
            id: record.id.clone(),
            share_code: record.share_code.clone(),
            match_type: record.match_type.to_db_string().to_string(),
            team_a_name: record.team_a_name.clone(),
            team_b_name: record.team_b_name.clone(),
            player_a1: record.player_a1.clone(),
            player_b1: record.player_b1.clone(),
            player_a2: record.player_a2.clone(),
            player_b2: record.player_b2.clone(),
            best_of: i32::from(record.best_of),
            super_tiebreak_final_set: record.super_tiebreak_final_set(),
            score_state: serde_json::to_string(&record.state)?,
            history: serde_json::to_string(&history)?,
            created_at: record.created_at,
            updated_at: record.updated_at,
            finished_at: record.finished_at,
        })
    }
}

impl MatchRow {
    /// Rebuilds a match record, keeping at most `history_limit` undo entries.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored JSON cannot be parsed, a stored
    /// score breaks a scoring invariant, or a stored score was played under a
    /// different super tiebreak setting than the row records.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn into_record(self, history_limit: usize) -> Result<MatchRecord, DbError> {
        let state: MatchState = serde_json::from_str(&self.score_state)?;
        let history: Vec<MatchState> = serde_json::from_str(&self.history)?;

        for snapshot in std::iter::once(&state).chain(history.iter()) {
            if let Err(violations) = TennisInvariants::check_all(snapshot) {
                warn!(?violations, "Stored score is inconsistent");
                return Err(DbError::new(format!(
                    "Match '{}' has an inconsistent stored score",
                    self.id
                )));
            }
            if snapshot.config().super_tiebreak_final_set != self.super_tiebreak_final_set {
                warn!(
                    column = self.super_tiebreak_final_set,
                    "Stored score disagrees with the match's super tiebreak setting"
                );
                return Err(DbError::new(format!(
                    "Match '{}' has a score for a different super tiebreak setting",
                    self.id
                )));
            }
        }

        let best_of = u8::try_from(self.best_of)
            .map_err(|_| DbError::new(format!("Invalid best_of: {}", self.best_of)))?;

        Ok(MatchRecord {
            match_type: MatchType::from_db_string(&self.match_type)?,
            id: self.id,
            share_code: self.share_code,
            team_a_name: self.team_a_name,
            team_b_name: self.team_b_name,
            player_a1: self.player_a1,
            player_b1: self.player_b1,
            player_a2: self.player_a2,
            player_b2: self.player_b2,
            best_of,
            state,
            history: UndoLog::from_states(history, history_limit),
            created_at: self.created_at,
            updated_at: self.updated_at,
            finished_at: self.finished_at,
        })
    }
}
