//! Live score messages pushed to WebSocket viewers.

use serde::{Deserialize, Serialize};
use strictly_tennis::ScoreSummary;

use crate::record::{MatchRecord, MatchView};

/// Why an update was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UpdateKind {
    /// First message after a viewer connects.
    Initial,
    /// Sent after every change to the score.
    ScoreUpdate,
}

/// A snapshot of one match, as sent to viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    /// Why the update was sent.
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    /// The match after the change.
    #[serde(rename = "match")]
    pub match_view: MatchView,
    /// Scoreboard projection of the current score.
    pub summary: ScoreSummary,
}

impl ScoreUpdate {
    /// Builds an update from the current state of a record.
    pub fn new(kind: UpdateKind, record: &MatchRecord) -> Self {
        Self {
            kind,
            match_view: MatchView::from(record),
            summary: ScoreSummary::from(record.state()),
        }
    }
}
