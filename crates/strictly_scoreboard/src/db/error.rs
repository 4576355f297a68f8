//! Errors raised by the match store.

use derive_more::{Display, Error};
use tracing::instrument;

/// Failure in the match store, tagged with the call site that raised it.
///
/// The service surfaces these as [`MatchError::Storage`](crate::MatchError::Storage).
#[derive(Debug, Clone, Display, Error)]
#[display("Match storage error: {} at {}:{}", message, file, line)]
pub struct DbError {
    /// What failed and for which match.
    pub message: String,
    /// Line of the call site.
    pub line: u32,
    /// File of the call site.
    pub file: &'static str,
}

impl DbError {
    /// Records a match store failure at the caller's location.
    ///
    /// Raised when the SQLite file cannot be opened or migrated, when a
    /// match row cannot be read or written, and when a stored score or
    /// history entry does not describe a reachable score.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Match row query failed: {}", err))
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Cannot open match database: {}", err))
    }
}

impl From<serde_json::Error> for DbError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Stored score is not valid JSON: {}", err))
    }
}
