//! Match coordination: one lock and one broadcast channel per match.
//!
//! Every change to a match runs under that match's own lock: the new record
//! is computed on a copy, persisted, swapped in, and only then broadcast. A
//! failed write leaves both the live record and its viewers untouched.

use std::collections::HashMap;
use std::sync::Arc;

use strictly_tennis::{ScoringError, Side, Transition, apply_game, apply_point};
use tokio::sync::{Mutex, RwLock, broadcast};
use tracing::{debug, info, instrument, warn};

use crate::broadcast::{ScoreUpdate, UpdateKind};
use crate::config::ServerConfig;
use crate::db::{DbError, MatchRepository, MatchRow};
use crate::record::{MatchRecord, NewMatch, SUPPORTED_BEST_OF};

/// Errors from match operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum MatchError {
    /// No match with this id or share code.
    #[display("Match '{}' not found", _0)]
    NotFound(String),
    /// The match has a winner; only undo and reset are allowed.
    #[display("Match is already finished")]
    AlreadyFinished,
    /// The undo history is empty.
    #[display("Nothing to undo")]
    NothingToUndo,
    /// Only best-of-3 matches can be created.
    #[display("Unsupported best_of {}: only best of {} is played", _0, SUPPORTED_BEST_OF)]
    UnsupportedBestOf(u8),
    /// The scoring engine refused the change.
    #[display("{}", _0)]
    #[from]
    Scoring(ScoringError),
    /// The database could not be read or written.
    #[display("{}", _0)]
    #[from]
    Storage(DbError),
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scoring(e) => Some(e),
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

/// A live match and the channel its viewers listen on.
#[derive(Debug)]
struct MatchHandle {
    record: Mutex<MatchRecord>,
    updates: broadcast::Sender<ScoreUpdate>,
}

impl MatchHandle {
    fn new(record: MatchRecord, capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(capacity);
        Self {
            record: Mutex::new(record),
            updates,
        }
    }
}

#[derive(Debug, Default)]
struct Registry {
    by_id: HashMap<String, Arc<MatchHandle>>,
    by_share_code: HashMap<String, String>,
}

impl Registry {
    fn insert(&mut self, record: MatchRecord, capacity: usize) {
        let id = record.id().clone();
        self.by_share_code
            .insert(record.share_code().clone(), id.clone());
        self.by_id
            .insert(id, Arc::new(MatchHandle::new(record, capacity)));
    }
}

/// Owns every live match. Cheap to clone; clones share the same matches.
#[derive(Debug, Clone)]
pub struct MatchService {
    registry: Arc<RwLock<Registry>>,
    repository: Option<MatchRepository>,
    history_limit: usize,
    broadcast_capacity: usize,
}

impl MatchService {
    /// Creates a service with no stored matches.
    ///
    /// `broadcast_capacity` is raised to 1 if zero.
    #[instrument(skip(repository), fields(persistent = repository.is_some()))]
    pub fn new(
        repository: Option<MatchRepository>,
        history_limit: usize,
        broadcast_capacity: usize,
    ) -> Self {
        info!("Creating match service");
        Self {
            registry: Arc::new(RwLock::new(Registry::default())),
            repository,
            history_limit,
            broadcast_capacity: broadcast_capacity.max(1),
        }
    }

    /// Creates a service from configuration, opening the database and
    /// loading its matches when one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Storage`] if the database cannot be opened or a
    /// stored match cannot be read.
    #[instrument(skip(config), fields(database = ?config.database_path()))]
    pub async fn from_config(config: &ServerConfig) -> Result<Self, MatchError> {
        let history_limit = *config.history_limit();
        let Some(path) = config.database_path().clone() else {
            info!("No database configured, matches kept in memory");
            return Ok(Self::new(None, history_limit, *config.broadcast_capacity()));
        };

        let (repository, records) = run_blocking(move || {
            let repository = MatchRepository::open(path)?;
            let records = repository
                .list()?
                .into_iter()
                .map(|row| row.into_record(history_limit))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((repository, records))
        })
        .await?;

        let service = Self::new(
            Some(repository),
            history_limit,
            *config.broadcast_capacity(),
        );
        {
            let mut registry = service.registry.write().await;
            for record in records {
                registry.insert(record, service.broadcast_capacity);
            }
            info!(count = registry.by_id.len(), "Loaded stored matches");
        }
        Ok(service)
    }

    /// Creates a match and returns its record.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::UnsupportedBestOf`] for anything but best of 3,
    /// or [`MatchError::Storage`] if the match cannot be saved.
    #[instrument(skip(self, new), fields(team_a = %new.team_a_name, team_b = %new.team_b_name))]
    pub async fn create_match(&self, new: NewMatch) -> Result<MatchRecord, MatchError> {
        if new.best_of != SUPPORTED_BEST_OF {
            warn!(best_of = new.best_of, "Rejected unsupported match length");
            return Err(MatchError::UnsupportedBestOf(new.best_of));
        }

        let record = MatchRecord::create(new, self.history_limit);
        if let Some(repository) = self.repository.clone() {
            let row = MatchRow::try_from(&record)?;
            run_blocking(move || repository.insert(&row)).await?;
        }

        self.registry
            .write()
            .await
            .insert(record.clone(), self.broadcast_capacity);
        info!(match_id = %record.id(), "Match created");
        Ok(record)
    }

    /// Returns a snapshot of a match by id.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NotFound`] if no match has this id.
    #[instrument(skip(self))]
    pub async fn get_match(&self, id: &str) -> Result<MatchRecord, MatchError> {
        let handle = self.handle(id).await?;
        let record = handle.record.lock().await;
        Ok(record.clone())
    }

    /// Returns a snapshot of a match by its spectator share code.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NotFound`] if no match has this share code.
    #[instrument(skip(self))]
    pub async fn get_by_share_code(&self, share_code: &str) -> Result<MatchRecord, MatchError> {
        let id = self
            .registry
            .read()
            .await
            .by_share_code
            .get(share_code)
            .cloned()
            .ok_or_else(|| MatchError::NotFound(share_code.to_string()))?;
        self.get_match(&id).await
    }

    /// Returns snapshots of every match, oldest first.
    #[instrument(skip(self))]
    pub async fn list_matches(&self) -> Vec<MatchRecord> {
        let handles: Vec<Arc<MatchHandle>> =
            self.registry.read().await.by_id.values().cloned().collect();

        let mut records = Vec::with_capacity(handles.len());
        for handle in handles {
            records.push(handle.record.lock().await.clone());
        }
        records.sort_by(|a, b| {
            a.created_at()
                .cmp(b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        debug!(count = records.len(), "Listed matches");
        records
    }

    /// Awards a point to `side`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NotFound`], [`MatchError::AlreadyFinished`] or
    /// [`MatchError::Storage`].
    #[instrument(skip(self))]
    pub async fn score_point(&self, id: &str, side: Side) -> Result<MatchRecord, MatchError> {
        self.mutate(id, |record| {
            if record.state().is_finished() {
                return Err(MatchError::AlreadyFinished);
            }
            match apply_point(record.state(), side) {
                Transition::Applied(next) => record.advance(next),
                Transition::NoEffect(_) => return Err(MatchError::AlreadyFinished),
            }
            Ok(())
        })
        .await
    }

    /// Awards a whole game to `side`, discarding points in progress.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Scoring`] with
    /// [`ScoringError::TiebreakInProgress`] during a tiebreak, plus the
    /// errors of [`Self::score_point`]. A rejected shortcut leaves the undo
    /// history untouched.
    #[instrument(skip(self))]
    pub async fn score_game(&self, id: &str, side: Side) -> Result<MatchRecord, MatchError> {
        self.mutate(id, |record| {
            if record.state().is_finished() {
                return Err(MatchError::AlreadyFinished);
            }
            match apply_game(record.state(), side)? {
                Transition::Applied(next) => record.advance(next),
                Transition::NoEffect(_) => return Err(MatchError::AlreadyFinished),
            }
            Ok(())
        })
        .await
    }

    /// Restores the score from before the most recent change.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NothingToUndo`] on an empty history, plus
    /// [`MatchError::NotFound`] and [`MatchError::Storage`].
    #[instrument(skip(self))]
    pub async fn undo(&self, id: &str) -> Result<MatchRecord, MatchError> {
        self.mutate(id, |record| {
            if record.undo() {
                Ok(())
            } else {
                Err(MatchError::NothingToUndo)
            }
        })
        .await
    }

    /// Starts the match over from 0-0 and clears its history.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NotFound`] or [`MatchError::Storage`].
    #[instrument(skip(self))]
    pub async fn reset(&self, id: &str) -> Result<MatchRecord, MatchError> {
        self.mutate(id, |record| {
            record.reset();
            Ok(())
        })
        .await
    }

    /// Subscribes to a match's live updates.
    ///
    /// Returns the current state as an `initial` update together with a
    /// receiver that yields every later change, with nothing missed between
    /// the two.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NotFound`] if no match has this id.
    #[instrument(skip(self))]
    pub async fn subscribe(
        &self,
        id: &str,
    ) -> Result<(ScoreUpdate, broadcast::Receiver<ScoreUpdate>), MatchError> {
        let handle = self.handle(id).await?;
        let record = handle.record.lock().await;
        let receiver = handle.updates.subscribe();
        debug!(viewers = handle.updates.receiver_count(), "Viewer subscribed");
        Ok((ScoreUpdate::new(UpdateKind::Initial, &record), receiver))
    }

    async fn handle(&self, id: &str) -> Result<Arc<MatchHandle>, MatchError> {
        self.registry
            .read()
            .await
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| {
                debug!(match_id = id, "Match not found");
                MatchError::NotFound(id.to_string())
            })
    }

    async fn mutate<F>(&self, id: &str, change: F) -> Result<MatchRecord, MatchError>
    where
        F: FnOnce(&mut MatchRecord) -> Result<(), MatchError>,
    {
        let handle = self.handle(id).await?;
        let mut record = handle.record.lock().await;

        let mut next = record.clone();
        if let Err(e) = change(&mut next) {
            warn!(match_id = id, error = %e, "Change rejected");
            return Err(e);
        }

        if let Some(repository) = self.repository.clone() {
            let row = MatchRow::try_from(&next)?;
            run_blocking(move || repository.update(&row)).await?;
        }

        *record = next;
        // No viewers is fine; the update is simply dropped.
        let viewers = handle
            .updates
            .send(ScoreUpdate::new(UpdateKind::ScoreUpdate, &record))
            .unwrap_or(0);
        debug!(
            match_id = id,
            viewers,
            sets = ?record.state().sets(),
            winner = ?record.state().winner(),
            "Score updated"
        );
        Ok(record.clone())
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, MatchError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, DbError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| DbError::new(format!("Database task failed: {}", e)))?
        .map_err(MatchError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> MatchService {
        MatchService::new(None, 50, 16)
    }

    #[tokio::test]
    async fn test_create_rejects_best_of_five() {
        let new = NewMatch {
            best_of: 5,
            ..NewMatch::default()
        };
        let err = service().create_match(new).await.unwrap_err();
        assert!(matches!(err, MatchError::UnsupportedBestOf(5)));
    }

    #[tokio::test]
    async fn test_unknown_match_not_found() {
        let err = service().score_point("missing", Side::A).await.unwrap_err();
        assert!(matches!(err, MatchError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_share_code_lookup_finds_same_match() {
        let service = service();
        let created = service.create_match(NewMatch::default()).await.unwrap();
        let found = service
            .get_by_share_code(created.share_code())
            .await
            .unwrap();
        assert_eq!(found.id(), created.id());
    }

    #[tokio::test]
    async fn test_undo_on_fresh_match_fails() {
        let service = service();
        let created = service.create_match(NewMatch::default()).await.unwrap();
        let err = service.undo(created.id()).await.unwrap_err();
        assert!(matches!(err, MatchError::NothingToUndo));
    }

    #[test]
    fn test_scoring_error_converts() {
        let err = MatchError::from(ScoringError::TiebreakInProgress);
        assert!(matches!(err, MatchError::Scoring(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
