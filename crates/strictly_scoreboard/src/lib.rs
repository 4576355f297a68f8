//! Strictly Scoreboard - live tennis scoring service
//!
//! Keeps matches scored by courtside scorers and pushes every change to
//! spectators over WebSocket.
//!
//! # Architecture
//!
//! - **Records**: [`MatchRecord`] pairs a [`strictly_tennis::MatchState`] with
//!   team details and a bounded [`UndoLog`].
//! - **Service**: [`MatchService`] gives each match its own lock and
//!   broadcast channel; changes are persisted before they are broadcast.
//! - **API**: [`router`] exposes the REST routes and the `/ws/{id}` feed.
//! - **Storage**: [`MatchRepository`] keeps matches in SQLite via diesel.
//!
//! # Example
//!
//! ```no_run
//! use strictly_scoreboard::{MatchService, NewMatch};
//! use strictly_tennis::Side;
//!
//! # async fn example() -> Result<(), strictly_scoreboard::MatchError> {
//! let service = MatchService::new(None, 50, 64);
//! let record = service.create_match(NewMatch::default()).await?;
//! let record = service.score_point(record.id(), Side::A).await?;
//! assert_eq!(record.state().points(), [1, 0]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod broadcast;
mod config;
mod db;
mod record;
mod service;
mod undo;

// Crate-level exports - API
pub use api::{ErrorBody, MutationResponse, ScoreRequest, router};

// Crate-level exports - Live updates
pub use broadcast::{ScoreUpdate, UpdateKind};

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Persistence
pub use db::{DbError, MatchRepository, MatchRow};

// Crate-level exports - Match records
pub use record::{MatchRecord, MatchType, MatchView, NewMatch, SUPPORTED_BEST_OF};

// Crate-level exports - Service
pub use service::{MatchError, MatchService};

// Crate-level exports - Undo history
pub use undo::{DEFAULT_HISTORY_LIMIT, UndoLog};
