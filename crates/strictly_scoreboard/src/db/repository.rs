//! Database repository for match records.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, MatchRow, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for match persistence.
///
/// Each call opens its own SQLite connection, so the repository is cheap to
/// clone into blocking tasks.
#[derive(Debug, Clone)]
pub struct MatchRepository {
    db_path: String,
}

impl MatchRepository {
    /// Opens the database at the given path and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening MatchRepository");
        let repository = Self { db_path };
        repository.run_migrations()?;
        Ok(repository)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any migrations that have not run yet.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Inserts a newly created match.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the id or share code already exists or a
    /// database error occurs.
    #[instrument(skip(self, row), fields(match_id = %row.id()))]
    pub fn insert(&self, row: &MatchRow) -> Result<(), DbError> {
        debug!("Inserting match");
        let mut conn = self.connection()?;

        diesel::insert_into(schema::matches::table)
            .values(row)
            .execute(&mut conn)?;

        info!(share_code = %row.share_code(), "Match inserted");
        Ok(())
    }

    /// Writes the current score, history and timestamps of a match.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the match does not exist or a database error
    /// occurs.
    #[instrument(skip(self, row), fields(match_id = %row.id()))]
    pub fn update(&self, row: &MatchRow) -> Result<(), DbError> {
        use schema::matches::dsl;

        debug!("Saving match score");
        let mut conn = self.connection()?;

        let updated = diesel::update(dsl::matches.find(row.id().as_str()))
            .set((
                dsl::score_state.eq(row.score_state().as_str()),
                dsl::history.eq(row.history().as_str()),
                dsl::updated_at.eq(*row.updated_at()),
                dsl::finished_at.eq(*row.finished_at()),
            ))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(DbError::new(format!("Match '{}' not found", row.id())));
        }

        debug!("Match score saved");
        Ok(())
    }

    /// Gets a match by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find(&self, id: &str) -> Result<Option<MatchRow>, DbError> {
        let mut conn = self.connection()?;

        let row = schema::matches::table
            .find(id)
            .select(MatchRow::as_select())
            .first(&mut conn)
            .optional()?;

        debug!(found = row.is_some(), "Looked up match by id");
        Ok(row)
    }

    /// Gets a match by its spectator share code. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_by_share_code(&self, share_code: &str) -> Result<Option<MatchRow>, DbError> {
        let mut conn = self.connection()?;

        let row = schema::matches::table
            .filter(schema::matches::share_code.eq(share_code))
            .select(MatchRow::as_select())
            .first(&mut conn)
            .optional()?;

        debug!(found = row.is_some(), "Looked up match by share code");
        Ok(row)
    }

    /// Lists all matches, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<MatchRow>, DbError> {
        let mut conn = self.connection()?;

        let rows = schema::matches::table
            .order(schema::matches::created_at.asc())
            .select(MatchRow::as_select())
            .load(&mut conn)?;

        info!(count = rows.len(), "Matches loaded");
        Ok(rows)
    }
}
