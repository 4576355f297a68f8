//! Database persistence layer for match records.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::MatchRow;
pub use repository::MatchRepository;
