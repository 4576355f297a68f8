//! Errors raised by the scoring engine.

/// A scoring request that cannot be represented under the current rules.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ScoringError {
    /// A side index other than 0 or 1 was supplied.
    #[display("Invalid side {}: expected 0 or 1", _0)]
    InvalidSide(i64),

    /// A whole game cannot be awarded while a tiebreak is running.
    #[display("Cannot award a game during a tiebreak")]
    TiebreakInProgress,

    /// A transition produced a state that breaks a scoring invariant.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for ScoringError {}
