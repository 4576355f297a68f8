//! Bounded undo history of match states.

use std::collections::VecDeque;

use strictly_tennis::MatchState;
use tracing::{debug, instrument};

/// Default number of states kept for undo.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Ring buffer of previous states, newest last.
///
/// Pushing onto a full log discards the oldest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoLog {
    states: VecDeque<MatchState>,
    capacity: usize,
}

impl UndoLog {
    /// Creates an empty log holding at most `capacity` states.
    pub fn new(capacity: usize) -> Self {
        Self {
            states: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuilds a log from stored states (oldest first), keeping the newest
    /// `capacity` of them.
    #[instrument(skip(states), fields(stored = states.len()))]
    pub fn from_states(states: Vec<MatchState>, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        for state in states {
            log.push(state);
        }
        log
    }

    /// Records a previous state.
    pub fn push(&mut self, state: MatchState) {
        if self.capacity == 0 {
            return;
        }
        if self.states.len() == self.capacity {
            self.states.pop_front();
            debug!(capacity = self.capacity, "Undo history full, dropped oldest state");
        }
        self.states.push_back(state);
    }

    /// Removes and returns the most recent state.
    pub fn pop(&mut self) -> Option<MatchState> {
        self.states.pop_back()
    }

    /// Discards every stored state.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Number of stored states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Maximum number of stored states.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates stored states, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MatchState> {
        self.states.iter()
    }
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_tennis::{Side, apply_point};

    fn sequence(count: usize) -> Vec<MatchState> {
        let mut states = vec![MatchState::default()];
        for _ in 1..count {
            let last = states.last().cloned().unwrap_or_default();
            states.push(apply_point(&last, Side::A).into_state());
        }
        states
    }

    #[test]
    fn test_pop_returns_newest_first() {
        let states = sequence(3);
        let mut log = UndoLog::new(10);
        for state in states.iter().cloned() {
            log.push(state);
        }
        assert_eq!(log.pop(), Some(states[2].clone()));
        assert_eq!(log.pop(), Some(states[1].clone()));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_full_log_drops_oldest() {
        let states = sequence(4);
        let mut log = UndoLog::new(2);
        for state in states.iter().cloned() {
            log.push(state);
        }
        assert_eq!(log.len(), 2);
        let kept: Vec<_> = log.iter().cloned().collect();
        assert_eq!(kept, vec![states[2].clone(), states[3].clone()]);
    }

    #[test]
    fn test_from_states_truncates_to_capacity() {
        let log = UndoLog::from_states(sequence(5), 3);
        assert_eq!(log.len(), 3);
        assert_eq!(log.capacity(), 3);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut log = UndoLog::new(0);
        log.push(MatchState::default());
        assert!(log.is_empty());
        assert_eq!(log.pop(), None);
    }
}
