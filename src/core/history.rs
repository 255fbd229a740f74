//! Transition history tracking.
//!
//! Records every activation the runner starts, bounded to a configurable
//! number of entries so a long-lived machine does not grow without limit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use uuid::Uuid;

/// Record of a single activation start.
///
/// # Example
///
/// ```rust
/// use linkstate::core::{StateHistory, TransitionRecord};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let mut history = StateHistory::new();
/// history.record(TransitionRecord {
///     from: None,
///     to: "Splash".to_string(),
///     timestamp: Utc::now(),
///     activation: Uuid::new_v4(),
/// });
/// history.record(TransitionRecord {
///     from: Some("Splash".to_string()),
///     to: "Menu".to_string(),
///     timestamp: Utc::now(),
///     activation: Uuid::new_v4(),
/// });
///
/// assert_eq!(history.get_path(), vec!["Splash", "Menu"]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Name of the state that was current before, if any
    pub from: Option<String>,
    /// Name of the state that became current
    pub to: String,
    /// When the new activation started
    pub timestamp: DateTime<Utc>,
    /// Identifier of the new activation
    pub activation: Uuid,
}

/// Ordered, optionally bounded history of transitions.
///
/// When a limit is set, the oldest records are discarded first.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: VecDeque<TransitionRecord>,
    limit: Option<usize>,
}

impl StateHistory {
    /// Create an unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history keeping at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(64)),
            limit: Some(limit),
        }
    }

    /// Maximum number of retained records, if bounded.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Append a record, discarding the oldest when over the limit.
    pub fn record(&mut self, transition: TransitionRecord) {
        if self.limit == Some(0) {
            return;
        }
        if let Some(limit) = self.limit {
            while self.transitions.len() >= limit {
                self.transitions.pop_front();
            }
        }
        self.transitions.push_back(transition);
    }

    /// Names of the states traversed, in order.
    ///
    /// Starts with the `from` of the oldest retained record when it has one.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(from) = self.transitions.front().and_then(|t| t.from.as_deref()) {
            path.push(from);
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Time between the first and last retained record.
    ///
    /// Returns `None` if there are no records.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Iterate over retained records, oldest first.
    pub fn transitions(&self) -> impl ExactSizeIterator<Item = &TransitionRecord> {
        self.transitions.iter()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&TransitionRecord> {
        self.transitions.back()
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
