//! In-memory activity log for the shell
//!
//! Records what was submitted in which view and how it ended. Discarded on
//! exit; nothing is persisted.

use crate::views::ViewKind;
use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

/// Maximum number of actions kept in the log
const MAX_HISTORY_SIZE: usize = 200;

/// Longest input excerpt kept per record
const PREVIEW_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Completed,
    Cancelled,
    Rejected,
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStatus::Completed => write!(f, "completed"),
            ActionStatus::Cancelled => write!(f, "cancelled"),
            ActionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// One submitted action
#[derive(Debug, Clone)]
pub struct ActionRecord {
    pub view: ViewKind,
    pub action: String,
    pub input_preview: String,
    pub status: ActionStatus,
    pub duration_ms: u64,
}

impl ActionRecord {
    pub fn new(view: ViewKind, action: &str, input: &str, status: ActionStatus, duration_ms: u64) -> Self {
        Self {
            view,
            action: action.to_string(),
            input_preview: preview(input),
            status,
            duration_ms,
        }
    }
}

/// First line of `input`, cut to `PREVIEW_CHARS` characters
pub fn preview(input: &str) -> String {
    let first_line = input.lines().next().unwrap_or("");
    let mut out: String = first_line.chars().take(PREVIEW_CHARS).collect();
    if first_line.chars().count() > PREVIEW_CHARS || input.lines().count() > 1 {
        out.push('…');
    }
    out
}

/// Bounded log of this shell session's actions
pub struct ActivityLog {
    history: VecDeque<ActionRecord>,
    started: Instant,
    total: usize,
}

impl ActivityLog {
    pub fn new() -> Self {
        ActivityLog {
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
            started: Instant::now(),
            total: 0,
        }
    }

    pub fn record(&mut self, record: ActionRecord) {
        if self.history.len() >= MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
        self.history.push_back(record);
        self.total += 1;
    }

    /// Up to `limit` most recent records, newest first
    pub fn recent(&self, limit: usize) -> Vec<&ActionRecord> {
        self.history.iter().rev().take(limit).collect()
    }

    pub fn count_with(&self, status: ActionStatus) -> usize {
        self.history.iter().filter(|r| r.status == status).count()
    }

    /// Total actions recorded, including ones evicted from the log
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn session_duration_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(action: &str, status: ActionStatus) -> ActionRecord {
        ActionRecord::new(ViewKind::Clinical, action, "input", status, 100)
    }

    #[test]
    fn test_log_creation() {
        let log = ActivityLog::new();
        assert!(log.is_empty());
        assert_eq!(log.total(), 0);
    }

    #[test]
    fn test_recent_newest_first() {
        let mut log = ActivityLog::new();
        for i in 0..10 {
            log.record(record(&format!("action {}", i), ActionStatus::Completed));
        }

        let recent = log.recent(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].action, "action 9");
        assert_eq!(recent[2].action, "action 7");
    }

    #[test]
    fn test_history_bounded() {
        let mut log = ActivityLog::new();
        for i in 0..(MAX_HISTORY_SIZE + 50) {
            log.record(record(&format!("action {}", i), ActionStatus::Completed));
        }
        assert_eq!(log.len(), MAX_HISTORY_SIZE);
        assert_eq!(log.total(), MAX_HISTORY_SIZE + 50);
    }

    #[test]
    fn test_count_with_status() {
        let mut log = ActivityLog::new();
        log.record(record("a", ActionStatus::Completed));
        log.record(record("b", ActionStatus::Cancelled));
        log.record(record("c", ActionStatus::Cancelled));
        assert_eq!(log.count_with(ActionStatus::Cancelled), 2);
        assert_eq!(log.count_with(ActionStatus::Rejected), 0);
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview("line one\nline two"), "line one…");
        let long = "x".repeat(100);
        assert_eq!(preview(&long).chars().count(), PREVIEW_CHARS + 1);
    }
}
