//! Session ledger
//!
//! An in-memory, append-only record of completed turns, flushed to a JSON
//! file when the session ends. Turns are immutable once appended and the
//! ledger is only ever appended to — never mutated in place.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::emotion::EmotionLabel;
use crate::{Error, Result};

/// One completed exchange between the user and the companion
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// What the user said
    #[serde(rename = "user")]
    pub user_text: String,

    /// What the companion replied (real reply or deliberate error substitute)
    #[serde(rename = "assistant")]
    pub assistant_text: String,

    /// Emotion recorded for the turn (may be the placeholder default when
    /// the background estimate had not landed in time)
    pub emotion: EmotionLabel,

    /// Language tag of the user's utterance
    pub language: String,

    /// Local wall-clock time of the exchange (HH:MM:SS)
    pub timestamp: NaiveTime,
}

impl Turn {
    /// Create a turn stamped with the current local time
    #[must_use]
    pub fn new(
        user_text: impl Into<String>,
        assistant_text: impl Into<String>,
        emotion: EmotionLabel,
        language: impl Into<String>,
    ) -> Self {
        let now = Local::now().time();
        Self {
            user_text: user_text.into(),
            assistant_text: assistant_text.into(),
            emotion,
            language: language.into(),
            // Whole seconds only, matching the persisted HH:MM:SS format
            timestamp: now.with_nanosecond(0).unwrap_or(now),
        }
    }
}

/// A conversation session: an ordered ledger of turns
#[derive(Debug)]
pub struct Session {
    start_time: DateTime<Local>,
    turns: Vec<Turn>,
    active: bool,
}

impl Session {
    /// Start a new, active session
    #[must_use]
    pub fn start() -> Self {
        Self {
            start_time: Local::now(),
            turns: Vec::new(),
            active: true,
        }
    }

    /// Append a completed turn to the ledger
    pub fn append(&mut self, turn: Turn) {
        tracing::debug!(turns = self.turns.len() + 1, "turn appended to ledger");
        self.turns.push(turn);
    }

    /// The ordered turns recorded so far
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Whether the session is still accepting turns
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// When the session started
    #[must_use]
    pub const fn start_time(&self) -> DateTime<Local> {
        self.start_time
    }

    /// Mark the session inactive (terminal; no further captures)
    pub fn end(&mut self) {
        self.active = false;
    }

    /// File name for this session's flushed ledger, derived from start time
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "solace_session_{}.json",
            self.start_time.format("%Y%m%d_%H%M%S")
        )
    }

    /// Flush the full ordered ledger to `data_dir` as a JSON array
    ///
    /// The in-memory turns are untouched; a failed flush loses nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the directory cannot be created or
    /// the file cannot be written
    pub fn flush(&self, data_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(data_dir)
            .map_err(|e| Error::Persistence(format!("creating {}: {e}", data_dir.display())))?;

        let path = data_dir.join(self.file_name());
        let json = serde_json::to_string_pretty(&self.turns)
            .map_err(|e| Error::Persistence(e.to_string()))?;

        std::fs::write(&path, json)
            .map_err(|e| Error::Persistence(format!("writing {}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), turns = self.turns.len(), "session ledger flushed");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_append_in_order() {
        let mut session = Session::start();
        assert!(session.is_active());

        session.append(Turn::new("one", "a", EmotionLabel::Neutral, "en"));
        session.append(Turn::new("two", "b", EmotionLabel::Neutral, "en"));

        let turns = session.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].user_text, "one");
        assert_eq!(turns[1].user_text, "two");
    }

    #[test]
    fn end_deactivates() {
        let mut session = Session::start();
        session.end();
        assert!(!session.is_active());
    }

    #[test]
    fn file_name_uses_start_timestamp() {
        let session = Session::start();
        let name = session.file_name();
        assert!(name.starts_with("solace_session_"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn turn_serializes_with_record_field_names() {
        let turn = Turn::new("hi", "hello", EmotionLabel::Neutral, "english");
        let value = serde_json::to_value(&turn).unwrap();
        assert!(value.get("user").is_some());
        assert!(value.get("assistant").is_some());
        assert!(value.get("emotion").is_some());
        assert!(value.get("language").is_some());
        assert!(value.get("timestamp").is_some());
    }
}
