//! Wake-phrase gate
//!
//! Optional pre-session listener: short clips are captured and transcribed,
//! and the session only starts once an utterance begins with the configured
//! phrase. Off by default; the orchestrator drives the capture/transcribe
//! loop and asks this gate about each transcript.

/// Matches transcripts against a configured wake phrase
pub struct WakeGate {
    phrase: String,
}

impl WakeGate {
    /// Create a gate for the given phrase (normalized to lowercase)
    #[must_use]
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into().to_lowercase().trim().to_string(),
        }
    }

    /// The normalized wake phrase
    #[must_use]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Whether a transcript starts with the wake phrase, case-insensitively
    #[must_use]
    pub fn matches(&self, transcript: &str) -> bool {
        transcript
            .to_lowercase()
            .trim_start()
            .starts_with(&self.phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_prefix_case_insensitively() {
        let gate = WakeGate::new("hey solace");

        assert!(gate.matches("hey solace"));
        assert!(gate.matches("Hey Solace, are you there?"));
        assert!(gate.matches("  HEY SOLACE  "));
    }

    #[test]
    fn phrase_elsewhere_does_not_match() {
        let gate = WakeGate::new("hey solace");

        assert!(!gate.matches("I said hey solace"));
        assert!(!gate.matches("hello there"));
        assert!(!gate.matches(""));
    }

    #[test]
    fn phrase_is_normalized() {
        let gate = WakeGate::new("  Hey Solace  ");
        assert_eq!(gate.phrase(), "hey solace");
    }
}
