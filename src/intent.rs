//! Intent classification over transcribed text
//!
//! Pure substring matchers, no I/O. Substring matching is intentionally
//! over-broad (it catches phrase variants like "thanks a lot"); callers that
//! need a stricter matcher swap this module out without touching the
//! orchestrator.

/// Phrases that signal the user wants to end the session
const EXIT_PHRASES: &[&str] = &[
    "thank you",
    "thanks",
    "you solved my problem",
    "problem solved",
    "appreciate it",
    "that helped",
];

/// Phrases that signal the user has drifted away from emotional support
const OFF_TOPIC_PHRASES: &[&str] = &[
    "who is",
    "tell me about",
    "what is",
    "prime minister",
    "actor",
    "movie",
    "president",
    "cricketer",
    "capital of",
    "current news",
    "weather",
    "joke",
];

/// Whether the utterance contains a session-ending phrase
///
/// Case-insensitive; decides whether the session ends after the current
/// turn has been spoken and logged.
#[must_use]
pub fn is_exit_intent(text: &str) -> bool {
    let lower = text.to_lowercase();
    EXIT_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Whether the utterance is off-topic for an emotional support session
///
/// Evaluated before the language model is invoked; an off-topic turn
/// short-circuits to a fixed warning.
#[must_use]
pub fn is_off_topic(text: &str) -> bool {
    let lower = text.to_lowercase();
    OFF_TOPIC_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_phrases_match_as_substrings() {
        assert!(is_exit_intent("Thanks a lot!"));
        assert!(is_exit_intent("thank you so much"));
        assert!(is_exit_intent("okay, problem solved then"));
        assert!(is_exit_intent("I really appreciate it"));
    }

    #[test]
    fn exit_is_case_insensitive() {
        assert!(is_exit_intent("THANK YOU"));
        assert!(is_exit_intent("That Helped"));
    }

    #[test]
    fn non_exit_text_does_not_match() {
        assert!(!is_exit_intent("I feel sad"));
        assert!(!is_exit_intent(""));
        assert!(!is_exit_intent("I want to talk more"));
    }

    #[test]
    fn off_topic_phrases_match_as_substrings() {
        assert!(is_off_topic("what is the weather today"));
        assert!(is_off_topic("tell me a joke"));
        assert!(is_off_topic("who is the prime minister"));
        assert!(is_off_topic("WHAT IS the capital of France"));
    }

    #[test]
    fn on_topic_text_does_not_match() {
        assert!(!is_off_topic("I had a rough day at work"));
        assert!(!is_off_topic("I'm feeling anxious"));
        assert!(!is_off_topic(""));
    }
}
