//! Prompt construction for the response generator

use crate::emotion::EmotionLabel;

/// Build the full prompt for one turn
///
/// A fixed template framing the companion role, the emotion label chosen for
/// prompt construction (the latency-safe default, not necessarily the final
/// estimate), the user's language, and the literal utterance.
#[must_use]
pub fn build_prompt(
    name: &str,
    emotion: EmotionLabel,
    language: &str,
    user_text: &str,
) -> String {
    format!(
        "You are {name}, an empathetic multilingual companion for emotional support and well-being.\n\
         \n\
         User Emotion: {emotion}\n\
         Language: {language}\n\
         Query: {user_text}\n\
         \n\
         Based on the emotional tone, craft a deeply empathetic, helpful, and relevant response \
         in the user's language. Keep responses concise and conversational.\n\
         User: {user_text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_all_parameters() {
        let prompt = build_prompt(
            "Solace",
            EmotionLabel::Sadness,
            "english",
            "I had a terrible day",
        );

        assert!(prompt.contains("You are Solace"));
        assert!(prompt.contains("User Emotion: sadness"));
        assert!(prompt.contains("Language: english"));
        assert!(prompt.contains("I had a terrible day"));
    }

    #[test]
    fn utterance_is_embedded_literally() {
        let prompt = build_prompt(
            "Solace",
            EmotionLabel::Neutral,
            "english",
            "what's \"up\" & <stuff>",
        );
        assert!(prompt.contains("what's \"up\" & <stuff>"));
    }
}
