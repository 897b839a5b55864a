//! Context gate: is a learner's message about this kit at all?
//!
//! The gate compares message tokens against a vocabulary built from the
//! kit's own text. A single shared token is enough to pass; this is a loose
//! topic filter, not a classifier.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use kitguide_shared::Kit;

/// Vocabulary tokens must be strictly longer than this.
const MIN_TOKEN_EXCLUSIVE_LEN: usize = 2;

/// Lowercase `text` and split it into maximal ASCII alphanumeric runs.
pub fn tokenize(text: &str) -> HashSet<String> {
    static TOKEN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("valid regex"));

    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// KitVocabulary
// ---------------------------------------------------------------------------

/// Tokens longer than two characters drawn from a kit's name and every
/// stage's name, technical content, and story text.
#[derive(Debug, Clone, Default)]
pub struct KitVocabulary {
    tokens: HashSet<String>,
}

impl KitVocabulary {
    /// Build the vocabulary for one kit.
    pub fn for_kit(kit: &Kit) -> Self {
        let mut tokens = tokenize(&kit.kit_name);
        for stage in &kit.stages {
            tokens.extend(tokenize(&stage.stage_name));
            tokens.extend(tokenize(&stage.technical_content));
            tokens.extend(tokenize(&stage.story_explanation));
        }
        tokens.retain(|t| t.len() > MIN_TOKEN_EXCLUSIVE_LEN);

        Self { tokens }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Whether the message shares at least one token with this vocabulary.
    /// Messages with no tokens never match.
    pub fn admits(&self, message: &str) -> bool {
        let message_tokens = tokenize(message);
        if message_tokens.is_empty() {
            return false;
        }
        message_tokens.iter().any(|t| self.tokens.contains(t))
    }
}

/// Decide whether `message` is plausibly about `kit`.
pub fn is_in_context(message: &str, kit: &Kit) -> bool {
    let vocabulary = KitVocabulary::for_kit(kit);
    let in_context = vocabulary.admits(message);
    debug!(
        kit_id = %kit.kit_id,
        vocabulary = vocabulary.tokens.len(),
        in_context,
        "context gate evaluated"
    );
    in_context
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use kitguide_shared::Stage;

    fn line_follower() -> Kit {
        Kit {
            kit_id: "RX-101".into(),
            order_ids: vec!["ORD-1001".into()],
            kit_name: "Line Follower Robot".into(),
            age_group: "10-14".into(),
            difficulty: "Beginner".into(),
            stages: vec![
                Stage {
                    stage_name: "Body Making".into(),
                    technical_content: "Assemble chassis and fix the LED on the AI board.".into(),
                    story_explanation: "You are designing a stable robot frame.".into(),
                },
                Stage {
                    stage_name: "Circuit Building".into(),
                    technical_content: "Connect sensors using color-coded wires.".into(),
                    story_explanation: "Your robot is learning to read track signals.".into(),
                },
            ],
        }
    }

    #[test]
    fn tokenize_splits_on_non_alphanumerics() {
        let tokens = tokenize("Hello, WORLD! rx-101_v2");
        let expected: HashSet<String> = ["hello", "world", "rx", "101", "v2"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn tokenize_empty_and_punctuation_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("?!... --").is_empty());
    }

    #[test]
    fn vocabulary_drops_short_tokens() {
        let vocab = KitVocabulary::for_kit(&line_follower());
        assert!(vocab.contains("led"));
        assert!(vocab.contains("chassis"));
        assert!(vocab.contains("follower"));
        assert!(!vocab.contains("ai"));
        assert!(!vocab.contains("on"));
    }

    #[test]
    fn empty_message_is_out_of_context() {
        let kit = line_follower();
        assert!(!is_in_context("", &kit));
        assert!(!is_in_context("   \t\n", &kit));
        assert!(!is_in_context("???", &kit));
    }

    #[test]
    fn unrelated_message_is_out_of_context() {
        let kit = line_follower();
        assert!(!is_in_context("Capital of France, please?", &kit));
    }

    #[test]
    fn short_shared_tokens_do_not_pass() {
        // "ai" appears in the kit text but is filtered out of the vocabulary.
        let kit = line_follower();
        assert!(!is_in_context("AI", &kit));
    }

    #[test]
    fn adding_a_kit_token_flips_the_gate() {
        let kit = line_follower();
        let base = "capital of france please";
        assert!(!is_in_context(base, &kit));

        for token in ["follower", "circuit", "chassis", "signals"] {
            let message = format!("{base} {token}");
            assert!(is_in_context(&message, &kit), "token {token} should pass");
        }
    }

    #[test]
    fn generic_story_word_is_enough() {
        // "your" comes only from the story text.
        let kit = line_follower();
        assert!(is_in_context("is this your favourite?", &kit));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let kit = line_follower();
        assert!(is_in_context("CHASSIS!!", &kit));
    }

    #[test]
    fn kit_without_stages_uses_name_only() {
        let mut kit = line_follower();
        kit.stages.clear();
        assert!(is_in_context("my robot stopped", &kit));
        assert!(!is_in_context("my chassis cracked", &kit));
    }

    #[test]
    fn gate_is_idempotent() {
        let kit = line_follower();
        let message = "How do I wire the sensors?";
        let first = is_in_context(message, &kit);
        for _ in 0..5 {
            assert_eq!(is_in_context(message, &kit), first);
        }
    }
}
