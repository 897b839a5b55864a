//! Core tutoring logic for KitGuide.
//!
//! - [`gate`] — decides whether a message is about the learner's kit
//! - [`classifier`] — routes an in-scope message to the most relevant stage
//! - [`tone`] — age-group tone hints
//! - [`catalog`] — the immutable kit table
//! - [`chat`] — ties the above together into session and chat replies

pub mod catalog;
pub mod chat;
pub mod classifier;
pub mod gate;
pub mod tone;

pub use catalog::KitCatalog;
pub use chat::{ChatReply, Guidance, KitGuide, ScopeRefusal, SessionStart};
pub use classifier::{DEFAULT_STAGE, KeywordTable, StageClassifier, classify_stage};
pub use gate::{KitVocabulary, is_in_context};
pub use tone::age_tuned_tone;

// Names used by the HTTP-facing API.
pub use classifier::classify_stage as classify;
pub use gate::is_in_context as evaluate_context;
pub use tone::age_tuned_tone as tone_for;

#[cfg(test)]
mod tests {
    use super::*;
    use kitguide_shared::{Kit, Stage};

    #[test]
    fn classify_without_keywords_uses_first_stage() {
        let p = classify("", &["Body Making", "Circuit Building"]);
        assert_eq!(p.stage, "Body Making");
        assert!((p.confidence - 0.3).abs() < 1e-9);
        assert_eq!(
            p.reasoning,
            "No explicit stage keywords detected; using first stage as default learning path."
        );
    }

    #[test]
    fn tone_for_known_and_unknown_groups() {
        assert_eq!(
            tone_for("10-14"),
            "Use short, playful sentences with vivid analogies."
        );
        assert_eq!(
            tone_for("99-100"),
            "Use clear and supportive educational language."
        );
    }

    #[test]
    fn evaluate_context_on_kit_text() {
        let kit = Kit {
            kit_id: "RX-101".into(),
            order_ids: vec![],
            kit_name: "Line Follower Robot".into(),
            age_group: "10-14".into(),
            difficulty: "Beginner".into(),
            stages: vec![Stage {
                stage_name: "Body Making".into(),
                technical_content: "Assemble chassis.".into(),
                story_explanation: "A stable frame.".into(),
            }],
        };
        assert!(evaluate_context("my chassis wobbles", &kit));
        assert!(!evaluate_context("", &kit));
    }
}
