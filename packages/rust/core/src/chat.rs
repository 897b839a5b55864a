//! Chat orchestration: identifier → kit → gate → classifier → guidance.
//!
//! [`KitGuide`] owns the catalog and classifier and is shared read-only by
//! the HTTP layer and the CLI.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use kitguide_shared::{Kit, KitGuideError, KitRef, Result};

use crate::catalog::KitCatalog;
use crate::classifier::{DEFAULT_STAGE, StageClassifier};
use crate::gate;
use crate::tone;

/// Questions offered when a learner opens a session.
pub const NEXT_QUESTIONS: [&str; 3] = [
    "Do you need help with mechanical assembly?",
    "Are you working on wiring or calibration?",
    "Would you like a story-based explanation first?",
];

/// Questions offered after an out-of-scope message.
pub const SUGGESTED_QUESTIONS: [&str; 3] = [
    "How do I complete the mechanical assembly stage?",
    "How should I wire sensors and motor drivers safely?",
    "Can you explain this step with a simple story?",
];

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Kit summary returned when a session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStart {
    pub kit_id: String,
    pub kit_name: String,
    pub age_group: String,
    pub difficulty: String,
    pub next_questions: Vec<String>,
}

/// Reply to a message the context gate rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeRefusal {
    pub kit: KitRef,
    pub out_of_scope: bool,
    pub response: String,
    pub suggested_questions: Vec<String>,
}

/// Stage-specific guidance for an in-scope message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guidance {
    pub kit: KitRef,
    pub out_of_scope: bool,
    pub predicted_stage: String,
    pub confidence: f64,
    pub reasoning: String,
    pub tone_policy: String,
    pub response: String,
}

/// One chat turn's outcome. Serializes as the inner object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatReply {
    Guided(Guidance),
    OutOfScope(ScopeRefusal),
}

impl ChatReply {
    pub fn is_out_of_scope(&self) -> bool {
        matches!(self, Self::OutOfScope(_))
    }
}

// ---------------------------------------------------------------------------
// KitGuide
// ---------------------------------------------------------------------------

/// Read-only tutoring service over a loaded catalog.
#[derive(Debug, Clone)]
pub struct KitGuide {
    catalog: KitCatalog,
    classifier: StageClassifier,
}

impl KitGuide {
    pub fn new(catalog: KitCatalog, classifier: StageClassifier) -> Self {
        Self {
            catalog,
            classifier,
        }
    }

    /// Guide using the built-in keyword table.
    pub fn with_builtin_keywords(catalog: KitCatalog) -> Self {
        Self::new(catalog, StageClassifier::default())
    }

    pub fn catalog(&self) -> &KitCatalog {
        &self.catalog
    }

    /// Exact kit ID lookup.
    pub fn kit(&self, kit_id: &str) -> Result<&Kit> {
        self.catalog.get_kit_by_id(kit_id)
    }

    fn resolve(&self, identifier: &str) -> Result<&Kit> {
        self.catalog.get_kit_by_identifier(identifier).ok_or_else(|| {
            warn!(identifier, "no kit for identifier");
            KitGuideError::kit_not_found(identifier.trim())
        })
    }

    /// Resolve an order or kit ID and summarize the kit.
    #[instrument(skip(self))]
    pub fn start_session(&self, identifier: &str) -> Result<SessionStart> {
        let kit = self.resolve(identifier)?;
        info!(kit_id = %kit.kit_id, "session started");

        Ok(SessionStart {
            kit_id: kit.kit_id.clone(),
            kit_name: kit.kit_name.clone(),
            age_group: kit.age_group.clone(),
            difficulty: kit.difficulty.clone(),
            next_questions: NEXT_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        })
    }

    /// Resolve the identifier and answer one message.
    #[instrument(skip(self, message), fields(message_len = message.len()))]
    pub fn chat(&self, identifier: &str, message: &str) -> Result<ChatReply> {
        let kit = self.resolve(identifier)?;
        Ok(self.reply_for_kit(kit, message))
    }

    /// Answer one message for an already-resolved kit.
    pub fn reply_for_kit(&self, kit: &Kit, message: &str) -> ChatReply {
        if !gate::is_in_context(message, kit) {
            info!(kit_id = %kit.kit_id, "message outside kit scope");
            return ChatReply::OutOfScope(ScopeRefusal {
                kit: kit.to_ref(),
                out_of_scope: true,
                response: format!(
                    "I can only help with the '{}' kit. \
                     Please ask about assembly, wiring, testing, or troubleshooting for this kit.",
                    kit.kit_name
                ),
                suggested_questions: SUGGESTED_QUESTIONS.iter().map(|q| q.to_string()).collect(),
            });
        }

        let prediction = self.classifier.classify(message, &kit.stage_names());

        let response = match kit.stage(&prediction.stage).or_else(|| kit.stages.first()) {
            Some(stage) => format!(
                "For {}: {} Story: {}",
                stage.stage_name, stage.technical_content, stage.story_explanation
            ),
            None => format!(
                "For {DEFAULT_STAGE}: Ask about a specific step of the '{}' kit.",
                kit.kit_name
            ),
        };

        info!(
            kit_id = %kit.kit_id,
            stage = %prediction.stage,
            confidence = prediction.confidence,
            "guidance prepared"
        );

        ChatReply::Guided(Guidance {
            kit: kit.to_ref(),
            out_of_scope: false,
            predicted_stage: prediction.stage,
            confidence: prediction.confidence,
            reasoning: prediction.reasoning,
            tone_policy: tone::age_tuned_tone(&kit.age_group).to_string(),
            response,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
