//! Core domain types for KitGuide kit records.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// One step of a kit's build/learning path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Display name, unique within the owning kit.
    pub stage_name: String,
    /// Precise assembly or wiring instructions.
    pub technical_content: String,
    /// Narrative framing for younger learners.
    pub story_explanation: String,
}

// ---------------------------------------------------------------------------
// Kit
// ---------------------------------------------------------------------------

/// A robotics kit with its ordered curriculum of stages.
///
/// Kits are loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kit {
    /// Canonical kit identifier (matched case-insensitively).
    pub kit_id: String,
    /// Order IDs that resolve to this kit (matched case-insensitively).
    #[serde(default)]
    pub order_ids: Vec<String>,
    /// Human-readable product name.
    pub kit_name: String,
    /// Age-group tag, e.g. `10-14`.
    pub age_group: String,
    /// Difficulty tag, e.g. `Beginner`.
    pub difficulty: String,
    /// Stages in declared order. The first one is the default stage.
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl Kit {
    /// Stage names in declared order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.stage_name.as_str()).collect()
    }

    /// Look up a stage by its exact name.
    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.stage_name == name)
    }

    /// Short reference used in chat responses.
    pub fn to_ref(&self) -> KitRef {
        KitRef {
            id: self.kit_id.clone(),
            name: self.kit_name.clone(),
        }
    }
}

/// `{id, name}` pair identifying a kit in API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitRef {
    pub id: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// StagePrediction
// ---------------------------------------------------------------------------

/// Outcome of classifying one message against a kit's stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagePrediction {
    /// Name of the chosen stage.
    pub stage: String,
    /// Confidence in `[0.3, 0.95]`.
    pub confidence: f64,
    /// Human-readable justification.
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kit_defaults_optional_collections() {
        let json = r#"{
            "kit_id": "RX-900",
            "kit_name": "Bare Kit",
            "age_group": "8-12",
            "difficulty": "Beginner"
        }"#;
        let kit: Kit = serde_json::from_str(json).expect("deserialize");
        assert!(kit.order_ids.is_empty());
        assert!(kit.stages.is_empty());
        assert!(kit.stage_names().is_empty());
    }

    #[test]
    fn stage_lookup_is_exact() {
        let kit = Kit {
            kit_id: "RX-1".into(),
            order_ids: vec![],
            kit_name: "Test".into(),
            age_group: "10-14".into(),
            difficulty: "Beginner".into(),
            stages: vec![Stage {
                stage_name: "Body Making".into(),
                technical_content: "Assemble chassis.".into(),
                story_explanation: "Build a home.".into(),
            }],
        };
        assert!(kit.stage("Body Making").is_some());
        assert!(kit.stage("body making").is_none());
        assert_eq!(kit.stage_names(), vec!["Body Making"]);
        assert_eq!(kit.to_ref().id, "RX-1");
    }

    #[test]
    fn kits_fixture_validates() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/kits.fixture.json")
            .expect("read fixture");
        let parsed: serde_json::Value =
            serde_json::from_str(&fixture).expect("deserialize fixture");
        let kit: Kit = serde_json::from_value(parsed["kits_by_id"]["RX-101"].clone())
            .expect("deserialize fixture kit");
        assert_eq!(kit.kit_name, "Line Follower Robot");
        assert_eq!(kit.stage_names(), vec!["Body Making", "Circuit Building"]);
    }
}
