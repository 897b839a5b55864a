//! In-memory kit catalog.
//!
//! Built once from `kits_data.json` at startup and shared read-only.
//! Resolves kit IDs and order IDs case-insensitively and exactly.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use kitguide_shared::{Kit, KitGuideError, Result};

/// On-disk layout: `{"kits_by_id": {"<KIT_ID>": {..kit..}}}`.
#[derive(Debug, Deserialize)]
struct KitsDocument {
    #[serde(default)]
    kits_by_id: BTreeMap<String, Kit>,
}

/// Immutable kit table with case-insensitive indexes.
#[derive(Debug, Clone, Default)]
pub struct KitCatalog {
    kits: Vec<Kit>,
    by_kit_id: HashMap<String, usize>,
    by_order_id: HashMap<String, usize>,
}

impl KitCatalog {
    /// Load and validate the catalog from a JSON file.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| KitGuideError::io(path, e))?;
        let catalog = Self::from_json_str(&content)?;
        info!(kits = catalog.len(), "kit catalog loaded");
        Ok(catalog)
    }

    /// Parse and validate the catalog from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: KitsDocument = serde_json::from_str(json)
            .map_err(|e| KitGuideError::parse(format!("invalid kits document: {e}")))?;

        for (key, kit) in &doc.kits_by_id {
            if !key.eq_ignore_ascii_case(&kit.kit_id) {
                return Err(KitGuideError::validation(format!(
                    "kit stored under '{key}' declares kit_id '{}'",
                    kit.kit_id
                )));
            }
        }

        Self::from_kits(doc.kits_by_id.into_values())
    }

    /// Build the catalog from kit records, enforcing:
    /// - kit IDs unique (case-insensitive)
    /// - stage names unique within each kit
    /// - every order ID maps to exactly one kit (case-insensitive)
    pub fn from_kits(kits: impl IntoIterator<Item = Kit>) -> Result<Self> {
        let kits: Vec<Kit> = kits.into_iter().collect();
        let mut by_kit_id = HashMap::with_capacity(kits.len());
        let mut by_order_id = HashMap::new();

        for (idx, kit) in kits.iter().enumerate() {
            let key = normalize_identifier(&kit.kit_id);
            if key.is_empty() {
                return Err(KitGuideError::validation("kit with empty kit_id"));
            }
            if by_kit_id.insert(key, idx).is_some() {
                return Err(KitGuideError::validation(format!(
                    "duplicate kit_id '{}'",
                    kit.kit_id
                )));
            }

            let mut stage_names = HashSet::new();
            for stage in &kit.stages {
                if !stage_names.insert(stage.stage_name.as_str()) {
                    return Err(KitGuideError::validation(format!(
                        "kit '{}' has duplicate stage '{}'",
                        kit.kit_id, stage.stage_name
                    )));
                }
            }

            for order_id in &kit.order_ids {
                if let Some(other) = by_order_id.insert(normalize_identifier(order_id), idx) {
                    if other != idx {
                        return Err(KitGuideError::validation(format!(
                            "order_id '{order_id}' belongs to both '{}' and '{}'",
                            kits[other].kit_id, kit.kit_id
                        )));
                    }
                }
            }
        }

        debug!(
            kits = kits.len(),
            order_ids = by_order_id.len(),
            "kit catalog indexed"
        );

        Ok(Self {
            kits,
            by_kit_id,
            by_order_id,
        })
    }

    /// Exact, case-insensitive kit ID lookup. Surrounding whitespace is ignored.
    pub fn get_kit_by_id(&self, kit_id: &str) -> Result<&Kit> {
        self.by_kit_id
            .get(&normalize_identifier(kit_id))
            .map(|&idx| &self.kits[idx])
            .ok_or_else(|| KitGuideError::kit_not_found(kit_id.trim()))
    }

    /// Resolve a kit ID first, then an order ID.
    pub fn get_kit_by_identifier(&self, identifier: &str) -> Option<&Kit> {
        if let Ok(kit) = self.get_kit_by_id(identifier) {
            return Some(kit);
        }
        self.by_order_id
            .get(&normalize_identifier(identifier))
            .map(|&idx| &self.kits[idx])
    }

    /// All kits, ordered by kit ID.
    pub fn kits(&self) -> &[Kit] {
        &self.kits
    }

    pub fn len(&self) -> usize {
        self.kits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kits.is_empty()
    }
}

fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_uppercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
