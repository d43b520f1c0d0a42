use std::collections::{HashMap, HashSet};

use strum_macros::{Display, EnumIter};

use crate::models::model_id::ModelId;

/// The two Gemini operation families, named after their wire methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Operation {
    #[strum(serialize = "generateContent")]
    GenerateContent,
    #[strum(serialize = "generateImages")]
    GenerateImages,
}

/// Model suggested to a fresh session before the user picks one.
pub const DEFAULT_MODEL: &str = "models/gemini-1.5-flash";

/// Substring marking the image-generation model family. Best-effort fallback
/// for identifiers the registry has never seen, not a guaranteed classifier.
const IMAGE_FAMILY_MARKER: &str = "imagen";

const DEFAULT_MODELS: &[(&str, Operation)] = &[
    ("models/gemini-1.5-flash", Operation::GenerateContent),
    ("models/gemini-1.5-pro", Operation::GenerateContent),
    ("models/nonobanana-3", Operation::GenerateContent),
    ("models/imagen-4.0-generate-001", Operation::GenerateImages),
    ("models/imagen-4.0-ultra-generate-001", Operation::GenerateImages),
    ("models/imagen-4.0-fast-generate-001", Operation::GenerateImages),
    ("models/imagen-3.0-generate-002", Operation::GenerateImages),
];

/// Maps model identifiers to the operations they are believed to support.
///
/// Seeded with the known models; unknown identifiers are classified once by
/// the naming heuristic and the result is cached for the registry's lifetime,
/// so every turn of a session sees the same answer.
#[derive(Debug)]
pub struct CapabilityRegistry {
    entries: HashMap<ModelId, HashSet<Operation>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        let mut entries: HashMap<ModelId, HashSet<Operation>> = HashMap::new();
        for (name, operation) in DEFAULT_MODELS {
            entries
                .entry(ModelId::new(name))
                .or_default()
                .insert(*operation);
        }
        Self { entries }
    }

    /// Total lookup: the seeded table first, then the naming heuristic.
    /// Never fails; an unknown identifier always resolves to exactly one
    /// inferred operation.
    pub fn resolve(&mut self, model: &ModelId) -> &HashSet<Operation> {
        self.entries.entry(model.clone()).or_insert_with(|| {
            let inferred = if model.as_str().contains(IMAGE_FAMILY_MARKER) {
                Operation::GenerateImages
            } else {
                Operation::GenerateContent
            };
            tracing::debug!("Unknown model {}, assuming {}", model, inferred);
            HashSet::from([inferred])
        })
    }

    pub fn supports(&mut self, model: &ModelId, operation: Operation) -> bool {
        self.resolve(model).contains(&operation)
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
