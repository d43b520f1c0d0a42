use std::fmt;

use serde::{Deserialize, Serialize};

/// Fully-qualified Gemini model identifier (`models/<name>`).
///
/// Every lookup and request URL goes through this type, so canonicalization
/// happens exactly once, at the edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Canonicalizes a raw identifier. Bare names get the `models/` namespace
    /// prefixed; identifiers that already carry a namespace are kept as-is,
    /// which makes the operation idempotent. Whitespace-only input stays
    /// empty.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            ModelId(trimmed.to_string())
        } else {
            ModelId(format!("models/{trimmed}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name_gets_namespace() {
        assert_eq!(ModelId::new("gemini-1.5-flash").as_str(), "models/gemini-1.5-flash");
    }

    #[test]
    fn test_qualified_name_kept() {
        assert_eq!(ModelId::new("models/gemini-1.5-pro").as_str(), "models/gemini-1.5-pro");
        assert_eq!(ModelId::new("tunedModels/my-model").as_str(), "tunedModels/my-model");
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        for raw in ["gemini-1.5-flash", "models/imagen-3.0-generate-002", "  padded  ", ""] {
            let once = ModelId::new(raw);
            let twice = ModelId::new(once.as_str());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(ModelId::new("  gemini-1.5-pro ").as_str(), "models/gemini-1.5-pro");
        assert!(ModelId::new("   ").is_empty());
    }
}
