use serde::{Deserialize, Serialize};

/// Stable identifier of a haplotype definition (e.g. `CA10000.1`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DefinitionId(pub String);

impl DefinitionId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a matched definition came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    /// A curated definition from the catalog
    Curated,
    /// Synthesized from the sample's deviations from the reference
    Combination,
    /// At least one of the definition's calls fell on a position the sample is missing
    Partial,
}

impl std::fmt::Display for CallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Curated => write!(f, "curated"),
            Self::Combination => write!(f, "combination"),
            Self::Partial => write!(f, "partial"),
        }
    }
}
