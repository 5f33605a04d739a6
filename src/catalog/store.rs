use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::definition::{DefinitionError, HaplotypeDefinition, RawDefinition};
use crate::core::position::Position;
use crate::core::types::DefinitionId;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid definition in {gene}: {source}")]
    Definition {
        gene: String,
        #[source]
        source: DefinitionError,
    },

    #[error("{gene} has no reference definition")]
    MissingReference { gene: String },

    #[error("{gene} has {count} reference definitions, expected exactly one")]
    MultipleReferences { gene: String, count: usize },

    #[error("{gene} is defined more than once")]
    DuplicateGene { gene: String },

    #[error("{gene} has more than one definition with id {id}")]
    DuplicateDefinition { gene: String, id: DefinitionId },
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable definition data for one gene
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneDefinitionData {
    pub gene: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chromosome: Option<String>,
    pub positions: Vec<Position>,
    pub named_alleles: Vec<RawDefinition>,
}

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogData {
    pub version: String,
    #[serde(default)]
    pub created_at: String,
    pub genes: Vec<GeneDefinitionData>,
}

/// The positions and initialized definitions of one gene
#[derive(Debug, Clone)]
pub struct GeneDefinitions {
    gene: String,
    positions: Arc<[Position]>,

    /// In canonical order, so the reference is always first
    definitions: Vec<Arc<HaplotypeDefinition>>,

    /// Index: definition ID -> index in definitions vec
    id_to_index: HashMap<DefinitionId, usize>,
}

impl GeneDefinitions {
    /// Validate and initialize a gene's curated definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if any definition is not aligned with `positions`, if two
    /// definitions share an id, or if the gene does not have exactly one reference
    /// definition.
    pub fn new(
        gene: impl Into<String>,
        positions: Vec<Position>,
        raw_definitions: Vec<RawDefinition>,
    ) -> Result<Self, CatalogError> {
        let gene = gene.into();
        let positions: Arc<[Position]> = positions.into();

        let references = raw_definitions.iter().filter(|d| d.reference).count();
        match references {
            0 => return Err(CatalogError::MissingReference { gene }),
            1 => {}
            count => return Err(CatalogError::MultipleReferences { gene, count }),
        }

        let mut definitions = Vec::with_capacity(raw_definitions.len());
        for raw in raw_definitions {
            match raw.initialize(&positions) {
                Ok(def) => definitions.push(Arc::new(def)),
                Err(source) => return Err(CatalogError::Definition { gene, source }),
            }
        }
        definitions.sort();

        let mut id_to_index = HashMap::with_capacity(definitions.len());
        for (i, def) in definitions.iter().enumerate() {
            if id_to_index.insert(def.id().clone(), i).is_some() {
                return Err(CatalogError::DuplicateDefinition {
                    gene,
                    id: def.id().clone(),
                });
            }
        }

        Ok(Self {
            gene,
            positions,
            definitions,
            id_to_index,
        })
    }

    pub fn gene(&self) -> &str {
        &self.gene
    }

    pub fn positions(&self) -> &Arc<[Position]> {
        &self.positions
    }

    pub fn definitions(&self) -> &[Arc<HaplotypeDefinition>] {
        &self.definitions
    }

    pub fn reference(&self) -> &Arc<HaplotypeDefinition> {
        // sorted canonically and validated to contain exactly one reference
        &self.definitions[0]
    }

    pub fn get(&self, id: &DefinitionId) -> Option<&Arc<HaplotypeDefinition>> {
        self.id_to_index.get(id).map(|&idx| &self.definitions[idx])
    }

    /// Copies of the definitions with the sample's missing positions removed.
    ///
    /// Each copy records which of its calls were removed. A non-reference copy that
    /// lost calls becomes a partial call, with one partial per removed call. Copies
    /// left with no calls cannot distinguish anything and are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if a copy fails initialization, which indicates the curated
    /// definitions themselves are inconsistent.
    pub fn specialize(
        &self,
        missing: &BTreeSet<usize>,
    ) -> Result<Vec<Arc<HaplotypeDefinition>>, CatalogError> {
        if missing.is_empty() {
            return Ok(self.definitions.clone());
        }

        let mut out = Vec::with_capacity(self.definitions.len());
        for def in &self.definitions {
            let mut raw = def.to_raw();
            for &pos in missing {
                if let Some(slot) = raw.alleles.get_mut(pos) {
                    if slot.take().is_some() {
                        raw.missing_positions.insert(pos);
                    }
                }
                if let Some(slot) = raw.cpic_alleles.get_mut(pos) {
                    *slot = None;
                }
            }
            if !raw.reference {
                if raw.alleles.iter().all(Option::is_none) {
                    continue;
                }
                // a required call the sample cannot confirm makes this a partial call
                raw.num_partials += raw.missing_positions.len();
            }
            let specialized = raw
                .initialize(&self.positions)
                .map_err(|source| CatalogError::Definition {
                    gene: self.gene.clone(),
                    source,
                })?;
            out.push(Arc::new(specialized));
        }
        Ok(out)
    }

    fn to_data(&self) -> GeneDefinitionData {
        GeneDefinitionData {
            gene: self.gene.clone(),
            chromosome: self.positions.first().map(|p| p.chromosome.clone()),
            positions: self.positions.to_vec(),
            named_alleles: self.definitions.iter().map(|d| d.to_raw()).collect(),
        }
    }

    /// Number of definitions, including the reference
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Curated definitions for every gene, loaded once and shared read-only
#[derive(Debug, Default)]
pub struct DefinitionCatalog {
    genes: Vec<GeneDefinitions>,

    /// Index: gene symbol -> index in genes vec
    gene_to_index: HashMap<String, usize>,

    /// Genes whose data failed validation, with the reason
    rejected: HashMap<String, String>,
}

impl DefinitionCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load catalog from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse catalog from JSON string.
    ///
    /// A gene with invalid definitions is rejected on its own: it is logged, recorded
    /// in [`DefinitionCatalog::rejection`], and the remaining genes still load.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            warn!(
                "Catalog version mismatch (expected {}, found {})",
                CATALOG_VERSION, data.version
            );
        }

        let mut catalog = Self::new();
        for gene_data in data.genes {
            let gene = gene_data.gene.clone();
            let loaded = GeneDefinitions::new(
                gene_data.gene,
                gene_data.positions,
                gene_data.named_alleles,
            )
            .and_then(|defs| catalog.add_gene(defs));
            if let Err(e) = loaded {
                tracing::error!("Rejecting {gene}: {e}");
                catalog.rejected.insert(gene, e.to_string());
            }
        }

        info!(
            "Loaded {} genes ({} rejected)",
            catalog.len(),
            catalog.rejected.len()
        );
        Ok(catalog)
    }

    /// Add a gene to the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the gene is already present.
    pub fn add_gene(&mut self, definitions: GeneDefinitions) -> Result<(), CatalogError> {
        if self.gene_to_index.contains_key(definitions.gene()) {
            return Err(CatalogError::DuplicateGene {
                gene: definitions.gene().to_string(),
            });
        }
        self.gene_to_index
            .insert(definitions.gene().to_string(), self.genes.len());
        self.genes.push(definitions);
        Ok(())
    }

    /// Get a gene's definitions
    pub fn get(&self, gene: &str) -> Option<&GeneDefinitions> {
        self.gene_to_index.get(gene).map(|&idx| &self.genes[idx])
    }

    /// Why a gene was rejected at load time, if it was
    pub fn rejection(&self, gene: &str) -> Option<&str> {
        self.rejected.get(gene).map(String::as_str)
    }

    pub fn genes(&self) -> &[GeneDefinitions] {
        &self.genes
    }

    /// Export catalog to JSON
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            genes: self.genes.iter().map(GeneDefinitions::to_data).collect(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of genes in catalog
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CallKind;

    const CATALOG_JSON: &str = r#"{
        "version": "1.0.0",
        "genes": [
            {
                "gene": "GENE1",
                "positions": [
                    {"chromosome": "chr1", "position": 100, "ref": "A", "rsid": "rs1"},
                    {"chromosome": "chr1", "position": 200, "ref": "C"}
                ],
                "namedAlleles": [
                    {"id": "G1.2", "name": "*2", "alleles": ["G", null]},
                    {"id": "G1.1", "name": "*1", "alleles": ["A", "C"], "reference": true}
                ]
            },
            {
                "gene": "BROKEN",
                "positions": [{"chromosome": "chr2", "position": 5, "ref": "T"}],
                "namedAlleles": [
                    {"id": "B.1", "name": "*1", "alleles": ["T"], "reference": true},
                    {"id": "B.2", "name": "*2", "alleles": ["T", "A"]}
                ]
            }
        ]
    }"#;

    fn positions() -> Vec<Position> {
        vec![
            Position::new("chr1", 100, "A"),
            Position::new("chr1", 200, "C"),
            Position::new("chr1", 300, "G"),
        ]
    }

    #[test]
    fn test_from_json_rejects_only_broken_gene() {
        let catalog = DefinitionCatalog::from_json(CATALOG_JSON).unwrap();
        assert_eq!(catalog.len(), 1);
        let gene = catalog.get("GENE1").unwrap();
        assert_eq!(gene.len(), 2);
        assert_eq!(gene.reference().name(), "*1");
        assert!(catalog.get("BROKEN").is_none());
        assert!(catalog.rejection("BROKEN").unwrap().contains("B.2"));
        assert!(catalog.rejection("GENE1").is_none());
    }

    #[test]
    fn test_get_by_id() {
        let catalog = DefinitionCatalog::from_json(CATALOG_JSON).unwrap();
        let gene = catalog.get("GENE1").unwrap();
        let star2 = gene.get(&DefinitionId::new("G1.2")).unwrap();
        assert_eq!(star2.name(), "*2");
        assert!(gene.get(&DefinitionId::new("nope")).is_none());
    }

    #[test]
    fn test_requires_exactly_one_reference() {
        let none = GeneDefinitions::new(
            "G",
            positions(),
            vec![RawDefinition::from_calls("2", "*2", &["G", "", ""], false)],
        );
        assert!(matches!(none, Err(CatalogError::MissingReference { .. })));

        let two = GeneDefinitions::new(
            "G",
            positions(),
            vec![
                RawDefinition::from_calls("1", "*1", &["A", "C", "G"], true),
                RawDefinition::from_calls("1b", "*1b", &["A", "C", "G"], true),
            ],
        );
        assert!(matches!(
            two,
            Err(CatalogError::MultipleReferences { count: 2, .. })
        ));
    }

    #[test]
    fn test_reference_with_undefined_call_is_rejected() {
        let result = GeneDefinitions::new(
            "G",
            positions(),
            vec![RawDefinition::from_calls("1", "*1", &["A", "", "G"], true)],
        );
        assert!(matches!(
            result,
            Err(CatalogError::Definition {
                source: DefinitionError::UndefinedReferenceCall { index: 1, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_definitions_sorted_canonically() {
        let gene = GeneDefinitions::new(
            "G",
            positions(),
            vec![
                RawDefinition::from_calls("10", "*10", &["", "T", ""], false),
                RawDefinition::from_calls("9", "*9", &["G", "", ""], false),
                RawDefinition::from_calls("1", "*1", &["A", "C", "G"], true),
            ],
        )
        .unwrap();
        let names: Vec<&str> = gene.definitions().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["*1", "*9", "*10"]);
    }

    #[test]
    fn test_specialize_removes_missing_positions() {
        let gene = GeneDefinitions::new(
            "G",
            positions(),
            vec![
                RawDefinition::from_calls("1", "*1", &["A", "C", "G"], true),
                RawDefinition::from_calls("2", "*2", &["G", "T", ""], false),
                RawDefinition::from_calls("3", "*3", &["", "", "A"], false),
            ],
        )
        .unwrap();

        let missing: BTreeSet<usize> = [2].into_iter().collect();
        let specialized = gene.specialize(&missing).unwrap();
        let names: Vec<&str> = specialized.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["*1", "*2"]);

        let reference = &specialized[0];
        assert_eq!(reference.allele(2), None);
        assert_eq!(reference.score(), 2);
        assert_eq!(reference.missing_position_indices().len(), 1);

        let star2 = &specialized[1];
        assert_eq!(star2.score(), 2);
        assert!(star2.missing_position_indices().is_empty());

        // nothing missing returns the curated definitions untouched
        let same = gene.specialize(&BTreeSet::new()).unwrap();
        assert!(Arc::ptr_eq(&same[1], &gene.definitions()[1]));
    }

    #[test]
    fn test_specialize_marks_lost_calls_as_partial() {
        let gene = GeneDefinitions::new(
            "G",
            positions(),
            vec![
                RawDefinition::from_calls("1", "*1", &["A", "C", "G"], true),
                RawDefinition::from_calls("4", "*4", &["G", "", "T"], false),
            ],
        )
        .unwrap();

        let missing: BTreeSet<usize> = [2].into_iter().collect();
        let specialized = gene.specialize(&missing).unwrap();

        let reference = &specialized[0];
        assert!(!reference.is_partial());
        assert_eq!(reference.num_partials(), 0);

        let star4 = &specialized[1];
        assert_eq!(star4.name(), "*4");
        assert_eq!(star4.kind(), CallKind::Partial);
        assert_eq!(star4.num_partials(), 1);
        // one remaining defined call, minus one partial
        assert_eq!(star4.score(), 0);
    }

    #[test]
    fn test_duplicate_definition_id() {
        let result = GeneDefinitions::new(
            "G",
            positions(),
            vec![
                RawDefinition::from_calls("1", "*1", &["A", "C", "G"], true),
                RawDefinition::from_calls("2", "*2", &["G", "", ""], false),
                RawDefinition::from_calls("2", "*3", &["", "T", ""], false),
            ],
        );
        assert!(matches!(
            result,
            Err(CatalogError::DuplicateDefinition { ref id, .. }) if id.as_str() == "2"
        ));
    }

    #[test]
    fn test_duplicate_gene() {
        let make = || {
            GeneDefinitions::new(
                "G",
                positions(),
                vec![RawDefinition::from_calls("1", "*1", &["A", "C", "G"], true)],
            )
            .unwrap()
        };
        let mut catalog = DefinitionCatalog::new();
        catalog.add_gene(make()).unwrap();
        assert!(matches!(
            catalog.add_gene(make()),
            Err(CatalogError::DuplicateGene { .. })
        ));
    }

    #[test]
    fn test_to_json_round_trips() {
        let catalog = DefinitionCatalog::from_json(CATALOG_JSON).unwrap();
        let json = catalog.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"namedAlleles\""));

        let reloaded = DefinitionCatalog::from_json(&json).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(
            reloaded.get("GENE1").unwrap().definitions(),
            catalog.get("GENE1").unwrap().definitions()
        );
    }
}
