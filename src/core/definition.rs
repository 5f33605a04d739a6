use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;

use crate::core::iupac;
use crate::core::position::Position;
use crate::core::types::{CallKind, DefinitionId};
use crate::matching::pattern::DefinitionPattern;
use crate::utils::natural::compare_names;

/// Curated data that cannot be turned into a usable definition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("{id}: {found} allele calls do not match {expected} positions")]
    LengthMismatch {
        id: DefinitionId,
        expected: usize,
        found: usize,
    },

    #[error("{id}: {found} normalized calls do not match {expected} positions")]
    CpicLengthMismatch {
        id: DefinitionId,
        expected: usize,
        found: usize,
    },

    #[error("{id}: reference definition has no call at position index {index}")]
    UndefinedReferenceCall { id: DefinitionId, index: usize },
}

/// A haplotype definition as read from the catalog or synthesized at match time.
///
/// This is the uninitialized state: it carries only the curated data and exposes
/// none of the derived lookups. Call [`RawDefinition::initialize`] to get a
/// [`HaplotypeDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDefinition {
    /// Stable identifier
    pub id: DefinitionId,

    /// Display name (e.g. `*2`)
    pub name: String,

    /// Allele calls aligned 1:1 with the gene's positions; `None` means "not distinguishing"
    pub alleles: Vec<Option<String>>,

    /// Normalized calls used for naming, parallel to `alleles`.
    /// Empty means "same as `alleles`".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cpic_alleles: Vec<Option<String>>,

    /// Whether this is the gene's reference haplotype
    #[serde(default, alias = "matchesreferencesequence")]
    pub reference: bool,

    /// Position indices this copy had calls for but the sample is missing
    #[serde(skip)]
    pub missing_positions: BTreeSet<usize>,

    /// Number of elementary distinguishing positions merged into a synthesized definition
    #[serde(default, skip_serializing_if = "is_zero")]
    pub num_combinations: usize,

    /// Number of required positions a synthesized definition could not resolve
    #[serde(default, skip_serializing_if = "is_zero")]
    pub num_partials: usize,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde skip_serializing_if signature
fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl RawDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        alleles: Vec<Option<String>>,
        reference: bool,
    ) -> Self {
        Self {
            id: DefinitionId::new(id),
            name: name.into(),
            alleles,
            cpic_alleles: Vec::new(),
            reference,
            missing_positions: BTreeSet::new(),
            num_combinations: 0,
            num_partials: 0,
        }
    }

    /// Convenience constructor from string slices; empty strings become undefined calls
    pub fn from_calls(
        id: impl Into<String>,
        name: impl Into<String>,
        calls: &[&str],
        reference: bool,
    ) -> Self {
        let alleles = calls
            .iter()
            .map(|c| (!c.is_empty()).then(|| (*c).to_string()))
            .collect();
        Self::new(id, name, alleles, reference)
    }

    #[must_use]
    pub fn with_cpic_alleles(mut self, cpic_alleles: Vec<Option<String>>) -> Self {
        self.cpic_alleles = cpic_alleles;
        self
    }

    /// Validate against the gene's positions and derive every lookup up front.
    ///
    /// # Errors
    ///
    /// Returns an error if the call lists are not aligned with `positions`, or if a
    /// reference definition has an undefined call at a position that is not missing.
    pub fn initialize(self, positions: &Arc<[Position]>) -> Result<HaplotypeDefinition, DefinitionError> {
        if self.alleles.len() != positions.len() {
            return Err(DefinitionError::LengthMismatch {
                id: self.id,
                expected: positions.len(),
                found: self.alleles.len(),
            });
        }
        if !self.cpic_alleles.is_empty() && self.cpic_alleles.len() != positions.len() {
            return Err(DefinitionError::CpicLengthMismatch {
                id: self.id,
                expected: positions.len(),
                found: self.cpic_alleles.len(),
            });
        }
        if self.reference {
            let undefined = self
                .alleles
                .iter()
                .enumerate()
                .find(|(i, a)| a.is_none() && !self.missing_positions.contains(i))
                .map(|(i, _)| i);
            if let Some(index) = undefined {
                return Err(DefinitionError::UndefinedReferenceCall { id: self.id, index });
            }
        }

        let mut allele_map = HashMap::with_capacity(positions.len());
        let mut wobble_positions = Vec::new();
        let mut defined = 0usize;
        for (i, (position, allele)) in positions.iter().zip(&self.alleles).enumerate() {
            allele_map.insert(position.clone(), i);
            if let Some(allele) = allele {
                if iupac::is_wobble(allele) {
                    wobble_positions.push(i);
                }
                defined += 1;
            }
        }

        let score = to_score(defined) - to_score(self.num_partials);
        let pattern = DefinitionPattern::compile(&self.alleles);

        Ok(HaplotypeDefinition {
            raw: self,
            positions: Arc::clone(positions),
            allele_map,
            wobble_positions,
            score,
            pattern,
        })
    }
}

#[inline]
fn to_score(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// An initialized haplotype definition ("named allele").
///
/// Every derived structure is computed once by [`RawDefinition::initialize`] and
/// never changes afterwards.
#[derive(Debug, Clone)]
pub struct HaplotypeDefinition {
    raw: RawDefinition,
    positions: Arc<[Position]>,
    allele_map: HashMap<Position, usize>,
    wobble_positions: Vec<usize>,
    score: i32,
    pattern: DefinitionPattern,
}

impl HaplotypeDefinition {
    pub fn id(&self) -> &DefinitionId {
        &self.raw.id
    }

    pub fn name(&self) -> &str {
        &self.raw.name
    }

    pub fn is_reference(&self) -> bool {
        self.raw.reference
    }

    pub fn alleles(&self) -> &[Option<String>] {
        &self.raw.alleles
    }

    /// Allele call at a position index
    pub fn allele(&self, index: usize) -> Option<&str> {
        self.raw.alleles.get(index).and_then(Option::as_deref)
    }

    /// Allele call at a position, or `None` if undefined or not one of the gene's positions
    pub fn allele_at(&self, position: &Position) -> Option<&str> {
        self.allele_map
            .get(position)
            .and_then(|&i| self.allele(i))
    }

    /// Normalized call at a position index
    pub fn cpic_allele(&self, index: usize) -> Option<&str> {
        if self.raw.cpic_alleles.is_empty() {
            self.allele(index)
        } else {
            self.raw.cpic_alleles.get(index).and_then(Option::as_deref)
        }
    }

    /// Normalized call at a position
    pub fn cpic_allele_at(&self, position: &Position) -> Option<&str> {
        self.allele_map
            .get(position)
            .and_then(|&i| self.cpic_allele(i))
    }

    pub fn positions(&self) -> &Arc<[Position]> {
        &self.positions
    }

    /// Indices of positions whose call is an ambiguity code
    pub fn wobble_positions(&self) -> &[usize] {
        &self.wobble_positions
    }

    /// Positions this copy had calls for that are missing in the sample
    pub fn missing_positions(&self) -> impl Iterator<Item = &Position> {
        self.raw
            .missing_positions
            .iter()
            .filter_map(|&i| self.positions.get(i))
    }

    pub fn missing_position_indices(&self) -> &BTreeSet<usize> {
        &self.raw.missing_positions
    }

    /// Base score: defined positions minus partials
    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn pattern(&self) -> &DefinitionPattern {
        &self.pattern
    }

    pub fn num_combinations(&self) -> usize {
        self.raw.num_combinations
    }

    pub fn num_partials(&self) -> usize {
        self.raw.num_partials
    }

    pub fn is_combination(&self) -> bool {
        self.raw.num_combinations > 1
    }

    pub fn is_partial(&self) -> bool {
        self.raw.num_partials > 0
    }

    pub fn kind(&self) -> CallKind {
        if self.raw.num_partials > 0 {
            CallKind::Partial
        } else if self.raw.num_combinations > 0 {
            CallKind::Combination
        } else {
            CallKind::Curated
        }
    }

    /// Indices of positions with a defined call
    pub fn defined_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.raw
            .alleles
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.as_ref().map(|_| i))
    }

    /// The curated data this definition was built from
    pub fn raw(&self) -> &RawDefinition {
        &self.raw
    }

    pub fn to_raw(&self) -> RawDefinition {
        self.raw.clone()
    }

    /// Canonical total order: reference first, then natural name order, then id,
    /// then the allele calls themselves.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        other
            .is_reference()
            .cmp(&self.is_reference())
            .then_with(|| compare_names(self.name(), other.name()))
            .then_with(|| self.id().cmp(other.id()))
            .then_with(|| self.alleles().cmp(other.alleles()))
    }
}

impl std::fmt::Display for HaplotypeDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.raw.name, self.raw.id)
    }
}

impl PartialEq for HaplotypeDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.raw.name == other.raw.name
            && self.raw.id == other.raw.id
            && self.raw.reference == other.raw.reference
            && self.raw.alleles == other.raw.alleles
    }
}

impl Eq for HaplotypeDefinition {}

impl std::hash::Hash for HaplotypeDefinition {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.name.hash(state);
        self.raw.id.hash(state);
        self.raw.reference.hash(state);
        self.raw.alleles.hash(state);
    }
}

impl PartialOrd for HaplotypeDefinition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HaplotypeDefinition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical_cmp(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions() -> Arc<[Position]> {
        vec![
            Position::new("chr1", 100, "A"),
            Position::new("chr1", 200, "C"),
            Position::new("chr1", 300, "G"),
        ]
        .into()
    }

    fn init(raw: RawDefinition) -> HaplotypeDefinition {
        raw.initialize(&positions()).unwrap()
    }

    #[test]
    fn test_initialize_derives_score_and_wobbles() {
        let def = init(RawDefinition::from_calls("CA2", "*2", &["G", "", "R"], false));
        assert_eq!(def.score(), 2);
        assert_eq!(def.wobble_positions(), &[2]);
        assert_eq!(def.allele(0), Some("G"));
        assert_eq!(def.allele(1), None);
        assert_eq!(def.allele_at(&Position::new("chr1", 300, "G")), Some("R"));
        assert_eq!(def.allele_at(&Position::new("chr2", 300, "G")), None);
        assert_eq!(def.kind(), CallKind::Curated);
    }

    #[test]
    fn test_partials_reduce_score() {
        let mut raw = RawDefinition::from_calls("x", "[*2 + *3]", &["G", "T", ""], false);
        raw.num_combinations = 2;
        raw.num_partials = 1;
        let def = init(raw);
        assert_eq!(def.score(), 1);
        assert!(def.is_combination());
        assert!(def.is_partial());
        assert_eq!(def.kind(), CallKind::Partial);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let raw = RawDefinition::from_calls("CA2", "*2", &["G", "Y", ""], false);
        let a = raw.clone().initialize(&positions()).unwrap();
        let b = a.to_raw().initialize(&positions()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.score(), b.score());
        assert_eq!(a.wobble_positions(), b.wobble_positions());
        assert_eq!(a.pattern(), b.pattern());
        assert_eq!(a.raw(), &raw);
    }

    #[test]
    fn test_length_mismatch() {
        let err = RawDefinition::from_calls("CA2", "*2", &["G"], false)
            .initialize(&positions())
            .unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::LengthMismatch {
                expected: 3,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_cpic_length_mismatch() {
        let err = RawDefinition::from_calls("CA2", "*2", &["G", "", ""], false)
            .with_cpic_alleles(vec![Some("G".to_string())])
            .initialize(&positions())
            .unwrap_err();
        assert!(matches!(err, DefinitionError::CpicLengthMismatch { .. }));
    }

    #[test]
    fn test_reference_requires_every_call() {
        let err = RawDefinition::from_calls("CA1", "*1", &["A", "", "G"], true)
            .initialize(&positions())
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::UndefinedReferenceCall {
                id: DefinitionId::new("CA1"),
                index: 1
            }
        );

        // a missing position in the sample is allowed to be undefined
        let mut raw = RawDefinition::from_calls("CA1", "*1", &["A", "", "G"], true);
        raw.missing_positions.insert(1);
        assert!(raw.initialize(&positions()).is_ok());
    }

    #[test]
    fn test_cpic_alleles_fall_back_to_alleles() {
        let def = init(RawDefinition::from_calls("CA2", "*2", &["G", "", ""], false));
        assert_eq!(def.cpic_allele(0), Some("G"));

        let def = init(
            RawDefinition::from_calls("CA3", "*3", &["G", "", ""], false)
                .with_cpic_alleles(vec![Some("delA".to_string()), None, None]),
        );
        assert_eq!(def.cpic_allele(0), Some("delA"));
        assert_eq!(def.cpic_allele_at(&Position::new("chr1", 100, "A")), Some("delA"));
    }

    #[test]
    fn test_reference_sorts_first() {
        let reference = init(RawDefinition::from_calls("z", "*99", &["A", "C", "G"], true));
        let other = init(RawDefinition::from_calls("a", "*1", &["G", "", ""], false));
        assert!(reference < other);
        assert!(other > reference);
    }

    #[test]
    fn test_natural_name_order() {
        let nine = init(RawDefinition::from_calls("x", "*9", &["G", "", ""], false));
        let ten = init(RawDefinition::from_calls("x", "*10", &["G", "", ""], false));
        assert!(nine < ten);
    }

    #[test]
    fn test_id_then_alleles_break_ties() {
        let a = init(RawDefinition::from_calls("CA1", "*2", &["G", "", ""], false));
        let b = init(RawDefinition::from_calls("CA2", "*2", &["G", "", ""], false));
        assert!(a < b);

        let c = init(RawDefinition::from_calls("CA1", "*2", &["G", "T", ""], false));
        assert_ne!(a, c);
        assert_ne!(a.cmp(&c), Ordering::Equal);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_equality_agrees_with_order_on_reference_flag() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |def: &HaplotypeDefinition| {
            let mut hasher = DefaultHasher::new();
            def.hash(&mut hasher);
            hasher.finish()
        };

        let reference = init(RawDefinition::from_calls("CA1", "*1", &["A", "C", "G"], true));
        let other = init(RawDefinition::from_calls("CA1", "*1", &["A", "C", "G"], false));
        assert_ne!(reference.cmp(&other), Ordering::Equal);
        assert_ne!(reference, other);
        assert_ne!(hash(&reference), hash(&other));
        assert_eq!(hash(&reference), hash(&reference.clone()));
    }

    #[test]
    fn test_deserialize_reference_alias() {
        let json = r#"{"id":"CA1","name":"*1","alleles":["A","C","G"],"matchesreferencesequence":true}"#;
        let raw: RawDefinition = serde_json::from_str(json).unwrap();
        assert!(raw.reference);
        assert_eq!(raw.num_partials, 0);
        assert!(raw.cpic_alleles.is_empty());

        let json = r#"{"id":"CA2","name":"*2","alleles":["G",null,null],"cpicAlleles":["G",null,null]}"#;
        let raw: RawDefinition = serde_json::from_str(json).unwrap();
        assert!(!raw.reference);
        assert_eq!(raw.alleles[1], None);
        assert_eq!(raw.cpic_alleles.len(), 3);
    }
}
