//! Compiled per-position predicates for a haplotype definition.

use crate::core::iupac;

/// What a definition accepts at one position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionPredicate {
    /// Undefined in the definition: anything matches, including a missing call
    Any,
    /// A single IUPAC code: any base in its expansion
    Bases(&'static [&'static str]),
    /// Any other allele string, matched literally
    Exact(String),
}

impl PositionPredicate {
    fn compile(allele: Option<&str>) -> Self {
        match allele {
            None => Self::Any,
            Some(a) => match iupac::expand_allele(a) {
                Some(bases) => Self::Bases(bases),
                None => Self::Exact(a.to_string()),
            },
        }
    }

    /// Test an observed call; `None` is a missing call
    #[inline]
    pub fn accepts(&self, call: Option<&str>) -> bool {
        match (self, call) {
            (Self::Any, _) => true,
            (_, None) => false,
            (Self::Bases(bases), Some(c)) => bases.iter().any(|b| *b == c),
            (Self::Exact(allele), Some(c)) => allele == c,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// A definition's match pattern, one predicate per gene position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionPattern {
    predicates: Vec<PositionPredicate>,
}

impl DefinitionPattern {
    pub fn compile(alleles: &[Option<String>]) -> Self {
        Self {
            predicates: alleles
                .iter()
                .map(|a| PositionPredicate::compile(a.as_deref()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn predicate(&self, index: usize) -> Option<&PositionPredicate> {
        self.predicates.get(index)
    }

    /// Test a sequence of calls position by position, stopping at the first mismatch
    pub fn matches<'a, I>(&self, calls: I) -> bool
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut count = 0;
        for (predicate, call) in self.predicates.iter().zip(calls) {
            if !predicate.accepts(call) {
                return false;
            }
            count += 1;
        }
        count == self.predicates.len()
    }

    /// Test calls fetched by position index, skipping positions the pattern ignores
    pub fn matches_with<'a, F>(&self, call_at: F) -> bool
    where
        F: Fn(usize) -> Option<&'a str>,
    {
        self.predicates
            .iter()
            .enumerate()
            .all(|(i, p)| p.is_any() || p.accepts(call_at(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(calls: &[&str]) -> DefinitionPattern {
        let alleles: Vec<Option<String>> = calls
            .iter()
            .map(|c| (!c.is_empty()).then(|| (*c).to_string()))
            .collect();
        DefinitionPattern::compile(&alleles)
    }

    #[test]
    fn test_exact_base() {
        let p = pattern(&["A", "C"]);
        assert!(p.matches([Some("A"), Some("C")]));
        assert!(!p.matches([Some("A"), Some("T")]));
    }

    #[test]
    fn test_wobble_expansion() {
        let p = pattern(&["R"]);
        assert!(p.matches([Some("A")]));
        assert!(p.matches([Some("G")]));
        assert!(!p.matches([Some("C")]));
        assert!(!p.matches([None]));
    }

    #[test]
    fn test_undefined_matches_anything() {
        let p = pattern(&["", "T"]);
        assert!(p.matches([None, Some("T")]));
        assert!(p.matches([Some("delC"), Some("T")]));
    }

    #[test]
    fn test_multi_char_is_literal() {
        let p = pattern(&["delC"]);
        assert!(p.matches([Some("delC")]));
        assert!(!p.matches([Some("C")]));
    }

    #[test]
    fn test_defined_does_not_match_missing() {
        let p = pattern(&["A"]);
        assert!(!p.matches([None]));
    }

    #[test]
    fn test_short_input_does_not_match() {
        let p = pattern(&["A", "C"]);
        assert!(!p.matches([Some("A")]));
    }

    #[test]
    fn test_matches_with() {
        let p = pattern(&["A", "", "Y"]);
        let calls = [Some("A"), None, Some("T")];
        assert!(p.matches_with(|i| calls[i]));
        let calls = [Some("A"), None, Some("G")];
        assert!(!p.matches_with(|i| calls[i]));
    }
}
