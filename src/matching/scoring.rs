use crate::core::definition::HaplotypeDefinition;
use crate::matching::permutation::PermutationSpace;

/// How well a definition explains the permutations it matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    /// Defined positions minus partials
    pub base: i32,

    /// Wobble positions where every matched permutation carries the reference allele
    pub uninformative_wobbles: i32,

    /// Final score: `base - uninformative_wobbles`
    pub score: i32,
}

impl MatchScore {
    /// Score `definition` against the permutations (by index into `space`) it matched.
    ///
    /// An ambiguity code that never shows up as a non-reference call in the matched
    /// data carries no signal, so each such wobble position costs one point.
    #[must_use]
    pub fn calculate(
        definition: &HaplotypeDefinition,
        space: &PermutationSpace,
        matched: &[usize],
    ) -> Self {
        let base = definition.score();
        let positions = space.positions();

        let uninformative = definition
            .wobble_positions()
            .iter()
            .filter(|&&pos| {
                let ref_allele = positions[pos].ref_allele.as_str();
                matched
                    .iter()
                    .all(|&idx| space.call(idx, pos) == Some(ref_allele))
            })
            .count();
        let uninformative_wobbles = i32::try_from(uninformative).unwrap_or(i32::MAX);

        Self {
            base,
            uninformative_wobbles,
            score: base - uninformative_wobbles,
        }
    }
}
