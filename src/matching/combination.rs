//! Synthesis of derived definitions for permutations no curated definition explains.
//!
//! A permutation's deviations from the reference are covered first by curated
//! non-reference definitions whose distinguishing calls are all present, then by
//! one standalone `g.<coordinate><ref>><alt>` component per remaining position.
//! The components are merged into a single [`RawDefinition`] named like
//! `[*2 + g.94775367A>G]`.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::core::definition::{HaplotypeDefinition, RawDefinition};
use crate::core::position::Position;
use crate::matching::permutation::PermutationSpace;

/// Name of a standalone single-position component
pub fn position_component_name(position: &Position, alt: &str) -> String {
    format!("g.{}{}>{}", position.position, position.ref_allele, alt)
}

/// Positions of `definition` whose curated call does not accept the reference allele
fn distinguishing_positions(definition: &HaplotypeDefinition, positions: &[Position]) -> Vec<usize> {
    definition
        .defined_positions()
        .filter(|&pos| {
            definition
                .pattern()
                .predicate(pos)
                .is_some_and(|p| !p.accepts(Some(positions[pos].ref_allele.as_str())))
        })
        .collect()
}

/// Whether one of `matched` accounts for every deviation of permutation `index`.
///
/// A deviation is accounted for when the definition has a call at that position;
/// since the definition matched, the call accepts the observed allele.
pub fn is_explained(
    space: &PermutationSpace,
    index: usize,
    matched: &[&HaplotypeDefinition],
) -> bool {
    let deviations = space.deviations(index);
    matched.iter().any(|definition| {
        deviations
            .iter()
            .all(|&pos| definition.allele(pos).is_some())
    })
}

/// Build a derived definition for permutation `index`.
///
/// `candidates` are the sample-specialized curated definitions, already in the order
/// they should be tried (best first). Returns `None` if the permutation does not
/// deviate from the reference anywhere.
pub fn synthesize(
    space: &PermutationSpace,
    index: usize,
    candidates: &[Arc<HaplotypeDefinition>],
) -> Option<RawDefinition> {
    let positions = space.positions();
    let deviations = space.deviations(index);
    if deviations.is_empty() {
        return None;
    }

    let mut remaining: BTreeSet<usize> = deviations.iter().copied().collect();
    let mut alleles: Vec<Option<String>> = vec![None; positions.len()];
    let mut cpic_alleles: Vec<Option<String>> = vec![None; positions.len()];
    let mut named: Vec<&Arc<HaplotypeDefinition>> = Vec::new();
    let mut missing: BTreeSet<usize> = BTreeSet::new();

    for candidate in candidates.iter().filter(|c| !c.is_reference()) {
        let distinguishing = distinguishing_positions(candidate, positions);
        if distinguishing.is_empty() || !distinguishing.iter().all(|p| remaining.contains(p)) {
            continue;
        }
        let covered: Vec<usize> = remaining
            .iter()
            .copied()
            .filter(|&pos| {
                candidate.allele(pos).is_some()
                    && candidate
                        .pattern()
                        .predicate(pos)
                        .is_some_and(|p| p.accepts(space.call(index, pos)))
            })
            .collect();
        if !distinguishing.iter().all(|p| covered.contains(p)) {
            continue;
        }

        for &pos in &covered {
            alleles[pos] = candidate.allele(pos).map(str::to_string);
            cpic_alleles[pos] = candidate.cpic_allele(pos).map(str::to_string);
            remaining.remove(&pos);
        }
        missing.extend(candidate.missing_position_indices().iter().copied());
        named.push(candidate);

        if remaining.is_empty() {
            break;
        }
    }

    named.sort();
    let mut names: Vec<String> = named.iter().map(|d| d.name().to_string()).collect();
    let mut ids: Vec<String> = named.iter().map(|d| d.id().to_string()).collect();

    for &pos in &remaining {
        let alt = space.call(index, pos)?;
        let component = position_component_name(&positions[pos], alt);
        alleles[pos] = Some(alt.to_string());
        cpic_alleles[pos] = Some(alt.to_string());
        names.push(component.clone());
        ids.push(component);
    }

    let name = if names.len() == 1 {
        names.remove(0)
    } else {
        format!("[{}]", names.join(" + "))
    };

    let mut raw = RawDefinition::new(ids.join("+"), name, alleles, false)
        .with_cpic_alleles(cpic_alleles);
    raw.num_combinations = deviations.len();
    raw.num_partials = missing.len();
    raw.missing_positions = missing;
    Some(raw)
}
