//! Expansion of a sample's calls into candidate single-chromosome sequences.
//!
//! Each permutation is one hypothesized copy of the gene. Phased heterozygous
//! positions contribute one of two threads (every permutation takes the same
//! thread at every phased position), while unphased heterozygous positions double
//! the number of permutations. Homozygous, hemizygous and missing positions
//! contribute the same call to every permutation.
//!
//! The space is never materialized: a permutation is addressed by an index and
//! decoded on demand, so memory stays flat even at the configured ceiling.

use std::sync::Arc;
use thiserror::Error;

use crate::core::position::Position;
use crate::core::sample::{Genotype, SampleCall, NO_CALL};

/// Default ceiling on unphased heterozygous positions combined per gene (2^16 permutations)
pub const DEFAULT_MAX_UNPHASED_HETEROZYGOUS: usize = 16;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermutationError {
    #[error("{heterozygous} unphased heterozygous positions exceed the limit of {limit}")]
    LimitExceeded { heterozygous: usize, limit: usize },

    #[error("{calls} sample calls do not match {positions} positions")]
    LengthMismatch { calls: usize, positions: usize },
}

#[derive(Debug, Clone)]
enum Slot {
    /// Same call in every permutation; `None` is missing
    Fixed(Option<String>),
    /// Phased heterozygous: thread 0 takes the first allele, thread 1 the second
    Phased(String, String),
    /// Unphased heterozygous: the bit at `rank` picks the allele
    Unphased(String, String, usize),
}

/// A single hypothesized chromosome copy
#[derive(Debug, Clone)]
pub struct SamplePermutation {
    index: usize,
    calls: Vec<Option<String>>,
    key: String,
}

impl SamplePermutation {
    /// Index of this permutation within its space
    pub fn index(&self) -> usize {
        self.index
    }

    /// Calls aligned to the gene positions; `None` is missing
    pub fn calls(&self) -> &[Option<String>] {
        &self.calls
    }

    pub fn call(&self, index: usize) -> Option<&str> {
        self.calls.get(index).and_then(Option::as_deref)
    }

    /// Serialized `position:call;` token sequence
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for SamplePermutation {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for SamplePermutation {}

impl std::hash::Hash for SamplePermutation {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for SamplePermutation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SamplePermutation {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

impl std::fmt::Display for SamplePermutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)
    }
}

/// Every permutation a sample's calls allow for one gene
#[derive(Debug, Clone)]
pub struct PermutationSpace {
    positions: Arc<[Position]>,
    slots: Vec<Slot>,
    threads: usize,
    unphased_heterozygous: usize,
    len: usize,
}

impl PermutationSpace {
    /// Build the space for calls aligned to `positions`.
    ///
    /// # Errors
    ///
    /// Returns an error if the calls are not aligned with the positions, or if more than
    /// `max_unphased_heterozygous` positions are unphased and heterozygous.
    pub fn new(
        positions: &Arc<[Position]>,
        calls: &[SampleCall],
        max_unphased_heterozygous: usize,
    ) -> Result<Self, PermutationError> {
        if calls.len() != positions.len() {
            return Err(PermutationError::LengthMismatch {
                calls: calls.len(),
                positions: positions.len(),
            });
        }

        let mut slots = Vec::with_capacity(calls.len());
        let mut has_phased = false;
        let mut unphased = 0usize;

        for call in calls {
            let slot = match &call.genotype {
                Genotype::Missing => Slot::Fixed(None),
                Genotype::Haploid(a) => Slot::Fixed(Some(a.clone())),
                Genotype::Diploid(a, b) if a == b => Slot::Fixed(Some(a.clone())),
                Genotype::Diploid(a, b) if call.phased => {
                    has_phased = true;
                    Slot::Phased(a.clone(), b.clone())
                }
                Genotype::Diploid(a, b) => {
                    unphased += 1;
                    if unphased > max_unphased_heterozygous {
                        // keep counting so the error reports the real total
                        continue;
                    }
                    Slot::Unphased(a.clone(), b.clone(), unphased - 1)
                }
            };
            slots.push(slot);
        }

        let threads = if has_phased { 2 } else { 1 };
        let len = u32::try_from(unphased)
            .ok()
            .filter(|_| unphased <= max_unphased_heterozygous)
            .and_then(|h| 1usize.checked_shl(h))
            .and_then(|n| n.checked_mul(threads))
            .ok_or(PermutationError::LimitExceeded {
                heterozygous: unphased,
                limit: max_unphased_heterozygous,
            })?;

        Ok(Self {
            positions: Arc::clone(positions),
            slots,
            threads,
            unphased_heterozygous: unphased,
            len,
        })
    }

    /// Number of permutations
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn unphased_heterozygous(&self) -> usize {
        self.unphased_heterozygous
    }

    /// Whether any heterozygous position is phased (two threads)
    pub fn is_phased(&self) -> bool {
        self.threads == 2
    }

    pub fn positions(&self) -> &Arc<[Position]> {
        &self.positions
    }

    /// Call at position `pos` in permutation `index`, without building the permutation
    #[inline]
    pub fn call(&self, index: usize, pos: usize) -> Option<&str> {
        let thread = index % self.threads;
        let mask = index / self.threads;
        match self.slots.get(pos)? {
            Slot::Fixed(call) => call.as_deref(),
            Slot::Phased(a, b) => Some(if thread == 0 { a.as_str() } else { b.as_str() }),
            Slot::Unphased(a, b, rank) => {
                Some(if (mask >> *rank) & 1 == 0 { a.as_str() } else { b.as_str() })
            }
        }
    }

    /// Decode one permutation
    pub fn get(&self, index: usize) -> Option<SamplePermutation> {
        if index >= self.len {
            return None;
        }
        let calls: Vec<Option<String>> = (0..self.slots.len())
            .map(|pos| self.call(index, pos).map(str::to_string))
            .collect();
        let mut key = String::new();
        for (position, call) in self.positions.iter().zip(&calls) {
            key.push_str(&position.position.to_string());
            key.push(':');
            key.push_str(call.as_deref().unwrap_or(NO_CALL));
            key.push(';');
        }
        Some(SamplePermutation { index, calls, key })
    }

    /// Lazily decode every permutation in index order
    pub fn iter(&self) -> impl Iterator<Item = SamplePermutation> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    /// Indices of positions where permutation `index` differs from the reference allele
    pub fn deviations(&self, index: usize) -> Vec<usize> {
        self.positions
            .iter()
            .enumerate()
            .filter(|(pos, position)| {
                self.call(index, *pos)
                    .is_some_and(|c| c != position.ref_allele)
            })
            .map(|(pos, _)| pos)
            .collect()
    }
}
