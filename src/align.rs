//! # Subsequence alignment
//!
//! [`embed`] maps a run decomposition onto a pattern by greedy leftmost
//! matching: each run claims the first unclaimed pattern position to the
//! right of the previous claim that carries its sign. The result is
//! all-or-nothing — either every run is placed, or the run encoding is not a
//! subsequence of the pattern and no alignment exists.
//!
//! The greedy, non-backtracking scan is load-bearing: the minimum-distance
//! guarantee of the sorting driver relies on exactly this placement.

use crate::{pattern::Pattern, runs::RunDecomposition};

/// A left-to-right embedding of a run decomposition into a pattern.
///
/// One slot per pattern position; a slot holds the index of the run placed
/// there, or nothing for positions no run claimed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    slots: Vec<Option<usize>>,
}

impl Alignment {
    /// The run placed at `position`, if any.
    pub fn run_at(&self, position: usize) -> Option<usize> {
        self.slots.get(position).copied().flatten()
    }

    /// Number of pattern positions (the pattern length).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of positions that carry a run.
    pub fn mapped(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Renders the run encoding spread out under the pattern: the run sign at
    /// each claimed position, a blank at each unclaimed one.
    ///
    /// Printed above a pattern's encoding this visualizes the embedding:
    ///
    /// ```text
    /// p nnp n
    /// ppnnppnn
    /// ```
    pub fn aligned_encoding(&self, runs: &RunDecomposition) -> String {
        self.slots
            .iter()
            .map(|slot| match slot.and_then(|index| runs.get(index)) {
                Some(run) => run.sign.symbol(),
                None => ' ',
            })
            .collect()
    }
}

/// Greedily embeds `runs` into `pattern`.
///
/// Returns `None` when the run encoding is not a subsequence of the pattern
/// string; this is the expected negative outcome that drives the pattern
/// search, not an error.
///
/// # Examples
///
/// ```
/// use mitosort::{align, pattern::generate, permutation::Permutation, runs::RunDecomposition};
///
/// let p = Permutation::new(vec![1, -2, -3]).unwrap();
/// let runs = RunDecomposition::of(&p);
/// // "pnn" embeds into "ppnn" at positions 0, 2, 3.
/// let pattern = &generate(2)[1];
/// let alignment = align::embed(&runs, pattern).unwrap();
/// assert_eq!(alignment.run_at(0), Some(0));
/// assert_eq!(alignment.run_at(1), None);
/// assert_eq!(alignment.run_at(2), Some(1));
/// assert_eq!(alignment.run_at(3), Some(2));
/// ```
pub fn embed(runs: &RunDecomposition, pattern: &Pattern) -> Option<Alignment> {
    let symbols = pattern.symbols();
    let mut slots = vec![None; symbols.len()];
    let mut cursor = 0;
    for (run_index, run) in runs.iter().enumerate() {
        let offset = symbols[cursor..]
            .iter()
            .position(|&symbol| symbol == run.sign)?;
        let position = cursor + offset;
        slots[position] = Some(run_index);
        cursor = position + 1;
    }
    Some(Alignment { slots })
}
