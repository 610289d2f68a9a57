//! # Run decomposition
//!
//! A signed permutation splits uniquely into maximal contiguous segments that
//! are strictly ascending and sign-consistent. [`RunDecomposition::of`] finds
//! these runs in one left-to-right pass; the derived [`encoding`] is the
//! string of run signs that the pattern machinery matches against.
//!
//! Runs are throwaway data: they describe one concrete permutation and are
//! recomputed from scratch after every transformation step.
//!
//! [`encoding`]: RunDecomposition::encoding

use crate::permutation::{Permutation, Sign};

/// A maximal ascending, sign-consistent segment of a permutation.
///
/// `end` is exclusive, so `start..end` slices the owning permutation
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub sign: Sign,
    pub start: usize,
    pub end: usize,
}

impl Run {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The slice of `permutation` covered by this run.
    pub fn slice<'a>(&self, permutation: &'a Permutation) -> &'a [i64] {
        &permutation.as_slice()[self.start..self.end]
    }
}

/// The ordered list of runs of one permutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDecomposition {
    runs: Vec<Run>,
}

impl RunDecomposition {
    /// Decomposes `permutation` in a single pass.
    ///
    /// A run boundary is declared when the order breaks (the previous element
    /// is not strictly smaller), when the sign changes, or at the final
    /// index. A final element that itself breaks order or sign closes out as
    /// its own single-element run.
    ///
    /// # Examples
    ///
    /// ```
    /// use mitosort::{permutation::Permutation, runs::RunDecomposition};
    ///
    /// let p = Permutation::new(vec![3, -1, 2]).unwrap();
    /// let runs = RunDecomposition::of(&p);
    /// assert_eq!(runs.encoding(), "pnp");
    /// ```
    pub fn of(permutation: &Permutation) -> Self {
        let elements = permutation.as_slice();
        let n = elements.len();
        if n == 0 {
            return RunDecomposition { runs: Vec::new() };
        }
        if n == 1 {
            return RunDecomposition {
                runs: vec![Run {
                    sign: Sign::of(elements[0]),
                    start: 0,
                    end: 1,
                }],
            };
        }

        let mut runs = Vec::new();
        let mut last_boundary = 0;
        let mut last = elements[0];
        for (i, &current) in elements.iter().enumerate().skip(1) {
            let breaks = last > current || Sign::of(last) != Sign::of(current);
            if breaks || i == n - 1 {
                runs.push(Run {
                    sign: Sign::of(last),
                    start: last_boundary,
                    end: i,
                });
                last_boundary = i;
            }
            if i == n - 1 && breaks {
                runs.push(Run {
                    sign: Sign::of(current),
                    start: last_boundary,
                    end: i,
                });
            }
            last = current;
        }
        // The loop leaves the last run one short; extend it so every end is
        // an exclusive slice bound and the final run reaches n.
        if let Some(last_run) = runs.last_mut() {
            last_run.end += 1;
        }
        RunDecomposition { runs }
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn get(&self, index: usize) -> Option<&Run> {
        self.runs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Run> {
        self.runs.iter()
    }

    /// The sign string of the decomposition, one symbol per run.
    pub fn encoding(&self) -> String {
        self.runs.iter().map(|run| run.sign.symbol()).collect()
    }
}
