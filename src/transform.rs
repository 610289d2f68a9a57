//! # The transformation step
//!
//! [`transform`] applies one step of the sorting recursion: guided by a
//! pattern and an alignment, it folds the permutation's runs pairwise into
//! longer sorted runs, producing the next permutation, the residual pattern
//! half, and the exact TDRL/iTDRL operation (with its left/right
//! bipartition) that reverses the step.
//!
//! Pattern positions without a mapped run contribute empty segments; the
//! step never fails.

use crate::{
    align::Alignment,
    pattern::{OpKind, Pattern},
    permutation::{invert, Permutation, Sign},
    runs::RunDecomposition,
};

/// Stable ascending merge of two individually ascending sequences.
///
/// Ties take the right-hand element first; for signed permutations all
/// values are distinct, so the output of two sorted inputs is fully sorted
/// either way.
///
/// # Examples
///
/// ```
/// use mitosort::transform::merge;
///
/// assert_eq!(merge(&[-3, 1], &[-2, 4]), vec![-3, -2, 1, 4]);
/// ```
pub fn merge(a: &[i64], b: &[i64]) -> Vec<i64> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let mut i = 0;
    let mut j = 0;
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            merged.push(a[i]);
            i += 1;
        } else {
            merged.push(b[j]);
            j += 1;
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    merged
}

/// The outcome of one transformation step.
///
/// `op` together with `left` and `right` describes the inverse operation: a
/// `op` with bipartition `(left, right)` applied to `permutation` restores
/// the step's input. `residual` is the pattern half the new permutation's
/// run decomposition embeds into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub permutation: Permutation,
    pub residual: Vec<Sign>,
    pub op: OpKind,
    pub left: Vec<i64>,
    pub right: Vec<i64>,
}

impl Step {
    /// The residual sign string as text.
    pub fn residual_encoding(&self) -> String {
        self.residual.iter().map(|sign| sign.symbol()).collect()
    }
}

/// The permutation slice of the run mapped at `position`, or the empty
/// segment when no run is mapped there.
fn segment<'a>(
    permutation: &'a Permutation,
    runs: &RunDecomposition,
    alignment: &Alignment,
    position: usize,
) -> &'a [i64] {
    alignment
        .run_at(position)
        .and_then(|index| runs.get(index))
        .map(|run| run.slice(permutation))
        .unwrap_or(&[])
}

/// Applies one transformation step to `permutation`.
///
/// The pattern family selects how run pairs are folded:
///
/// - **TDRL**: position `i` merges with position `half + i`; the residual is
///   the pattern's first half.
/// - **liTDRL**: position `half - 1 - i`, signed-reversed, merges with
///   position `half + i`; the residual is the second half.
/// - **riTDRL**: position `i` merges with position `full - 1 - i`,
///   signed-reversed; the residual is the first half.
///
/// `left` and `right` collect the consumed elements in fold order, reversed
/// sides already reversed, so they spell out the inverse operation's
/// bipartition verbatim.
pub fn transform(
    permutation: &Permutation,
    pattern: &Pattern,
    runs: &RunDecomposition,
    alignment: &Alignment,
) -> Step {
    let symbols = pattern.symbols();
    let full = symbols.len();
    let half = full / 2;

    let mut next = Vec::with_capacity(permutation.len());
    let mut left = Vec::new();
    let mut right = Vec::new();

    let residual = match pattern.op() {
        OpKind::Tdrl => {
            for i in 0..half {
                let lhs = segment(permutation, runs, alignment, i);
                let rhs = segment(permutation, runs, alignment, half + i);
                left.extend_from_slice(lhs);
                right.extend_from_slice(rhs);
                next.extend(merge(lhs, rhs));
            }
            symbols[..half].to_vec()
        }
        OpKind::LiTdrl => {
            for i in 0..half {
                let lhs = invert(segment(permutation, runs, alignment, half - 1 - i));
                let rhs = segment(permutation, runs, alignment, half + i);
                left.extend_from_slice(&lhs);
                right.extend_from_slice(rhs);
                next.extend(merge(&lhs, rhs));
            }
            symbols[half..].to_vec()
        }
        OpKind::RiTdrl => {
            for i in 0..half {
                let lhs = segment(permutation, runs, alignment, i);
                let rhs = invert(segment(permutation, runs, alignment, full - 1 - i));
                left.extend_from_slice(lhs);
                right.extend_from_slice(&rhs);
                next.extend(merge(lhs, &rhs));
            }
            symbols[..half].to_vec()
        }
    };

    Step {
        permutation: Permutation::from_raw(next),
        residual,
        op: pattern.op(),
        left,
        right,
    }
}

#[cfg(test)]
mod tests {
    use ahash::AHashSet;
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;
    use crate::{align, pattern::generate};

    fn step_for(elements: Vec<i64>, pattern: &Pattern) -> Step {
        let permutation = Permutation::new(elements).unwrap();
        let runs = RunDecomposition::of(&permutation);
        let alignment = align::embed(&runs, pattern).unwrap();
        transform(&permutation, pattern, &runs, &alignment)
    }

    /// Applies the inverse operation a step describes to its output
    /// permutation: pick the left/right element subsequences, undo the
    /// reversal on the inverted side, and concatenate.
    fn apply_inverse(step: &Step) -> Vec<i64> {
        let left_set: AHashSet<i64> = step.left.iter().copied().collect();
        let right_set: AHashSet<i64> = step.right.iter().copied().collect();
        let l: Vec<i64> = step
            .permutation
            .iter()
            .copied()
            .filter(|x| left_set.contains(x))
            .collect();
        let r: Vec<i64> = step
            .permutation
            .iter()
            .copied()
            .filter(|x| right_set.contains(x))
            .collect();
        match step.op {
            OpKind::Tdrl => [l, r].concat(),
            OpKind::LiTdrl => [invert(&l), r].concat(),
            OpKind::RiTdrl => [l, invert(&r)].concat(),
        }
    }

    #[test]
    fn merge_interleaves_ascending() {
        assert_eq!(merge(&[1, 3, 5], &[2, 4]), vec![1, 2, 3, 4, 5]);
        assert_eq!(merge(&[], &[7]), vec![7]);
        assert_eq!(merge(&[7], &[]), vec![7]);
        assert_eq!(merge(&[], &[]), Vec::<i64>::new());
        assert_eq!(merge(&[-4, -3], &[-9, 2]), vec![-9, -4, -3, 2]);
    }

    #[test]
    fn merge_ties_take_the_right_side_first() {
        assert_eq!(merge(&[1, 2], &[2, 3]), vec![1, 2, 2, 3]);
    }

    #[test]
    fn tdrl_step_sorts_a_transposition() {
        let pattern = &generate(1)[0]; // TDRL pp
        let step = step_for(vec![2, 1], pattern);
        assert_eq!(step.permutation.as_slice(), &[1, 2]);
        assert_eq!(step.op, OpKind::Tdrl);
        assert_eq!(step.left, vec![2]);
        assert_eq!(step.right, vec![1]);
        assert_eq!(step.residual, vec![Sign::Plus]);
        assert_eq!(step.residual_encoding(), "p");
    }

    #[test]
    fn ritdrl_step_flips_a_negative_run() {
        let pattern = &generate(1)[1]; // riTDRL pn
        let step = step_for(vec![-3, -2, -1], pattern);
        assert_eq!(step.permutation.as_slice(), &[1, 2, 3]);
        assert_eq!(step.op, OpKind::RiTdrl);
        assert_eq!(step.left, Vec::<i64>::new());
        assert_eq!(step.right, vec![1, 2, 3]);
        assert_eq!(step.residual, vec![Sign::Plus]);
    }

    #[test]
    fn litdrl_step_flips_a_leading_negative_run() {
        let pattern = &generate(1)[2]; // liTDRL np
        let step = step_for(vec![-2, 1], pattern);
        assert_eq!(step.permutation.as_slice(), &[1, 2]);
        assert_eq!(step.op, OpKind::LiTdrl);
        assert_eq!(step.left, vec![2]);
        assert_eq!(step.right, vec![1]);
        assert_eq!(step.residual, vec![Sign::Plus]);
    }

    #[test]
    fn ritdrl_step_with_a_longer_pattern() {
        let pattern = &generate(2)[1]; // riTDRL ppnn
        let step = step_for(vec![2, 1, -4, -3], pattern);
        assert_eq!(step.permutation.as_slice(), &[2, 1, 3, 4]);
        assert_eq!(step.left, vec![2, 1]);
        assert_eq!(step.right, vec![3, 4]);
        assert_eq!(step.residual, vec![Sign::Plus, Sign::Plus]);
    }

    #[test]
    fn unmapped_positions_contribute_nothing() {
        // A single sorted run forced through "pp": the right half of the
        // pattern stays empty and the step is the identity on the elements.
        let pattern = &generate(1)[0];
        let step = step_for(vec![1, 2, 3], pattern);
        assert_eq!(step.permutation.as_slice(), &[1, 2, 3]);
        assert_eq!(step.left, vec![1, 2, 3]);
        assert_eq!(step.right, Vec::<i64>::new());
    }

    #[test]
    fn inputs_are_not_mutated() {
        let permutation = Permutation::new(vec![2, 1]).unwrap();
        let runs = RunDecomposition::of(&permutation);
        let pattern = &generate(1)[0];
        let alignment = align::embed(&runs, pattern).unwrap();
        let _ = transform(&permutation, pattern, &runs, &alignment);
        assert_eq!(permutation.as_slice(), &[2, 1]);
        assert_eq!(runs, RunDecomposition::of(&permutation));
    }

    #[test]
    fn inverse_operation_restores_the_input() {
        for (elements, pattern) in [
            (vec![2, 1], &generate(1)[0]),
            (vec![-3, -2, -1], &generate(1)[1]),
            (vec![-2, 1], &generate(1)[2]),
            (vec![2, 1, -4, -3], &generate(2)[1]),
            (vec![1, -2, -3], &generate(2)[1]),
        ] {
            let step = step_for(elements.clone(), pattern);
            assert_eq!(apply_inverse(&step), elements);
        }
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn merge_is_a_length_preserving_interleave(
                mut a in proptest::collection::vec(-50i64..50, 0..12),
                mut b in proptest::collection::vec(-50i64..50, 0..12),
            ) {
                a.sort_unstable();
                b.sort_unstable();
                let merged = merge(&a, &b);
                prop_assert_eq!(merged.len(), a.len() + b.len());
                prop_assert!(merged.windows(2).all(|w| w[0] <= w[1]));

                let mut expected = [a, b].concat();
                expected.sort_unstable();
                let mut sorted = merged.clone();
                sorted.sort_unstable();
                prop_assert_eq!(sorted, expected);
            }

            #[test]
            fn every_fitting_pattern_round_trips(seed in any::<u64>(), n in 2usize..=16) {
                let permutation =
                    Permutation::random(n, 0.5, &mut SmallRng::seed_from_u64(seed));
                let runs = RunDecomposition::of(&permutation);
                let k = (usize::BITS - (runs.len() - 1).leading_zeros()).max(1);
                for exponent in [k, k + 1] {
                    for pattern in generate(exponent) {
                        let Some(alignment) = align::embed(&runs, &pattern) else { continue };
                        let step = transform(&permutation, &pattern, &runs, &alignment);
                        prop_assert_eq!(apply_inverse(&step), permutation.as_slice());
                    }
                }
            }
        }
    }
}
