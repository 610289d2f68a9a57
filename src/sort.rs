//! # The sorting driver
//!
//! [`sort`] orchestrates the whole recursion: decompose the permutation,
//! find the shortest pattern its run encoding embeds into (that pattern's
//! exponent is the sorting distance), then repeatedly transform until the
//! identity is reached, deriving each follow-up pattern from the shape of
//! the residual.
//!
//! [`sort_into`] relabels the computation so the trace ends at an arbitrary
//! target permutation instead of the canonical identity.

use thiserror::Error;

use crate::{
    align,
    pattern::{store::PatternStore, OpKind, Pattern, PatternLibrary},
    permutation::{Permutation, Sign},
    runs::RunDecomposition,
    transform::{transform, Step},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("cannot sort an empty permutation")]
    EmptyPermutation,

    #[error("no pattern of length 2^{0} or 2^{1} embeds the run decomposition")]
    NoEmbedding(u32, u32),

    #[error("the run decomposition stopped embedding into the tracked pattern")]
    LostEmbedding,

    #[error("permutations of length {0} and {1} cannot be relabeled into each other")]
    LengthMismatch(usize, usize),
}

/// A complete sorting scenario.
///
/// `steps` holds exactly `distance` transformation outcomes, each carrying
/// the next permutation and the operation that reverses it; the last step's
/// permutation is sorted. `pattern` is the initially chosen pattern, absent
/// when the input was already sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub input: Permutation,
    pub distance: u32,
    pub pattern: Option<Pattern>,
    pub steps: Vec<Step>,
}

impl Scenario {
    /// The permutation the scenario ends at.
    pub fn result(&self) -> &Permutation {
        self.steps
            .last()
            .map(|step| &step.permutation)
            .unwrap_or(&self.input)
    }
}

fn ceil_log2(n: usize) -> u32 {
    debug_assert!(n > 0);
    usize::BITS - (n - 1).leading_zeros()
}

/// Tries every pattern of exponent `k`, then of `k + 1`, in library order;
/// the first embedding fixes the distance and the initial pattern.
fn search_pattern<S: PatternStore>(
    runs: &RunDecomposition,
    library: &mut PatternLibrary<S>,
    k: u32,
) -> Result<(u32, Pattern), SortError> {
    for exponent in [k, k + 1] {
        for pattern in library.patterns(exponent) {
            if align::embed(runs, &pattern).is_some() {
                return Ok((exponent, pattern));
            }
        }
    }
    // A pattern of the larger exponent always fits; reaching this means the
    // input was not a signed permutation.
    Err(SortError::NoEmbedding(k, k + 1))
}

/// Derives the family of the next pattern from the residual's shape.
fn next_family(residual: &[Sign]) -> OpKind {
    let first = residual[0];
    let last = residual[residual.len() - 1];
    let middle = residual[residual.len() / 2];
    match (first, last, middle) {
        (Sign::Minus, Sign::Plus, Sign::Plus) => OpKind::LiTdrl,
        (Sign::Plus, Sign::Minus, Sign::Minus) => OpKind::RiTdrl,
        _ => OpKind::Tdrl,
    }
}

/// Computes a minimum-length scenario sorting `input` to the canonical
/// identity.
///
/// # Examples
///
/// ```
/// use mitosort::{pattern::PatternLibrary, permutation::Permutation, sort::sort};
///
/// let p = Permutation::new(vec![2, 1]).unwrap();
/// let scenario = sort(&p, &mut PatternLibrary::in_memory()).unwrap();
/// assert_eq!(scenario.distance, 1);
/// assert!(scenario.result().is_identity());
/// ```
pub fn sort<S: PatternStore>(
    input: &Permutation,
    library: &mut PatternLibrary<S>,
) -> Result<Scenario, SortError> {
    if input.is_empty() {
        return Err(SortError::EmptyPermutation);
    }

    let runs = RunDecomposition::of(input);
    // A single positive run is already sorted.
    if runs.len() == 1 && runs.runs()[0].sign == Sign::Plus {
        return Ok(Scenario {
            input: input.clone(),
            distance: 0,
            pattern: None,
            steps: Vec::new(),
        });
    }

    let k = ceil_log2(runs.len());
    let (distance, initial) = search_pattern(&runs, library, k)?;

    let mut steps = Vec::with_capacity(distance as usize);
    let mut current = input.clone();
    let mut pattern = initial.clone();
    let mut remaining = distance;
    while remaining > 0 {
        let runs = RunDecomposition::of(&current);
        let alignment = align::embed(&runs, &pattern).ok_or(SortError::LostEmbedding)?;
        let step = transform(&current, &pattern, &runs, &alignment);
        current = step.permutation.clone();
        remaining -= 1;
        if remaining > 0 {
            pattern = Pattern::new(next_family(&step.residual), step.residual.clone());
        }
        steps.push(step);
    }

    Ok(Scenario {
        input: input.clone(),
        distance,
        pattern: Some(initial),
        steps,
    })
}

/// Computes the scenario sorting `input` into `target` instead of the
/// canonical identity.
///
/// The computation runs in the frame where `target` is the identity and is
/// relabeled back, so every reported permutation and bipartition uses the
/// caller's element names; the final permutation equals `target`.
pub fn sort_into<S: PatternStore>(
    input: &Permutation,
    target: &Permutation,
    library: &mut PatternLibrary<S>,
) -> Result<Scenario, SortError> {
    if input.len() != target.len() {
        return Err(SortError::LengthMismatch(input.len(), target.len()));
    }

    let relabeled = target.inverse().compose(input);
    let scenario = sort(&relabeled, library)?;

    let relabel = |values: &[i64]| values.iter().map(|&value| target.image(value)).collect();
    Ok(Scenario {
        input: input.clone(),
        distance: scenario.distance,
        pattern: scenario.pattern,
        steps: scenario
            .steps
            .into_iter()
            .map(|step| Step {
                permutation: target.compose(&step.permutation),
                residual: step.residual,
                op: step.op,
                left: relabel(&step.left),
                right: relabel(&step.right),
            })
            .collect(),
    })
}
