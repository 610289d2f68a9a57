//! # Canonical sorting patterns
//!
//! Patterns are sign strings of power-of-two length that describe how far a
//! permutation's run structure is from sorted: a permutation whose run
//! encoding embeds into a pattern of length `2^k` can be sorted in at most
//! `k` TDRL/iTDRL operations, and the pattern's family names the operation
//! that undoes the next transformation step.
//!
//! The full list for an exponent is generated bottom-up from exponent 1 and
//! is expensive only through its string lengths, so [`PatternLibrary`] puts a
//! [`store::PatternStore`] in front of [`generate`] and fills it lazily.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::permutation::Sign;

pub mod store;

pub use store::PatternLibrary;

/// The three operation families of the sorting model.
///
/// `Tdrl` is the plain tandem duplication random loss; `LiTdrl` and `RiTdrl`
/// are its left- and right-inverted variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    #[serde(rename = "TDRL")]
    Tdrl,
    #[serde(rename = "liTDRL")]
    LiTdrl,
    #[serde(rename = "riTDRL")]
    RiTdrl,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpKind::Tdrl => "TDRL",
            OpKind::LiTdrl => "liTDRL",
            OpKind::RiTdrl => "riTDRL",
        };
        write!(f, "{name}")
    }
}

/// A family tag together with its sign string.
///
/// Immutable once built; the symbol length is always a power of two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    op: OpKind,
    symbols: Vec<Sign>,
}

impl Pattern {
    pub fn new(op: OpKind, symbols: Vec<Sign>) -> Self {
        Pattern { op, symbols }
    }

    pub fn op(&self) -> OpKind {
        self.op
    }

    pub fn symbols(&self) -> &[Sign] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The sign string as text, e.g. `"ppnn"`.
    pub fn encoding(&self) -> String {
        self.symbols.iter().map(|sign| sign.symbol()).collect()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.encoding())
    }
}

/// Generates the ordered pattern list for exponent `k` (strings of length
/// `2^k`).
///
/// For each exponent the list holds, in order:
///
/// 1. the all-positive string (TDRL),
/// 2. positive half then negative half (riTDRL),
/// 3. negative half then positive half (liTDRL),
/// 4. every pattern of the previous exponent concatenated with itself
///    (TDRL), skipping those that both start and end positive.
///
/// Exponents below `k` are scaffolding; only the `k` slice is returned.
/// `k = 0` yields the empty list: no pattern is shorter than two symbols.
///
/// # Examples
///
/// ```
/// use mitosort::pattern::generate;
///
/// let patterns = generate(2);
/// let encodings: Vec<String> = patterns.iter().map(|p| p.encoding()).collect();
/// assert_eq!(encodings, ["pppp", "ppnn", "nnpp", "pnpn", "npnp"]);
/// ```
pub fn generate(k: u32) -> Vec<Pattern> {
    if k == 0 {
        return Vec::new();
    }

    let mut previous: Vec<Pattern> = Vec::new();
    for i in 1..=k {
        let full = 1usize << i;
        let half = full / 2;

        let mut current = Vec::with_capacity(previous.len() + 3);
        current.push(Pattern::new(OpKind::Tdrl, vec![Sign::Plus; full]));

        let mut positive_negative = vec![Sign::Plus; half];
        positive_negative.extend(std::iter::repeat(Sign::Minus).take(half));
        current.push(Pattern::new(OpKind::RiTdrl, positive_negative));

        let mut negative_positive = vec![Sign::Minus; half];
        negative_positive.extend(std::iter::repeat(Sign::Plus).take(half));
        current.push(Pattern::new(OpKind::LiTdrl, negative_positive));

        for pattern in &previous {
            if pattern.symbols.first() == Some(&Sign::Plus)
                && pattern.symbols.last() == Some(&Sign::Plus)
            {
                continue;
            }
            let mut doubled = pattern.symbols.clone();
            doubled.extend_from_slice(&pattern.symbols);
            current.push(Pattern::new(OpKind::Tdrl, doubled));
        }

        previous = current;
    }
    previous
}
