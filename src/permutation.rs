//! # Signed permutations
//!
//! This module provides a [`Permutation`] struct for representing and working
//! with signed permutations: sequences of `n` non-zero integers whose absolute
//! values are exactly `{1..n}`, each carrying a sign.
//!
//! ## Key Features:
//!
//! - **Construction**:
//!   - Validated: `Permutation::new(vec![...])`.
//!   - Canonical identity: `Permutation::identity(n)`.
//!   - Uniformly random with independent sign flips: `Permutation::random(n, p, rng)`.
//!   - Parsing from whitespace- or comma-separated text via [`FromStr`].
//! - **Basic Operations**:
//!   - Inverse: `p.inverse()`.
//!   - Composition: `p1.compose(&p2)` (applies `p2` then `p1`).
//!   - Elementwise image: `p.image(x)` respects the sign of `x`.
//!   - Signed reversal: `p.reversed()` (order flipped, every sign negated).
//!   - Identity check: `p.is_identity()`.
//! - **Rendering**: one-line form `( 1 -2 3 )` via [`fmt::Display`].
//!
//! The free function [`invert`] applies the signed reversal to an arbitrary
//! integer segment; it is the element-level operation the transformation step
//! uses on runs.

use std::{fmt, ops::Index, str::FromStr};

use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The sign of a permutation element, or of a whole run of elements.
///
/// Serializes as the symbol alphabet `"p"`/`"n"` so that cached pattern files
/// stay human-readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    #[serde(rename = "p")]
    Plus,
    #[serde(rename = "n")]
    Minus,
}

impl Sign {
    /// Sign of a non-zero integer.
    pub fn of(value: i64) -> Self {
        if value < 0 {
            Sign::Minus
        } else {
            Sign::Plus
        }
    }

    /// The encoding symbol: `'p'` for positive, `'n'` for negative.
    pub fn symbol(self) -> char {
        match self {
            Sign::Plus => 'p',
            Sign::Minus => 'n',
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermutationError {
    #[error("a permutation must contain at least one element")]
    Empty,

    #[error("element {0} is out of range for a permutation of length {1}")]
    OutOfRange(i64, usize),

    #[error("absolute value {0} occurs more than once")]
    Duplicate(i64),

    #[error("cannot parse `{0}` as a signed integer")]
    Parse(String),
}

/// A signed permutation of `{1..n}`.
///
/// # Examples
///
/// ```
/// use mitosort::permutation::Permutation;
///
/// let p = Permutation::new(vec![3, -1, 2]).unwrap();
/// assert_eq!(p.len(), 3);
/// assert_eq!(p.to_string(), "( 3 -1 2 )");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permutation {
    elements: Vec<i64>,
}

impl Permutation {
    /// Validates and wraps a sequence of signed elements.
    ///
    /// Every absolute value in `1..=n` must occur exactly once.
    pub fn new(elements: Vec<i64>) -> Result<Self, PermutationError> {
        if elements.is_empty() {
            return Err(PermutationError::Empty);
        }
        let n = elements.len();
        let mut seen = vec![false; n];
        for &element in &elements {
            let magnitude = element.unsigned_abs() as usize;
            if magnitude == 0 || magnitude > n {
                return Err(PermutationError::OutOfRange(element, n));
            }
            if std::mem::replace(&mut seen[magnitude - 1], true) {
                return Err(PermutationError::Duplicate(element.abs()));
            }
        }
        Ok(Permutation { elements })
    }

    /// Wraps elements that are valid by construction (transformation output).
    pub(crate) fn from_raw(elements: Vec<i64>) -> Self {
        Permutation { elements }
    }

    /// The canonical identity `( 1 2 .. n )`.
    pub fn identity(n: usize) -> Self {
        Permutation {
            elements: (1..=n as i64).collect(),
        }
    }

    /// A uniformly random signed permutation of `{1..n}`; each element is
    /// negated independently with probability `negation_probability`.
    ///
    /// # Panics
    ///
    /// Panics if `negation_probability` is not in `[0, 1]`.
    pub fn random(n: usize, negation_probability: f64, rng: &mut impl Rng) -> Self {
        let mut elements: Vec<i64> = (1..=n as i64).collect();
        elements.shuffle(rng);
        for element in &mut elements {
            if rng.gen_bool(negation_probability) {
                *element = -*element;
            }
        }
        Permutation { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, i64> {
        self.elements.iter()
    }

    /// Whether this is the canonical identity `( 1 2 .. n )`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use mitosort::permutation::Permutation;
    /// assert!(Permutation::identity(4).is_identity());
    /// assert!(!Permutation::new(vec![2, 1]).unwrap().is_identity());
    /// ```
    pub fn is_identity(&self) -> bool {
        self.elements
            .iter()
            .enumerate()
            .all(|(i, &element)| element == i as i64 + 1)
    }

    /// The image of a signed value under this permutation.
    ///
    /// A negative argument negates the image, so `image` extends the
    /// permutation to the signed alphabet.
    pub fn image(&self, value: i64) -> i64 {
        let mapped = self.elements[value.unsigned_abs() as usize - 1];
        if value < 0 {
            -mapped
        } else {
            mapped
        }
    }

    /// Returns the inverse permutation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use mitosort::permutation::Permutation;
    /// let p = Permutation::new(vec![3, -1, 2]).unwrap();
    /// assert_eq!(p.inverse().as_slice(), &[-2, 3, 1]);
    /// assert!(p.compose(&p.inverse()).is_identity());
    /// ```
    pub fn inverse(&self) -> Self {
        let mut inverse = vec![0i64; self.elements.len()];
        for (i, &element) in self.elements.iter().enumerate() {
            let position = i as i64 + 1;
            inverse[element.unsigned_abs() as usize - 1] = if element < 0 {
                -position
            } else {
                position
            };
        }
        Permutation { elements: inverse }
    }

    /// Composes `self` with `other`: `(self ∘ other)(i) = self.image(other(i))`.
    ///
    /// Both permutations must have the same length.
    pub fn compose(&self, other: &Self) -> Self {
        debug_assert_eq!(self.len(), other.len());
        Permutation {
            elements: other.iter().map(|&value| self.image(value)).collect(),
        }
    }

    /// The signed reversal of the whole permutation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use mitosort::permutation::Permutation;
    /// let p = Permutation::new(vec![3, -1, 2]).unwrap();
    /// assert_eq!(p.reversed().as_slice(), &[-2, 1, -3]);
    /// ```
    pub fn reversed(&self) -> Self {
        Permutation {
            elements: invert(&self.elements),
        }
    }
}

/// Reverses the order of a segment and negates every element.
///
/// Applying it twice returns the original segment.
pub fn invert(segment: &[i64]) -> Vec<i64> {
    segment.iter().rev().map(|&value| -value).collect()
}

impl Index<usize> for Permutation {
    type Output = i64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.elements[index]
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( {} )", self.elements.iter().join(" "))
    }
}

impl FromStr for Permutation {
    type Err = PermutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let elements = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<i64>()
                    .map_err(|_| PermutationError::Parse(token.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Permutation::new(elements)
    }
}
