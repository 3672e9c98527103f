//! Shape-directed algorithm tables.
//!
//! An algorithm is registered under one pattern per dispatched argument. A
//! lookup picks the most specific registration whose patterns all match the
//! arguments' shapes: each pattern has a rank (exact shape 0, sequence 1,
//! anything 2) and the lowest summed rank wins. Equal ranks go to the
//! earliest registration.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::syntax::Shape;

/// What a registration accepts for one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    Exact(Shape),
    /// Tuples and lists.
    Sequence,
    Any,
}

impl Pattern {
    pub fn matches(self, shape: Shape) -> bool {
        match self {
            Pattern::Exact(expected) => expected == shape,
            Pattern::Sequence => matches!(shape, Shape::Tuple | Shape::List),
            Pattern::Any => true,
        }
    }

    /// Lower is more specific.
    pub fn rank(self) -> usize {
        match self {
            Pattern::Exact(_) => 0,
            Pattern::Sequence => 1,
            Pattern::Any => 2,
        }
    }
}

impl From<Shape> for Pattern {
    fn from(shape: Shape) -> Self {
        Pattern::Exact(shape)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Exact(shape) => write!(f, "{}", shape),
            Pattern::Sequence => write!(f, "sequence"),
            Pattern::Any => write!(f, "any"),
        }
    }
}

/// Errors from algorithm lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("no algorithm registered for ({})", join_shapes(.shapes))]
    NoAlgorithm { shapes: Vec<Shape> },
}

fn join_shapes(shapes: &[Shape]) -> String {
    shapes
        .iter()
        .map(Shape::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Algorithms of type `F`, dispatched on the shapes of `N` arguments.
#[derive(Clone)]
pub struct DispatchTable<F, const N: usize> {
    entries: Vec<([Pattern; N], F)>,
    /// Winning entry index for every combination of shapes.
    resolved: Vec<Option<usize>>,
}

impl<F: Copy, const N: usize> DispatchTable<F, N> {
    /// A table with no registrations; every lookup misses.
    pub fn empty() -> Self {
        DispatchTable {
            entries: Vec::new(),
            resolved: vec![None; Shape::ALL.len().pow(N as u32)],
        }
    }

    /// Register `algorithm` for arguments matching `patterns`.
    ///
    /// Existing registrations are untouched; a new registration only wins
    /// the shape combinations for which it is strictly more specific.
    pub fn register(&mut self, patterns: [Pattern; N], algorithm: F) {
        debug!(
            patterns = %patterns.iter().map(Pattern::to_string).collect::<Vec<_>>().join(", "),
            "registered algorithm"
        );
        self.entries.push((patterns, algorithm));
        self.resolve_all();
    }

    /// The algorithm for arguments of the given shapes.
    pub fn lookup(&self, shapes: [Shape; N]) -> Result<F, DispatchError> {
        self.resolved[Self::slot(&shapes)]
            .map(|entry| self.entries[entry].1)
            .ok_or_else(|| DispatchError::NoAlgorithm {
                shapes: shapes.to_vec(),
            })
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn slot(shapes: &[Shape; N]) -> usize {
        shapes
            .iter()
            .fold(0, |slot, shape| slot * Shape::ALL.len() + shape.index())
    }

    fn resolve_all(&mut self) {
        for slot in 0..self.resolved.len() {
            let shapes = Self::shapes_of(slot);
            self.resolved[slot] = self.most_specific(&shapes);
        }
    }

    fn shapes_of(mut slot: usize) -> [Shape; N] {
        let mut shapes = [Shape::Atom; N];
        for shape in shapes.iter_mut().rev() {
            *shape = Shape::ALL[slot % Shape::ALL.len()];
            slot /= Shape::ALL.len();
        }
        shapes
    }

    fn most_specific(&self, shapes: &[Shape; N]) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, (patterns, _))| {
                patterns
                    .iter()
                    .zip(shapes)
                    .all(|(pattern, &shape)| pattern.matches(shape))
            })
            .map(|(index, (patterns, _))| {
                let rank: usize = patterns.iter().map(|p| p.rank()).sum();
                (rank, index)
            })
            // Tuples compare rank first, then registration order.
            .min()
            .map(|(_, index)| index)
    }
}

impl<F, const N: usize> fmt::Debug for DispatchTable<F, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field(
                "entries",
                &self.entries.iter().map(|(p, _)| p).collect::<Vec<_>>(),
            )
            .finish()
    }
}
