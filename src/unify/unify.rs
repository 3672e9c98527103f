//! Unification: one algorithm per pair of term shapes, driven without native recursion.

use thiserror::Error;

use super::{walk, Substitution};
use crate::dispatch::{DispatchTable, Pattern};
use crate::eval::{Computation, Step, Suspend};
use crate::syntax::{dispatch_shape, is_variable, Atom, Shape, Term};
use crate::unifier::default_unifier;

/// Result of a unification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnifyResult {
    /// Unification succeeded; the substitution may have no bindings at all.
    Success(Substitution),
    /// Unification failed.
    Failure(UnifyError),
}

impl UnifyResult {
    pub fn is_success(&self) -> bool {
        matches!(self, UnifyResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, UnifyResult::Failure(_))
    }

    pub fn substitution(&self) -> Option<&Substitution> {
        match self {
            UnifyResult::Success(subst) => Some(subst),
            UnifyResult::Failure(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Substitution, UnifyError> {
        match self {
            UnifyResult::Success(subst) => Ok(subst),
            UnifyResult::Failure(err) => Err(err),
        }
    }
}

/// Reasons why unification can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    /// Sequences, set residues, or mappings of different sizes.
    #[error("length mismatch: {left} elements against {right}")]
    LengthMismatch { left: usize, right: usize },
    /// A key of the left mapping that the right one lacks.
    #[error("key {key:?} is missing from the right-hand mapping")]
    MissingKey { key: Term },
    #[error("atoms {left} and {right} differ")]
    AtomMismatch { left: Atom, right: Atom },
    #[error("cannot unify a {left} with a {right}")]
    ShapeClash { left: Shape, right: Shape },
}

/// A unification algorithm for one pair of shapes.
///
/// It either decides immediately or returns a suspended computation that
/// awaits the unification of sub-terms through `table`.
pub type UnifyAlgorithm = for<'a> fn(
    table: &'a UnifyTable,
    u: &Term,
    v: &Term,
    subst: Substitution,
) -> Computation<'a, UnifyResult>;

/// Unification algorithms keyed by the shapes of both terms.
#[derive(Debug, Clone)]
pub struct UnifyTable {
    table: DispatchTable<UnifyAlgorithm, 2>,
}

impl Default for UnifyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl UnifyTable {
    /// The standard algorithms for every shape pair.
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.register([Shape::Var.into(), Pattern::Any], unify_variable);
        table.register([Pattern::Any, Shape::Var.into()], unify_variable_right);
        table.register([Shape::Tuple.into(), Shape::Tuple.into()], unify_sequence);
        table.register([Shape::List.into(), Shape::List.into()], unify_sequence);
        table.register([Shape::Set.into(), Shape::Set.into()], unify_set);
        table.register([Shape::Map.into(), Shape::Map.into()], unify_map);
        table.register([Shape::Slice.into(), Shape::Slice.into()], unify_slice);
        table.register([Pattern::Any, Pattern::Any], unify_atomic);
        table
    }

    /// A table with no algorithms.
    pub fn empty() -> Self {
        UnifyTable {
            table: DispatchTable::empty(),
        }
    }

    pub fn register(&mut self, patterns: [Pattern; 2], algorithm: UnifyAlgorithm) {
        self.table.register(patterns, algorithm);
    }

    /// The suspended unification of `u` and `v` under `subst`.
    ///
    /// # Panics
    ///
    /// If no algorithm is registered for the shapes of `u` and `v`.
    pub fn computation<'a>(
        &'a self,
        u: &Term,
        v: &Term,
        subst: Substitution,
    ) -> Computation<'a, UnifyResult> {
        let algorithm = self
            .table
            .lookup([dispatch_shape(u), dispatch_shape(v)])
            .unwrap_or_else(|err| panic!("{}", err));
        algorithm(self, u, v, subst)
    }

    /// The suspended simultaneous unification of every pair, left to right.
    pub fn computation_many<'a>(
        &'a self,
        pairs: Vec<(Term, Term)>,
        subst: Substitution,
    ) -> Computation<'a, UnifyResult> {
        Computation::suspended(UnifyPairs::new(self, pairs, subst))
    }
}

/// Folds unification over pairs of sub-terms, threading the substitution and
/// stopping at the first failure.
struct UnifyPairs<'a> {
    table: &'a UnifyTable,
    pairs: std::vec::IntoIter<(Term, Term)>,
    subst: Substitution,
}

impl<'a> UnifyPairs<'a> {
    fn new(table: &'a UnifyTable, pairs: Vec<(Term, Term)>, subst: Substitution) -> Self {
        UnifyPairs {
            table,
            pairs: pairs.into_iter(),
            subst,
        }
    }
}

impl<'a> Suspend<'a, UnifyResult> for UnifyPairs<'a> {
    fn resume(&mut self, input: Option<UnifyResult>) -> Step<'a, UnifyResult> {
        match input {
            Some(UnifyResult::Success(subst)) => self.subst = subst,
            Some(failure) => return Step::Return(failure),
            None => {}
        }
        let subst = std::mem::take(&mut self.subst);
        match self.pairs.next() {
            Some((u, v)) => Step::Await(self.table.computation(&u, &v, subst)),
            None => Step::Return(UnifyResult::Success(subst)),
        }
    }
}

fn unify_variable<'a>(
    table: &'a UnifyTable,
    u: &Term,
    v: &Term,
    mut subst: Substitution,
) -> Computation<'a, UnifyResult> {
    let u_walked = walk(u, &subst);
    let v_walked = if is_variable(v) { walk(v, &subst) } else { v };

    if std::ptr::eq(u_walked, u) {
        if u != v_walked {
            let binding = v_walked.clone();
            subst.bind(u.clone(), binding);
        }
        return Computation::Done(UnifyResult::Success(subst));
    }

    let (u_walked, v_walked) = (u_walked.clone(), v_walked.clone());
    table.computation(&u_walked, &v_walked, subst)
}

fn unify_variable_right<'a>(
    table: &'a UnifyTable,
    u: &Term,
    v: &Term,
    subst: Substitution,
) -> Computation<'a, UnifyResult> {
    unify_variable(table, v, u, subst)
}

fn unify_sequence<'a>(
    table: &'a UnifyTable,
    u: &Term,
    v: &Term,
    subst: Substitution,
) -> Computation<'a, UnifyResult> {
    let (Some(left), Some(right)) = (u.items(), v.items()) else {
        return unify_atomic(table, u, v, subst);
    };
    unify_elementwise(table, left.to_vec(), right.to_vec(), subst)
}

fn unify_set<'a>(
    table: &'a UnifyTable,
    u: &Term,
    v: &Term,
    subst: Substitution,
) -> Computation<'a, UnifyResult> {
    let (Term::Set(left), Term::Set(right)) = (u, v) else {
        return unify_atomic(table, u, v, subst);
    };
    // Elements present on both sides pair with themselves; what remains must
    // pair up in iteration order.
    let left_rest = left.difference(right).cloned().collect();
    let right_rest = right.difference(left).cloned().collect();
    unify_elementwise(table, left_rest, right_rest, subst)
}

fn unify_elementwise<'a>(
    table: &'a UnifyTable,
    left: Vec<Term>,
    right: Vec<Term>,
    subst: Substitution,
) -> Computation<'a, UnifyResult> {
    if left.len() != right.len() {
        return Computation::Done(UnifyResult::Failure(UnifyError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        }));
    }
    let pairs = left.into_iter().zip(right).collect();
    Computation::suspended(UnifyPairs::new(table, pairs, subst))
}

fn unify_map<'a>(
    table: &'a UnifyTable,
    u: &Term,
    v: &Term,
    subst: Substitution,
) -> Computation<'a, UnifyResult> {
    let (Term::Map(left), Term::Map(right)) = (u, v) else {
        return unify_atomic(table, u, v, subst);
    };
    if left.len() != right.len() {
        return Computation::Done(UnifyResult::Failure(UnifyError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        }));
    }
    let mut pairs = Vec::with_capacity(left.len());
    for (key, value) in left.iter() {
        match right.get(key) {
            Some(other) => pairs.push((value.clone(), other.clone())),
            None => {
                return Computation::Done(UnifyResult::Failure(UnifyError::MissingKey {
                    key: key.clone(),
                }))
            }
        }
    }
    Computation::suspended(UnifyPairs::new(table, pairs, subst))
}

fn unify_slice<'a>(
    table: &'a UnifyTable,
    u: &Term,
    v: &Term,
    subst: Substitution,
) -> Computation<'a, UnifyResult> {
    let (Term::Slice(left), Term::Slice(right)) = (u, v) else {
        return unify_atomic(table, u, v, subst);
    };
    let pairs = vec![
        (left.start.clone(), right.start.clone()),
        (left.stop.clone(), right.stop.clone()),
        (left.step.clone(), right.step.clone()),
    ];
    Computation::suspended(UnifyPairs::new(table, pairs, subst))
}

fn unify_atomic<'a>(
    _table: &'a UnifyTable,
    u: &Term,
    v: &Term,
    subst: Substitution,
) -> Computation<'a, UnifyResult> {
    let result = if u == v {
        UnifyResult::Success(subst)
    } else if let (Term::Atom(left), Term::Atom(right)) = (u, v) {
        UnifyResult::Failure(UnifyError::AtomMismatch {
            left: left.clone(),
            right: right.clone(),
        })
    } else {
        UnifyResult::Failure(UnifyError::ShapeClash {
            left: u.shape(),
            right: v.shape(),
        })
    };
    Computation::Done(result)
}

/// Find an extension of `subst` under which `u` and `v` are equal.
///
/// Uses the process-wide default [`Unifier`](crate::Unifier).
pub fn unify(u: &Term, v: &Term, subst: &Substitution) -> UnifyResult {
    default_unifier().unify(u, v, subst)
}

/// Unify `u` and `v` starting from the empty substitution.
pub fn solve(u: &Term, v: &Term) -> UnifyResult {
    default_unifier().solve(u, v)
}

/// Simultaneous unification of multiple term pairs.
///
/// Finds an extension σ of `subst` such that σ(uᵢ) = σ(vᵢ) for all pairs.
pub fn unify_many(pairs: &[(Term, Term)], subst: &Substitution) -> UnifyResult {
    default_unifier().unify_many(pairs, subst)
}
