//! Reification: replacing bound logic variables in a term by their values.

use std::collections::BTreeSet;

use crate::dispatch::{DispatchTable, Pattern};
use crate::eval::{Computation, Event, Flow, Interrupt, Observer, Step, Suspend};
use crate::syntax::{dispatch_shape, is_variable, Shape, Slice, Term};
use crate::unifier::default_unifier;
use crate::unify::{walk, Substitution};

/// A reification algorithm for one term shape.
pub type ReifyAlgorithm =
    for<'a> fn(table: &'a ReifyTable, term: &Term, subst: &Substitution) -> Computation<'a, Term>;

/// Reification algorithms keyed by term shape.
#[derive(Debug, Clone)]
pub struct ReifyTable {
    table: DispatchTable<ReifyAlgorithm, 1>,
}

impl Default for ReifyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ReifyTable {
    /// The standard algorithms for every shape.
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.register([Shape::Var.into()], reify_variable);
        table.register([Pattern::Sequence], reify_compound);
        table.register([Shape::Set.into()], reify_compound);
        table.register([Shape::Map.into()], reify_compound);
        table.register([Shape::Slice.into()], reify_compound);
        table.register([Pattern::Any], reify_atomic);
        table
    }

    /// A table with no algorithms.
    pub fn empty() -> Self {
        ReifyTable {
            table: DispatchTable::empty(),
        }
    }

    pub fn register(&mut self, patterns: [Pattern; 1], algorithm: ReifyAlgorithm) {
        self.table.register(patterns, algorithm);
    }

    /// The suspended reification of `term` under `subst`.
    ///
    /// # Panics
    ///
    /// If no algorithm is registered for the shape of `term`.
    pub fn computation<'a>(&'a self, term: &Term, subst: &Substitution) -> Computation<'a, Term> {
        let algorithm = self
            .table
            .lookup([dispatch_shape(term)])
            .unwrap_or_else(|err| panic!("{}", err));
        algorithm(self, term, subst)
    }
}

/// How to put a compound back together from its reified parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rebuild {
    Tuple,
    List,
    Set,
    /// Parts alternate key, value.
    Map,
    Slice,
}

impl Rebuild {
    /// The parts of `term` in reification order, and how to rebuild it.
    fn decompose(term: &Term) -> Option<(Rebuild, Vec<Term>)> {
        let decomposed = match term {
            Term::Tuple(items) => (Rebuild::Tuple, items.to_vec()),
            Term::List(items) => (Rebuild::List, items.to_vec()),
            Term::Set(set) => (Rebuild::Set, set.iter().cloned().collect()),
            Term::Map(map) => (
                Rebuild::Map,
                map.iter()
                    .flat_map(|(key, value)| [key.clone(), value.clone()])
                    .collect(),
            ),
            Term::Slice(slice) => (
                Rebuild::Slice,
                vec![slice.start.clone(), slice.stop.clone(), slice.step.clone()],
            ),
            Term::Atom(_) | Term::Var(_) => return None,
        };
        Some(decomposed)
    }

    fn build(self, parts: Vec<Term>) -> Term {
        match self {
            Rebuild::Tuple => Term::Tuple(parts.into()),
            Rebuild::List => Term::List(parts.into()),
            Rebuild::Set => Term::set(parts),
            Rebuild::Map => {
                let mut parts = parts.into_iter();
                let mut entries = Vec::new();
                while let (Some(key), Some(value)) = (parts.next(), parts.next()) {
                    entries.push((key, value));
                }
                Term::map(entries)
            }
            Rebuild::Slice => {
                let mut parts = parts.into_iter();
                Term::from(Slice {
                    start: parts.next().unwrap_or_default(),
                    stop: parts.next().unwrap_or_default(),
                    step: parts.next().unwrap_or_default(),
                })
            }
        }
    }
}

/// Reifies each part of a compound in turn, then rebuilds a compound of the
/// same kind from the results.
struct ReifyParts<'a> {
    table: &'a ReifyTable,
    subst: Substitution,
    rebuild: Rebuild,
    pending: std::vec::IntoIter<Term>,
    parts: Vec<Term>,
    constructing: bool,
}

impl<'a> Suspend<'a, Term> for ReifyParts<'a> {
    fn resume(&mut self, input: Option<Term>) -> Step<'a, Term> {
        if let Some(part) = input {
            self.parts.push(part);
        }
        if let Some(next) = self.pending.next() {
            return Step::Await(self.table.computation(&next, &self.subst));
        }
        if !self.constructing {
            self.constructing = true;
            return Step::Construct;
        }
        let parts = std::mem::take(&mut self.parts);
        Step::Return(self.rebuild.build(parts))
    }
}

fn reify_variable<'a>(
    table: &'a ReifyTable,
    term: &Term,
    subst: &Substitution,
) -> Computation<'a, Term> {
    let resolved = walk(term, subst);
    if std::ptr::eq(resolved, term) {
        Computation::Done(term.clone())
    } else {
        table.computation(resolved, subst)
    }
}

fn reify_compound<'a>(
    table: &'a ReifyTable,
    term: &Term,
    subst: &Substitution,
) -> Computation<'a, Term> {
    match Rebuild::decompose(term) {
        Some((rebuild, pending)) => Computation::suspended(ReifyParts {
            table,
            subst: subst.clone(),
            rebuild,
            parts: Vec::with_capacity(pending.len()),
            pending: pending.into_iter(),
            constructing: false,
        }),
        None => reify_atomic(table, term, subst),
    }
}

fn reify_atomic<'a>(
    _table: &'a ReifyTable,
    term: &Term,
    _subst: &Substitution,
) -> Computation<'a, Term> {
    Computation::Done(term.clone())
}

/// Halts at the first unresolved variable; skips every reconstruction.
pub(crate) struct GroundCheck;

impl Observer<Term> for GroundCheck {
    fn observe(&mut self, event: Event<'_, Term>) -> Flow {
        match event {
            Event::Value(term) if is_variable(term) => Flow::Halt,
            Event::Construct => Flow::Abandon,
            _ => Flow::Continue,
        }
    }
}

impl GroundCheck {
    pub(crate) fn verdict(outcome: Result<Term, Interrupt>) -> bool {
        !matches!(outcome, Err(Interrupt::Halted))
    }
}

/// Records every unresolved variable; skips every reconstruction.
#[derive(Default)]
pub(crate) struct FreeVariables {
    pub(crate) found: BTreeSet<Term>,
}

impl Observer<Term> for FreeVariables {
    fn observe(&mut self, event: Event<'_, Term>) -> Flow {
        match event {
            Event::Value(term) if is_variable(term) => {
                self.found.insert(term.clone());
                Flow::Continue
            }
            Event::Construct => Flow::Abandon,
            _ => Flow::Continue,
        }
    }
}

/// Replace every variable bound in `subst` inside `term` by its value,
/// recursively. Unbound variables are kept.
///
/// Uses the process-wide default [`Unifier`](crate::Unifier).
pub fn reify(term: &Term, subst: &Substitution) -> Term {
    default_unifier().reify(term, subst)
}

/// Check if `term` contains no unresolved variable under `subst`.
pub fn is_ground(term: &Term, subst: &Substitution) -> bool {
    default_unifier().is_ground(term, subst)
}

/// The unresolved variables of `term` under `subst`.
pub fn free_variables(term: &Term, subst: &Substitution) -> BTreeSet<Term> {
    default_unifier().free_variables(term, subst)
}
