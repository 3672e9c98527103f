//! Unifier: the configured entry point for unification and reification.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::eval::{EvalConfig, Evaluator};
use crate::reify::{FreeVariables, GroundCheck, ReifyTable};
use crate::syntax::Term;
use crate::unify::{Substitution, UnifyResult, UnifyTable};

static DEFAULT: LazyLock<Unifier> = LazyLock::new(Unifier::new);

/// The unifier behind the crate-level free functions.
pub fn default_unifier() -> &'static Unifier {
    &DEFAULT
}

/// A unifier holds the algorithm tables and the evaluator that drives them.
///
/// The standard tables cover every shape; register additional algorithms
/// through [`unify_table_mut`](Self::unify_table_mut) and
/// [`reify_table_mut`](Self::reify_table_mut) to override them for specific
/// shape combinations.
#[derive(Debug, Clone, Default)]
pub struct Unifier {
    unify_table: UnifyTable,
    reify_table: ReifyTable,
    evaluator: Evaluator,
}

impl Unifier {
    /// Create a unifier with the standard tables and default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a unifier with the given evaluator configuration.
    pub fn with_config(config: EvalConfig) -> Self {
        Unifier {
            evaluator: Evaluator::with_config(config),
            ..Self::default()
        }
    }

    /// Create a unifier from explicit tables.
    pub fn with_tables(unify_table: UnifyTable, reify_table: ReifyTable) -> Self {
        Unifier {
            unify_table,
            reify_table,
            evaluator: Evaluator::new(),
        }
    }

    pub fn config(&self) -> &EvalConfig {
        self.evaluator.config()
    }

    pub fn unify_table(&self) -> &UnifyTable {
        &self.unify_table
    }

    pub fn unify_table_mut(&mut self) -> &mut UnifyTable {
        &mut self.unify_table
    }

    pub fn reify_table(&self) -> &ReifyTable {
        &self.reify_table
    }

    pub fn reify_table_mut(&mut self) -> &mut ReifyTable {
        &mut self.reify_table
    }

    /// Find an extension of `subst` under which `u` and `v` are equal.
    ///
    /// On success the substitution may be `subst` itself, unextended. On
    /// failure `subst` is untouched.
    ///
    /// # Panics
    ///
    /// If a custom table has no algorithm for a pair of shapes encountered.
    pub fn unify(&self, u: &Term, v: &Term, subst: &Substitution) -> UnifyResult {
        if std::ptr::eq(u, v) {
            return UnifyResult::Success(subst.clone());
        }
        self.evaluator
            .run(self.unify_table.computation(u, v, subst.clone()))
    }

    /// Unify `u` and `v` starting from the empty substitution.
    pub fn solve(&self, u: &Term, v: &Term) -> UnifyResult {
        self.unify(u, v, &Substitution::empty())
    }

    /// Unify every pair left to right, threading a single substitution.
    pub fn unify_many(&self, pairs: &[(Term, Term)], subst: &Substitution) -> UnifyResult {
        self.evaluator.run(
            self.unify_table
                .computation_many(pairs.to_vec(), subst.clone()),
        )
    }

    /// Replace every variable bound in `subst` inside `term` by its value.
    pub fn reify(&self, term: &Term, subst: &Substitution) -> Term {
        self.evaluator
            .run(self.reify_table.computation(term, subst))
    }

    /// Check if `term` has no unresolved variable under `subst`.
    pub fn is_ground(&self, term: &Term, subst: &Substitution) -> bool {
        let outcome = self
            .evaluator
            .run_observed(self.reify_table.computation(term, subst), &mut GroundCheck);
        GroundCheck::verdict(outcome)
    }

    /// The unresolved variables of `term` under `subst`.
    pub fn free_variables(&self, term: &Term, subst: &Substitution) -> BTreeSet<Term> {
        let mut observer = FreeVariables::default();
        // Reconstruction is skipped, so the outcome carries no term.
        let _ = self
            .evaluator
            .run_observed(self.reify_table.computation(term, subst), &mut observer);
        observer.found
    }
}
