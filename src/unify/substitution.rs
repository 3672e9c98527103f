//! Substitution: mapping logic variables to terms.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::syntax::{is_variable, Term};

/// A substitution mapping logic variables to terms.
///
/// Substitutions are persistent values: cloning is cheap, and binding on a
/// clone copies the bindings first, so every other holder keeps its view.
/// Alternate branches of a search can share a common prefix this way.
///
/// Keys are variable terms (a [`Term::Var`] or a registered ad hoc variable).
/// Bindings must be acyclic: no variable may resolve, directly or through
/// other bindings, to itself. [`walk`] does not terminate otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitution {
    bindings: Arc<BTreeMap<Term, Term>>,
}

impl Substitution {
    /// Create an empty substitution (identity).
    pub fn empty() -> Self {
        Substitution::default()
    }

    /// Create a substitution with a single binding.
    pub fn singleton(var: impl Into<Term>, term: impl Into<Term>) -> Self {
        let mut subst = Substitution::empty();
        subst.bind(var, term);
        subst
    }

    /// Add a binding to this substitution, leaving other clones unaffected.
    pub fn bind(&mut self, var: impl Into<Term>, term: impl Into<Term>) {
        Arc::make_mut(&mut self.bindings).insert(var.into(), term.into());
    }

    /// A new substitution with one more binding; `self` is unchanged.
    pub fn extended(&self, var: impl Into<Term>, term: impl Into<Term>) -> Self {
        let mut next = self.clone();
        next.bind(var, term);
        next
    }

    /// Look up a variable in this substitution.
    pub fn lookup(&self, var: &Term) -> Option<&Term> {
        self.bindings.get(var)
    }

    /// Get the domain of this substitution (variables that are mapped).
    pub fn domain(&self) -> impl Iterator<Item = &Term> {
        self.bindings.keys()
    }

    /// Iterate over the bindings in this substitution.
    pub fn bindings(&self) -> impl Iterator<Item = (&Term, &Term)> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if this substitution is empty (has no bindings).
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Whether both substitutions share the same storage, i.e. neither has
    /// been extended since one was cloned from the other.
    pub fn shares_bindings_with(&self, other: &Substitution) -> bool {
        Arc::ptr_eq(&self.bindings, &other.bindings)
    }
}

impl<K: Into<Term>, V: Into<Term>> FromIterator<(K, V)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Substitution {
            bindings: Arc::new(
                iter.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

/// Resolve `term` through `subst`: follow bindings while the current term is
/// a bound variable, and return the first term that is not.
pub fn walk<'a>(mut term: &'a Term, subst: &'a Substitution) -> &'a Term {
    while is_variable(term) {
        match subst.lookup(term) {
            Some(next) => term = next,
            None => break,
        }
    }
    term
}
