//! Logic variables and the thread-local registry of ad hoc variables.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::trace;

use super::{Atom, Shape, Term};

static NEXT_FRESH: AtomicU64 = AtomicU64::new(1);

/// The identity of a logic variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
    /// Sequentially generated by [`Var::fresh`].
    Fresh(u64),
    /// Supplied by the caller: any term, compound ones included.
    Named(Arc<Term>),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Fresh(n) => write!(f, "_{}", n),
            Token::Named(name) => match name.as_ref() {
                Term::Atom(Atom::Str(s)) => write!(f, "{}", s),
                Term::Atom(atom) => write!(f, "{}", atom),
                term => write!(f, "{:?}", term),
            },
        }
    }
}

/// A logic variable.
///
/// Two variables are equal iff their tokens are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var {
    token: Token,
}

impl Var {
    /// Create a variable identified by `token`.
    pub fn new(token: impl Into<Term>) -> Self {
        Var {
            token: Token::Named(Arc::new(token.into())),
        }
    }

    /// Create a variable with a fresh sequential token.
    pub fn fresh() -> Self {
        Var {
            token: Token::Fresh(NEXT_FRESH.fetch_add(1, Ordering::Relaxed)),
        }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}", self.token)
    }
}

/// A fresh variable term.
pub fn var() -> Term {
    Term::Var(Var::fresh())
}

/// `n` distinct fresh variable terms.
pub fn vars(n: usize) -> Vec<Term> {
    (0..n).map(|_| var()).collect()
}

/// The ad hoc variables of one thread.
///
/// `shapes` has bit `i` set when some registered term has the shape with
/// index `i`, so terms of any other shape are rejected without hashing them.
#[derive(Debug, Clone, Default)]
struct Registry {
    terms: HashSet<Term>,
    shapes: u8,
}

impl Registry {
    fn shape_bit(shape: Shape) -> u8 {
        1 << shape.index()
    }

    fn contains(&self, term: &Term) -> bool {
        self.shapes & Self::shape_bit(term.shape()) != 0 && self.terms.contains(term)
    }

    fn extend(&mut self, values: impl IntoIterator<Item = Term>) {
        for value in values {
            self.shapes |= Self::shape_bit(value.shape());
            self.terms.insert(value);
        }
    }
}

thread_local! {
    /// Terms currently treated as logic variables on this thread.
    static AD_HOC: RefCell<Registry> = RefCell::new(Registry::default());
}

/// Check whether `term` is a logic variable: a [`Term::Var`], or a term
/// registered by an enclosing [`VariableScope`] on this thread.
pub fn is_variable(term: &Term) -> bool {
    match term {
        Term::Var(_) => true,
        _ => AD_HOC.with(|registry| registry.borrow().contains(term)),
    }
}

/// The shape the algorithms dispatch on: registered ad hoc variables count
/// as [`Shape::Var`], everything else keeps its structural shape.
pub fn dispatch_shape(term: &Term) -> Shape {
    if is_variable(term) {
        Shape::Var
    } else {
        term.shape()
    }
}

/// RAII guard that treats extra terms as logic variables on this thread.
///
/// Entering unions the values into the registry; dropping the guard restores
/// the registry to its exact contents at entry, so nested scopes must be
/// dropped in reverse order of entry. The guard is bound to its thread.
pub struct VariableScope {
    snapshot: Registry,
    _thread_bound: PhantomData<*const ()>,
}

impl VariableScope {
    pub fn enter(values: impl IntoIterator<Item = Term>) -> Self {
        let snapshot = AD_HOC.with(|registry| {
            let mut registry = registry.borrow_mut();
            let snapshot = registry.clone();
            registry.extend(values);
            trace!(registered = registry.terms.len(), "entered variable scope");
            snapshot
        });
        VariableScope {
            snapshot,
            _thread_bound: PhantomData,
        }
    }
}

impl Drop for VariableScope {
    fn drop(&mut self) {
        let snapshot = std::mem::take(&mut self.snapshot);
        AD_HOC.with(|registry| {
            *registry.borrow_mut() = snapshot;
        });
        trace!("left variable scope");
    }
}

/// Run `f` with `values` treated as logic variables.
///
/// The registry is restored when `f` returns, including when it unwinds.
pub fn with_variables<R>(values: impl IntoIterator<Item = Term>, f: impl FnOnce() -> R) -> R {
    let _scope = VariableScope::enter(values);
    f()
}
