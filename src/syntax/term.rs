//! Terms: atoms, logic variables, and the compound shapes the algorithms decompose.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::Var;

/// An opaque atomic value, compared by equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Atom {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Char(char),
    Str(Arc<str>),
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::None => write!(f, "None"),
            Atom::Bool(b) => write!(f, "{}", b),
            Atom::Int(i) => write!(f, "{}", i),
            Atom::Char(c) => write!(f, "{:?}", c),
            Atom::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for Atom {
    fn from(b: bool) -> Self {
        Atom::Bool(b)
    }
}

impl From<i64> for Atom {
    fn from(i: i64) -> Self {
        Atom::Int(i)
    }
}

impl From<i32> for Atom {
    fn from(i: i32) -> Self {
        Atom::Int(i64::from(i))
    }
}

impl From<char> for Atom {
    fn from(c: char) -> Self {
        Atom::Char(c)
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Self {
        Atom::Str(Arc::from(s))
    }
}

impl From<String> for Atom {
    fn from(s: String) -> Self {
        Atom::Str(Arc::from(s))
    }
}

/// The three fields of a start/stop/step compound.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slice {
    pub start: Term,
    pub stop: Term,
    pub step: Term,
}

/// The variant tag of a term, used to select algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shape {
    Atom,
    Var,
    Tuple,
    List,
    Set,
    Map,
    Slice,
}

impl Shape {
    /// Every shape, in tag order.
    pub const ALL: [Shape; 7] = [
        Shape::Atom,
        Shape::Var,
        Shape::Tuple,
        Shape::List,
        Shape::Set,
        Shape::Map,
        Shape::Slice,
    ];

    /// Dense index of this shape, in `0..Shape::ALL.len()`.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Atom => "atom",
            Shape::Var => "variable",
            Shape::Tuple => "tuple",
            Shape::List => "list",
            Shape::Set => "set",
            Shape::Map => "map",
            Shape::Slice => "slice",
        };
        f.write_str(name)
    }
}

/// A term.
///
/// Compound children sit behind `Arc`, so cloning a term is shallow and
/// substitutions can share sub-terms freely. Equality, ordering and hashing
/// are structural and walk the term with an explicit stack; sets and maps of
/// terms iterate in that order.
#[derive(Debug, Clone)]
pub enum Term {
    Atom(Atom),
    Var(Var),
    /// Fixed-arity ordered sequence.
    Tuple(Arc<[Term]>),
    /// Variable-length ordered sequence.
    List(Arc<[Term]>),
    Set(Arc<BTreeSet<Term>>),
    Map(Arc<BTreeMap<Term, Term>>),
    Slice(Arc<Slice>),
}

impl Default for Term {
    fn default() -> Self {
        Term::Atom(Atom::None)
    }
}

impl Term {
    /// The `None` atom.
    pub fn none() -> Self {
        Term::Atom(Atom::None)
    }

    /// Create an atomic term.
    pub fn atom(atom: impl Into<Atom>) -> Self {
        Term::Atom(atom.into())
    }

    /// Create a tuple term.
    pub fn tuple(items: impl IntoIterator<Item = Term>) -> Self {
        Term::Tuple(items.into_iter().collect())
    }

    /// Create a list term.
    pub fn list(items: impl IntoIterator<Item = Term>) -> Self {
        Term::List(items.into_iter().collect())
    }

    /// Create a set term. Duplicate elements collapse.
    pub fn set(items: impl IntoIterator<Item = Term>) -> Self {
        Term::Set(Arc::new(items.into_iter().collect()))
    }

    /// Create a map term. Later entries win on duplicate keys.
    pub fn map(entries: impl IntoIterator<Item = (Term, Term)>) -> Self {
        Term::Map(Arc::new(entries.into_iter().collect()))
    }

    /// Create a start/stop/step compound.
    pub fn slice(start: impl Into<Term>, stop: impl Into<Term>, step: impl Into<Term>) -> Self {
        Term::Slice(Arc::new(Slice {
            start: start.into(),
            stop: stop.into(),
            step: step.into(),
        }))
    }

    /// The structural variant tag of this term.
    ///
    /// This ignores the ad hoc variable registry; see
    /// [`dispatch_shape`](super::dispatch_shape) for the tag the algorithms use.
    pub fn shape(&self) -> Shape {
        match self {
            Term::Atom(_) => Shape::Atom,
            Term::Var(_) => Shape::Var,
            Term::Tuple(_) => Shape::Tuple,
            Term::List(_) => Shape::List,
            Term::Set(_) => Shape::Set,
            Term::Map(_) => Shape::Map,
            Term::Slice(_) => Shape::Slice,
        }
    }

    /// Elements of a tuple or list.
    pub fn items(&self) -> Option<&[Term]> {
        match self {
            Term::Tuple(items) | Term::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Term::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Term::Var(var) => Some(var),
            _ => None,
        }
    }

    /// Check if this term has children.
    pub fn is_compound(&self) -> bool {
        !matches!(self, Term::Atom(_) | Term::Var(_))
    }

    /// Move uniquely owned children into `out`, leaving placeholders behind.
    /// Shared children are left alone; their other owners keep them alive.
    fn detach_children(&mut self, out: &mut Vec<Term>) {
        match self {
            Term::Tuple(items) | Term::List(items) => {
                if let Some(items) = Arc::get_mut(items) {
                    out.extend(
                        items
                            .iter_mut()
                            .filter(|item| item.is_compound())
                            .map(std::mem::take),
                    );
                }
            }
            Term::Set(set) => {
                if let Some(set) = Arc::get_mut(set) {
                    out.extend(std::mem::take(set).into_iter().filter(Term::is_compound));
                }
            }
            Term::Map(map) => {
                if let Some(map) = Arc::get_mut(map) {
                    for (key, value) in std::mem::take(map) {
                        out.extend([key, value].into_iter().filter(Term::is_compound));
                    }
                }
            }
            Term::Slice(slice) => {
                if let Some(slice) = Arc::get_mut(slice) {
                    let fields = [
                        std::mem::take(&mut slice.start),
                        std::mem::take(&mut slice.stop),
                        std::mem::take(&mut slice.step),
                    ];
                    out.extend(fields.into_iter().filter(Term::is_compound));
                }
            }
            Term::Atom(_) | Term::Var(_) => {}
        }
    }
}

// Nested terms are torn down with an explicit stack so that dropping a term
// nested tens of thousands of levels deep does not overflow the native stack.
impl Drop for Term {
    fn drop(&mut self) {
        if !self.is_compound() {
            return;
        }
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut term) = pending.pop() {
            term.detach_children(&mut pending);
        }
    }
}

/// One step of a pre-order walk over a term.
///
/// Two terms compare like their walks: every compound is bracketed by
/// `Open` and `Close`, and `Close` sorts first so a shorter sequence precedes
/// any extension of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Visit<'a> {
    Close,
    Atom(&'a Atom),
    Var(&'a Var),
    Open(Shape),
}

enum Pending<'a> {
    Enter(&'a Term),
    Close,
}

/// Pre-order walk of a term on an explicit stack.
struct Walk<'a> {
    pending: Vec<Pending<'a>>,
}

impl<'a> Walk<'a> {
    fn new(term: &'a Term) -> Self {
        Walk {
            pending: vec![Pending::Enter(term)],
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Visit<'a>> {
        let term = match self.pending.pop()? {
            Pending::Close => return Some(Visit::Close),
            Pending::Enter(term) => term,
        };
        match term {
            Term::Atom(atom) => return Some(Visit::Atom(atom)),
            Term::Var(var) => return Some(Visit::Var(var)),
            _ => {}
        }
        self.pending.push(Pending::Close);
        match term {
            Term::Tuple(items) | Term::List(items) => {
                self.pending.extend(items.iter().rev().map(Pending::Enter));
            }
            Term::Set(set) => self.pending.extend(set.iter().rev().map(Pending::Enter)),
            Term::Map(map) => {
                for (key, value) in map.iter().rev() {
                    self.pending.push(Pending::Enter(value));
                    self.pending.push(Pending::Enter(key));
                }
            }
            Term::Slice(slice) => self.pending.extend(
                [&slice.step, &slice.stop, &slice.start].map(Pending::Enter),
            ),
            Term::Atom(_) | Term::Var(_) => {}
        }
        Some(Visit::Open(term.shape()))
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Term {}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Term::Atom(a), Term::Atom(b)) => return a.cmp(b),
            (Term::Var(a), Term::Var(b)) => return a.cmp(b),
            _ if std::ptr::eq(self, other) => return Ordering::Equal,
            _ => {}
        }
        Walk::new(self).cmp(Walk::new(other))
    }
}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for visit in Walk::new(self) {
            visit.hash(state);
        }
    }
}

impl From<Atom> for Term {
    fn from(atom: Atom) -> Self {
        Term::Atom(atom)
    }
}

impl From<Var> for Term {
    fn from(var: Var) -> Self {
        Term::Var(var)
    }
}

impl From<&Var> for Term {
    fn from(var: &Var) -> Self {
        Term::Var(var.clone())
    }
}

impl From<bool> for Term {
    fn from(b: bool) -> Self {
        Term::Atom(Atom::Bool(b))
    }
}

impl From<i64> for Term {
    fn from(i: i64) -> Self {
        Term::Atom(Atom::Int(i))
    }
}

impl From<i32> for Term {
    fn from(i: i32) -> Self {
        Term::Atom(Atom::Int(i64::from(i)))
    }
}

impl From<char> for Term {
    fn from(c: char) -> Self {
        Term::Atom(Atom::Char(c))
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Term::Atom(Atom::from(s))
    }
}

impl From<String> for Term {
    fn from(s: String) -> Self {
        Term::Atom(Atom::from(s))
    }
}

impl From<Slice> for Term {
    fn from(slice: Slice) -> Self {
        Term::Slice(Arc::new(slice))
    }
}
