//! Unification: extending substitutions so that two terms become equal.

mod substitution;
mod unify;

pub use substitution::{walk, Substitution};
pub use unify::{solve, unify, unify_many, UnifyAlgorithm, UnifyError, UnifyResult, UnifyTable};
