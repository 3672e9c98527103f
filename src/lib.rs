//! Unification: syntactic unification and reification over terms containing
//! logic variables.
//!
//! Unification extends a substitution so that two terms become structurally
//! equal; reification replaces the bound variables of a term by their values.
//! Both run on an explicit work stack, so terms may nest arbitrarily deep.
//!
//! ```
//! use unification::{reify, unify, var, Substitution, Term};
//!
//! let (x, y) = (var(), var());
//! let pattern = Term::tuple([Term::from(1), x.clone(), Term::tuple([Term::from(3), y])]);
//! let value = Term::tuple([Term::from(1), Term::from(2), Term::tuple([Term::from(3), Term::from(4)])]);
//!
//! let subst = unify(&pattern, &value, &Substitution::empty()).into_result().unwrap();
//! assert_eq!(reify(&pattern, &subst), value);
//! assert_eq!(reify(&x, &subst), Term::from(2));
//! ```

pub mod dispatch;
pub mod eval;
pub mod reify;
pub mod syntax;
pub mod unifier;
pub mod unify;

pub use reify::{free_variables, is_ground, reify};
pub use syntax::{is_variable, var, vars, with_variables, Atom, Slice, Term, Var, VariableScope};
pub use unifier::Unifier;
pub use unify::{solve, unify, unify_many, walk, Substitution, UnifyError, UnifyResult};

#[cfg(test)]
mod tests;
