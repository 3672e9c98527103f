//! Semantic tests for unification and reification.
//!
//! These tests verify essential semantic properties, not just surface behavior:
//! reflexivity, persistence of substitutions, the success/failure distinction,
//! idempotence of reification, and agreement between the groundness check and
//! free-variable collection.
//!
//! # References
//!
//! - Robinson, J.A. "A Machine-Oriented Logic Based on the Resolution
//!   Principle." J. ACM 12(1), 23–41 (1965).
//! - Baader, F., Snyder, W. "Unification Theory." Handbook of Automated
//!   Reasoning, ch. 8 (2001).
use std::collections::BTreeSet;

use crate::reify::{free_variables, is_ground, reify};
use crate::syntax::{with_variables, Term, Var};
use crate::unify::{unify, unify_many, Substitution, UnifyError, UnifyResult};

/// A named logic variable term.
fn v(name: &str) -> Term {
    Term::from(Var::new(name))
}

fn int(i: i64) -> Term {
    Term::from(i)
}

fn tuple(items: Vec<Term>) -> Term {
    Term::tuple(items)
}

fn list(items: Vec<Term>) -> Term {
    Term::list(items)
}

fn subst(pairs: Vec<(Term, Term)>) -> Substitution {
    pairs.into_iter().collect()
}

/// The substitution of a successful unification.
fn solved(result: UnifyResult) -> Substitution {
    match result {
        UnifyResult::Success(s) => s,
        UnifyResult::Failure(err) => panic!("Expected success, got {}", err),
    }
}

/// The reason of a failed unification.
fn failed(result: UnifyResult) -> UnifyError {
    match result {
        UnifyResult::Failure(err) => err,
        UnifyResult::Success(s) => panic!("Expected failure, got {:?}", s),
    }
}

mod dispatch_semantics;
mod groundness_semantics;
mod proptests;
