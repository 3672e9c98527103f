use super::*;
use crate::dispatch::Pattern;
use crate::eval::Computation;
use crate::reify::ReifyTable;
use crate::syntax::{Atom, Shape};
use crate::unifier::Unifier;
use crate::unify::UnifyTable;

// =============================================================================
// OPEN REGISTRATION
// =============================================================================
//
// New algorithms can be registered for shape combinations without touching
// the standard ones. The most specific registration wins; among equally
// specific ones, the earliest.

/// Unifies any two sequences elementwise, regardless of their kinds.
fn unify_mixed_sequences<'a>(
    table: &'a UnifyTable,
    u: &Term,
    v: &Term,
    s: Substitution,
) -> Computation<'a, UnifyResult> {
    match (u.items(), v.items()) {
        (Some(left), Some(right)) if left.len() == right.len() => table.computation_many(
            left.iter().cloned().zip(right.iter().cloned()).collect(),
            s,
        ),
        _ => Computation::Done(UnifyResult::Failure(UnifyError::ShapeClash {
            left: u.shape(),
            right: v.shape(),
        })),
    }
}

/// Negates integers; leaves every other atom alone.
fn reify_negated<'a>(_table: &'a ReifyTable, term: &Term, _s: &Substitution) -> Computation<'a, Term> {
    match term {
        Term::Atom(Atom::Int(i)) => Computation::Done(Term::from(-i)),
        _ => Computation::Done(term.clone()),
    }
}

#[test]
fn registering_a_sequence_algorithm_lets_tuples_meet_lists() {
    let mut unifier = Unifier::new();
    unifier
        .unify_table_mut()
        .register([Pattern::Sequence, Pattern::Sequence], unify_mixed_sequences);

    let u = tuple(vec![v("x"), int(2)]);
    let w = list(vec![int(1), int(2)]);
    let s = solved(unifier.unify(&u, &w, &Substitution::empty()));
    assert_eq!(s.lookup(&v("x")), Some(&int(1)));

    // Exact registrations for same-kind sequences still win.
    let err = failed(unifier.unify(
        &tuple(vec![int(1)]),
        &tuple(vec![int(1), int(2)]),
        &Substitution::empty(),
    ));
    assert_eq!(err, UnifyError::LengthMismatch { left: 1, right: 2 });

    // The default unifier is unaffected.
    assert!(unify(&u, &w, &Substitution::empty()).is_failure());
}

#[test]
fn registering_an_atom_algorithm_overrides_the_fallback() {
    let mut unifier = Unifier::new();
    unifier
        .reify_table_mut()
        .register([Shape::Atom.into()], reify_negated);

    let s = subst(vec![(v("x"), int(2))]);
    let term = tuple(vec![int(1), v("x"), Term::from("a")]);
    assert_eq!(
        unifier.reify(&term, &s),
        tuple(vec![int(-1), int(-2), Term::from("a")])
    );
}

#[test]
#[should_panic(expected = "no algorithm registered for (atom, atom)")]
fn missing_algorithm_is_fatal() {
    let unifier = Unifier::with_tables(UnifyTable::empty(), ReifyTable::new());
    let _ = unifier.unify(&int(1), &int(1), &Substitution::empty());
}

#[test]
#[should_panic(expected = "no algorithm registered for (tuple)")]
fn missing_reify_algorithm_is_fatal() {
    let mut table = ReifyTable::empty();
    table.register([Pattern::Exact(Shape::Atom)], reify_negated);
    let unifier = Unifier::with_tables(UnifyTable::new(), table);
    let _ = unifier.reify(&tuple(vec![int(1)]), &Substitution::empty());
}

#[test]
fn configured_unifier_behaves_like_the_default() {
    let unifier = Unifier::with_config(crate::eval::EvalConfig { stack_capacity: 4 });
    assert_eq!(unifier.config().stack_capacity, 4);
    let pattern = tuple(vec![int(1), v("x"), tuple(vec![int(3), v("y")])]);
    let value = tuple(vec![int(1), int(2), tuple(vec![int(3), int(4)])]);
    let s = solved(unifier.unify(&pattern, &value, &Substitution::empty()));
    assert_eq!(unifier.reify(&pattern, &s), value);
    assert!(unifier.is_ground(&pattern, &s));
    assert_eq!(
        unifier.free_variables(&pattern, &Substitution::empty()).len(),
        2
    );
}
