use super::*;

// =============================================================================
// GROUNDNESS AND FREE VARIABLES
// =============================================================================
//
// A term is ground under σ when reification leaves no variable in it.
// is_ground(t, σ) holds exactly when free_variables(t, σ) is empty.

fn set_of(terms: Vec<Term>) -> BTreeSet<Term> {
    terms.into_iter().collect()
}

#[test]
fn atoms_are_ground() {
    assert!(is_ground(&int(1), &Substitution::empty()));
    assert!(free_variables(&int(1), &Substitution::empty()).is_empty());
}

#[test]
fn unbound_variable_is_not_ground() {
    assert!(!is_ground(&v("x"), &Substitution::empty()));
    assert_eq!(
        free_variables(&v("x"), &Substitution::empty()),
        set_of(vec![v("x")])
    );
}

#[test]
fn bound_variable_is_ground() {
    let s = subst(vec![(v("x"), int(1))]);
    assert!(is_ground(&v("x"), &s));
    assert!(free_variables(&v("x"), &s).is_empty());
}

#[test]
fn variable_nested_deep_inside_is_found() {
    let term = tuple(vec![int(1), list(vec![int(2), tuple(vec![v("x")])])]);
    assert!(!is_ground(&term, &Substitution::empty()));
}

#[test]
fn empty_containers_are_ground() {
    let s = Substitution::empty();
    assert!(is_ground(&tuple(vec![]), &s));
    assert!(is_ground(&Term::set([]), &s));
    assert!(is_ground(&Term::map([]), &s));
}

#[test]
fn free_variables_collects_every_unresolved_variable() {
    let s = subst(vec![(v("y"), int(3))]);
    let term = tuple(vec![
        v("x"),
        list(vec![v("y"), v("x")]),
        Term::map([(v("z"), int(1))]),
        Term::slice(0, v("w"), Term::none()),
    ]);
    assert_eq!(
        free_variables(&term, &s),
        set_of(vec![v("x"), v("z"), v("w")])
    );
    assert!(!is_ground(&term, &s));
}

#[test]
fn free_variables_follow_bindings_to_compounds() {
    let s = subst(vec![(v("x"), tuple(vec![v("y"), int(1)]))]);
    assert_eq!(free_variables(&v("x"), &s), set_of(vec![v("y")]));
}

#[test]
fn chain_ending_in_unbound_variable_reports_the_end() {
    let s = subst(vec![(v("x"), v("y"))]);
    assert_eq!(free_variables(&v("x"), &s), set_of(vec![v("y")]));
}

#[test]
fn ground_after_unification() {
    let pattern = tuple(vec![v("x"), list(vec![v("y")])]);
    let value = tuple(vec![int(1), list(vec![int(2)])]);
    let s = solved(unify(&pattern, &value, &Substitution::empty()));
    assert!(is_ground(&pattern, &s));
    assert!(free_variables(&pattern, &s).is_empty());
}
