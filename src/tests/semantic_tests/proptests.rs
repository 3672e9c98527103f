use super::*;
use proptest::prelude::*;

// =============================================================================
// PROPERTY-BASED TESTS
// =============================================================================
//
// These use proptest to verify properties hold for arbitrary inputs.

const VARIABLE_NAMES: [&str; 4] = ["a", "b", "c", "d"];

fn arb_var() -> impl Strategy<Value = Term> {
    prop::sample::select(VARIABLE_NAMES.to_vec()).prop_map(v)
}

fn arb_atom() -> impl Strategy<Value = Term> {
    prop_oneof![
        (-5i64..5).prop_map(Term::from),
        "[a-z]{1,3}".prop_map(Term::from),
        any::<bool>().prop_map(Term::from),
        Just(Term::none()),
    ]
}

/// Terms of every shape, variables included.
fn arb_term() -> impl Strategy<Value = Term> {
    let leaf = prop_oneof![3 => arb_atom(), 1 => arb_var()];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Term::tuple),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Term::list),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Term::set),
            prop::collection::vec((arb_atom(), inner.clone()), 0..3).prop_map(Term::map),
            (inner.clone(), inner.clone(), inner).prop_map(|(a, b, c)| Term::slice(a, b, c)),
        ]
    })
}

/// Terms whose structure survives reification unchanged: no sets, whose
/// elements could collapse once variables are resolved.
fn arb_rigid_term(leaf: BoxedStrategy<Term>) -> impl Strategy<Value = Term> {
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Term::tuple),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Term::list),
            prop::collection::vec((arb_atom(), inner.clone()), 0..3).prop_map(Term::map),
            (inner.clone(), inner.clone(), inner).prop_map(|(a, b, c)| Term::slice(a, b, c)),
        ]
    })
}

fn arb_ground_rigid_term() -> impl Strategy<Value = Term> {
    arb_rigid_term(arb_atom().boxed())
}

fn arb_rigid_pattern() -> impl Strategy<Value = Term> {
    arb_rigid_term(prop_oneof![2 => arb_atom(), 1 => arb_var()].boxed())
}

/// Acyclic substitutions: the pattern variables are bound to terms over a
/// disjoint set of variables, which stay unbound.
fn arb_subst() -> impl Strategy<Value = Substitution> {
    let other_var = prop::sample::select(vec!["p", "q"]).prop_map(v);
    let value = prop_oneof![2 => arb_atom(), 1 => other_var].prop_recursive(2, 8, 3, |inner| {
        prop::collection::vec(inner, 0..3).prop_map(Term::tuple)
    });
    prop::collection::vec((arb_var(), value), 0..4)
        .prop_map(|pairs| pairs.into_iter().collect())
}

// -------------------------------------------------------------------------
//  Self-unification always succeeds without new bindings
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn self_unification_is_identity(term in arb_term(), s in arb_subst()) {
        let copy = term.clone();
        let result = unify(&term, &copy, &s);
        prop_assert_eq!(result, UnifyResult::Success(s));
    }
}

// -------------------------------------------------------------------------
//  Atoms unify iff equal, symmetrically
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn atom_unification_is_symmetric(a in arb_atom(), b in arb_atom(), s in arb_subst()) {
        let forward = unify(&a, &b, &s);
        let backward = unify(&b, &a, &s);
        prop_assert_eq!(forward.is_success(), a == b);
        prop_assert_eq!(forward.substitution(), backward.substitution());
    }
}

// -------------------------------------------------------------------------
//  Reification is idempotent
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn reification_is_idempotent(term in arb_term(), s in arb_subst()) {
        let once = reify(&term, &s);
        let twice = reify(&once, &s);
        prop_assert_eq!(once, twice);
    }
}

// -------------------------------------------------------------------------
//  Groundness agrees with free-variable collection
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn ground_iff_no_free_variables(term in arb_term(), s in arb_subst()) {
        prop_assert_eq!(is_ground(&term, &s), free_variables(&term, &s).is_empty());
    }
}

proptest! {
    #[test]
    fn reified_term_has_only_reported_free_variables(term in arb_term(), s in arb_subst()) {
        let reified = reify(&term, &s);
        let before = free_variables(&term, &s);
        let after = free_variables(&reified, &Substitution::empty());
        prop_assert_eq!(before, after);
    }
}

// -------------------------------------------------------------------------
//  A pattern unifies with any of its instances, and the solution rebuilds it
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn pattern_unifies_with_its_instances(
        pattern in arb_rigid_pattern(),
        values in prop::collection::vec(arb_ground_rigid_term(), VARIABLE_NAMES.len()),
    ) {
        let instantiation: Substitution = VARIABLE_NAMES
            .iter()
            .map(|name| v(name))
            .zip(values)
            .collect();
        let instance = reify(&pattern, &instantiation);

        let solution = unify(&pattern, &instance, &Substitution::empty());
        prop_assert!(solution.is_success(), "Pattern must unify with its instance");
        if let UnifyResult::Success(sigma) = solution {
            prop_assert_eq!(reify(&pattern, &sigma), instance.clone());
            prop_assert!(is_ground(&pattern, &sigma) == is_ground(&instance, &Substitution::empty()));
        }
    }
}
