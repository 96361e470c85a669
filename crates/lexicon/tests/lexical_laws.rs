//! Lexical laws
//!
//! Property tests over the sentence algebra: double negation preserves
//! the enumerators, substitution leaves non-matching parameters alone,
//! the total order is lawful and consistent with equality, and the
//! argument key-string codec round-trips.

use lexicon::*;
use proptest::prelude::*;

fn arb_atomic() -> impl Strategy<Value = Sentence> {
    (0u8..NUM_ATOMIC_SYMBOLS, 0u32..3)
        .prop_map(|(i, s)| Sentence::from(Atomic::new(i, s).unwrap()))
}

fn arb_constant() -> impl Strategy<Value = Constant> {
    (0u8..NUM_CONST_SYMBOLS, 0u32..2).prop_map(|(i, s)| Constant::new(i, s).unwrap())
}

fn arb_predicated() -> impl Strategy<Value = Sentence> {
    (0u8..NUM_PREDICATE_SYMBOLS, 1u8..3, proptest::collection::vec(arb_constant(), 2))
        .prop_map(|(i, arity, consts)| {
            let p = Predicate::new(i, 0, arity, None).unwrap();
            let params: Vec<Parameter> = consts
                .into_iter()
                .cycle()
                .take(arity as usize)
                .map(Parameter::from)
                .collect();
            Sentence::predicated(p, params).unwrap()
        })
}

fn arb_sentence() -> impl Strategy<Value = Sentence> {
    let leaf = prop_oneof![arb_atomic(), arb_predicated()];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|s| s.negate()),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.conjoin(&b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.disjoin(&b)),
            (inner.clone(), inner).prop_map(|(a, b)| {
                Sentence::operated(Operator::MaterialConditional, [a, b]).unwrap()
            }),
        ]
    })
}

proptest! {
    #[test]
    fn double_negation_is_distinct_but_preserves_enumerators(s in arb_sentence()) {
        let nn = s.negate().negate();
        prop_assert_ne!(&nn, &s);
        prop_assert_eq!(nn.atomics(), s.atomics());
        prop_assert_eq!(nn.constants(), s.constants());
        prop_assert_eq!(nn.variables(), s.variables());
        prop_assert_eq!(nn.predicates(), s.predicates());
        // The operator list gains exactly the two negations.
        prop_assert_eq!(nn.operators().len(), s.operators().len() + 2);
    }

    #[test]
    fn substitution_ignores_non_matching_parameters(s in arb_sentence()) {
        // No sentence from this generator contains a variable, so any
        // variable substitution is the identity.
        let v = Variable::new(0, 0).unwrap();
        let c = Constant::new(0, 0).unwrap();
        prop_assert_eq!(s.substitute(Parameter::from(c), Parameter::from(v)), s);
    }

    #[test]
    fn ordering_is_total_and_consistent(a in arb_sentence(), b in arb_sentence()) {
        use std::cmp::Ordering;
        match a.cmp(&b) {
            Ordering::Equal => prop_assert_eq!(&a, &b),
            Ordering::Less => prop_assert_eq!(b.cmp(&a), Ordering::Greater),
            Ordering::Greater => prop_assert_eq!(b.cmp(&a), Ordering::Less),
        }
    }

    #[test]
    fn ordering_is_transitive(mut items in proptest::collection::vec(arb_sentence(), 3)) {
        items.sort();
        prop_assert!(items[0] <= items[1] && items[1] <= items[2]);
        prop_assert!(items[0] <= items[2]);
    }

    #[test]
    fn sort_key_equality_matches_value_equality(a in arb_sentence(), b in arb_sentence()) {
        prop_assert_eq!(a.sort_key() == b.sort_key(), a == b);
    }

    #[test]
    fn keystr_roundtrips(premises in proptest::collection::vec(arb_sentence(), 0..3), c in arb_sentence()) {
        let arg = Argument::new(c, premises, Some("prop"));
        let back = Argument::from_keystr(&arg.keystr()).unwrap();
        prop_assert_eq!(back, arg);
    }
}

#[test]
fn mixed_item_sorting_follows_kind_ranks() {
    let mut items = vec![
        LexItem::from(Sentence::from(Atomic::new(0, 0).unwrap())),
        LexItem::Variable(Variable::new(0, 0).unwrap()),
        LexItem::from(Predicate::identity()),
        LexItem::Constant(Constant::new(0, 0).unwrap()),
    ];
    items.sort();
    assert!(matches!(items[0], LexItem::Predicate(_)));
    assert!(matches!(items[1], LexItem::Constant(_)));
    assert!(matches!(items[2], LexItem::Variable(_)));
    assert!(matches!(items[3], LexItem::Sentence(_)));
}

#[test]
fn system_predicates_precede_user_predicates() {
    let user = Predicate::new(0, 0, 1, None).unwrap();
    assert!(Predicate::existence() < Predicate::identity());
    assert!(Predicate::identity() < user);
}
