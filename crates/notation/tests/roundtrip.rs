//! Parser and writer round-trips
//!
//! For any sentence and either notation, writing then parsing yields the
//! same sentence. Plus targeted cases for the notations' corners:
//! dropped outer parens, infix identity, subscripts, prefix system
//! predicates.

use lexicon::*;
use notation::{Format, LexWriter, Notation, Parser, ParserOptions, WriterOptions};
use proptest::prelude::*;

fn arb_sentence() -> impl Strategy<Value = Sentence> {
    let atomic = (0u8..NUM_ATOMIC_SYMBOLS, 0u32..3)
        .prop_map(|(i, s)| Sentence::from(Atomic::new(i, s).unwrap()));
    let predicated = (0u8..NUM_PREDICATE_SYMBOLS, 0u8..2, 0u32..2).prop_map(|(p, c, s)| {
        let predicate = Predicate::new(p, 0, 2, None).unwrap();
        let c1 = Constant::new(c, s).unwrap();
        let c2 = Constant::new(c + 1, 0).unwrap();
        Sentence::predicated(predicate, [Parameter::from(c1), Parameter::from(c2)]).unwrap()
    });
    let identity = (0u8..2, 0u8..2).prop_map(|(i, j)| {
        let a = Constant::new(i, 0).unwrap();
        let b = Constant::new(j, 1).unwrap();
        Sentence::predicated(Predicate::identity(), [Parameter::from(a), Parameter::from(b)])
            .unwrap()
    });
    let leaf = prop_oneof![atomic, predicated, identity];
    leaf.prop_recursive(4, 20, 2, |inner| {
        let unary = prop_oneof![
            inner.clone().prop_map(|s| s.negate()),
            inner
                .clone()
                .prop_map(|s| Sentence::operated(Operator::Possibility, [s]).unwrap()),
            inner
                .clone()
                .prop_map(|s| Sentence::operated(Operator::Necessity, [s]).unwrap()),
        ];
        let binary_ops = prop_oneof![
            Just(Operator::Conjunction),
            Just(Operator::Disjunction),
            Just(Operator::MaterialConditional),
            Just(Operator::MaterialBiconditional),
            Just(Operator::Conditional),
            Just(Operator::Biconditional),
        ];
        prop_oneof![
            unary,
            (binary_ops, inner.clone(), inner)
                .prop_map(|(op, a, b)| Sentence::operated(op, [a, b]).unwrap()),
        ]
    })
}

fn parser(notation: Notation) -> Parser {
    Parser::new(
        ParserOptions {
            notation,
            auto_preds: true,
        },
        Predicates::new(),
    )
}

proptest! {
    #[test]
    fn polish_roundtrip(s in arb_sentence()) {
        let written = LexWriter::polish().write_sentence(&s);
        let parsed = parser(Notation::Polish).parse(&written).unwrap();
        prop_assert_eq!(parsed, s);
    }

    #[test]
    fn standard_roundtrip(s in arb_sentence()) {
        let written = LexWriter::standard().write_sentence(&s);
        let parsed = parser(Notation::Standard).parse(&written).unwrap();
        prop_assert_eq!(parsed, s);
    }

    #[test]
    fn standard_roundtrip_with_parens_kept(s in arb_sentence()) {
        let writer = LexWriter::new(
            Notation::Standard,
            WriterOptions { drop_parens: false, ..WriterOptions::default() },
        );
        let written = writer.write_sentence(&s);
        let parsed = parser(Notation::Standard).parse(&written).unwrap();
        prop_assert_eq!(parsed, s);
    }
}

#[test]
fn quantified_sentences_roundtrip() {
    for input in ["VxFx", "SxFx", "VxSyGxy", "NVxFx", "VxKFxGxx"] {
        let s = parser(Notation::Polish).parse(input).unwrap();
        let written = LexWriter::polish().write_sentence(&s);
        assert_eq!(written, input);
        let std = LexWriter::standard().write_sentence(&s);
        let back = parser(Notation::Standard).parse(&std).unwrap();
        assert_eq!(back, s);
    }
}

#[test]
fn subscripts_roundtrip() {
    let mut p = parser(Notation::Polish);
    let s = p.parse("Ka12b3").unwrap();
    assert_eq!(LexWriter::polish().write_sentence(&s), "Ka12b3");
}

#[test]
fn scenario_sentences_parse() {
    // The canonical end-to-end arguments must all be readable.
    let mut p = parser(Notation::Polish);
    for input in ["Cab", "AaNa", "KaNa", "Aab", "CaLMa", "LVxSyUFxLMGy"] {
        assert!(p.parse(input).is_ok(), "{input} fails to parse");
    }
}

#[test]
fn standard_drop_parens_inverse() {
    let mut p = parser(Notation::Standard);
    let with = p.parse("(A & B)").unwrap();
    let without = p.parse("A & B").unwrap();
    assert_eq!(with, without);
    assert_eq!(LexWriter::standard().write_sentence(&with), "A & B");
}

#[test]
fn infix_identity_and_existence_roundtrip() {
    let mut p = parser(Notation::Standard);
    let s = p.parse("a = b").unwrap();
    assert_eq!(LexWriter::standard().write_sentence(&s), "a = b");
    let e = p.parse("!a").unwrap();
    assert_eq!(LexWriter::standard().write_sentence(&e), "!a");
}
