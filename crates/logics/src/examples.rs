//! Prebuilt named arguments
//!
//! The classic example arguments in polish notation, used by the test
//! suites and handy at the REPL. `argument(name)` parses on demand with
//! auto-declared predicates.

use lexicon::Argument;
use notation::{ParseResult, Parser};

/// The example table: `(name, premises, conclusion)` in polish notation.
pub const ARGUMENTS: &[(&str, &[&str], &str)] = &[
    ("Addition", &["a"], "Aab"),
    ("Affirming a Disjunct", &["Aab", "a"], "b"),
    ("Affirming the Consequent", &["Cab", "b"], "a"),
    ("Biconditional Elimination", &["Eab", "a"], "b"),
    ("Biconditional Identity", &[], "Baa"),
    ("Conditional Contraction", &["UaUab"], "Uab"),
    ("Conditional Equivalence", &["Cab"], "Cba"),
    ("Conditional Identity", &[], "Uaa"),
    ("Contraction", &["CaCab"], "Cab"),
    ("DeMorgan 1", &["NAab"], "KNaNb"),
    ("DeMorgan 2", &["NKab"], "ANaNb"),
    ("DeMorgan 3", &["KNaNb"], "NAab"),
    ("DeMorgan 4", &["ANaNb"], "NKab"),
    ("Denying the Antecedent", &["Cab", "Na"], "b"),
    ("Disjunctive Syllogism", &["Aab", "Nb"], "a"),
    ("Existential Generalization", &["Fm"], "SxFx"),
    ("Extracting the Antecedent", &["Cab"], "a"),
    ("Extracting the Consequent", &["Cab"], "b"),
    ("Identity", &[], "Caa"),
    ("Law of Excluded Middle", &[], "AaNa"),
    ("Law of Non-contradiction", &["KaNa"], "b"),
    ("Material Identity", &[], "Caa"),
    ("Modal Platitude 1", &["Ma"], "Ma"),
    ("Modal Platitude 2", &["La"], "La"),
    ("Modal Platitude 3", &["LMa"], "LMa"),
    ("Modal Transformation 1", &["La"], "NMNa"),
    ("Modal Transformation 2", &["NMNa"], "La"),
    ("Modal Transformation 3", &["NLa"], "MNa"),
    ("Modal Transformation 4", &["MNa"], "NLa"),
    ("Modus Ponens", &["Cab", "a"], "b"),
    ("Modus Tollens", &["Cab", "Nb"], "Na"),
    ("Necessity Distribution", &[], "CLCabCLaLb"),
    ("Necessity Elimination", &["La"], "a"),
    ("Possibility Addition", &["a"], "Ma"),
    ("Possibility Distribution", &["KMaMb"], "MKab"),
    ("Reflexive Inference 1", &[], "CLaa"),
    ("S4 Material Inference 1", &[], "CLaLLa"),
    ("S5 Material Inference 1", &[], "CaLMa"),
    ("Serial Inference 1", &[], "CLaMa"),
    ("Simplification", &["Kab"], "a"),
    ("Syllogism", &["VxUFxGx", "VxUGxHx"], "VxUFxHx"),
    ("Triviality 1", &["a"], "b"),
    ("Triviality 2", &[], "a"),
    ("Universal Instantiation", &["VxFx"], "Fm"),
];

/// Look up and parse a named example argument.
pub fn argument(name: &str) -> ParseResult<Argument> {
    let (title, premises, conclusion) = ARGUMENTS
        .iter()
        .find(|(n, _, _)| *n == name)
        .copied()
        .unwrap_or((name, &[], name));
    // An unknown name is treated as a polish conclusion string, matching
    // the original's accept-either behavior.
    Parser::polish().argument(conclusion, premises, Some(title))
}

/// All example names, in table order.
pub fn names() -> Vec<&'static str> {
    ARGUMENTS.iter().map(|(n, _, _)| *n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_examples_parse() {
        for (name, _, _) in ARGUMENTS {
            assert!(argument(name).is_ok(), "{name} fails to parse");
        }
    }

    #[test]
    fn test_modus_ponens_shape() {
        let arg = argument("Modus Ponens").unwrap();
        assert_eq!(arg.premises().len(), 2);
        assert_eq!(arg.title(), Some("Modus Ponens"));
    }

    #[test]
    fn test_unknown_name_parses_as_sentence() {
        let arg = argument("Caa").unwrap();
        assert!(arg.premises().is_empty());
    }
}
