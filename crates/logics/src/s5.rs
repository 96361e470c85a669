//! Equivalence-relation normal modal
//!
//! S4 plus symmetry: the access relation becomes an equivalence
//! relation. Symmetric and Transitive saturate together before
//! Reflexive.

use lexicon::Argument;
use tableaux::{CounterModel, Logic, Meta, Rule, RuleSet, TableauOptions};

use crate::bivalent;
use crate::k;
use crate::model::Model;
use crate::rules::modal::{Reflexive, Symmetric, Transitive};
use crate::semantics::{bivalent_truth, Semantics, Value};

/// The S5 semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "S5",
    values: &[Value::F, Value::T],
    designated: &[Value::T],
    truth_fn: bivalent_truth,
    modal: true,
    quantified: true,
    access_reflexive: true,
    access_serial: false,
    access_transitive: true,
    access_symmetric: true,
};

fn add_rules(rules: &mut RuleSet, opts: &TableauOptions) {
    let access: Vec<Vec<Box<dyn Rule>>> = vec![
        vec![Box::new(Symmetric::new()), Box::new(Transitive::new())],
        vec![Box::new(Reflexive)],
    ];
    k::add_modal_rules(rules, opts, access, false);
}

fn build_model(
    branch: &tableaux::Branch,
    argument: Option<&Argument>,
    id: usize,
) -> Box<dyn CounterModel> {
    Box::new(Model::read_branch(&SEMANTICS, branch, argument, id))
}

/// The S5 logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "S5",
        title: "S5 Normal Modal Logic",
        category: "Bivalent Modal",
        description: "Normal modal logic with an equivalence access relation",
        tags: &["bivalent", "modal", "first-order"],
        category_order: 5,
    },
    build_trunk: bivalent::build_trunk_modal,
    add_rules,
    branching_complexity: k::branching_complexity,
    build_model,
};

#[cfg(test)]
mod tests {
    use notation::Parser;
    use tableaux::{Tableau, TableauOptions};

    fn build(conclusion: &str, premises: &[&str]) -> Tableau {
        let arg = Parser::polish().argument(conclusion, premises, None).unwrap();
        let mut tab = Tableau::for_argument(&super::LOGIC, arg, TableauOptions::default()).unwrap();
        tab.build().unwrap();
        tab
    }

    #[test]
    fn test_s5_axiom_valid() {
        let tab = build("CaLMa", &[]);
        assert_eq!(tab.valid(), Some(true));
    }

    #[test]
    fn test_triviality_invalid_in_s5() {
        let tab = build("b", &["a"]);
        assert_eq!(tab.invalid(), Some(true));
    }
}
