//! Reflexive normal modal
//!
//! K with a reflexive access relation, via the Reflexive access rule.

use lexicon::Argument;
use tableaux::{CounterModel, Logic, Meta, Rule, RuleSet, TableauOptions};

use crate::bivalent;
use crate::k;
use crate::model::Model;
use crate::rules::modal::Reflexive;
use crate::semantics::{bivalent_truth, Semantics, Value};

/// The T semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "T",
    values: &[Value::F, Value::T],
    designated: &[Value::T],
    truth_fn: bivalent_truth,
    modal: true,
    quantified: true,
    access_reflexive: true,
    access_serial: false,
    access_transitive: false,
    access_symmetric: false,
};

fn add_rules(rules: &mut RuleSet, opts: &TableauOptions) {
    let access: Vec<Vec<Box<dyn Rule>>> = vec![vec![Box::new(Reflexive)]];
    k::add_modal_rules(rules, opts, access, false);
}

fn build_model(
    branch: &tableaux::Branch,
    argument: Option<&Argument>,
    id: usize,
) -> Box<dyn CounterModel> {
    Box::new(Model::read_branch(&SEMANTICS, branch, argument, id))
}

/// The T logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "T",
        title: "Reflexive Normal Modal Logic",
        category: "Bivalent Modal",
        description: "Normal modal logic with a reflexive access relation",
        tags: &["bivalent", "modal", "first-order"],
        category_order: 3,
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
    fn test_necessity_elimination_valid() {
        let tab = build("a", &["La"]);
        assert_eq!(tab.valid(), Some(true));
    }

    #[test]
    fn test_possibility_addition_valid() {
        let tab = build("Ma", &["a"]);
        assert_eq!(tab.valid(), Some(true));
    }

    #[test]
    fn test_s4_axiom_invalid_in_t() {
        let tab = build("CLaLLa", &[]);
        assert_eq!(tab.invalid(), Some(true));
    }
}
