//! Serial normal modal
//!
//! K with a serial access relation: every world reaches some world. The
//! Serial rule runs in the last group so it only fires once nothing else
//! applies.

use lexicon::Argument;
use tableaux::{CounterModel, Logic, Meta, RuleSet, TableauOptions};

use crate::bivalent;
use crate::k;
use crate::model::Model;
use crate::semantics::{bivalent_truth, Semantics, Value};

/// The D semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "D",
    values: &[Value::F, Value::T],
    designated: &[Value::T],
    truth_fn: bivalent_truth,
    modal: true,
    quantified: true,
    access_reflexive: false,
    access_serial: true,
    access_transitive: false,
    access_symmetric: false,
};

fn add_rules(rules: &mut RuleSet, opts: &TableauOptions) {
    k::add_modal_rules(rules, opts, Vec::new(), true);
}

fn build_model(
    branch: &tableaux::Branch,
    argument: Option<&Argument>,
    id: usize,
) -> Box<dyn CounterModel> {
    Box::new(Model::read_branch(&SEMANTICS, branch, argument, id))
}

/// The D logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "D",
        title: "Deontic Normal Modal Logic",
        category: "Bivalent Modal",
        description: "Normal modal logic with a serial access relation",
        tags: &["bivalent", "modal", "first-order"],
        category_order: 2,
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
    fn test_serial_inference_valid() {
        let tab = build("CLaMa", &[]);
        assert_eq!(tab.valid(), Some(true));
    }

    #[test]
    fn test_reflexive_inference_invalid_in_d() {
        let tab = build("CLaa", &[]);
        assert_eq!(tab.invalid(), Some(true));
    }
}
