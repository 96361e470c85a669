//! Kripke normal modal
//!
//! The bivalent rules with world markers, plus Possibility (fresh world
//! under the MaxWorlds projection) and Necessity (fan-out over the
//! access relation). First-order: the quantifier rules run per world.
//! The relatives (D, T, S4, S5) insert their access rules between the
//! non-branching group and the modal operators.

use lexicon::Argument;
use tableaux::{CounterModel, Logic, Meta, NodeProps, Rule, RuleSet, TableauOptions};

use crate::bivalent;
use crate::cpl;
use crate::model::Model;
use crate::rules::identity::IdentityIndiscernability;
use crate::rules::modal::{Necessity, Possibility, Serial};
use crate::semantics::{bivalent_truth, Semantics, Value};

/// The K semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "K",
    values: &[Value::F, Value::T],
    designated: &[Value::T],
    truth_fn: bivalent_truth,
    modal: true,
    quantified: true,
    access_reflexive: false,
    access_serial: false,
    access_transitive: false,
    access_symmetric: false,
};

// The shared installer for the whole modal family: closure, then
// non-branching, then the per-logic access groups, then the modal
// operators, branching, quantifiers, and (for D) the serial rule.
pub(crate) fn add_modal_rules(
    rules: &mut RuleSet,
    opts: &TableauOptions,
    access_groups: Vec<Vec<Box<dyn Rule>>>,
    serial: bool,
) {
    let r = opts.is_rank_optim;
    cpl::add_closures(rules, r, true);
    let mut nonbranching = bivalent::nonbranching_group(true);
    nonbranching.push(Box::new(IdentityIndiscernability::modal()));
    nonbranching.extend(bivalent::quantifier_negated_rules());
    rules.add_group(nonbranching, r).expect("rule registry unlocked");
    for group in access_groups {
        rules.add_group(group, r).expect("rule registry unlocked");
    }
    rules
        .add_group(
            vec![
                Box::new(Necessity::new()) as Box<dyn Rule>,
                Box::new(Possibility::new()),
            ],
            r,
        )
        .expect("rule registry unlocked");
    rules
        .add_group(bivalent::branching_group(true), r)
        .expect("rule registry unlocked");
    rules
        .add_group(bivalent::existential_group(true), r)
        .expect("rule registry unlocked");
    rules
        .add_group(bivalent::universal_group(true), r)
        .expect("rule registry unlocked");
    if serial {
        rules
            .add_group(vec![Box::new(Serial::new()) as Box<dyn Rule>], r)
            .expect("rule registry unlocked");
    }
}

fn add_rules(rules: &mut RuleSet, opts: &TableauOptions) {
    add_modal_rules(rules, opts, Vec::new(), false);
}

pub(crate) fn branching_complexity(props: &NodeProps) -> u32 {
    crate::fde::complexity_with(bivalent::branchable, props)
}

fn build_model(
    branch: &tableaux::Branch,
    argument: Option<&Argument>,
    id: usize,
) -> Box<dyn CounterModel> {
    Box::new(Model::read_branch(&SEMANTICS, branch, argument, id))
}

/// The K logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "K",
        title: "Kripke Normal Modal Logic",
        category: "Bivalent Modal",
        description: "Normal modal logic with no access restrictions",
        tags: &["bivalent", "modal", "first-order"],
        category_order: 1,
    },
    build_trunk: bivalent::build_trunk_modal,
    add_rules,
    branching_complexity,
    build_model,
};

#[cfg(test)]
mod tests {
    use super::*;
    use notation::Parser;
    use tableaux::{Tableau, TableauOptions};

    fn build(conclusion: &str, premises: &[&str]) -> Tableau {
        let arg = Parser::polish().argument(conclusion, premises, None).unwrap();
        let mut tab = Tableau::for_argument(&LOGIC, arg, TableauOptions::default()).unwrap();
        tab.build().unwrap();
        tab
    }

    #[test]
    fn test_modal_platitude_valid() {
        let tab = build("Ma", &["Ma"]);
        assert_eq!(tab.valid(), Some(true));
    }

    #[test]
    fn test_necessity_distribution_valid() {
        let tab = build("CLCabCLaLb", &[]);
        assert_eq!(tab.valid(), Some(true));
    }

    #[test]
    fn test_modal_transformation_valid() {
        let tab = build("NMNa", &["La"]);
        assert_eq!(tab.valid(), Some(true));
    }

    #[test]
    fn test_necessity_elimination_invalid_in_k() {
        let tab = build("a", &["La"]);
        assert_eq!(tab.invalid(), Some(true));
    }

    #[test]
    fn test_trunk_single_world() {
        let arg = Parser::polish().argument("b", &["CaLMa"], None).unwrap();
        let tab = Tableau::for_argument(&LOGIC, arg, TableauOptions::default()).unwrap();
        let trunk = &tab.branches()[0];
        assert!(trunk.nodes().iter().all(|n| n.world() == Some(0)));
        assert!(trunk.worlds().len() <= 1);
    }
}
