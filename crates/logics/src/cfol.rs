//! Classical first-order
//!
//! CPL plus the quantifier rules: a fresh constant for existentials, all
//! branch constants for universals, and the dual reformulations for
//! negated quantifiers.

use lexicon::Argument;
use tableaux::{CounterModel, Logic, Meta, NodeProps, RuleSet, TableauOptions};

use crate::bivalent;
use crate::model::Model;
use crate::rules::identity::IdentityIndiscernability;
use crate::semantics::{bivalent_truth, Semantics, Value};
use crate::cpl;

/// The CFOL semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "CFOL",
    values: &[Value::F, Value::T],
    designated: &[Value::T],
    truth_fn: bivalent_truth,
    modal: false,
    quantified: true,
    access_reflexive: false,
    access_serial: false,
    access_transitive: false,
    access_symmetric: false,
};

fn add_rules(rules: &mut RuleSet, opts: &TableauOptions) {
    let r = opts.is_rank_optim;
    cpl::add_closures(rules, r, false);
    let mut nonbranching = bivalent::nonbranching_group(false);
    nonbranching.push(Box::new(IdentityIndiscernability::new()));
    nonbranching.extend(bivalent::quantifier_negated_rules());
    rules.add_group(nonbranching, r).expect("rule registry unlocked");
    rules
        .add_group(bivalent::branching_group(false), r)
        .expect("rule registry unlocked");
    rules
        .add_group(bivalent::existential_group(false), r)
        .expect("rule registry unlocked");
    rules
        .add_group(bivalent::universal_group(false), r)
        .expect("rule registry unlocked");
}

fn branching_complexity(props: &NodeProps) -> u32 {
    crate::fde::complexity_with(bivalent::branchable, props)
}

fn build_model(
    branch: &tableaux::Branch,
    argument: Option<&Argument>,
    id: usize,
) -> Box<dyn CounterModel> {
    Box::new(Model::read_branch(&SEMANTICS, branch, argument, id))
}

/// The CFOL logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "CFOL",
        title: "Classical First Order Logic",
        category: "Bivalent",
        description: "Standard bivalent logic with full first-order quantification",
        tags: &["bivalent", "non-modal", "first-order"],
        category_order: 2,
    },
    build_trunk: bivalent::build_trunk,
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
    fn test_universal_instantiation_valid() {
        let tab = build("Fm", &["VxFx"]);
        assert_eq!(tab.valid(), Some(true));
    }

    #[test]
    fn test_existential_generalization_valid() {
        let tab = build("SxFx", &["Fm"]);
        assert_eq!(tab.valid(), Some(true));
    }

    #[test]
    fn test_quantifier_switch_invalid() {
        let tab = build("VxFx", &["SxFx"]);
        assert_eq!(tab.invalid(), Some(true));
    }

    #[test]
    fn test_self_identity_valid() {
        let tab = build("Imm", &[]);
        assert_eq!(tab.valid(), Some(true));
    }

    #[test]
    fn test_identity_substitution_valid() {
        let tab = build("Fn", &["Imn", "Fm"]);
        assert_eq!(tab.valid(), Some(true));
    }
}
