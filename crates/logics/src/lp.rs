//! Logic of Paradox
//!
//! FDE restricted to the glut: same rules, plus the gap closure ruling
//! out undesignated contradictions.

use lexicon::Argument;
use tableaux::{CounterModel, Logic, Meta, NodeProps, RuleSet, TableauOptions};

use crate::fde;
use crate::model::Model;
use crate::rules::closure::{DesignationClosure, GapClosure};
use crate::semantics::{fde_truth, Semantics, Value};

/// The LP semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "LP",
    values: &[Value::F, Value::B, Value::T],
    designated: &[Value::B, Value::T],
    truth_fn: fde_truth,
    modal: false,
    quantified: true,
    access_reflexive: false,
    access_serial: false,
    access_transitive: false,
    access_symmetric: false,
};

fn build_model(
    branch: &tableaux::Branch,
    argument: Option<&Argument>,
    id: usize,
) -> Box<dyn CounterModel> {
    Box::new(Model::read_branch(&SEMANTICS, branch, argument, id))
}

pub(crate) fn add_closures(rules: &mut RuleSet, rank_optim: bool) {
    rules
        .add_closure_rule(Box::new(GapClosure), rank_optim)
        .expect("rule registry unlocked");
    rules
        .add_closure_rule(Box::new(DesignationClosure), rank_optim)
        .expect("rule registry unlocked");
}

fn add_rules(rules: &mut RuleSet, opts: &TableauOptions) {
    let r = opts.is_rank_optim;
    add_closures(rules, r);
    rules.add_group(fde::nonbranching_group(), r).expect("rule registry unlocked");
    rules.add_group(fde::branching_group(), r).expect("rule registry unlocked");
    rules.add_group(fde::quantifier_fresh_rules(), r).expect("rule registry unlocked");
    rules.add_group(fde::quantifier_all_rules(), r).expect("rule registry unlocked");
}

fn branching_complexity(props: &NodeProps) -> u32 {
    fde::complexity_with(fde::fde_branchable, props)
}

/// The LP logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "LP",
        title: "Logic of Paradox",
        category: "Many-valued",
        description: "Three-valued logic with values T, F, and B",
        tags: &["many-valued", "glutty", "non-modal", "first-order"],
        category_order: 30,
    },
    build_trunk: fde::build_trunk,
    add_rules,
    branching_complexity,
    build_model,
};
