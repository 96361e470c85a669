//! Strong Kleene
//!
//! FDE restricted to the gap: same rules, plus the glut closure ruling
//! out designated contradictions.

use lexicon::Argument;
use tableaux::{CounterModel, Logic, Meta, NodeProps, RuleSet, TableauOptions};

use crate::model::Model;
use crate::rules::closure::{DesignationClosure, GlutClosure};
use crate::semantics::{fde_truth, Semantics, Value};
use crate::fde;

/// The K3 semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "K3",
    values: &[Value::F, Value::N, Value::T],
    designated: &[Value::T],
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
        .add_closure_rule(Box::new(GlutClosure), rank_optim)
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

/// The K3 logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "K3",
        title: "Strong Kleene 3-valued logic",
        category: "Many-valued",
        description: "Three-valued logic with values T, F, and N",
        tags: &["many-valued", "gappy", "non-modal", "first-order"],
        category_order: 20,
    },
    build_trunk: fde::build_trunk,
    add_rules,
    branching_complexity,
    build_model,
};
