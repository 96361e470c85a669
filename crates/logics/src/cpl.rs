//! Classical propositional
//!
//! Bivalent, negated-conclusion trunk. Quantified and modal sentences
//! are opaque to the model; the identity rules still apply at the
//! propositional level since predications can occur as atoms.

use lexicon::Argument;
use tableaux::{CounterModel, Logic, Meta, NodeProps, RuleSet, TableauOptions};

use crate::bivalent;
use crate::model::Model;
use crate::rules::closure::{ContradictionClosure, NonExistenceClosure, SelfIdentityClosure};
use crate::rules::identity::IdentityIndiscernability;
use crate::semantics::{bivalent_truth, Semantics, Value};

/// The CPL semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "CPL",
    values: &[Value::F, Value::T],
    designated: &[Value::T],
    truth_fn: bivalent_truth,
    modal: false,
    quantified: false,
    access_reflexive: false,
    access_serial: false,
    access_transitive: false,
    access_symmetric: false,
};

pub(crate) fn add_closures(rules: &mut RuleSet, rank_optim: bool, modal: bool) {
    let (contradiction, self_identity, non_existence) = if modal {
        (
            ContradictionClosure::modal(),
            SelfIdentityClosure::modal(),
            NonExistenceClosure::modal(),
        )
    } else {
        (
            ContradictionClosure::new(),
            SelfIdentityClosure::new(),
            NonExistenceClosure::new(),
        )
    };
    rules
        .add_closure_rule(Box::new(contradiction), rank_optim)
        .expect("rule registry unlocked");
    rules
        .add_closure_rule(Box::new(self_identity), rank_optim)
        .expect("rule registry unlocked");
    rules
        .add_closure_rule(Box::new(non_existence), rank_optim)
        .expect("rule registry unlocked");
}

fn add_rules(rules: &mut RuleSet, opts: &TableauOptions) {
    let r = opts.is_rank_optim;
    add_closures(rules, r, false);
    let mut nonbranching = bivalent::nonbranching_group(false);
    nonbranching.push(Box::new(IdentityIndiscernability::new()));
    rules.add_group(nonbranching, r).expect("rule registry unlocked");
    rules
        .add_group(bivalent::branching_group(false), r)
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

/// The CPL logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "CPL",
        title: "Classical Propositional Logic",
        category: "Bivalent",
        description: "Standard bivalent propositional logic",
        tags: &["bivalent", "non-modal", "propositional"],
        category_order: 1,
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
    fn test_modus_ponens_valid() {
        let tab = build("b", &["Cab", "a"]);
        assert_eq!(tab.valid(), Some(true));
    }

    #[test]
    fn test_affirming_the_consequent_invalid() {
        let tab = build("a", &["Cab", "b"]);
        assert_eq!(tab.invalid(), Some(true));
        // The conditional split leaves both branches open; each reads
        // the same a = F, b = T counter-model.
        assert_eq!(tab.open_branches().len(), 2);
    }

    #[test]
    fn test_law_of_excluded_middle_valid() {
        let tab = build("AaNa", &[]);
        assert_eq!(tab.valid(), Some(true));
    }

    #[test]
    fn test_branching_complexity_table() {
        let mut p = Parser::polish();
        let disj = p.parse("Aab").unwrap();
        assert_eq!(branching_complexity(&NodeProps::sentence(disj.clone())), 1);
        assert_eq!(branching_complexity(&NodeProps::sentence(disj.negate())), 0);
    }
}
