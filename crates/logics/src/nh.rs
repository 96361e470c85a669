//! Paraconsistent hybrid
//!
//! LP with a hybrid conjunction (a double glut collapses to T) and the
//! same all-or-nothing conditional as MH. Propositional only.

use lexicon::{Argument, Operator};
use smallvec::smallvec;
use tableaux::{CounterModel, Logic, Meta, NodeProps, Rule, RuleSet, TableauOptions};

use crate::model::Model;
use crate::rules::NodeRule;
use crate::semantics::{fde_truth, Semantics, Value};
use crate::{fde, l3, lp, mh};

/// The NH semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "NH",
    values: &[Value::F, Value::B, Value::T],
    designated: &[Value::B, Value::T],
    truth_fn: truth,
    modal: false,
    quantified: false,
    access_reflexive: false,
    access_serial: false,
    access_transitive: false,
    access_symmetric: false,
};

fn truth(op: Operator, a: Value, b: Option<Value>) -> Value {
    match op {
        Operator::Conjunction if a == Value::B && b == Some(Value::B) => Value::T,
        Operator::Conditional => {
            if a != Value::F && b == Some(Value::F) {
                Value::F
            } else {
                Value::T
            }
        }
        Operator::Biconditional => {
            let fwd = truth(Operator::Conditional, a, b);
            let back = truth(Operator::Conditional, b.unwrap_or(Value::F), Some(a));
            fde_truth(Operator::Conjunction, fwd, Some(back))
        }
        _ => fde_truth(op, a, b),
    }
}

fn hybrid_conjunction_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NodeRule::operated(
            "ConjunctionNegatedDesignated",
            Operator::Conjunction,
            true,
            Some(true),
            4,
            |ctx| smallvec![
                vec![ctx.d(ctx.lhs(), false)],
                vec![ctx.d(ctx.rhs(), false)],
                vec![
                    ctx.d(ctx.lhs(), true),
                    ctx.d(ctx.lhs().negate(), true),
                    ctx.d(ctx.rhs().negate(), false),
                ],
                vec![
                    ctx.d(ctx.rhs(), true),
                    ctx.d(ctx.rhs().negate(), true),
                    ctx.d(ctx.lhs().negate(), false),
                ],
            ],
        )),
        // Either both negations fail outright, or everything gluts.
        Box::new(NodeRule::operated(
            "ConjunctionNegatedUndesignated",
            Operator::Conjunction,
            true,
            Some(false),
            2,
            |ctx| smallvec![
                vec![ctx.d(ctx.lhs().negate(), false), ctx.d(ctx.rhs().negate(), false)],
                vec![
                    ctx.d(ctx.lhs(), true),
                    ctx.d(ctx.lhs().negate(), true),
                    ctx.d(ctx.rhs(), true),
                    ctx.d(ctx.rhs().negate(), true),
                ],
            ],
        )),
    ]
}

fn nonbranching_group() -> Vec<Box<dyn Rule>> {
    let mut rules = fde::assertion_rules();
    rules.extend(fde::double_negation_rules());
    rules.extend(
        fde::conjunction_nonbranching()
            .into_iter()
            .filter(|r| r.name() == "ConjunctionDesignated"),
    );
    rules.extend(fde::disjunction_nonbranching());
    rules.extend(mh::material_reduction_rules());
    rules.extend(l3::bicond_reduction_rules());
    rules
}

fn branching_group() -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = fde::conjunction_branching()
        .into_iter()
        .filter(|r| r.name() == "ConjunctionUndesignated")
        .collect();
    rules.extend(fde::disjunction_branching());
    rules.extend(hybrid_conjunction_rules());
    rules.extend(mh::conditional_rules());
    rules
}

fn add_rules(rules: &mut RuleSet, opts: &TableauOptions) {
    let r = opts.is_rank_optim;
    lp::add_closures(rules, r);
    rules.add_group(nonbranching_group(), r).expect("rule registry unlocked");
    rules.add_group(branching_group(), r).expect("rule registry unlocked");
}

fn branchable(op: Operator, negated: bool, designated: Option<bool>) -> u32 {
    match (op, negated, designated) {
        (Operator::Conjunction, true, Some(true)) => 3,
        (Operator::Conjunction, true, Some(false)) => 1,
        (Operator::Conditional, false, Some(true)) => 1,
        (Operator::Conditional, true, Some(false)) => 1,
        (Operator::Conditional, _, _) => 0,
        (
            Operator::MaterialConditional
            | Operator::MaterialBiconditional
            | Operator::Biconditional,
            _,
            _,
        ) => 0,
        _ => fde::fde_branchable(op, negated, designated),
    }
}

fn branching_complexity(props: &NodeProps) -> u32 {
    fde::complexity_with(branchable, props)
}

fn build_model(
    branch: &tableaux::Branch,
    argument: Option<&Argument>,
    id: usize,
) -> Box<dyn CounterModel> {
    Box::new(Model::read_branch(&SEMANTICS, branch, argument, id))
}

/// The NH logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "NH",
        title: "Paraconsistent Hybrid Logic",
        category: "Many-valued",
        description: "LP with a hybrid conjunction and an all-or-nothing conditional",
        tags: &["many-valued", "glutty", "non-modal", "propositional"],
        category_order: 80,
    },
    build_trunk: fde::build_trunk,
    add_rules,
    branching_complexity,
    build_model,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hybrid_conjunction_collapses_double_glut() {
        assert_eq!(truth(Operator::Conjunction, Value::B, Some(Value::B)), Value::T);
        assert_eq!(truth(Operator::Conjunction, Value::B, Some(Value::T)), Value::B);
    }
}
