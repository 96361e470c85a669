//! R-mingle 3
//!
//! LP with a proper conditional: false whenever the antecedent outranks
//! the consequent. The designated conditional branches three ways;
//! biconditionals reduce to conjunctions of conditionals.

use lexicon::{Argument, Operator};
use smallvec::smallvec;
use tableaux::{CounterModel, Logic, Meta, NodeProps, Rule, RuleSet, TableauOptions};

use crate::model::Model;
use crate::rules::NodeRule;
use crate::semantics::{fde_truth, join, meet, negation, Semantics, Value};
use crate::{fde, l3, lp};

/// The RM3 semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "RM3",
    values: &[Value::F, Value::B, Value::T],
    designated: &[Value::B, Value::T],
    truth_fn: truth,
    modal: false,
    quantified: true,
    access_reflexive: false,
    access_serial: false,
    access_transitive: false,
    access_symmetric: false,
};

fn conditional(a: Value, b: Value) -> Value {
    if a > b {
        Value::F
    } else {
        join(negation(a), b)
    }
}

fn truth(op: Operator, a: Value, b: Option<Value>) -> Value {
    match op {
        Operator::Conditional => conditional(a, b.unwrap_or(Value::F)),
        Operator::Biconditional => {
            let b = b.unwrap_or(Value::F);
            meet(conditional(a, b), conditional(b, a))
        }
        _ => fde_truth(op, a, b),
    }
}

fn conditional_rules() -> Vec<Box<dyn Rule>> {
    vec![
        // Antecedent undesignated, consequent falsified, or everything
        // glutted.
        Box::new(NodeRule::operated(
            "ConditionalDesignated",
            Operator::Conditional,
            false,
            Some(true),
            3,
            |ctx| smallvec![
                vec![ctx.d(ctx.lhs(), false)],
                vec![ctx.d(ctx.rhs().negate(), false)],
                vec![
                    ctx.d(ctx.lhs(), true),
                    ctx.d(ctx.lhs().negate(), true),
                    ctx.d(ctx.rhs(), true),
                    ctx.d(ctx.rhs().negate(), true),
                ],
            ],
        )),
        Box::new(NodeRule::operated(
            "ConditionalNegatedDesignated",
            Operator::Conditional,
            true,
            Some(true),
            1,
            |ctx| smallvec![vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs().negate(), true)]],
        )),
        Box::new(NodeRule::operated(
            "ConditionalUndesignated",
            Operator::Conditional,
            false,
            Some(false),
            2,
            |ctx| smallvec![
                vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs(), false)],
                vec![ctx.d(ctx.lhs().negate(), false), ctx.d(ctx.rhs().negate(), true)],
            ],
        )),
        Box::new(NodeRule::operated(
            "ConditionalNegatedUndesignated",
            Operator::Conditional,
            true,
            Some(false),
            2,
            |ctx| smallvec![
                vec![ctx.d(ctx.lhs(), false)],
                vec![ctx.d(ctx.rhs().negate(), false)],
            ],
        )),
    ]
}

fn nonbranching_group() -> Vec<Box<dyn Rule>> {
    let mut rules = fde::assertion_rules();
    rules.extend(fde::double_negation_rules());
    rules.extend(fde::conjunction_nonbranching());
    rules.extend(fde::disjunction_nonbranching());
    rules.extend(fde::material_nonbranching());
    rules.extend(l3::bicond_reduction_rules());
    rules.extend(fde::quantifier_negated_rules());
    rules
}

fn branching_group() -> Vec<Box<dyn Rule>> {
    let mut rules = fde::conjunction_branching();
    rules.extend(fde::disjunction_branching());
    rules.extend(fde::material_branching());
    rules.extend(conditional_rules());
    rules
}

fn add_rules(rules: &mut RuleSet, opts: &TableauOptions) {
    let r = opts.is_rank_optim;
    lp::add_closures(rules, r);
    rules.add_group(nonbranching_group(), r).expect("rule registry unlocked");
    rules.add_group(branching_group(), r).expect("rule registry unlocked");
    rules.add_group(fde::quantifier_fresh_rules(), r).expect("rule registry unlocked");
    rules.add_group(fde::quantifier_all_rules(), r).expect("rule registry unlocked");
}

fn branchable(op: Operator, negated: bool, designated: Option<bool>) -> u32 {
    match (op, negated, designated) {
        (Operator::Conditional, false, Some(true)) => 2,
        (Operator::Conditional, false, Some(false)) => 1,
        (Operator::Conditional, true, Some(true)) => 0,
        (Operator::Conditional, true, _) => 1,
        (Operator::Biconditional, _, _) => 0,
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

/// The RM3 logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "RM3",
        title: "R-mingle 3",
        category: "Many-valued",
        description: "LP with a proper conditional",
        tags: &["many-valued", "glutty", "non-modal", "first-order"],
        category_order: 50,
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
    fn test_rm3_conditional_demotes_descent() {
        assert_eq!(conditional(Value::T, Value::B), Value::F);
        assert_eq!(conditional(Value::B, Value::F), Value::F);
        assert_eq!(conditional(Value::B, Value::B), Value::B);
        assert_eq!(conditional(Value::F, Value::F), Value::T);
        assert_eq!(conditional(Value::B, Value::T), Value::T);
    }
}
