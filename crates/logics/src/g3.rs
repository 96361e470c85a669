//! Goedel 3-valued
//!
//! K3 with the Goedel conditional and a non-involutive negation: the gap
//! negates to F. Double negation therefore gets its own designation-
//! flipping rules, and the negated conditional branches differently than
//! in L3.

use lexicon::{Argument, Operator};
use smallvec::smallvec;
use tableaux::{CounterModel, Logic, Meta, NodeProps, Rule, RuleSet, TableauOptions};

use crate::model::Model;
use crate::rules::NodeRule;
use crate::semantics::{fde_truth, meet, negation, Semantics, Value};
use crate::{fde, k3, l3};

/// The G3 semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "G3",
    values: &[Value::F, Value::N, Value::T],
    designated: &[Value::T],
    truth_fn: truth,
    modal: false,
    quantified: true,
    access_reflexive: false,
    access_serial: false,
    access_transitive: false,
    access_symmetric: false,
};

fn conditional(a: Value, b: Value) -> Value {
    if a <= b {
        Value::T
    } else {
        b
    }
}

fn truth(op: Operator, a: Value, b: Option<Value>) -> Value {
    match op {
        Operator::Negation => {
            if a == Value::N {
                Value::F
            } else {
                negation(a)
            }
        }
        Operator::Conditional => conditional(a, b.unwrap_or(Value::F)),
        Operator::Biconditional => {
            let b = b.unwrap_or(Value::F);
            meet(conditional(a, b), conditional(b, a))
        }
        _ => fde_truth(op, a, b),
    }
}

// Goedel negation: a designated double negation leaves the negatum
// undesignated, and conversely.
fn double_negation_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NodeRule::operated(
            "DoubleNegationDesignated",
            Operator::Negation,
            true,
            Some(true),
            1,
            |ctx| smallvec![vec![ctx.d(ctx.s.clone(), false)]],
        )),
        Box::new(NodeRule::operated(
            "DoubleNegationUndesignated",
            Operator::Negation,
            true,
            Some(false),
            1,
            |ctx| smallvec![vec![ctx.d(ctx.s.clone(), true)]],
        )),
    ]
}

fn conditional_negated_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NodeRule::operated(
            "ConditionalNegatedDesignated",
            Operator::Conditional,
            true,
            Some(true),
            2,
            |ctx| smallvec![
                vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs().negate(), true)],
                vec![
                    ctx.d(ctx.lhs(), false),
                    ctx.d(ctx.lhs().negate(), false),
                    ctx.d(ctx.rhs().negate(), true),
                ],
            ],
        )),
        Box::new(NodeRule::operated(
            "ConditionalNegatedUndesignated",
            Operator::Conditional,
            true,
            Some(false),
            2,
            |ctx| smallvec![
                vec![ctx.d(ctx.lhs().negate(), true)],
                vec![ctx.d(ctx.rhs().negate(), false)],
            ],
        )),
    ]
}

fn nonbranching_group() -> Vec<Box<dyn Rule>> {
    let mut rules = fde::assertion_rules();
    rules.extend(double_negation_rules());
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
    rules.push(l3::conditional_designated_rule());
    rules.push(l3::conditional_undesignated_rule());
    rules.extend(conditional_negated_rules());
    rules
}

fn add_rules(rules: &mut RuleSet, opts: &TableauOptions) {
    let r = opts.is_rank_optim;
    k3::add_closures(rules, r);
    rules.add_group(nonbranching_group(), r).expect("rule registry unlocked");
    rules.add_group(branching_group(), r).expect("rule registry unlocked");
    rules.add_group(fde::quantifier_fresh_rules(), r).expect("rule registry unlocked");
    rules.add_group(fde::quantifier_all_rules(), r).expect("rule registry unlocked");
}

fn branchable(op: Operator, negated: bool, designated: Option<bool>) -> u32 {
    match (op, negated) {
        (Operator::Conditional, _) => 1,
        (Operator::Biconditional, _) => 0,
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

/// The G3 logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "G3",
        title: "Goedel 3-valued logic",
        category: "Many-valued",
        description: "K3 with the Goedel conditional and negation",
        tags: &["many-valued", "gappy", "non-modal", "first-order"],
        category_order: 90,
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
    fn test_goedel_negation_closes_gap() {
        assert_eq!(truth(Operator::Negation, Value::N, None), Value::F);
        assert_eq!(truth(Operator::Negation, Value::F, None), Value::T);
    }

    #[test]
    fn test_goedel_conditional() {
        assert_eq!(conditional(Value::T, Value::N), Value::N);
        assert_eq!(conditional(Value::N, Value::F), Value::F);
        assert_eq!(conditional(Value::N, Value::T), Value::T);
    }
}
