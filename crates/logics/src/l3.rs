//! Lukasiewicz 3-valued
//!
//! K3 with a primitive conditional respecting conditional identity. The
//! conditional gets its own rules; biconditionals reduce to conjunctions
//! of conditionals.

use lexicon::{Argument, Operator, Sentence};
use smallvec::smallvec;
use tableaux::rule::Adds;
use tableaux::{CounterModel, Logic, Meta, NodeProps, Rule, RuleSet, TableauOptions};

use crate::model::Model;
use crate::rules::{BuildCtx, NodeRule};
use crate::semantics::{fde_truth, meet, Semantics, Value};
use crate::{fde, k3};

/// The L3 semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "L3",
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
        match (a, b) {
            (Value::T, Value::N) | (Value::N, Value::F) => Value::N,
            _ => Value::F,
        }
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

fn material(ctx: &BuildCtx<'_>) -> Sentence {
    Sentence::operated(Operator::MaterialConditional, [ctx.lhs(), ctx.rhs()])
        .expect("binary operands")
}

// A designated conditional is either a designated material conditional,
// or both sides take the gap.
fn conditional_designated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![
        vec![ctx.d(material(ctx), true)],
        vec![
            ctx.d(ctx.lhs(), false),
            ctx.d(ctx.lhs().negate(), false),
            ctx.d(ctx.rhs(), false),
            ctx.d(ctx.rhs().negate(), false),
        ],
    ]
}

fn conditional_undesignated(ctx: &BuildCtx<'_>) -> Adds {
    let mat = ctx.d(material(ctx), false);
    smallvec![
        vec![mat.clone(), ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs(), false)],
        vec![
            mat,
            ctx.d(ctx.lhs(), false),
            ctx.d(ctx.lhs().negate(), false),
            ctx.d(ctx.rhs().negate(), true),
        ],
    ]
}

fn bicond_designated(ctx: &BuildCtx<'_>) -> Adds {
    fde::bicond_to_conjunction(ctx, true, false)
}

fn bicond_negated_designated(ctx: &BuildCtx<'_>) -> Adds {
    fde::bicond_to_conjunction(ctx, true, true)
}

fn bicond_undesignated(ctx: &BuildCtx<'_>) -> Adds {
    fde::bicond_to_conjunction(ctx, false, false)
}

fn bicond_negated_undesignated(ctx: &BuildCtx<'_>) -> Adds {
    fde::bicond_to_conjunction(ctx, false, true)
}

pub(crate) fn bicond_reduction_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NodeRule::operated("BiconditionalDesignated", Operator::Biconditional, false, Some(true), 1, bicond_designated)),
        Box::new(NodeRule::operated("BiconditionalNegatedDesignated", Operator::Biconditional, true, Some(true), 1, bicond_negated_designated)),
        Box::new(NodeRule::operated("BiconditionalUndesignated", Operator::Biconditional, false, Some(false), 1, bicond_undesignated)),
        Box::new(NodeRule::operated("BiconditionalNegatedUndesignated", Operator::Biconditional, true, Some(false), 1, bicond_negated_undesignated)),
    ]
}

pub(crate) fn conditional_designated_rule() -> Box<dyn Rule> {
    Box::new(NodeRule::operated(
        "ConditionalDesignated",
        Operator::Conditional,
        false,
        Some(true),
        2,
        conditional_designated,
    ))
}

pub(crate) fn conditional_undesignated_rule() -> Box<dyn Rule> {
    Box::new(NodeRule::operated(
        "ConditionalUndesignated",
        Operator::Conditional,
        false,
        Some(false),
        2,
        conditional_undesignated,
    ))
}

fn nonbranching_group() -> Vec<Box<dyn Rule>> {
    let mut rules = fde::assertion_rules();
    rules.extend(fde::double_negation_rules());
    rules.extend(fde::conjunction_nonbranching());
    rules.extend(fde::disjunction_nonbranching());
    rules.extend(fde::material_nonbranching());
    rules.push(Box::new(NodeRule::operated(
        "ConditionalNegatedDesignated",
        Operator::Conditional,
        true,
        Some(true),
        1,
        |ctx| smallvec![vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs().negate(), true)]],
    )));
    rules.extend(bicond_reduction_rules());
    rules.extend(fde::quantifier_negated_rules());
    rules
}

fn branching_group() -> Vec<Box<dyn Rule>> {
    let mut rules = fde::conjunction_branching();
    rules.extend(fde::disjunction_branching());
    rules.extend(fde::material_branching());
    rules.push(conditional_designated_rule());
    rules.push(conditional_undesignated_rule());
    rules.push(Box::new(NodeRule::operated(
        "ConditionalNegatedUndesignated",
        Operator::Conditional,
        true,
        Some(false),
        2,
        |ctx| smallvec![
            vec![ctx.d(ctx.lhs(), false)],
            vec![ctx.d(ctx.rhs().negate(), false)],
        ],
    )));
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

pub(crate) fn branchable(op: Operator, negated: bool, designated: Option<bool>) -> u32 {
    match (op, negated) {
        (Operator::Conditional, false) => 1,
        (Operator::Conditional, true) => {
            if designated == Some(false) {
                1
            } else {
                0
            }
        }
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

/// The L3 logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "L3",
        title: "Lukasiewicz 3-valued logic",
        category: "Many-valued",
        description: "K3 with a primitive conditional respecting identity",
        tags: &["many-valued", "gappy", "non-modal", "first-order"],
        category_order: 40,
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
    fn test_conditional_identity_table() {
        for v in [Value::F, Value::N, Value::T] {
            assert_eq!(conditional(v, v), Value::T);
        }
        assert_eq!(conditional(Value::N, Value::F), Value::N);
        assert_eq!(conditional(Value::T, Value::N), Value::N);
        assert_eq!(conditional(Value::T, Value::F), Value::F);
    }
}
