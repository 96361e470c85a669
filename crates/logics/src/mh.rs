//! Paracomplete hybrid
//!
//! K3 with a hybrid disjunction (a double gap collapses to F) and an
//! all-or-nothing conditional. Propositional only: quantified sentences
//! are opaque to the model.

use lexicon::{Argument, Operator, Sentence};
use smallvec::smallvec;
use tableaux::rule::Adds;
use tableaux::{CounterModel, Logic, Meta, NodeProps, Rule, RuleSet, TableauOptions};

use crate::model::Model;
use crate::rules::{BuildCtx, NodeRule};
use crate::semantics::{fde_truth, Semantics, Value};
use crate::{fde, k3, l3};

/// The MH semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "MH",
    values: &[Value::F, Value::N, Value::T],
    designated: &[Value::T],
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
        Operator::Disjunction if a == Value::N && b == Some(Value::N) => Value::F,
        Operator::Conditional => {
            if a == Value::T && b != Some(Value::T) {
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

fn disjunction(ctx: &BuildCtx<'_>) -> Sentence {
    ctx.lhs().negate().disjoin(&ctx.rhs())
}

pub(crate) fn conditional_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NodeRule::operated(
            "ConditionalDesignated",
            Operator::Conditional,
            false,
            Some(true),
            2,
            |ctx| smallvec![
                vec![ctx.d(ctx.lhs(), false)],
                vec![ctx.d(ctx.rhs(), true)],
            ],
        )),
        Box::new(NodeRule::operated(
            "ConditionalNegatedDesignated",
            Operator::Conditional,
            true,
            Some(true),
            1,
            |ctx| smallvec![vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs(), false)]],
        )),
        Box::new(NodeRule::operated(
            "ConditionalUndesignated",
            Operator::Conditional,
            false,
            Some(false),
            1,
            |ctx| smallvec![vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs(), false)]],
        )),
        Box::new(NodeRule::operated(
            "ConditionalNegatedUndesignated",
            Operator::Conditional,
            true,
            Some(false),
            2,
            |ctx| smallvec![
                vec![ctx.d(ctx.lhs(), false)],
                vec![ctx.d(ctx.rhs(), true)],
            ],
        )),
    ]
}

pub(crate) fn material_reduction_rules() -> Vec<Box<dyn Rule>> {
    fn to_disjunction(ctx: &BuildCtx<'_>) -> Adds {
        let d = ctx.designated.unwrap_or(true);
        smallvec![vec![ctx.d(disjunction(ctx), d)]]
    }
    fn to_negated_disjunction(ctx: &BuildCtx<'_>) -> Adds {
        let d = ctx.designated.unwrap_or(true);
        smallvec![vec![ctx.d(disjunction(ctx).negate(), d)]]
    }
    fn to_conjunction(ctx: &BuildCtx<'_>) -> Adds {
        let d = ctx.designated.unwrap_or(true);
        let fwd = Sentence::operated(Operator::MaterialConditional, [ctx.lhs(), ctx.rhs()])
            .expect("binary operands");
        let back = Sentence::operated(Operator::MaterialConditional, [ctx.rhs(), ctx.lhs()])
            .expect("binary operands");
        smallvec![vec![ctx.d(fwd.conjoin(&back), d)]]
    }
    fn to_negated_conjunction(ctx: &BuildCtx<'_>) -> Adds {
        let d = ctx.designated.unwrap_or(true);
        let fwd = Sentence::operated(Operator::MaterialConditional, [ctx.lhs(), ctx.rhs()])
            .expect("binary operands");
        let back = Sentence::operated(Operator::MaterialConditional, [ctx.rhs(), ctx.lhs()])
            .expect("binary operands");
        smallvec![vec![ctx.d(fwd.conjoin(&back).negate(), d)]]
    }
    vec![
        Box::new(NodeRule::operated("MaterialConditionalDesignated", Operator::MaterialConditional, false, Some(true), 1, to_disjunction)),
        Box::new(NodeRule::operated("MaterialConditionalNegatedDesignated", Operator::MaterialConditional, true, Some(true), 1, to_negated_disjunction)),
        Box::new(NodeRule::operated("MaterialConditionalUndesignated", Operator::MaterialConditional, false, Some(false), 1, to_disjunction)),
        Box::new(NodeRule::operated("MaterialConditionalNegatedUndesignated", Operator::MaterialConditional, true, Some(false), 1, to_negated_disjunction)),
        Box::new(NodeRule::operated("MaterialBiconditionalDesignated", Operator::MaterialBiconditional, false, Some(true), 1, to_conjunction)),
        Box::new(NodeRule::operated("MaterialBiconditionalNegatedDesignated", Operator::MaterialBiconditional, true, Some(true), 1, to_negated_conjunction)),
        Box::new(NodeRule::operated("MaterialBiconditionalUndesignated", Operator::MaterialBiconditional, false, Some(false), 1, to_conjunction)),
        Box::new(NodeRule::operated("MaterialBiconditionalNegatedUndesignated", Operator::MaterialBiconditional, true, Some(false), 1, to_negated_conjunction)),
    ]
}

fn hybrid_disjunction_rules() -> Vec<Box<dyn Rule>> {
    vec![
        // Either both disjuncts gap out, or both negations hold.
        Box::new(NodeRule::operated(
            "DisjunctionNegatedDesignated",
            Operator::Disjunction,
            true,
            Some(true),
            2,
            |ctx| smallvec![
                vec![
                    ctx.d(ctx.lhs(), false),
                    ctx.d(ctx.lhs().negate(), false),
                    ctx.d(ctx.rhs(), false),
                    ctx.d(ctx.rhs().negate(), false),
                ],
                vec![ctx.d(ctx.lhs().negate(), true), ctx.d(ctx.rhs().negate(), true)],
            ],
        )),
        Box::new(NodeRule::operated(
            "DisjunctionNegatedUndesignated",
            Operator::Disjunction,
            true,
            Some(false),
            4,
            |ctx| smallvec![
                vec![ctx.d(ctx.lhs(), true)],
                vec![ctx.d(ctx.rhs(), true)],
                vec![
                    ctx.d(ctx.lhs(), false),
                    ctx.d(ctx.lhs().negate(), false),
                    ctx.d(ctx.rhs().negate(), true),
                ],
                vec![
                    ctx.d(ctx.rhs(), false),
                    ctx.d(ctx.rhs().negate(), false),
                    ctx.d(ctx.lhs().negate(), true),
                ],
            ],
        )),
    ]
}

fn nonbranching_group() -> Vec<Box<dyn Rule>> {
    let mut rules = fde::assertion_rules();
    rules.extend(fde::double_negation_rules());
    rules.extend(fde::conjunction_nonbranching());
    rules.extend(
        fde::disjunction_nonbranching()
            .into_iter()
            .filter(|r| r.name() == "DisjunctionUndesignated"),
    );
    rules.extend(material_reduction_rules());
    rules.extend(l3::bicond_reduction_rules());
    rules
}

fn branching_group() -> Vec<Box<dyn Rule>> {
    let mut rules = fde::conjunction_branching();
    rules.extend(
        fde::disjunction_branching()
            .into_iter()
            .filter(|r| r.name() == "DisjunctionDesignated"),
    );
    rules.extend(hybrid_disjunction_rules());
    rules.extend(conditional_rules());
    rules
}

fn add_rules(rules: &mut RuleSet, opts: &TableauOptions) {
    let r = opts.is_rank_optim;
    k3::add_closures(rules, r);
    rules.add_group(nonbranching_group(), r).expect("rule registry unlocked");
    rules.add_group(branching_group(), r).expect("rule registry unlocked");
}

fn branchable(op: Operator, negated: bool, designated: Option<bool>) -> u32 {
    match (op, negated, designated) {
        (Operator::Disjunction, true, Some(true)) => 1,
        (Operator::Disjunction, true, Some(false)) => 3,
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

/// The MH logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "MH",
        title: "Paracomplete Hybrid Logic",
        category: "Many-valued",
        description: "K3 with a hybrid disjunction and an all-or-nothing conditional",
        tags: &["many-valued", "gappy", "non-modal", "propositional"],
        category_order: 70,
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
    fn test_hybrid_disjunction_collapses_double_gap() {
        assert_eq!(truth(Operator::Disjunction, Value::N, Some(Value::N)), Value::F);
        assert_eq!(truth(Operator::Disjunction, Value::N, Some(Value::T)), Value::T);
    }

    #[test]
    fn test_conditional_is_all_or_nothing() {
        assert_eq!(truth(Operator::Conditional, Value::T, Some(Value::N)), Value::F);
        assert_eq!(truth(Operator::Conditional, Value::N, Some(Value::F)), Value::T);
    }
}
