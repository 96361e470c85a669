//! Weak Kleene
//!
//! K3 where the gap is infectious: any binary compound with an N operand
//! is N. The disjunction and negated-conjunction rules branch three ways
//! to cover the infection; the material and conditional operators reduce
//! to disjunction forms.

use lexicon::{Argument, Operator, Sentence};
use smallvec::smallvec;
use tableaux::rule::Adds;
use tableaux::{CounterModel, Logic, Meta, NodeProps, Rule, RuleSet, TableauOptions};

use crate::model::Model;
use crate::rules::{BuildCtx, NodeRule};
use crate::semantics::{fde_truth, Semantics, Value};
use crate::{fde, k3};

/// The K3W semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "K3W",
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

fn truth(op: Operator, a: Value, b: Option<Value>) -> Value {
    if op.arity() == 2 && (a == Value::N || b == Some(Value::N)) {
        return Value::N;
    }
    fde_truth(op, a, b)
}

fn disjunction(ctx: &BuildCtx<'_>) -> Sentence {
    ctx.lhs().negate().disjoin(&ctx.rhs())
}

fn material_to_disjunction(ctx: &BuildCtx<'_>) -> Adds {
    let d = ctx.designated.unwrap_or(true);
    smallvec![vec![ctx.d(disjunction(ctx), d)]]
}

fn material_negated_to_disjunction(ctx: &BuildCtx<'_>) -> Adds {
    let d = ctx.designated.unwrap_or(true);
    smallvec![vec![ctx.d(disjunction(ctx).negate(), d)]]
}

fn bicond_to_material_conjunction(ctx: &BuildCtx<'_>) -> Adds {
    let d = ctx.designated.unwrap_or(true);
    let fwd = Sentence::operated(Operator::MaterialConditional, [ctx.lhs(), ctx.rhs()])
        .expect("binary operands");
    let back = Sentence::operated(Operator::MaterialConditional, [ctx.rhs(), ctx.lhs()])
        .expect("binary operands");
    smallvec![vec![ctx.d(fwd.conjoin(&back), d)]]
}

fn bicond_negated_to_material_conjunction(ctx: &BuildCtx<'_>) -> Adds {
    let d = ctx.designated.unwrap_or(true);
    let fwd = Sentence::operated(Operator::MaterialConditional, [ctx.lhs(), ctx.rhs()])
        .expect("binary operands");
    let back = Sentence::operated(Operator::MaterialConditional, [ctx.rhs(), ctx.lhs()])
        .expect("binary operands");
    smallvec![vec![ctx.d(fwd.conjoin(&back).negate(), d)]]
}

fn reduction_rules() -> Vec<Box<dyn Rule>> {
    let conditional_specs: [(&'static str, Operator, bool, bool); 8] = [
        ("MaterialConditionalDesignated", Operator::MaterialConditional, false, true),
        ("MaterialConditionalNegatedDesignated", Operator::MaterialConditional, true, true),
        ("MaterialConditionalUndesignated", Operator::MaterialConditional, false, false),
        ("MaterialConditionalNegatedUndesignated", Operator::MaterialConditional, true, false),
        ("ConditionalDesignated", Operator::Conditional, false, true),
        ("ConditionalNegatedDesignated", Operator::Conditional, true, true),
        ("ConditionalUndesignated", Operator::Conditional, false, false),
        ("ConditionalNegatedUndesignated", Operator::Conditional, true, false),
    ];
    let biconditional_specs: [(&'static str, Operator, bool, bool); 8] = [
        ("MaterialBiconditionalDesignated", Operator::MaterialBiconditional, false, true),
        ("MaterialBiconditionalNegatedDesignated", Operator::MaterialBiconditional, true, true),
        ("MaterialBiconditionalUndesignated", Operator::MaterialBiconditional, false, false),
        ("MaterialBiconditionalNegatedUndesignated", Operator::MaterialBiconditional, true, false),
        ("BiconditionalDesignated", Operator::Biconditional, false, true),
        ("BiconditionalNegatedDesignated", Operator::Biconditional, true, true),
        ("BiconditionalUndesignated", Operator::Biconditional, false, false),
        ("BiconditionalNegatedUndesignated", Operator::Biconditional, true, false),
    ];
    let mut rules: Vec<Box<dyn Rule>> = Vec::new();
    for (name, op, negated, d) in conditional_specs {
        let build: crate::rules::BuildFn = if negated {
            material_negated_to_disjunction
        } else {
            material_to_disjunction
        };
        rules.push(Box::new(NodeRule::operated(name, op, negated, Some(d), 1, build)));
    }
    for (name, op, negated, d) in biconditional_specs {
        let build: crate::rules::BuildFn = if negated {
            bicond_negated_to_material_conjunction
        } else {
            bicond_to_material_conjunction
        };
        rules.push(Box::new(NodeRule::operated(name, op, negated, Some(d), 1, build)));
    }
    rules
}

// The infectious gap: a designated compound can also be explained by an
// N operand on either side, hence the three-way branches.
fn three_way_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NodeRule::operated(
            "ConjunctionNegatedDesignated",
            Operator::Conjunction,
            true,
            Some(true),
            3,
            |ctx| smallvec![
                vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs().negate(), true)],
                vec![ctx.d(ctx.lhs().negate(), true), ctx.d(ctx.rhs(), true)],
                vec![ctx.d(ctx.lhs().negate(), true), ctx.d(ctx.rhs().negate(), true)],
            ],
        )),
        Box::new(NodeRule::operated(
            "ConjunctionNegatedUndesignated",
            Operator::Conjunction,
            true,
            Some(false),
            3,
            |ctx| smallvec![
                vec![ctx.d(ctx.lhs(), false), ctx.d(ctx.lhs().negate(), false)],
                vec![ctx.d(ctx.rhs(), false), ctx.d(ctx.rhs().negate(), false)],
                vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs(), true)],
            ],
        )),
        Box::new(NodeRule::operated(
            "DisjunctionDesignated",
            Operator::Disjunction,
            false,
            Some(true),
            3,
            |ctx| smallvec![
                vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs().negate(), true)],
                vec![ctx.d(ctx.lhs().negate(), true), ctx.d(ctx.rhs(), true)],
                vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs(), true)],
            ],
        )),
        Box::new(NodeRule::operated(
            "DisjunctionUndesignated",
            Operator::Disjunction,
            false,
            Some(false),
            3,
            |ctx| smallvec![
                vec![ctx.d(ctx.lhs(), false), ctx.d(ctx.lhs().negate(), false)],
                vec![ctx.d(ctx.rhs(), false), ctx.d(ctx.rhs().negate(), false)],
                vec![ctx.d(ctx.lhs().negate(), true), ctx.d(ctx.rhs().negate(), true)],
            ],
        )),
        Box::new(NodeRule::operated(
            "DisjunctionNegatedUndesignated",
            Operator::Disjunction,
            true,
            Some(false),
            3,
            |ctx| smallvec![
                vec![ctx.d(ctx.s.clone(), true)],
                vec![ctx.d(ctx.lhs(), false), ctx.d(ctx.lhs().negate(), false)],
                vec![ctx.d(ctx.rhs(), false), ctx.d(ctx.rhs().negate(), false)],
            ],
        )),
    ]
}

fn nonbranching_group() -> Vec<Box<dyn Rule>> {
    let mut rules = fde::assertion_rules();
    rules.extend(fde::double_negation_rules());
    rules.extend(fde::conjunction_nonbranching().into_iter().filter(|r| r.name() == "ConjunctionDesignated"));
    rules.extend(fde::disjunction_nonbranching().into_iter().filter(|r| r.name() == "DisjunctionNegatedDesignated"));
    rules.extend(reduction_rules());
    rules.extend(fde::quantifier_negated_rules());
    rules
}

fn branching_group() -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = fde::conjunction_branching()
        .into_iter()
        .filter(|r| r.name() == "ConjunctionUndesignated")
        .collect();
    rules.extend(three_way_rules());
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
    match (op, negated, designated) {
        (Operator::Conjunction, true, _) => 2,
        (Operator::Conjunction, false, Some(false)) => 1,
        (Operator::Disjunction, false, _) => 2,
        (Operator::Disjunction, true, Some(false)) => 2,
        (Operator::Disjunction, true, Some(true)) => 0,
        (
            Operator::MaterialConditional
            | Operator::MaterialBiconditional
            | Operator::Conditional
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

/// The K3W logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "K3W",
        title: "Weak Kleene 3-valued logic",
        category: "Many-valued",
        description: "Three-valued logic with an infectious gap",
        tags: &["many-valued", "gappy", "non-modal", "first-order"],
        category_order: 60,
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
    fn test_gap_is_infectious() {
        assert_eq!(truth(Operator::Disjunction, Value::T, Some(Value::N)), Value::N);
        assert_eq!(truth(Operator::Conjunction, Value::N, Some(Value::F)), Value::N);
        assert_eq!(truth(Operator::Negation, Value::N, None), Value::N);
    }
}
