//! First Degree Entailment
//!
//! The four-valued base of the many-valued family. Trunks carry
//! designation markers: premises designated, the conclusion (unnegated)
//! undesignated. The operator rules here are shared by every logic in the
//! family; relatives swap in their own conditional/biconditional rules
//! and closure sets.

use lexicon::{Argument, Operator, Quantifier, Sentence};
use smallvec::smallvec;
use tableaux::rule::Adds;
use tableaux::{
    CounterModel, Logic, Meta, NodeProps, Rule, RuleSet, TabWriter, TableauOptions,
};

use crate::model::Model;
use crate::rules::closure::DesignationClosure;
use crate::rules::quantifier::{negated_quantifier_adds, AllConstantsRule, FreshConstantRule};
use crate::rules::{BuildCtx, NodeRule};
use crate::semantics::{fde_truth, Semantics, Value};

/// The FDE semantic profile.
pub static SEMANTICS: Semantics = Semantics {
    name: "FDE",
    values: &[Value::F, Value::N, Value::B, Value::T],
    designated: &[Value::B, Value::T],
    truth_fn: fde_truth,
    modal: false,
    quantified: true,
    access_reflexive: false,
    access_serial: false,
    access_transitive: false,
    access_symmetric: false,
};

pub(crate) fn build_trunk(w: &mut TabWriter<'_>, argument: &Argument) {
    let b = w.branch();
    for premise in argument.premises() {
        w.append(b, NodeProps::designated(premise.clone(), true));
    }
    w.append(b, NodeProps::designated(argument.conclusion().clone(), false));
}

fn build_model(
    branch: &tableaux::Branch,
    argument: Option<&Argument>,
    id: usize,
) -> Box<dyn CounterModel> {
    Box::new(Model::read_branch(&SEMANTICS, branch, argument, id))
}

// Adds-builders shared across the family. Designations are explicit; the
// shape filters guarantee the operand accessors.

fn conjunction_designated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs(), true)]]
}

fn conjunction_negated_designated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![
        vec![ctx.d(ctx.lhs().negate(), true)],
        vec![ctx.d(ctx.rhs().negate(), true)],
    ]
}

fn conjunction_undesignated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.d(ctx.lhs(), false)], vec![ctx.d(ctx.rhs(), false)]]
}

fn conjunction_negated_undesignated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![
        ctx.d(ctx.lhs().negate(), false),
        ctx.d(ctx.rhs().negate(), false),
    ]]
}

fn disjunction_designated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.d(ctx.lhs(), true)], vec![ctx.d(ctx.rhs(), true)]]
}

fn disjunction_negated_designated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![
        ctx.d(ctx.lhs().negate(), true),
        ctx.d(ctx.rhs().negate(), true),
    ]]
}

fn disjunction_undesignated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.d(ctx.lhs(), false), ctx.d(ctx.rhs(), false)]]
}

fn disjunction_negated_undesignated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![
        vec![ctx.d(ctx.lhs().negate(), false)],
        vec![ctx.d(ctx.rhs().negate(), false)],
    ]
}

fn material_designated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![
        vec![ctx.d(ctx.lhs().negate(), true)],
        vec![ctx.d(ctx.rhs(), true)],
    ]
}

fn material_negated_designated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs().negate(), true)]]
}

fn material_undesignated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![
        ctx.d(ctx.lhs().negate(), false),
        ctx.d(ctx.rhs(), false),
    ]]
}

fn material_negated_undesignated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![
        vec![ctx.d(ctx.lhs(), false)],
        vec![ctx.d(ctx.rhs().negate(), false)],
    ]
}

fn material_bicond_designated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![
        vec![
            ctx.d(ctx.lhs().negate(), true),
            ctx.d(ctx.rhs().negate(), true),
        ],
        vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs(), true)],
    ]
}

fn material_bicond_negated_designated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![
        vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs().negate(), true)],
        vec![ctx.d(ctx.lhs().negate(), true), ctx.d(ctx.rhs(), true)],
    ]
}

fn material_bicond_undesignated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![
        vec![ctx.d(ctx.lhs().negate(), false), ctx.d(ctx.rhs(), false)],
        vec![ctx.d(ctx.rhs().negate(), false), ctx.d(ctx.lhs(), false)],
    ]
}

fn material_bicond_negated_undesignated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![
        vec![ctx.d(ctx.lhs(), false), ctx.d(ctx.rhs().negate(), false)],
        vec![ctx.d(ctx.lhs().negate(), false), ctx.d(ctx.rhs(), false)],
    ]
}

fn double_negation_designated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.d(ctx.operand(), true)]]
}

fn double_negation_undesignated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.d(ctx.operand(), false)]]
}

fn assertion_designated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.d(ctx.operand(), true)]]
}

fn assertion_negated_designated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.d(ctx.operand().negate(), true)]]
}

fn assertion_undesignated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.d(ctx.operand(), false)]]
}

fn assertion_negated_undesignated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.d(ctx.operand().negate(), false)]]
}

fn rule(
    name: &'static str,
    op: Operator,
    negated: bool,
    designated: bool,
    level: usize,
    build: crate::rules::BuildFn,
) -> Box<dyn Rule> {
    Box::new(NodeRule::operated(
        name,
        op,
        negated,
        Some(designated),
        level,
        build,
    ))
}

pub(crate) fn assertion_rules() -> Vec<Box<dyn Rule>> {
    vec![
        rule("AssertionDesignated", Operator::Assertion, false, true, 1, assertion_designated),
        rule("AssertionNegatedDesignated", Operator::Assertion, true, true, 1, assertion_negated_designated),
        rule("AssertionUndesignated", Operator::Assertion, false, false, 1, assertion_undesignated),
        rule("AssertionNegatedUndesignated", Operator::Assertion, true, false, 1, assertion_negated_undesignated),
    ]
}

pub(crate) fn double_negation_rules() -> Vec<Box<dyn Rule>> {
    vec![
        rule("DoubleNegationDesignated", Operator::Negation, true, true, 1, double_negation_designated),
        rule("DoubleNegationUndesignated", Operator::Negation, true, false, 1, double_negation_undesignated),
    ]
}

pub(crate) fn conjunction_nonbranching() -> Vec<Box<dyn Rule>> {
    vec![
        rule("ConjunctionDesignated", Operator::Conjunction, false, true, 1, conjunction_designated),
        rule("ConjunctionNegatedUndesignated", Operator::Conjunction, true, false, 1, conjunction_negated_undesignated),
    ]
}

pub(crate) fn conjunction_branching() -> Vec<Box<dyn Rule>> {
    vec![
        rule("ConjunctionNegatedDesignated", Operator::Conjunction, true, true, 2, conjunction_negated_designated),
        rule("ConjunctionUndesignated", Operator::Conjunction, false, false, 2, conjunction_undesignated),
    ]
}

pub(crate) fn disjunction_nonbranching() -> Vec<Box<dyn Rule>> {
    vec![
        rule("DisjunctionNegatedDesignated", Operator::Disjunction, true, true, 1, disjunction_negated_designated),
        rule("DisjunctionUndesignated", Operator::Disjunction, false, false, 1, disjunction_undesignated),
    ]
}

pub(crate) fn disjunction_branching() -> Vec<Box<dyn Rule>> {
    vec![
        rule("DisjunctionDesignated", Operator::Disjunction, false, true, 2, disjunction_designated),
        rule("DisjunctionNegatedUndesignated", Operator::Disjunction, true, false, 2, disjunction_negated_undesignated),
    ]
}

pub(crate) fn material_nonbranching() -> Vec<Box<dyn Rule>> {
    vec![
        rule("MaterialConditionalNegatedDesignated", Operator::MaterialConditional, true, true, 1, material_negated_designated),
        rule("MaterialConditionalUndesignated", Operator::MaterialConditional, false, false, 1, material_undesignated),
    ]
}

pub(crate) fn material_branching() -> Vec<Box<dyn Rule>> {
    vec![
        rule("MaterialConditionalDesignated", Operator::MaterialConditional, false, true, 2, material_designated),
        rule("MaterialConditionalNegatedUndesignated", Operator::MaterialConditional, true, false, 2, material_negated_undesignated),
        rule("MaterialBiconditionalDesignated", Operator::MaterialBiconditional, false, true, 2, material_bicond_designated),
        rule("MaterialBiconditionalNegatedDesignated", Operator::MaterialBiconditional, true, true, 2, material_bicond_negated_designated),
        rule("MaterialBiconditionalUndesignated", Operator::MaterialBiconditional, false, false, 2, material_bicond_undesignated),
        rule("MaterialBiconditionalNegatedUndesignated", Operator::MaterialBiconditional, true, false, 2, material_bicond_negated_undesignated),
    ]
}

// In FDE the conditional operators collapse to the material ones.
pub(crate) fn conditional_nonbranching() -> Vec<Box<dyn Rule>> {
    vec![
        rule("ConditionalNegatedDesignated", Operator::Conditional, true, true, 1, material_negated_designated),
        rule("ConditionalUndesignated", Operator::Conditional, false, false, 1, material_undesignated),
    ]
}

pub(crate) fn conditional_branching() -> Vec<Box<dyn Rule>> {
    vec![
        rule("ConditionalDesignated", Operator::Conditional, false, true, 2, material_designated),
        rule("ConditionalNegatedUndesignated", Operator::Conditional, true, false, 2, material_negated_undesignated),
        rule("BiconditionalDesignated", Operator::Biconditional, false, true, 2, material_bicond_designated),
        rule("BiconditionalNegatedDesignated", Operator::Biconditional, true, true, 2, material_bicond_negated_designated),
        rule("BiconditionalUndesignated", Operator::Biconditional, false, false, 2, material_bicond_undesignated),
        rule("BiconditionalNegatedUndesignated", Operator::Biconditional, true, false, 2, material_bicond_negated_undesignated),
    ]
}

pub(crate) fn quantifier_negated_rules() -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = Vec::new();
    for (name, q, d) in [
        ("ExistentialNegatedDesignated", Quantifier::Existential, true),
        ("ExistentialNegatedUndesignated", Quantifier::Existential, false),
        ("UniversalNegatedDesignated", Quantifier::Universal, true),
        ("UniversalNegatedUndesignated", Quantifier::Universal, false),
    ] {
        rules.push(Box::new(NodeRule::quantified(
            name,
            q,
            true,
            Some(d),
            negated_quantifier_adds,
        )));
    }
    rules
}

pub(crate) fn quantifier_fresh_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(FreshConstantRule::new(
            "ExistentialDesignated",
            Quantifier::Existential,
            Some(true),
        )),
        Box::new(FreshConstantRule::new(
            "UniversalUndesignated",
            Quantifier::Universal,
            Some(false),
        )),
    ]
}

pub(crate) fn quantifier_all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(AllConstantsRule::new(
            "UniversalDesignated",
            Quantifier::Universal,
            Some(true),
        )),
        Box::new(AllConstantsRule::new(
            "ExistentialUndesignated",
            Quantifier::Existential,
            Some(false),
        )),
    ]
}

pub(crate) fn nonbranching_group() -> Vec<Box<dyn Rule>> {
    let mut rules = assertion_rules();
    rules.extend(double_negation_rules());
    rules.extend(conjunction_nonbranching());
    rules.extend(disjunction_nonbranching());
    rules.extend(material_nonbranching());
    rules.extend(conditional_nonbranching());
    rules.extend(quantifier_negated_rules());
    rules
}

pub(crate) fn branching_group() -> Vec<Box<dyn Rule>> {
    let mut rules = conjunction_branching();
    rules.extend(disjunction_branching());
    rules.extend(material_branching());
    rules.extend(conditional_branching());
    rules
}

fn add_rules(rules: &mut RuleSet, opts: &TableauOptions) {
    let r = opts.is_rank_optim;
    rules
        .add_closure_rule(Box::new(DesignationClosure), r)
        .expect("rule registry unlocked");
    rules.add_group(nonbranching_group(), r).expect("rule registry unlocked");
    rules.add_group(branching_group(), r).expect("rule registry unlocked");
    rules.add_group(quantifier_fresh_rules(), r).expect("rule registry unlocked");
    rules.add_group(quantifier_all_rules(), r).expect("rule registry unlocked");
}

/// Added-branch forecast for the family's shared operator rules.
pub(crate) fn fde_branchable(op: Operator, negated: bool, designated: Option<bool>) -> u32 {
    let d = designated.unwrap_or(true);
    match (op, negated, d) {
        (Operator::Conjunction, true, true) => 1,
        (Operator::Conjunction, false, false) => 1,
        (Operator::Disjunction, false, true) => 1,
        (Operator::Disjunction, true, false) => 1,
        (Operator::MaterialConditional | Operator::Conditional, false, true) => 1,
        (Operator::MaterialConditional | Operator::Conditional, true, false) => 1,
        (Operator::MaterialBiconditional | Operator::Biconditional, _, _) => 1,
        _ => 0,
    }
}

/// Walk a node's operator chain with negation tracking, summing the
/// per-shape added-branch forecast.
pub(crate) fn complexity_with(
    table: fn(Operator, bool, Option<bool>) -> u32,
    props: &NodeProps,
) -> u32 {
    let Some(sentence) = &props.sentence else {
        return 0;
    };
    let mut negated = false;
    let mut total = 0;
    for op in sentence.operators() {
        if op == Operator::Negation && !negated {
            negated = true;
            continue;
        }
        total += table(op, negated, props.designated);
        negated = false;
    }
    total
}

fn branching_complexity(props: &NodeProps) -> u32 {
    complexity_with(fde_branchable, props)
}

/// The FDE logic bundle.
pub static LOGIC: Logic = Logic {
    meta: Meta {
        name: "FDE",
        title: "First Degree Entailment",
        category: "Many-valued",
        description: "Four-valued logic of gaps and gluts",
        tags: &["many-valued", "gappy", "glutty", "non-modal", "first-order"],
        category_order: 10,
    },
    build_trunk,
    add_rules,
    branching_complexity,
    build_model,
};

// Reductions shared with the Lukasiewicz-style relatives: a biconditional
// becomes a conjunction of conditionals, preserving negation and marker.
pub(crate) fn bicond_to_conjunction(ctx: &BuildCtx<'_>, designated: bool, negated: bool) -> Adds {
    let fwd = Sentence::operated(Operator::Conditional, [ctx.lhs(), ctx.rhs()])
        .expect("binary operands");
    let back = Sentence::operated(Operator::Conditional, [ctx.rhs(), ctx.lhs()])
        .expect("binary operands");
    let conj = fwd.conjoin(&back);
    let s = if negated { conj.negate() } else { conj };
    smallvec![vec![ctx.d(s, designated)]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trunk_marks_designation() {
        use notation::Parser;
        let arg = Parser::polish().argument("a", &["Aab", "Nb"], None).unwrap();
        let mut tab = tableaux::Tableau::new(TableauOptions::default());
        tab.set_logic(&LOGIC).unwrap();
        tab.set_argument(arg).unwrap();
        let trunk = &tab.branches()[0];
        assert_eq!(trunk.len(), 3);
        assert_eq!(trunk.nodes()[0].designated(), Some(true));
        assert_eq!(trunk.nodes()[2].designated(), Some(false));
    }

    #[test]
    fn test_branching_complexity_counts_shapes() {
        use notation::Parser;
        let mut p = Parser::polish();
        // A disjunction designated branches; its negation does not.
        let s = p.parse("Aab").unwrap();
        assert_eq!(branching_complexity(&NodeProps::designated(s.clone(), true)), 1);
        assert_eq!(branching_complexity(&NodeProps::designated(s.negate(), true)), 0);
    }

    #[test]
    fn test_every_rule_example_triggers() {
        for rule in nonbranching_group().into_iter().chain(branching_group()) {
            let mut branch = tableaux::Branch::standalone();
            for props in rule.example_nodes() {
                branch.append_props(props);
            }
            assert!(
                rule.get_targets(&branch).is_some(),
                "{} example does not trigger",
                rule.name()
            );
        }
    }
}
