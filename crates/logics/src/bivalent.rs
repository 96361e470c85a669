//! Shared rule parts for the bivalent logics (CPL, CFOL, and the modal
//! family). Nodes carry no designation marker; world markers pass
//! through untouched, so one rule set serves both the propositional and
//! the Kripke systems.

use lexicon::{Argument, Operator, Quantifier};
use smallvec::smallvec;
use tableaux::rule::Adds;
use tableaux::{NodeProps, Rule, TabWriter};

use crate::rules::quantifier::{negated_quantifier_adds, AllConstantsRule, FreshConstantRule};
use crate::rules::{BuildCtx, NodeRule};

pub(crate) fn build_trunk(w: &mut TabWriter<'_>, argument: &Argument) {
    let b = w.branch();
    for premise in argument.premises() {
        w.append(b, NodeProps::sentence(premise.clone()));
    }
    w.append(b, NodeProps::sentence(argument.conclusion().negate()));
}

pub(crate) fn build_trunk_modal(w: &mut TabWriter<'_>, argument: &Argument) {
    let b = w.branch();
    for premise in argument.premises() {
        w.append(b, NodeProps::at_world(premise.clone(), 0));
    }
    w.append(b, NodeProps::at_world(argument.conclusion().negate(), 0));
}

fn conjunction(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.keep(ctx.lhs()), ctx.keep(ctx.rhs())]]
}

fn conjunction_negated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![
        vec![ctx.keep(ctx.lhs().negate())],
        vec![ctx.keep(ctx.rhs().negate())],
    ]
}

fn disjunction(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.keep(ctx.lhs())], vec![ctx.keep(ctx.rhs())]]
}

fn disjunction_negated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![
        ctx.keep(ctx.lhs().negate()),
        ctx.keep(ctx.rhs().negate()),
    ]]
}

fn material(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![
        vec![ctx.keep(ctx.lhs().negate())],
        vec![ctx.keep(ctx.rhs())],
    ]
}

fn material_negated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.keep(ctx.lhs()), ctx.keep(ctx.rhs().negate())]]
}

fn material_bicond(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![
        vec![
            ctx.keep(ctx.lhs().negate()),
            ctx.keep(ctx.rhs().negate()),
        ],
        vec![ctx.keep(ctx.lhs()), ctx.keep(ctx.rhs())],
    ]
}

fn material_bicond_negated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![
        vec![ctx.keep(ctx.lhs()), ctx.keep(ctx.rhs().negate())],
        vec![ctx.keep(ctx.lhs().negate()), ctx.keep(ctx.rhs())],
    ]
}

fn double_negation(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.keep(ctx.operand())]]
}

fn assertion(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.keep(ctx.operand())]]
}

fn assertion_negated(ctx: &BuildCtx<'_>) -> Adds {
    smallvec![vec![ctx.keep(ctx.operand().negate())]]
}

fn possibility_negated(ctx: &BuildCtx<'_>) -> Adds {
    let boxed = lexicon::Sentence::operated(Operator::Necessity, [ctx.operand().negate()])
        .expect("unary operand");
    smallvec![vec![ctx.keep(boxed)]]
}

fn necessity_negated(ctx: &BuildCtx<'_>) -> Adds {
    let diamond = lexicon::Sentence::operated(Operator::Possibility, [ctx.operand().negate()])
        .expect("unary operand");
    smallvec![vec![ctx.keep(diamond)]]
}

fn rule(
    name: &'static str,
    op: Operator,
    negated: bool,
    level: usize,
    modal: bool,
    build: crate::rules::BuildFn,
) -> Box<dyn Rule> {
    let r = NodeRule::operated(name, op, negated, None, level, build);
    Box::new(if modal { r.modal() } else { r })
}

pub(crate) fn nonbranching_group(modal: bool) -> Vec<Box<dyn Rule>> {
    let mut rules = vec![
        rule("Assertion", Operator::Assertion, false, 1, modal, assertion),
        rule("AssertionNegated", Operator::Assertion, true, 1, modal, assertion_negated),
        rule("DoubleNegation", Operator::Negation, true, 1, modal, double_negation),
        rule("Conjunction", Operator::Conjunction, false, 1, modal, conjunction),
        rule("DisjunctionNegated", Operator::Disjunction, true, 1, modal, disjunction_negated),
        rule("MaterialConditionalNegated", Operator::MaterialConditional, true, 1, modal, material_negated),
        rule("ConditionalNegated", Operator::Conditional, true, 1, modal, material_negated),
    ];
    if modal {
        rules.push(rule("PossibilityNegated", Operator::Possibility, true, 1, true, possibility_negated));
        rules.push(rule("NecessityNegated", Operator::Necessity, true, 1, true, necessity_negated));
    }
    rules
}

pub(crate) fn branching_group(modal: bool) -> Vec<Box<dyn Rule>> {
    vec![
        rule("ConjunctionNegated", Operator::Conjunction, true, 2, modal, conjunction_negated),
        rule("Disjunction", Operator::Disjunction, false, 2, modal, disjunction),
        rule("MaterialConditional", Operator::MaterialConditional, false, 2, modal, material),
        rule("MaterialBiconditional", Operator::MaterialBiconditional, false, 2, modal, material_bicond),
        rule("MaterialBiconditionalNegated", Operator::MaterialBiconditional, true, 2, modal, material_bicond_negated),
        rule("Conditional", Operator::Conditional, false, 2, modal, material),
        rule("Biconditional", Operator::Biconditional, false, 2, modal, material_bicond),
        rule("BiconditionalNegated", Operator::Biconditional, true, 2, modal, material_bicond_negated),
    ]
}

pub(crate) fn quantifier_negated_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NodeRule::quantified(
            "ExistentialNegated",
            Quantifier::Existential,
            true,
            None,
            negated_quantifier_adds,
        )),
        Box::new(NodeRule::quantified(
            "UniversalNegated",
            Quantifier::Universal,
            true,
            None,
            negated_quantifier_adds,
        )),
    ]
}

pub(crate) fn existential_group(modal: bool) -> Vec<Box<dyn Rule>> {
    let r = FreshConstantRule::new("Existential", Quantifier::Existential, None);
    vec![Box::new(if modal { r.modal() } else { r })]
}

pub(crate) fn universal_group(modal: bool) -> Vec<Box<dyn Rule>> {
    let r = AllConstantsRule::new("Universal", Quantifier::Universal, None);
    vec![Box::new(if modal { r.modal() } else { r })]
}

/// Added-branch forecast for the bivalent operator rules.
pub(crate) fn branchable(op: Operator, negated: bool, _designated: Option<bool>) -> u32 {
    match (op, negated) {
        (Operator::Conjunction, true) => 1,
        (Operator::Disjunction, false) => 1,
        (Operator::MaterialConditional | Operator::Conditional, false) => 1,
        (Operator::MaterialBiconditional | Operator::Biconditional, _) => 1,
        _ => 0,
    }
}
