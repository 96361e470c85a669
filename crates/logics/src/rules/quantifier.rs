//! Quantifier rules
//!
//! Two families: fresh-constant rules tick their node after instantiating
//! a constant new to the branch; all-constants rules never tick and keep
//! instantiating until every branch constant has been applied, under the
//! MaxConstants projection with a quit flag when the budget runs out.

use lexicon::{Parameter, Quantifier, Sentence};
use smallvec::smallvec;
use tableaux::helpers::{MaxConstants, NodeAppliedConstants, QuitFlag};
use tableaux::node::NodeRef;
use tableaux::{Branch, BranchId, NodeProps, Rule, Target, World};

use super::{example_sentence, NodeFilter};

fn instance(inner: &Sentence, c: lexicon::Constant) -> Sentence {
    let q = inner.quantification().expect("quantified sentence");
    q.sentence
        .substitute(Parameter::Constant(c), Parameter::Variable(q.variable))
}

fn marked(s: Sentence, designation: Option<bool>, world: Option<World>) -> NodeProps {
    NodeProps {
        sentence: Some(s),
        designated: designation,
        world,
        ..NodeProps::default()
    }
}

/// Instantiates a quantified node with a constant new to the branch, then
/// ticks it.
pub struct FreshConstantRule {
    name: &'static str,
    filter: NodeFilter,
    modal_context: bool,
    max_constants: MaxConstants,
    quit: QuitFlag,
}

impl FreshConstantRule {
    /// A fresh-constant rule for the quantifier and designation.
    pub fn new(
        name: &'static str,
        quantifier: Quantifier,
        designation: Option<bool>,
    ) -> FreshConstantRule {
        FreshConstantRule {
            name,
            filter: NodeFilter {
                operator: None,
                quantifier: Some(quantifier),
                negated: false,
                designation,
            },
            modal_context: false,
            max_constants: MaxConstants::default(),
            quit: QuitFlag::default(),
        }
    }

    /// Mark the rule as operating on world-marked nodes.
    pub fn modal(mut self) -> FreshConstantRule {
        self.modal_context = true;
        self
    }
}

impl Rule for FreshConstantRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        for node in branch.unticked() {
            let Some(sentence) = node.sentence() else { continue };
            let Some(inner) = self.filter.matches(sentence, node.designated()) else {
                continue;
            };
            if self.max_constants.exceeded(branch, node.world()) {
                if self.quit.has_flagged(branch.id()) {
                    continue;
                }
                let flag = self.max_constants.quit_flag(self.name, branch);
                let target = Target::on(branch.id())
                    .with_adds(smallvec![vec![flag]])
                    .flagging();
                return Some(vec![target]);
            }
            let c = branch.new_constant();
            let result = instance(inner, c);
            let props = marked(result.clone(), node.designated(), node.world());
            let mut target = Target::on(branch.id())
                .with_node(node.clone())
                .with_adds(smallvec![vec![props]]);
            target.sentence = Some(result);
            target.constant = Some(c);
            return Some(vec![target]);
        }
        None
    }

    fn example_nodes(&self) -> Vec<NodeProps> {
        vec![marked(
            example_sentence(&self.filter),
            self.filter.designation,
            if self.modal_context { Some(0) } else { None },
        )]
    }

    fn after_trunk_build(&mut self, branches: &[Branch]) {
        self.max_constants.on_trunk_build(branches);
    }

    fn after_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        self.quit.on_branch_add(branch, parent);
        self.max_constants.on_branch_add(branch, parent);
    }

    fn after_node_add(&mut self, node: &NodeRef, branch: &Branch) {
        self.max_constants.on_node_add(node, branch);
    }

    fn after_apply(&mut self, target: &Target) {
        self.quit.on_apply(target);
    }
}

/// Instantiates a quantified node with every constant on the branch (a
/// fresh one when there are none), never ticking the node.
pub struct AllConstantsRule {
    name: &'static str,
    filter: NodeFilter,
    modal_context: bool,
    max_constants: MaxConstants,
    applied: NodeAppliedConstants,
    quit: QuitFlag,
}

impl AllConstantsRule {
    /// An all-constants rule for the quantifier and designation.
    pub fn new(
        name: &'static str,
        quantifier: Quantifier,
        designation: Option<bool>,
    ) -> AllConstantsRule {
        AllConstantsRule {
            name,
            filter: NodeFilter {
                operator: None,
                quantifier: Some(quantifier),
                negated: false,
                designation,
            },
            modal_context: false,
            max_constants: MaxConstants::default(),
            applied: NodeAppliedConstants::default(),
            quit: QuitFlag::default(),
        }
    }

    /// Mark the rule as operating on world-marked nodes.
    pub fn modal(mut self) -> AllConstantsRule {
        self.modal_context = true;
        self
    }

    fn matches_node(&self, node: &NodeRef) -> bool {
        node.sentence()
            .and_then(|s| self.filter.matches(s, node.designated()))
            .is_some()
    }
}

impl Rule for AllConstantsRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        let mut targets = Vec::new();
        for node in branch.unticked() {
            let Some(sentence) = node.sentence() else { continue };
            let Some(inner) = self.filter.matches(sentence, node.designated()) else {
                continue;
            };
            if self.max_constants.exceeded(branch, node.world()) {
                if !self.quit.has_flagged(branch.id()) {
                    let flag = self.max_constants.quit_flag(self.name, branch);
                    targets.push(
                        Target::on(branch.id())
                            .with_adds(smallvec![vec![flag]])
                            .flagging(),
                    );
                }
                continue;
            }
            let (constants, is_new) = if branch.constants().is_empty() {
                (vec![branch.new_constant()], true)
            } else {
                (self.applied.unapplied(node.id(), branch.id()), false)
            };
            for c in constants {
                let result = instance(inner, c);
                let props = marked(result.clone(), node.designated(), node.world());
                if !is_new && branch.has(&query_for(&props), None) {
                    continue;
                }
                let mut target = Target::on(branch.id())
                    .with_node(node.clone())
                    .with_adds(smallvec![vec![props]])
                    .without_tick();
                target.sentence = Some(result);
                target.constant = Some(c);
                targets.push(target);
            }
        }
        if targets.is_empty() {
            None
        } else {
            Some(targets)
        }
    }

    fn example_nodes(&self) -> Vec<NodeProps> {
        vec![marked(
            example_sentence(&self.filter),
            self.filter.designation,
            if self.modal_context { Some(0) } else { None },
        )]
    }

    fn after_trunk_build(&mut self, branches: &[Branch]) {
        self.max_constants.on_trunk_build(branches);
    }

    fn after_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        self.quit.on_branch_add(branch, parent);
        self.max_constants.on_branch_add(branch, parent);
        self.applied.on_branch_add(branch, parent);
    }

    fn after_node_add(&mut self, node: &NodeRef, branch: &Branch) {
        self.max_constants.on_node_add(node, branch);
        let track = self.matches_node(node);
        self.applied.on_node_add(node, branch, track);
    }

    fn after_apply(&mut self, target: &Target) {
        self.quit.on_apply(target);
        self.applied.on_apply(target);
    }
}

fn query_for(props: &NodeProps) -> tableaux::NodeQuery {
    tableaux::NodeQuery {
        sentence: props.sentence.clone(),
        designated: props.designated,
        world: props.world,
        world1: None,
        world2: None,
    }
}

/// The negated-quantifier reduction: from a negated quantified node,
/// produce the dual quantifier over the negated body, preserving markers.
pub fn negated_quantifier_adds(ctx: &super::BuildCtx<'_>) -> tableaux::rule::Adds {
    let flipped = ctx.s.quantifier_dual().expect("quantified sentence");
    smallvec![vec![ctx.keep(flipped)]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexicon::{Predicate, Variable};

    fn universal(designated: bool) -> NodeProps {
        let v = Variable::new(0, 0).unwrap();
        let p = Predicate::new(0, 0, 1, None).unwrap();
        let body = Sentence::predicated(p, [Parameter::from(v)]).unwrap();
        let s = Sentence::quantified(Quantifier::Universal, v, body).unwrap();
        NodeProps::designated(s, designated)
    }

    #[test]
    fn test_fresh_constant_rule_targets_first_match() {
        let mut branch = Branch::standalone();
        let node = branch.append_props(universal(false));
        let rule = FreshConstantRule::new("UniversalUndesignated", Quantifier::Universal, Some(false));
        let targets = rule.get_targets(&branch).unwrap();
        assert_eq!(targets.len(), 1);
        assert!(targets[0].constant.is_some());
        assert!(targets[0].ticks);
        assert_eq!(targets[0].node.as_ref().unwrap().id(), node.id());
    }

    #[test]
    fn test_all_constants_rule_does_not_tick() {
        let mut branch = Branch::standalone();
        branch.append_props(universal(true));
        let mut rule = AllConstantsRule::new("UniversalDesignated", Quantifier::Universal, Some(true));
        rule.after_branch_add(&branch, None);
        let targets = rule.get_targets(&branch).unwrap();
        assert!(targets.iter().all(|t| !t.ticks));
    }
}
