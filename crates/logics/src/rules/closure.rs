//! Closing rules
//!
//! Each closure rule scans a branch for its contradiction shape and, on
//! application, closes the branch. All of them implement
//! `nodes_will_close_branch` for closure scoring.

use lexicon::{Atomic, Constant, Parameter, Predicate, Sentence};
use tableaux::{Branch, NodeProps, NodeQuery, Rule, TabWriter, Target};

fn example_atomic() -> Sentence {
    Sentence::from(Atomic::new(0, 0).unwrap())
}

fn close_target(branch: &Branch, node: &tableaux::node::NodeRef) -> Vec<Target> {
    vec![Target::on(branch.id()).with_node(node.clone())]
}

/// FDE-style closure: the same sentence appears designated and
/// undesignated.
#[derive(Debug, Default)]
pub struct DesignationClosure;

impl Rule for DesignationClosure {
    fn name(&self) -> &'static str {
        "DesignationClosure"
    }

    fn is_closure(&self) -> bool {
        true
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        for node in branch.nodes() {
            let (Some(s), Some(d)) = (node.sentence(), node.designated()) else {
                continue;
            };
            if branch.has(&NodeQuery::designated(s.clone(), !d), None) {
                return Some(close_target(branch, node));
            }
        }
        None
    }

    fn nodes_will_close_branch(&self, nodes: &[NodeProps], branch: &Branch) -> bool {
        nodes.iter().any(|props| {
            match (&props.sentence, props.designated) {
                (Some(s), Some(d)) => branch.has(&NodeQuery::designated(s.clone(), !d), None),
                _ => false,
            }
        })
    }

    fn apply(&mut self, target: &Target, tab: &mut TabWriter<'_>) {
        tab.close(target.branch);
    }

    fn example_nodes(&self) -> Vec<NodeProps> {
        let s = example_atomic();
        vec![
            NodeProps::designated(s.clone(), true),
            NodeProps::designated(s, false),
        ]
    }
}

/// K3-style closure: a sentence and its negation both designated.
#[derive(Debug, Default)]
pub struct GlutClosure;

impl Rule for GlutClosure {
    fn name(&self) -> &'static str {
        "GlutClosure"
    }

    fn is_closure(&self) -> bool {
        true
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        for node in branch.nodes() {
            let (Some(s), Some(true)) = (node.sentence(), node.designated()) else {
                continue;
            };
            if branch.has(&NodeQuery::designated(s.negative(), true), None) {
                return Some(close_target(branch, node));
            }
        }
        None
    }

    fn nodes_will_close_branch(&self, nodes: &[NodeProps], branch: &Branch) -> bool {
        nodes.iter().any(|props| match (&props.sentence, props.designated) {
            (Some(s), Some(true)) => {
                branch.has(&NodeQuery::designated(s.negative(), true), None)
            }
            _ => false,
        })
    }

    fn apply(&mut self, target: &Target, tab: &mut TabWriter<'_>) {
        tab.close(target.branch);
    }

    fn example_nodes(&self) -> Vec<NodeProps> {
        let s = example_atomic();
        vec![
            NodeProps::designated(s.clone(), true),
            NodeProps::designated(s.negate(), true),
        ]
    }
}

/// LP-style closure: a sentence and its negation both undesignated.
#[derive(Debug, Default)]
pub struct GapClosure;

impl Rule for GapClosure {
    fn name(&self) -> &'static str {
        "GapClosure"
    }

    fn is_closure(&self) -> bool {
        true
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        for node in branch.nodes() {
            let (Some(s), Some(false)) = (node.sentence(), node.designated()) else {
                continue;
            };
            if branch.has(&NodeQuery::designated(s.negative(), false), None) {
                return Some(close_target(branch, node));
            }
        }
        None
    }

    fn nodes_will_close_branch(&self, nodes: &[NodeProps], branch: &Branch) -> bool {
        nodes.iter().any(|props| match (&props.sentence, props.designated) {
            (Some(s), Some(false)) => {
                branch.has(&NodeQuery::designated(s.negative(), false), None)
            }
            _ => false,
        })
    }

    fn apply(&mut self, target: &Target, tab: &mut TabWriter<'_>) {
        tab.close(target.branch);
    }

    fn example_nodes(&self) -> Vec<NodeProps> {
        let s = example_atomic();
        vec![
            NodeProps::designated(s.clone(), false),
            NodeProps::designated(s.negate(), false),
        ]
    }
}

/// Bivalent closure: a sentence and its negation on the branch, at the
/// same world in modal contexts.
#[derive(Debug)]
pub struct ContradictionClosure {
    modal: bool,
}

impl ContradictionClosure {
    /// A closure for marker-free branches.
    pub fn new() -> ContradictionClosure {
        ContradictionClosure { modal: false }
    }

    /// A closure matching sentence and negation within one world.
    pub fn modal() -> ContradictionClosure {
        ContradictionClosure { modal: true }
    }
}

impl Default for ContradictionClosure {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for ContradictionClosure {
    fn name(&self) -> &'static str {
        "ContradictionClosure"
    }

    fn is_closure(&self) -> bool {
        true
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        for node in branch.nodes() {
            let Some(s) = node.sentence() else { continue };
            let query = NodeQuery::maybe_world(s.negative(), node.world());
            if branch.has(&query, None) {
                return Some(close_target(branch, node));
            }
        }
        None
    }

    fn nodes_will_close_branch(&self, nodes: &[NodeProps], branch: &Branch) -> bool {
        nodes.iter().any(|props| match &props.sentence {
            Some(s) => branch.has(&NodeQuery::maybe_world(s.negative(), props.world), None),
            None => false,
        })
    }

    fn apply(&mut self, target: &Target, tab: &mut TabWriter<'_>) {
        tab.close(target.branch);
    }

    fn example_nodes(&self) -> Vec<NodeProps> {
        let s = example_atomic();
        let world = if self.modal { Some(0) } else { None };
        vec![
            NodeProps::maybe_world(s.clone(), world),
            NodeProps::maybe_world(s.negate(), world),
        ]
    }
}

/// Closes on a negated self-identity `not a = a`.
#[derive(Debug)]
pub struct SelfIdentityClosure {
    modal: bool,
}

impl SelfIdentityClosure {
    /// A closure for marker-free branches.
    pub fn new() -> SelfIdentityClosure {
        SelfIdentityClosure { modal: false }
    }

    /// A closure for world-marked branches.
    pub fn modal() -> SelfIdentityClosure {
        SelfIdentityClosure { modal: true }
    }
}

impl Default for SelfIdentityClosure {
    fn default() -> Self {
        Self::new()
    }
}

fn is_negated_self_identity(s: &Sentence) -> bool {
    s.negatum()
        .and_then(Sentence::predication)
        .is_some_and(|p| p.predicate.is_identity() && p.params[0] == p.params[1])
}

impl Rule for SelfIdentityClosure {
    fn name(&self) -> &'static str {
        "SelfIdentityClosure"
    }

    fn is_closure(&self) -> bool {
        true
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        for node in branch.nodes() {
            if node.sentence().is_some_and(is_negated_self_identity) {
                return Some(close_target(branch, node));
            }
        }
        None
    }

    fn nodes_will_close_branch(&self, nodes: &[NodeProps], _branch: &Branch) -> bool {
        nodes
            .iter()
            .any(|p| p.sentence.as_ref().is_some_and(is_negated_self_identity))
    }

    fn apply(&mut self, target: &Target, tab: &mut TabWriter<'_>) {
        tab.close(target.branch);
    }

    fn example_nodes(&self) -> Vec<NodeProps> {
        let c = Constant::new(0, 0).unwrap();
        let s = Sentence::predicated(
            Predicate::identity(),
            [Parameter::from(c), Parameter::from(c)],
        )
        .unwrap();
        vec![NodeProps::maybe_world(
            s.negate(),
            if self.modal { Some(0) } else { None },
        )]
    }
}

/// Closes on a negated existence claim `not E!a`.
#[derive(Debug)]
pub struct NonExistenceClosure {
    modal: bool,
}

impl NonExistenceClosure {
    /// A closure for marker-free branches.
    pub fn new() -> NonExistenceClosure {
        NonExistenceClosure { modal: false }
    }

    /// A closure for world-marked branches.
    pub fn modal() -> NonExistenceClosure {
        NonExistenceClosure { modal: true }
    }
}

impl Default for NonExistenceClosure {
    fn default() -> Self {
        Self::new()
    }
}

fn is_negated_existence(s: &Sentence) -> bool {
    s.negatum()
        .and_then(Sentence::predication)
        .is_some_and(|p| p.predicate.is_existence())
}

impl Rule for NonExistenceClosure {
    fn name(&self) -> &'static str {
        "NonExistenceClosure"
    }

    fn is_closure(&self) -> bool {
        true
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        for node in branch.nodes() {
            if node.sentence().is_some_and(is_negated_existence) {
                return Some(close_target(branch, node));
            }
        }
        None
    }

    fn nodes_will_close_branch(&self, nodes: &[NodeProps], _branch: &Branch) -> bool {
        nodes
            .iter()
            .any(|p| p.sentence.as_ref().is_some_and(is_negated_existence))
    }

    fn apply(&mut self, target: &Target, tab: &mut TabWriter<'_>) {
        tab.close(target.branch);
    }

    fn example_nodes(&self) -> Vec<NodeProps> {
        let c = Constant::new(0, 0).unwrap();
        let s = Sentence::predicated(Predicate::existence(), [Parameter::from(c)]).unwrap();
        vec![NodeProps::maybe_world(
            s.negate(),
            if self.modal { Some(0) } else { None },
        )]
    }
}
