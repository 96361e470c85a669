//! Modal operator and access rules
//!
//! Possibility creates a fresh world under the MaxWorlds projection;
//! Necessity fans an operand out to every reachable world; the access
//! rules (Reflexive, Transitive, Symmetric, Serial) saturate the access
//! relation per frame property.

use lexicon::Operator;
use smallvec::smallvec;
use tableaux::helpers::{
    AppliedNodesWorlds, AppliedSentenceCounter, MaxWorlds, QuitFlag, UnserialWorlds, VisibleWorlds,
};
use tableaux::node::NodeRef;
use tableaux::{Branch, BranchId, NodeProps, NodeQuery, Rule, Target};

use super::{example_sentence, NodeFilter};

/// From an unticked possibility node at world `w`, add its operand at a
/// fresh world `w'` together with the access node `w R w'`, then tick.
/// Emits a quit flag when the world projection is exhausted.
pub struct Possibility {
    max_worlds: MaxWorlds,
    quit: QuitFlag,
    counter: AppliedSentenceCounter,
}

impl Possibility {
    /// A possibility rule.
    pub fn new() -> Possibility {
        Possibility {
            max_worlds: MaxWorlds::default(),
            quit: QuitFlag::default(),
            counter: AppliedSentenceCounter::default(),
        }
    }
}

impl Default for Possibility {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Possibility {
    fn name(&self) -> &'static str {
        "Possibility"
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        let mut targets = Vec::new();
        for node in branch.unticked() {
            let Some(sentence) = node.sentence() else { continue };
            if sentence.operator() != Some(Operator::Possibility) {
                continue;
            }
            if self.max_worlds.reached(branch) {
                if !self.quit.has_flagged(branch.id()) {
                    let flag = self.max_worlds.quit_flag(self.name(), branch);
                    targets.push(
                        Target::on(branch.id())
                            .with_adds(smallvec![vec![flag]])
                            .flagging(),
                    );
                }
                continue;
            }
            let operand = sentence.operand().cloned().expect("unary sentence");
            let w1 = node.world().unwrap_or(0);
            let w2 = branch.new_world();
            let mut target = Target::on(branch.id()).with_node(node.clone()).with_adds(
                smallvec![vec![
                    NodeProps::at_world(operand.clone(), w2),
                    NodeProps::access(w1, w2),
                ]],
            );
            target.sentence = Some(operand);
            target.world = Some(w2);
            target.world_pair = Some((w1, w2));
            targets.push(target);
        }
        if targets.is_empty() {
            None
        } else {
            Some(targets)
        }
    }

    // Round-robin across distinct possibility sentences.
    fn score_candidate(&self, target: &Target) -> f64 {
        match &target.sentence {
            Some(s) => -(self.counter.count(s, target.branch) as f64),
            None => 0.0,
        }
    }

    fn example_nodes(&self) -> Vec<NodeProps> {
        let filter = NodeFilter {
            operator: Some(Operator::Possibility),
            ..NodeFilter::default()
        };
        vec![NodeProps::at_world(example_sentence(&filter), 0)]
    }

    fn after_trunk_build(&mut self, branches: &[Branch]) {
        self.max_worlds.on_trunk_build(branches);
    }

    fn after_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        self.quit.on_branch_add(branch, parent);
        self.counter.on_branch_add(branch, parent);
    }

    fn after_apply(&mut self, target: &Target) {
        self.quit.on_apply(target);
        self.counter.on_apply(target);
    }
}

/// From an unticked necessity node at world `w`, add its operand at every
/// world reachable from `w` where it is missing. Never ticks.
pub struct Necessity {
    applied: AppliedNodesWorlds,
}

impl Necessity {
    /// A necessity rule.
    pub fn new() -> Necessity {
        Necessity {
            applied: AppliedNodesWorlds::default(),
        }
    }
}

impl Default for Necessity {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Necessity {
    fn name(&self) -> &'static str {
        "Necessity"
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        let mut targets = Vec::new();
        for node in branch.unticked() {
            let Some(sentence) = node.sentence() else { continue };
            if sentence.operator() != Some(Operator::Necessity) {
                continue;
            }
            let operand = sentence.operand().cloned().expect("unary sentence");
            let w1 = node.world().unwrap_or(0);
            for &w2 in branch.worlds() {
                if !branch.has_access(w1, w2) {
                    continue;
                }
                if self.applied.is_applied(node.id(), w2, branch.id()) {
                    continue;
                }
                if branch.has(&NodeQuery::at_world(operand.clone(), w2), None) {
                    continue;
                }
                let mut target = Target::on(branch.id())
                    .with_node(node.clone())
                    .with_adds(smallvec![vec![NodeProps::at_world(operand.clone(), w2)]])
                    .without_tick();
                target.sentence = Some(operand.clone());
                target.world = Some(w2);
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
        let filter = NodeFilter {
            operator: Some(Operator::Necessity),
            ..NodeFilter::default()
        };
        vec![
            NodeProps::at_world(example_sentence(&filter), 0),
            NodeProps::access(0, 1),
        ]
    }

    fn after_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        self.applied.on_branch_add(branch, parent);
    }

    fn after_apply(&mut self, target: &Target) {
        self.applied.on_apply(target);
    }
}

/// Adds `w R w` for any world lacking it.
#[derive(Debug, Default)]
pub struct Reflexive;

impl Rule for Reflexive {
    fn name(&self) -> &'static str {
        "Reflexive"
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        let mut targets = Vec::new();
        for &w in branch.worlds() {
            if branch.has_access(w, w) {
                continue;
            }
            let mut target =
                Target::on(branch.id()).with_adds(smallvec![vec![NodeProps::access(w, w)]]);
            target.world = Some(w);
            target.world_pair = Some((w, w));
            targets.push(target);
        }
        if targets.is_empty() {
            None
        } else {
            Some(targets)
        }
    }

    fn example_nodes(&self) -> Vec<NodeProps> {
        let s = example_sentence(&NodeFilter::default());
        vec![NodeProps::at_world(s, 0)]
    }
}

/// Adds `w1 R w3` wherever `w1 R w2` and `w2 R w3` hold without it.
pub struct Transitive {
    visible: VisibleWorlds,
}

impl Transitive {
    /// A transitive access rule.
    pub fn new() -> Transitive {
        Transitive {
            visible: VisibleWorlds::default(),
        }
    }
}

impl Default for Transitive {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Transitive {
    fn name(&self) -> &'static str {
        "Transitive"
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        let mut targets = Vec::new();
        for &w1 in branch.worlds() {
            for w2 in self.visible.visibles(branch.id(), w1) {
                for w3 in self.visible.intransitives(branch.id(), w1, w2) {
                    let mut target = Target::on(branch.id())
                        .with_adds(smallvec![vec![NodeProps::access(w1, w3)]]);
                    target.world_pair = Some((w1, w3));
                    targets.push(target);
                }
            }
        }
        if targets.is_empty() {
            None
        } else {
            Some(targets)
        }
    }

    fn example_nodes(&self) -> Vec<NodeProps> {
        vec![NodeProps::access(0, 1), NodeProps::access(1, 2)]
    }

    fn after_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        self.visible.on_branch_add(branch, parent);
    }

    fn after_node_add(&mut self, node: &NodeRef, branch: &Branch) {
        self.visible.on_node_add(node, branch);
    }
}

/// Adds `w2 R w1` wherever `w1 R w2` holds without it.
pub struct Symmetric {
    visible: VisibleWorlds,
}

impl Symmetric {
    /// A symmetric access rule.
    pub fn new() -> Symmetric {
        Symmetric {
            visible: VisibleWorlds::default(),
        }
    }
}

impl Default for Symmetric {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Symmetric {
    fn name(&self) -> &'static str {
        "Symmetric"
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        let mut targets = Vec::new();
        for &w1 in branch.worlds() {
            for w2 in self.visible.visibles(branch.id(), w1) {
                if branch.has_access(w2, w1) {
                    continue;
                }
                let mut target = Target::on(branch.id())
                    .with_adds(smallvec![vec![NodeProps::access(w2, w1)]]);
                target.world_pair = Some((w2, w1));
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
        vec![NodeProps::access(0, 1)]
    }

    fn after_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        self.visible.on_branch_add(branch, parent);
    }

    fn after_node_add(&mut self, node: &NodeRef, branch: &Branch) {
        self.visible.on_node_add(node, branch);
    }
}

/// Gives every unserial world an outgoing edge to a fresh world, under
/// the MaxWorlds projection with a quit flag.
pub struct Serial {
    unserial: UnserialWorlds,
    max_worlds: MaxWorlds,
    quit: QuitFlag,
}

impl Serial {
    /// A serial access rule.
    pub fn new() -> Serial {
        Serial {
            unserial: UnserialWorlds::default(),
            max_worlds: MaxWorlds::default(),
            quit: QuitFlag::default(),
        }
    }
}

impl Default for Serial {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Serial {
    fn name(&self) -> &'static str {
        "Serial"
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        let unserial = self.unserial.unserial(branch.id());
        if unserial.is_empty() {
            return None;
        }
        if self.max_worlds.reached(branch) {
            if self.quit.has_flagged(branch.id()) {
                return None;
            }
            let flag = self.max_worlds.quit_flag(self.name(), branch);
            return Some(vec![Target::on(branch.id())
                .with_adds(smallvec![vec![flag]])
                .flagging()]);
        }
        let w1 = unserial[0];
        let w2 = branch.new_world();
        let mut target =
            Target::on(branch.id()).with_adds(smallvec![vec![NodeProps::access(w1, w2)]]);
        target.world = Some(w1);
        target.world_pair = Some((w1, w2));
        Some(vec![target])
    }

    fn example_nodes(&self) -> Vec<NodeProps> {
        let s = example_sentence(&NodeFilter::default());
        vec![NodeProps::at_world(s, 0)]
    }

    fn after_trunk_build(&mut self, branches: &[Branch]) {
        self.max_worlds.on_trunk_build(branches);
    }

    fn after_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        self.unserial.on_branch_add(branch, parent);
        self.quit.on_branch_add(branch, parent);
    }

    fn after_node_add(&mut self, node: &NodeRef, branch: &Branch) {
        self.unserial.on_node_add(node, branch);
    }

    fn after_apply(&mut self, target: &Target) {
        self.quit.on_apply(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexicon::{Atomic, Sentence};

    #[test]
    fn test_possibility_target_creates_new_world() {
        let mut branch = Branch::standalone();
        let s = Sentence::operated(
            Operator::Possibility,
            [Sentence::from(Atomic::new(0, 0).unwrap())],
        )
        .unwrap();
        branch.append_props(NodeProps::at_world(s, 0));
        let rule = Possibility::new();
        let targets = rule.get_targets(&branch).unwrap();
        assert_eq!(targets[0].world, Some(1));
        assert_eq!(targets[0].world_pair, Some((0, 1)));
        assert_eq!(targets[0].adds[0].len(), 2);
    }

    #[test]
    fn test_necessity_requires_access() {
        let mut branch = Branch::standalone();
        let s = Sentence::operated(
            Operator::Necessity,
            [Sentence::from(Atomic::new(0, 0).unwrap())],
        )
        .unwrap();
        branch.append_props(NodeProps::at_world(s, 0));
        let mut rule = Necessity::new();
        rule.after_branch_add(&branch, None);
        assert!(rule.get_targets(&branch).is_none());
        branch.append_props(NodeProps::access(0, 1));
        let targets = rule.get_targets(&branch).unwrap();
        assert_eq!(targets[0].world, Some(1));
        assert!(!targets[0].ticks);
    }

    #[test]
    fn test_reflexive_saturates() {
        let mut branch = Branch::standalone();
        branch.append_props(NodeProps::access(0, 0));
        assert!(Reflexive.get_targets(&branch).is_none());
        branch.append_props(NodeProps::access(0, 1));
        let targets = Reflexive.get_targets(&branch).unwrap();
        assert_eq!(targets[0].world_pair, Some((1, 1)));
    }

    #[test]
    fn test_symmetric_targets_reverse_edge() {
        let mut branch = Branch::standalone();
        let mut rule = Symmetric::new();
        rule.after_branch_add(&branch, None);
        let node = branch.append_props(NodeProps::access(0, 1));
        rule.after_node_add(&node, &branch);
        let targets = rule.get_targets(&branch).unwrap();
        assert_eq!(targets[0].world_pair, Some((1, 0)));
    }
}
