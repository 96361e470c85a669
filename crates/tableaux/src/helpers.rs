//! Per-rule state gadgets
//!
//! Each gadget tracks per-branch state for the rule that owns it: applied
//! constants, reachable worlds, projected bounds, quit flags, firing
//! counts. The owning rule forwards its event hooks here; on branch
//! creation a gadget clones the parent branch's state.

use indexmap::IndexSet;
use lexicon::{Constant, Sentence};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::branch::{Branch, BranchId};
use crate::node::{NodeId, NodeProps, NodeQuery, NodeRef, World};
use crate::rule::Target;

/// Tracks whether the owning rule has flagged each branch, to prevent
/// repeated quit signals.
#[derive(Debug, Default)]
pub struct QuitFlag {
    flagged: FxHashMap<BranchId, bool>,
}

impl QuitFlag {
    /// Whether the branch has been flagged.
    pub fn has_flagged(&self, branch: BranchId) -> bool {
        self.flagged.get(&branch).copied().unwrap_or(false)
    }

    /// Forward of `after_branch_add`.
    pub fn on_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        let inherited = parent.map_or(false, |p| self.has_flagged(p));
        self.flagged.insert(branch.id(), inherited);
    }

    /// Forward of `after_apply`.
    pub fn on_apply(&mut self, target: &Target) {
        if target.is_flag {
            self.flagged.insert(target.branch, true);
        }
    }
}

/// Projects an upper bound on distinct constants per world for each
/// origin branch, computed once after the trunk is built. Blocks runaway
/// existential instantiation.
#[derive(Debug, Default)]
pub struct MaxConstants {
    branch_max: FxHashMap<BranchId, usize>,
    world_constants: FxHashMap<BranchId, FxHashMap<World, FxHashSet<Constant>>>,
}

impl MaxConstants {
    /// The projected max constants per world for the branch's origin.
    pub fn max_constants(&self, branch: &Branch) -> usize {
        self.branch_max.get(&branch.origin()).copied().unwrap_or(1)
    }

    fn constants_at(&self, branch: BranchId, world: World) -> usize {
        self.world_constants
            .get(&branch)
            .and_then(|m| m.get(&world))
            .map_or(0, FxHashSet::len)
    }

    /// Whether the constant budget is met or exceeded at the world.
    pub fn reached(&self, branch: &Branch, world: Option<World>) -> bool {
        self.constants_at(branch.id(), world.unwrap_or(0)) >= self.max_constants(branch)
    }

    /// Whether the constant budget is strictly exceeded at the world.
    pub fn exceeded(&self, branch: &Branch, world: Option<World>) -> bool {
        self.constants_at(branch.id(), world.unwrap_or(0)) > self.max_constants(branch)
    }

    /// A quit-flag node recording the projection.
    pub fn quit_flag(&self, rule: &str, branch: &Branch) -> NodeProps {
        NodeProps::quit_flag(format!("{rule}:MaxConstants({})", self.max_constants(branch)))
    }

    /// Forward of `after_trunk_build`: project the bound per origin as
    /// `max(1, constants) * max(1, quantifiers) + 1`.
    pub fn on_trunk_build(&mut self, branches: &[Branch]) {
        for branch in branches {
            let origin = branch.origin();
            if self.branch_max.contains_key(&origin) {
                continue;
            }
            let needed: usize = branch
                .nodes()
                .iter()
                .filter_map(|n| n.sentence())
                .map(|s| s.quantifiers().len())
                .sum();
            let bound = branch.constants().len().max(1) * needed.max(1) + 1;
            self.branch_max.insert(origin, bound);
        }
    }

    /// Forward of `after_branch_add`.
    pub fn on_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        let inherited = parent
            .and_then(|p| self.world_constants.get(&p).cloned())
            .unwrap_or_default();
        self.world_constants.insert(branch.id(), inherited);
    }

    /// Forward of `after_node_add`.
    pub fn on_node_add(&mut self, node: &NodeRef, branch: &Branch) {
        if node.sentence().is_none() {
            return;
        }
        let world = node.world().unwrap_or(0);
        let entry = self
            .world_constants
            .entry(branch.id())
            .or_default()
            .entry(world)
            .or_default();
        entry.extend(node.constants());
    }
}

#[derive(Debug, Default, Clone)]
struct NodeConstants {
    applied: FxHashSet<Constant>,
    unapplied: IndexSet<Constant>,
}

/// Tracks, per branch, which constants each tracked node has been
/// instantiated with and which are still pending.
#[derive(Debug, Default)]
pub struct NodeAppliedConstants {
    node_states: FxHashMap<BranchId, FxHashMap<NodeId, NodeConstants>>,
    consts: FxHashMap<BranchId, IndexSet<Constant>>,
}

impl NodeAppliedConstants {
    /// Constants not yet applied to the node on the branch, in
    /// first-appearance order.
    pub fn unapplied(&self, node: NodeId, branch: BranchId) -> Vec<Constant> {
        self.node_states
            .get(&branch)
            .and_then(|m| m.get(&node))
            .map(|s| s.unapplied.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether the node has any pending constant on the branch.
    pub fn has_unapplied(&self, node: NodeId, branch: BranchId) -> bool {
        self.node_states
            .get(&branch)
            .and_then(|m| m.get(&node))
            .is_some_and(|s| !s.unapplied.is_empty())
    }

    /// Forward of `after_branch_add`.
    pub fn on_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        let (states, consts) = match parent {
            Some(p) => (
                self.node_states.get(&p).cloned().unwrap_or_default(),
                self.consts.get(&p).cloned().unwrap_or_default(),
            ),
            None => Default::default(),
        };
        self.node_states.insert(branch.id(), states);
        self.consts.insert(branch.id(), consts);
    }

    /// Forward of `after_node_add`. `track` marks the node as a potential
    /// target of the owning rule.
    pub fn on_node_add(&mut self, node: &NodeRef, branch: &Branch, track: bool) {
        let states = self.node_states.entry(branch.id()).or_default();
        let consts = self.consts.entry(branch.id()).or_default();
        if track {
            states.entry(node.id()).or_insert_with(|| NodeConstants {
                applied: FxHashSet::default(),
                unapplied: consts.iter().copied().collect(),
            });
        }
        for c in node.constants() {
            if consts.insert(c) {
                for state in states.values_mut() {
                    state.unapplied.insert(c);
                }
            }
        }
    }

    /// Forward of `after_apply`.
    pub fn on_apply(&mut self, target: &Target) {
        if target.is_flag {
            return;
        }
        let (Some(node), Some(constant)) = (&target.node, target.constant) else {
            return;
        };
        if let Some(state) = self
            .node_states
            .get_mut(&target.branch)
            .and_then(|m| m.get_mut(&node.id()))
        {
            state.applied.insert(constant);
            state.unapplied.shift_remove(&constant);
        }
    }
}

/// Projects an upper bound on worlds per origin branch: the worlds on the
/// branch plus the modal complexity of its unticked sentences, plus one.
#[derive(Debug, Default)]
pub struct MaxWorlds {
    branch_max: FxHashMap<BranchId, usize>,
    complexities: FxHashMap<Sentence, usize>,
}

impl MaxWorlds {
    /// The projected max worlds for the branch's origin.
    pub fn max_worlds(&self, branch: &Branch) -> Option<usize> {
        self.branch_max.get(&branch.origin()).copied()
    }

    /// Whether the world budget is met or exceeded.
    pub fn reached(&self, branch: &Branch) -> bool {
        self.max_worlds(branch)
            .is_some_and(|max| branch.worlds().len() >= max)
    }

    /// Whether the world budget is strictly exceeded.
    pub fn exceeded(&self, branch: &Branch) -> bool {
        self.max_worlds(branch)
            .is_some_and(|max| branch.worlds().len() > max)
    }

    /// The modal complexity of a sentence, cached.
    pub fn modal_complexity(&mut self, sentence: &Sentence) -> usize {
        if let Some(&c) = self.complexities.get(sentence) {
            return c;
        }
        let c = sentence.modal_complexity();
        self.complexities.insert(sentence.clone(), c);
        c
    }

    /// A quit-flag node recording the projection.
    pub fn quit_flag(&self, rule: &str, branch: &Branch) -> NodeProps {
        let max = self
            .max_worlds(branch)
            .map_or_else(|| "?".to_string(), |m| m.to_string());
        NodeProps::quit_flag(format!("{rule}:MaxWorlds({max})"))
    }

    /// Forward of `after_trunk_build`.
    pub fn on_trunk_build(&mut self, branches: &[Branch]) {
        for branch in branches {
            let origin = branch.origin();
            if self.branch_max.contains_key(&origin) {
                continue;
            }
            let needed: usize = branch
                .nodes()
                .iter()
                .filter(|n| !branch.is_ticked(n.id()))
                .filter_map(|n| n.sentence().cloned())
                .map(|s| self.modal_complexity(&s))
                .sum();
            let bound = branch.worlds().len() + needed + 1;
            self.branch_max.insert(origin, bound);
        }
    }
}

/// The worlds on each branch with no outgoing access edge; consumed by
/// the Serial rule.
#[derive(Debug, Default)]
pub struct UnserialWorlds {
    unserial: FxHashMap<BranchId, IndexSet<World>>,
}

impl UnserialWorlds {
    /// The unserial worlds, in first-appearance order.
    pub fn unserial(&self, branch: BranchId) -> Vec<World> {
        self.unserial
            .get(&branch)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Forward of `after_branch_add`.
    pub fn on_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        let inherited = parent
            .and_then(|p| self.unserial.get(&p).cloned())
            .unwrap_or_default();
        self.unserial.insert(branch.id(), inherited);
    }

    /// Forward of `after_node_add`.
    pub fn on_node_add(&mut self, node: &NodeRef, branch: &Branch) {
        let set = self.unserial.entry(branch.id()).or_default();
        for w in node.worlds() {
            if branch.has(&NodeQuery::from_world(w), None) {
                set.shift_remove(&w);
            } else {
                set.insert(w);
            }
        }
    }
}

/// The outgoing access index per branch; consumed by the transitivity,
/// symmetry, and reflexivity rules.
#[derive(Debug, Default)]
pub struct VisibleWorlds {
    index: FxHashMap<BranchId, FxHashMap<World, IndexSet<World>>>,
}

impl VisibleWorlds {
    /// The worlds visible from `world` on the branch.
    pub fn visibles(&self, branch: BranchId, world: World) -> Vec<World> {
        self.index
            .get(&branch)
            .and_then(|m| m.get(&world))
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// The worlds visible to `w2` but not to `w1`.
    pub fn intransitives(&self, branch: BranchId, w1: World, w2: World) -> Vec<World> {
        let from_w1: FxHashSet<World> = self
            .index
            .get(&branch)
            .and_then(|m| m.get(&w1))
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();
        self.visibles(branch, w2)
            .into_iter()
            .filter(|w| !from_w1.contains(w))
            .collect()
    }

    /// Forward of `after_branch_add`.
    pub fn on_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        let inherited = parent
            .and_then(|p| self.index.get(&p).cloned())
            .unwrap_or_default();
        self.index.insert(branch.id(), inherited);
    }

    /// Forward of `after_node_add`.
    pub fn on_node_add(&mut self, node: &NodeRef, branch: &Branch) {
        if let Some((w1, w2)) = node.access() {
            self.index
                .entry(branch.id())
                .or_default()
                .entry(w1)
                .or_default()
                .insert(w2);
        }
    }
}

/// The predicated nodes per branch, in append order; consumed by the
/// identity-indiscernibility rule.
#[derive(Debug, Default)]
pub struct PredicatedNodes {
    nodes: FxHashMap<BranchId, Vec<NodeRef>>,
}

impl PredicatedNodes {
    /// The predicated nodes on the branch.
    pub fn get(&self, branch: BranchId) -> &[NodeRef] {
        self.nodes.get(&branch).map_or(&[], Vec::as_slice)
    }

    /// Forward of `after_branch_add`.
    pub fn on_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        let inherited = parent
            .and_then(|p| self.nodes.get(&p).cloned())
            .unwrap_or_default();
        self.nodes.insert(branch.id(), inherited);
    }

    /// Forward of `after_node_add`.
    pub fn on_node_add(&mut self, node: &NodeRef, branch: &Branch) {
        if node.sentence().is_some_and(Sentence::is_predicated) {
            self.nodes.entry(branch.id()).or_default().push(node.clone());
        }
    }
}

/// Tracks `(node, world)` pairs the owning rule has applied, per branch;
/// used by the necessity rule.
#[derive(Debug, Default)]
pub struct AppliedNodesWorlds {
    applied: FxHashMap<BranchId, FxHashSet<(NodeId, World)>>,
}

impl AppliedNodesWorlds {
    /// Whether the rule has applied to the node at the world.
    pub fn is_applied(&self, node: NodeId, world: World, branch: BranchId) -> bool {
        self.applied
            .get(&branch)
            .is_some_and(|s| s.contains(&(node, world)))
    }

    /// Forward of `after_branch_add`.
    pub fn on_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        let inherited = parent
            .and_then(|p| self.applied.get(&p).cloned())
            .unwrap_or_default();
        self.applied.insert(branch.id(), inherited);
    }

    /// Forward of `after_apply`.
    pub fn on_apply(&mut self, target: &Target) {
        if target.is_flag {
            return;
        }
        let (Some(node), Some(world)) = (&target.node, target.world) else {
            return;
        };
        self.applied
            .entry(target.branch)
            .or_default()
            .insert((node.id(), world));
    }
}

/// Counts the owning rule's applications per sentence, per branch.
#[derive(Debug, Default)]
pub struct AppliedSentenceCounter {
    counts: FxHashMap<BranchId, FxHashMap<Sentence, usize>>,
}

impl AppliedSentenceCounter {
    /// The count for the sentence on the branch.
    pub fn count(&self, sentence: &Sentence, branch: BranchId) -> usize {
        self.counts
            .get(&branch)
            .and_then(|m| m.get(sentence))
            .copied()
            .unwrap_or(0)
    }

    /// Forward of `after_branch_add`.
    pub fn on_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        let inherited = parent
            .and_then(|p| self.counts.get(&p).cloned())
            .unwrap_or_default();
        self.counts.insert(branch.id(), inherited);
    }

    /// Forward of `after_apply`.
    pub fn on_apply(&mut self, target: &Target) {
        if target.is_flag {
            return;
        }
        let Some(sentence) = &target.sentence else {
            return;
        };
        *self
            .counts
            .entry(target.branch)
            .or_default()
            .entry(sentence.clone())
            .or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use lexicon::{Atomic, Parameter, Predicate, Variable};
    use std::sync::Arc;

    fn branch() -> Branch {
        Branch::new(0, 0)
    }

    fn access_node(id: u64, w1: World, w2: World) -> NodeRef {
        Arc::new(Node::new(id, 0, 0, NodeProps::access(w1, w2)))
    }

    #[test]
    fn test_quit_flag_inherits() {
        let mut q = QuitFlag::default();
        let b0 = branch();
        q.on_branch_add(&b0, None);
        let mut t = Target::on(0);
        t.is_flag = true;
        q.on_apply(&t);
        let b1 = b0.copy(1, 0);
        q.on_branch_add(&b1, Some(0));
        assert!(q.has_flagged(0));
        assert!(q.has_flagged(1));
    }

    #[test]
    fn test_max_constants_projection() {
        let mut mc = MaxConstants::default();
        let mut b = branch();
        let v = Variable::new(0, 0).unwrap();
        let p = Predicate::new(0, 0, 1, None).unwrap();
        let body = Sentence::predicated(p, [Parameter::from(v)]).unwrap();
        let s = Sentence::quantified(lexicon::Quantifier::Universal, v, body).unwrap();
        b.append(Arc::new(Node::new(1, 0, 0, NodeProps::sentence(s))));
        mc.on_trunk_build(std::slice::from_ref(&b));
        // no constants (min 1) * one quantifier + 1
        assert_eq!(mc.max_constants(&b), 2);
    }

    #[test]
    fn test_visible_worlds_intransitives() {
        let mut vw = VisibleWorlds::default();
        let mut b = branch();
        vw.on_branch_add(&b, None);
        let n1 = access_node(1, 0, 1);
        let n2 = access_node(2, 1, 2);
        b.append(n1.clone());
        vw.on_node_add(&n1, &b);
        b.append(n2.clone());
        vw.on_node_add(&n2, &b);
        assert_eq!(vw.visibles(0, 0), vec![1]);
        assert_eq!(vw.intransitives(0, 0, 1), vec![2]);
    }

    #[test]
    fn test_unserial_worlds() {
        let mut uw = UnserialWorlds::default();
        let mut b = branch();
        uw.on_branch_add(&b, None);
        let s = Sentence::from(Atomic::new(0, 0).unwrap());
        let n = Arc::new(Node::new(1, 0, 0, NodeProps::at_world(s, 0)));
        b.append(n.clone());
        uw.on_node_add(&n, &b);
        assert_eq!(uw.unserial(0), vec![0]);
        let a = access_node(2, 0, 1);
        b.append(a.clone());
        uw.on_node_add(&a, &b);
        // 0 gained an outgoing edge; 1 has none.
        assert_eq!(uw.unserial(0), vec![1]);
    }

    #[test]
    fn test_node_applied_constants_flow() {
        let mut nac = NodeAppliedConstants::default();
        let b = branch();
        nac.on_branch_add(&b, None);
        let v = Variable::new(0, 0).unwrap();
        let p = Predicate::new(0, 0, 1, None).unwrap();
        let body = Sentence::predicated(p.clone(), [Parameter::from(v)]).unwrap();
        let univ = Sentence::quantified(lexicon::Quantifier::Universal, v, body).unwrap();
        let un = Arc::new(Node::new(1, 0, 0, NodeProps::sentence(univ)));
        nac.on_node_add(&un, &b, true);
        assert!(!nac.has_unapplied(1, 0));
        let c = Constant::new(0, 0).unwrap();
        let ground = Sentence::predicated(p, [Parameter::from(c)]).unwrap();
        let gn = Arc::new(Node::new(2, 0, 0, NodeProps::sentence(ground)));
        nac.on_node_add(&gn, &b, false);
        assert_eq!(nac.unapplied(1, 0), vec![c]);
        let mut t = Target::on(0);
        t.node = Some(un);
        t.constant = Some(c);
        nac.on_apply(&t);
        assert!(!nac.has_unapplied(1, 0));
    }
}
