//! Branches with reverse indices
//!
//! A branch is an append-only sequence of nodes plus per-property reverse
//! indices, derived caches (constants, worlds, atomics, predicates), a
//! ticked set, and a parent pointer. Copies share node references but own
//! their lists and indices.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use lexicon::{Atomic, Constant, Predicate, Sentence};
use rustc_hash::FxHashMap;

use crate::node::{Node, NodeId, NodeProps, NodeQuery, NodeRef, World};

/// A branch identity: its index in the tableau's branch list.
pub type BranchId = usize;

/// A tableau branch.
#[derive(Debug, Clone)]
pub struct Branch {
    id: BranchId,
    parent: Option<BranchId>,
    origin: BranchId,
    step_added: u32,
    nodes: Vec<NodeRef>,
    positions: FxHashMap<NodeId, usize>,
    ticked: IndexMap<NodeId, u32>,
    closed: bool,
    closed_step: Option<u32>,

    by_sentence: FxHashMap<Sentence, IndexSet<usize>>,
    by_designated: FxHashMap<bool, IndexSet<usize>>,
    by_world: FxHashMap<World, IndexSet<usize>>,
    by_world1: FxHashMap<World, IndexSet<usize>>,
    by_world2: FxHashMap<World, IndexSet<usize>>,
    by_access: FxHashMap<(World, World), IndexSet<usize>>,

    constants: IndexSet<Constant>,
    worlds: IndexSet<World>,
    atomics: IndexSet<Atomic>,
    predicates: IndexSet<Predicate>,
}

impl Branch {
    /// An unattached branch, for tests and model fixtures.
    pub fn standalone() -> Branch {
        Branch::new(0, 0)
    }

    pub(crate) fn new(id: BranchId, step_added: u32) -> Branch {
        Branch {
            id,
            parent: None,
            origin: id,
            step_added,
            nodes: Vec::new(),
            positions: FxHashMap::default(),
            ticked: IndexMap::new(),
            closed: false,
            closed_step: None,
            by_sentence: FxHashMap::default(),
            by_designated: FxHashMap::default(),
            by_world: FxHashMap::default(),
            by_world1: FxHashMap::default(),
            by_world2: FxHashMap::default(),
            by_access: FxHashMap::default(),
            constants: IndexSet::new(),
            worlds: IndexSet::new(),
            atomics: IndexSet::new(),
            predicates: IndexSet::new(),
        }
    }

    // Copy-on-branch: node references are shared, lists and indices are
    // owned by the copy.
    pub(crate) fn copy(&self, id: BranchId, step_added: u32) -> Branch {
        let mut copy = self.clone();
        copy.id = id;
        copy.parent = Some(self.id);
        copy.origin = self.origin;
        copy.step_added = step_added;
        copy
    }

    /// The branch identity.
    pub fn id(&self) -> BranchId {
        self.id
    }

    /// The branch this one was copied from, if any.
    pub fn parent(&self) -> Option<BranchId> {
        self.parent
    }

    /// The root of the parent chain.
    pub fn origin(&self) -> BranchId {
        self.origin
    }

    /// The step at which the branch was added.
    pub fn step_added(&self) -> u32 {
        self.step_added
    }

    /// Whether the branch is closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The step at which the branch closed, if it did.
    pub fn closed_step(&self) -> Option<u32> {
        self.closed_step
    }

    /// The nodes, in append order.
    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    /// The most recently appended node.
    pub fn leaf(&self) -> Option<&NodeRef> {
        self.nodes.last()
    }

    /// Node count.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the branch has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&NodeRef> {
        self.positions.get(&id).map(|&pos| &self.nodes[pos])
    }

    /// Whether the node is ticked on this branch.
    pub fn is_ticked(&self, id: NodeId) -> bool {
        self.ticked.contains_key(&id)
    }

    /// The step at which the node was ticked, if it was.
    pub fn ticked_step(&self, id: NodeId) -> Option<u32> {
        self.ticked.get(&id).copied()
    }

    /// Unticked sentence nodes in append order.
    pub fn unticked(&self) -> impl Iterator<Item = &NodeRef> {
        self.nodes
            .iter()
            .filter(|n| !self.ticked.contains_key(&n.id()))
    }

    /// Whether a node matching the query exists, optionally filtered by
    /// ticked status.
    pub fn has(&self, query: &NodeQuery, ticked: Option<bool>) -> bool {
        self.find(query, ticked).is_some()
    }

    /// Whether any of the queries matches.
    pub fn has_any(&self, queries: &[NodeQuery], ticked: Option<bool>) -> bool {
        queries.iter().any(|q| self.has(q, ticked))
    }

    /// Whether all of the queries match.
    pub fn has_all(&self, queries: &[NodeQuery], ticked: Option<bool>) -> bool {
        queries.iter().all(|q| self.has(q, ticked))
    }

    /// Whether the access node `w1 R w2` is on the branch.
    pub fn has_access(&self, w1: World, w2: World) -> bool {
        self.by_access.contains_key(&(w1, w2))
    }

    /// First matching node, in append order.
    pub fn find(&self, query: &NodeQuery, ticked: Option<bool>) -> Option<&NodeRef> {
        self.search(query, ticked, Some(1)).into_iter().next()
    }

    /// All matching nodes, in append order.
    pub fn find_all(&self, query: &NodeQuery, ticked: Option<bool>) -> Vec<&NodeRef> {
        self.search(query, ticked, None)
    }

    /// Search using the best reverse index for the query.
    ///
    /// The smallest index keyed by one of the query's properties is
    /// scanned in insertion order; remaining properties and the ticked
    /// filter are checked per node. A keyed property with no index entry
    /// short-circuits to an empty result.
    pub fn search(
        &self,
        query: &NodeQuery,
        ticked: Option<bool>,
        limit: Option<usize>,
    ) -> Vec<&NodeRef> {
        let mut results = Vec::new();
        let scan: Box<dyn Iterator<Item = usize> + '_> = match self.select_index(query) {
            IndexSelection::Empty => return results,
            IndexSelection::Indexed(set) => Box::new(set.iter().copied()),
            IndexSelection::None => Box::new(0..self.nodes.len()),
        };
        for pos in scan {
            if let Some(limit) = limit {
                if results.len() >= limit {
                    break;
                }
            }
            let node = &self.nodes[pos];
            if let Some(want) = ticked {
                if self.is_ticked(node.id()) != want {
                    continue;
                }
            }
            if query.matches(node) {
                results.push(node);
            }
        }
        results
    }

    fn select_index(&self, query: &NodeQuery) -> IndexSelection<'_> {
        let mut keyed: Vec<Option<&IndexSet<usize>>> = Vec::new();
        if let (Some(w1), Some(w2)) = (query.world1, query.world2) {
            keyed.push(self.by_access.get(&(w1, w2)));
        } else {
            if let Some(w1) = query.world1 {
                keyed.push(self.by_world1.get(&w1));
            }
            if let Some(w2) = query.world2 {
                keyed.push(self.by_world2.get(&w2));
            }
        }
        if let Some(s) = &query.sentence {
            keyed.push(self.by_sentence.get(s));
        }
        if let Some(d) = query.designated {
            keyed.push(self.by_designated.get(&d));
        }
        if let Some(w) = query.world {
            keyed.push(self.by_world.get(&w));
        }
        let mut best: Option<&IndexSet<usize>> = None;
        for entry in keyed {
            match entry {
                // A referenced key with no entry cannot match anything.
                None => return IndexSelection::Empty,
                Some(set) => {
                    if best.is_none_or(|b| set.len() < b.len()) {
                        best = Some(set);
                    }
                }
            }
        }
        match best {
            Some(set) => IndexSelection::Indexed(set),
            None => IndexSelection::None,
        }
    }

    /// The constants appearing on the branch, in first-appearance order.
    pub fn constants(&self) -> &IndexSet<Constant> {
        &self.constants
    }

    /// The worlds appearing on the branch, in first-appearance order.
    pub fn worlds(&self) -> &IndexSet<World> {
        &self.worlds
    }

    /// The atomic sentences appearing on the branch.
    pub fn atomics(&self) -> &IndexSet<Atomic> {
        &self.atomics
    }

    /// The predicates appearing on the branch.
    pub fn predicates(&self) -> &IndexSet<Predicate> {
        &self.predicates
    }

    /// One more than the max world on the branch, or 0.
    pub fn new_world(&self) -> World {
        self.worlds.iter().max().map_or(0, |w| w + 1)
    }

    /// The first constant not appearing on the branch, iterating index
    /// then subscript.
    pub fn new_constant(&self) -> Constant {
        Constant::first_unused(|c| self.constants.contains(&c))
    }

    /// The branch constants, or a fresh singleton when there are none.
    /// The flag reports whether the constant is new.
    pub fn constants_or_new(&self) -> (Vec<Constant>, bool) {
        if self.constants.is_empty() {
            (vec![self.new_constant()], true)
        } else {
            (self.constants.iter().copied().collect(), false)
        }
    }

    /// Append a raw property bag as a node, for standalone branches
    /// (tests, model fixtures). Ids are branch-local; inside a tableau,
    /// nodes are created and appended through the engine's writer.
    pub fn append_props(&mut self, props: NodeProps) -> NodeRef {
        let id = self.nodes.len() as NodeId + 1;
        let node = std::sync::Arc::new(Node::new(id, 0, 0, props));
        self.append(node.clone());
        node
    }

    /// Append several property bags, for standalone branches.
    pub fn extend_props(&mut self, nodes: impl IntoIterator<Item = NodeProps>) {
        for props in nodes {
            self.append_props(props);
        }
    }

    pub(crate) fn append(&mut self, node: NodeRef) {
        let pos = self.nodes.len();
        self.positions.insert(node.id(), pos);
        if let Some(s) = node.sentence() {
            self.by_sentence.entry(s.clone()).or_default().insert(pos);
            for c in s.constants() {
                self.constants.insert(c);
            }
            for a in s.atomics() {
                self.atomics.insert(a);
            }
            for p in s.predicates() {
                self.predicates.insert(p);
            }
        }
        if let Some(d) = node.designated() {
            self.by_designated.entry(d).or_default().insert(pos);
        }
        if let Some(w) = node.world() {
            self.by_world.entry(w).or_default().insert(pos);
        }
        if let Some(w1) = node.props().world1 {
            self.by_world1.entry(w1).or_default().insert(pos);
        }
        if let Some(w2) = node.props().world2 {
            self.by_world2.entry(w2).or_default().insert(pos);
        }
        if let Some((w1, w2)) = node.access() {
            self.by_access.entry((w1, w2)).or_default().insert(pos);
        }
        for w in node.worlds() {
            self.worlds.insert(w);
        }
        self.nodes.push(node);
    }

    /// Mark a node consumed on this branch. Returns whether the tick was
    /// new. The engine routes ticks through its writer so rules observe
    /// the event.
    pub fn tick(&mut self, id: NodeId, step: u32) -> bool {
        if self.positions.contains_key(&id) && !self.ticked.contains_key(&id) {
            self.ticked.insert(id, step);
            true
        } else {
            false
        }
    }

    pub(crate) fn set_closed(&mut self, step: u32) {
        self.closed = true;
        self.closed_step = Some(step);
    }
}

enum IndexSelection<'a> {
    Indexed(&'a IndexSet<usize>),
    None,
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeProps;

    fn node(id: NodeId, props: NodeProps) -> NodeRef {
        Arc::new(Node::new(id, 0, 0, props))
    }

    fn atomic(index: u8) -> Sentence {
        Sentence::from(Atomic::new(index, 0).unwrap())
    }

    #[test]
    fn test_append_updates_indices() {
        let mut b = Branch::new(0, 0);
        b.append(node(1, NodeProps::designated(atomic(0), true)));
        b.append(node(2, NodeProps::designated(atomic(0), false)));
        assert!(b.has(&NodeQuery::designated(atomic(0), true), None));
        assert!(b.has(&NodeQuery::designated(atomic(0), false), None));
        assert!(!b.has(&NodeQuery::designated(atomic(1), true), None));
    }

    #[test]
    fn test_access_index() {
        let mut b = Branch::new(0, 0);
        b.append(node(1, NodeProps::access(0, 1)));
        assert!(b.has_access(0, 1));
        assert!(!b.has_access(1, 0));
        assert_eq!(b.worlds().len(), 2);
        assert_eq!(b.new_world(), 2);
    }

    #[test]
    fn test_search_respects_ticked_filter() {
        let mut b = Branch::new(0, 0);
        b.append(node(1, NodeProps::sentence(atomic(0))));
        b.append(node(2, NodeProps::sentence(atomic(0))));
        b.tick(1, 1);
        let unticked = b.search(&NodeQuery::sentence(atomic(0)), Some(false), None);
        assert_eq!(unticked.len(), 1);
        assert_eq!(unticked[0].id(), 2);
    }

    #[test]
    fn test_search_missing_key_short_circuits() {
        let mut b = Branch::new(0, 0);
        b.append(node(1, NodeProps::sentence(atomic(0))));
        assert!(b.search(&NodeQuery::at_world(atomic(0), 7), None, None).is_empty());
    }

    #[test]
    fn test_copy_is_independent() {
        let mut b = Branch::new(0, 0);
        b.append(node(1, NodeProps::sentence(atomic(0))));
        let mut c = b.copy(1, 1);
        c.append(node(2, NodeProps::sentence(atomic(1))));
        c.tick(1, 2);
        assert_eq!(b.len(), 1);
        assert_eq!(c.len(), 2);
        assert!(!b.is_ticked(1));
        assert!(c.is_ticked(1));
        assert_eq!(c.parent(), Some(0));
        assert_eq!(c.origin(), 0);
    }

    #[test]
    fn test_new_constant_skips_taken() {
        let mut b = Branch::new(0, 0);
        let p = Predicate::new(0, 0, 1, None).unwrap();
        let c0 = Constant::new(0, 0).unwrap();
        let s = Sentence::predicated(p, [c0.into()]).unwrap();
        b.append(node(1, NodeProps::sentence(s)));
        assert_eq!(b.new_constant(), Constant::new(1, 0).unwrap());
        let (all, is_new) = b.constants_or_new();
        assert_eq!(all, vec![c0]);
        assert!(!is_new);
    }
}
