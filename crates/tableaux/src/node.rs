//! Proof-tree nodes
//!
//! A node is an immutable bag of properties created when it is appended
//! to a branch: a sentence with optional designation or world marker, an
//! access pair, or a flag. Nodes are shared between a branch and its
//! copies via `Arc`; identity is the node id.

use std::sync::Arc;

use lexicon::{Constant, Sentence};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

/// A possible world, as used by modal logics.
pub type World = u32;

/// A node identity, unique per tableau.
pub type NodeId = u64;

/// The kind of a flag node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    /// Terminal marker appended when a branch closes
    Closure,
    /// Terminal marker appended when a rule gives up on a branch
    Quit,
}

/// The properties of a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeProps {
    /// The sentence, if this is a sentence node.
    pub sentence: Option<Sentence>,
    /// The designation marker (FDE family).
    pub designated: Option<bool>,
    /// The world marker (modal logics).
    pub world: Option<World>,
    /// Source world of an access node.
    pub world1: Option<World>,
    /// Target world of an access node.
    pub world2: Option<World>,
    /// Whether this is a flag node.
    pub is_flag: bool,
    /// The flag kind, for flag nodes.
    pub flag: Option<FlagKind>,
    /// Free-form detail for flag nodes.
    pub info: Option<String>,
}

impl NodeProps {
    /// A bare sentence node.
    pub fn sentence(s: Sentence) -> NodeProps {
        NodeProps {
            sentence: Some(s),
            ..NodeProps::default()
        }
    }

    /// A sentence node with a designation marker.
    pub fn designated(s: Sentence, designated: bool) -> NodeProps {
        NodeProps {
            sentence: Some(s),
            designated: Some(designated),
            ..NodeProps::default()
        }
    }

    /// A sentence node at a world.
    pub fn at_world(s: Sentence, world: World) -> NodeProps {
        NodeProps {
            sentence: Some(s),
            world: Some(world),
            ..NodeProps::default()
        }
    }

    /// A sentence node with an optional world marker.
    pub fn maybe_world(s: Sentence, world: Option<World>) -> NodeProps {
        NodeProps {
            sentence: Some(s),
            world,
            ..NodeProps::default()
        }
    }

    /// An access node `world1 R world2`.
    pub fn access(world1: World, world2: World) -> NodeProps {
        NodeProps {
            world1: Some(world1),
            world2: Some(world2),
            ..NodeProps::default()
        }
    }

    /// The closure flag node appended by `Branch::close`.
    pub fn closure_flag() -> NodeProps {
        NodeProps {
            is_flag: true,
            flag: Some(FlagKind::Closure),
            ..NodeProps::default()
        }
    }

    /// A quit flag node with rule-provided detail.
    pub fn quit_flag(info: String) -> NodeProps {
        NodeProps {
            is_flag: true,
            flag: Some(FlagKind::Quit),
            info: Some(info),
            ..NodeProps::default()
        }
    }
}

/// A proof-tree node.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    step: u32,
    branching_complexity: u32,
    props: NodeProps,
}

impl Node {
    pub(crate) fn new(id: NodeId, step: u32, branching_complexity: u32, props: NodeProps) -> Node {
        Node {
            id,
            step,
            branching_complexity,
            props,
        }
    }

    /// The node identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The step at which the node was added to its branch.
    pub fn step(&self) -> u32 {
        self.step
    }

    /// The logic's branching-complexity forecast for this node.
    pub fn branching_complexity(&self) -> u32 {
        self.branching_complexity
    }

    /// The full property bag.
    pub fn props(&self) -> &NodeProps {
        &self.props
    }

    /// The sentence, if any.
    pub fn sentence(&self) -> Option<&Sentence> {
        self.props.sentence.as_ref()
    }

    /// The designation marker, if any.
    pub fn designated(&self) -> Option<bool> {
        self.props.designated
    }

    /// The world marker, if any.
    pub fn world(&self) -> Option<World> {
        self.props.world
    }

    /// The access pair, if this is an access node.
    pub fn access(&self) -> Option<(World, World)> {
        match (self.props.world1, self.props.world2) {
            (Some(w1), Some(w2)) => Some((w1, w2)),
            _ => None,
        }
    }

    /// Whether this is a flag node.
    pub fn is_flag(&self) -> bool {
        self.props.is_flag
    }

    /// Every world referenced by the node's properties.
    pub fn worlds(&self) -> SmallVec<[World; 2]> {
        let mut out = SmallVec::new();
        for w in [self.props.world, self.props.world1, self.props.world2]
            .into_iter()
            .flatten()
        {
            if !out.contains(&w) {
                out.push(w);
            }
        }
        out
    }

    /// The constants of the node's sentence, if any.
    pub fn constants(&self) -> rustc_hash::FxHashSet<Constant> {
        self.sentence().map(Sentence::constants).unwrap_or_default()
    }
}

// Serialized for the tree report: identity, step, and the non-lexical
// properties; the sentence goes out in its canonical key encoding.
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("Node", 8)?;
        st.serialize_field("id", &self.id)?;
        st.serialize_field("step", &self.step)?;
        st.serialize_field("sentence", &self.props.sentence.as_ref().map(lexicon::argument::sentence_key))?;
        st.serialize_field("designated", &self.props.designated)?;
        st.serialize_field("world", &self.props.world)?;
        st.serialize_field("world1", &self.props.world1)?;
        st.serialize_field("world2", &self.props.world2)?;
        st.serialize_field("is_flag", &self.props.is_flag)?;
        st.end()
    }
}

/// A property pattern for branch lookups. `None` fields are wildcards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeQuery {
    /// Match the node sentence.
    pub sentence: Option<Sentence>,
    /// Match the designation marker.
    pub designated: Option<bool>,
    /// Match the world marker.
    pub world: Option<World>,
    /// Match the access source world.
    pub world1: Option<World>,
    /// Match the access target world.
    pub world2: Option<World>,
}

impl NodeQuery {
    /// Match nodes carrying this sentence.
    pub fn sentence(s: Sentence) -> NodeQuery {
        NodeQuery {
            sentence: Some(s),
            ..NodeQuery::default()
        }
    }

    /// Match nodes carrying this sentence and designation.
    pub fn designated(s: Sentence, designated: bool) -> NodeQuery {
        NodeQuery {
            sentence: Some(s),
            designated: Some(designated),
            ..NodeQuery::default()
        }
    }

    /// Match nodes carrying this sentence at a world.
    pub fn at_world(s: Sentence, world: World) -> NodeQuery {
        NodeQuery {
            sentence: Some(s),
            world: Some(world),
            ..NodeQuery::default()
        }
    }

    /// Match nodes carrying this sentence with an optional world marker.
    pub fn maybe_world(s: Sentence, world: Option<World>) -> NodeQuery {
        NodeQuery {
            sentence: Some(s),
            world,
            ..NodeQuery::default()
        }
    }

    /// Match the access node `world1 R world2`.
    pub fn access(world1: World, world2: World) -> NodeQuery {
        NodeQuery {
            world1: Some(world1),
            world2: Some(world2),
            ..NodeQuery::default()
        }
    }

    /// Match nodes with this access source world.
    pub fn from_world(world1: World) -> NodeQuery {
        NodeQuery {
            world1: Some(world1),
            ..NodeQuery::default()
        }
    }

    /// Whether the node matches every set field.
    pub fn matches(&self, node: &Node) -> bool {
        if let Some(s) = &self.sentence {
            if node.sentence() != Some(s) {
                return false;
            }
        }
        if let Some(d) = self.designated {
            if node.designated() != Some(d) {
                return false;
            }
        }
        if let Some(w) = self.world {
            if node.world() != Some(w) {
                return false;
            }
        }
        if let Some(w1) = self.world1 {
            if node.props().world1 != Some(w1) {
                return false;
            }
        }
        if let Some(w2) = self.world2 {
            if node.props().world2 != Some(w2) {
                return false;
            }
        }
        true
    }
}

/// Shared node handle.
pub type NodeRef = Arc<Node>;

#[cfg(test)]
mod tests {
    use super::*;
    use lexicon::Atomic;

    fn atomic() -> Sentence {
        Sentence::from(Atomic::new(0, 0).unwrap())
    }

    #[test]
    fn test_worlds_union() {
        let node = Node::new(1, 0, 0, NodeProps::access(0, 1));
        assert_eq!(node.worlds().as_slice(), &[0, 1]);
        let node = Node::new(2, 0, 0, NodeProps::at_world(atomic(), 3));
        assert_eq!(node.worlds().as_slice(), &[3]);
    }

    #[test]
    fn test_query_wildcards() {
        let node = Node::new(1, 0, 0, NodeProps::designated(atomic(), true));
        assert!(NodeQuery::sentence(atomic()).matches(&node));
        assert!(NodeQuery::designated(atomic(), true).matches(&node));
        assert!(!NodeQuery::designated(atomic(), false).matches(&node));
        assert!(!NodeQuery::at_world(atomic(), 0).matches(&node));
    }

    #[test]
    fn test_flag_nodes() {
        let node = Node::new(1, 0, 0, NodeProps::closure_flag());
        assert!(node.is_flag());
        assert_eq!(node.sentence(), None);
    }
}
