//! The tree-structure report
//!
//! Built once on finish: branches sharing a prefix collapse into one
//! structure node holding the run of common nodes, with children for the
//! divergences below. Carries pre-order left/right values, width and
//! balance hints for renderers, and openness flags.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::branch::{Branch, BranchId};
use crate::node::NodeRef;

/// One structure node of the tree report.
#[derive(Debug, Clone, Serialize)]
pub struct TreeStruct {
    /// The run of nodes common to every branch at this depth.
    pub nodes: Vec<NodeRef>,
    /// The distinct divergences below.
    pub children: Vec<TreeStruct>,
    /// Whether this is a terminal structure.
    pub leaf: bool,
    /// Whether this is a closed terminal structure.
    pub closed: bool,
    /// Whether this is an open terminal structure.
    pub open: bool,
    /// Pre-order tree left value.
    pub left: usize,
    /// Pre-order tree right value.
    pub right: usize,
    /// Total node count of all descendants.
    pub descendant_node_count: usize,
    /// Node count plus descendant node count.
    pub structure_node_count: usize,
    /// Ancestor structure count.
    pub depth: usize,
    /// Whether this structure or a descendant is open.
    pub has_open: bool,
    /// Whether this structure or a descendant is closed.
    pub has_closed: bool,
    /// The step at which the branch closed, for closed leaves.
    pub closed_step: Option<u32>,
    /// The step at which this structure first appears.
    pub step: Option<u32>,
    /// The earliest step among the children.
    pub branch_step: Option<u32>,
    /// Number of descendant terminal structures, or 1.
    pub width: usize,
    /// Half the first child's width plus half the last child's plus the
    /// widths between, over this structure's width.
    pub balanced_line_width: f64,
    /// Half the first child's width over this structure's width.
    pub balanced_line_margin: f64,
    /// The branch id, for leaves.
    pub branch_id: Option<BranchId>,
    /// The model id, for open leaves with a model.
    pub model_id: Option<usize>,
    /// Whether this is the one and only branch.
    pub is_only_branch: bool,
    /// Distinct node count across the whole tree; set on the root.
    pub distinct_nodes: usize,
}

struct Track {
    pos: usize,
    depth: usize,
    distinct_nodes: usize,
}

/// Build the tree report over all branches.
pub fn build(branches: &[Branch], branch_models: &FxHashMap<BranchId, usize>) -> TreeStruct {
    let refs: Vec<&Branch> = branches.iter().collect();
    let mut track = Track {
        pos: 0,
        depth: 0,
        distinct_nodes: 0,
    };
    let mut root = structure(&refs, 0, &mut track, branch_models);
    root.distinct_nodes = track.distinct_nodes;
    root
}

fn structure(
    branches: &[&Branch],
    mut node_depth: usize,
    track: &mut Track,
    branch_models: &FxHashMap<BranchId, usize>,
) -> TreeStruct {
    track.pos += 1;
    let mut s = TreeStruct {
        nodes: Vec::new(),
        children: Vec::new(),
        leaf: false,
        closed: false,
        open: false,
        left: track.pos,
        right: 0,
        descendant_node_count: 0,
        structure_node_count: 0,
        depth: track.depth,
        has_open: false,
        has_closed: false,
        closed_step: None,
        step: None,
        branch_step: None,
        width: 0,
        balanced_line_width: 0.0,
        balanced_line_margin: 0.0,
        branch_id: None,
        model_id: None,
        is_only_branch: false,
        distinct_nodes: 0,
    };

    // Absorb the run of nodes every relevant branch shares at this depth.
    let mut distinct: Vec<NodeRef> = Vec::new();
    loop {
        let relevant: Vec<&Branch> = branches
            .iter()
            .copied()
            .filter(|b| b.len() > node_depth)
            .collect();
        for b in &relevant {
            if b.is_closed() {
                s.has_closed = true;
            } else {
                s.has_open = true;
            }
            if s.has_open && s.has_closed {
                break;
            }
        }
        distinct.clear();
        for b in &relevant {
            let node = &b.nodes()[node_depth];
            if !distinct.iter().any(|n| n.id() == node.id()) {
                distinct.push(node.clone());
            }
        }
        if distinct.len() == 1 {
            let node = distinct[0].clone();
            s.step = Some(s.step.map_or(node.step(), |cur| cur.min(node.step())));
            s.nodes.push(node);
            node_depth += 1;
            continue;
        }
        break;
    }
    track.distinct_nodes += s.nodes.len();

    if branches.len() == 1 {
        let branch = branches[0];
        s.closed = branch.is_closed();
        s.open = !s.closed;
        if s.closed {
            s.closed_step = branch.closed_step();
            s.has_closed = true;
        } else {
            s.has_open = true;
        }
        s.width = 1;
        s.leaf = true;
        s.branch_id = Some(branch.id());
        s.model_id = branch_models.get(&branch.id()).copied();
        if track.depth == 0 {
            s.is_only_branch = true;
        }
    } else {
        track.depth += 1;
        let mut first_width = 0.0f64;
        let mut last_width = 0.0f64;
        let mut inbetween_widths = 0usize;
        let count = distinct.len();
        for (i, node) in distinct.iter().enumerate() {
            let child_branches: Vec<&Branch> = branches
                .iter()
                .copied()
                .filter(|b| b.len() > node_depth && b.nodes()[node_depth].id() == node.id())
                .collect();
            let child = structure(&child_branches, node_depth, track, branch_models);
            s.descendant_node_count += child.nodes.len() + child.descendant_node_count;
            s.width += child.width;
            s.branch_step = match (s.branch_step, child.step) {
                (None, step) => step,
                (cur, None) => cur,
                (Some(a), Some(b)) => Some(a.min(b)),
            };
            if i == 0 {
                first_width = child.width as f64 / 2.0;
            } else if i == count - 1 {
                last_width = child.width as f64 / 2.0;
            } else {
                inbetween_widths += child.width;
            }
            s.children.push(child);
        }
        if s.width > 0 {
            s.balanced_line_width =
                (first_width + last_width + inbetween_widths as f64) / s.width as f64;
            s.balanced_line_margin = first_width / s.width as f64;
        }
        track.depth -= 1;
    }
    s.structure_node_count = s.descendant_node_count + s.nodes.len();
    track.pos += 1;
    s.right = track.pos;
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeProps};
    use lexicon::{Atomic, Sentence};
    use std::sync::Arc;

    fn sentence(i: u8) -> Sentence {
        Sentence::from(Atomic::new(i, 0).unwrap())
    }

    fn node(id: u64, i: u8) -> NodeRef {
        Arc::new(Node::new(id, 0, 0, NodeProps::sentence(sentence(i))))
    }

    #[test]
    fn test_single_branch_is_only_branch() {
        let mut b = Branch::new(0, 0);
        b.append(node(1, 0));
        b.append(node(2, 1));
        let tree = build(&[b], &FxHashMap::default());
        assert!(tree.leaf);
        assert!(tree.is_only_branch);
        assert_eq!(tree.nodes.len(), 2);
        assert_eq!(tree.distinct_nodes, 2);
        assert_eq!(tree.width, 1);
    }

    #[test]
    fn test_divergence_creates_children() {
        let shared = node(1, 0);
        let mut b0 = Branch::new(0, 0);
        b0.append(shared.clone());
        let mut b1 = b0.copy(1, 0);
        b0.append(node(2, 1));
        b1.append(node(3, 2));
        let tree = build(&[b0, b1], &FxHashMap::default());
        assert!(!tree.leaf);
        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.width, 2);
        assert_eq!(tree.distinct_nodes, 3);
        assert_eq!(tree.structure_node_count, 3);
        assert!(tree.children.iter().all(|c| c.leaf));
        assert!((tree.balanced_line_width - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_left_right_preorder() {
        let mut b = Branch::new(0, 0);
        b.append(node(1, 0));
        let tree = build(&[b], &FxHashMap::default());
        assert_eq!(tree.left, 1);
        assert_eq!(tree.right, 2);
    }
}
