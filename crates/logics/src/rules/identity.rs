//! Identity rules
//!
//! Indiscernibility of identicals: a positive identity `a = b` licenses
//! rewriting any predication over `a` into one over `b` (and conversely)
//! at the same world. The source nodes are never ticked.

use lexicon::{Constant, Parameter, Predicate, Sentence};
use smallvec::smallvec;
use tableaux::helpers::PredicatedNodes;
use tableaux::node::NodeRef;
use tableaux::{Branch, BranchId, NodeProps, NodeQuery, Rule, Target};

/// The identity-indiscernibility rule.
pub struct IdentityIndiscernability {
    modal: bool,
    preds: PredicatedNodes,
}

impl IdentityIndiscernability {
    /// A rule for marker-free branches.
    pub fn new() -> IdentityIndiscernability {
        IdentityIndiscernability {
            modal: false,
            preds: PredicatedNodes::default(),
        }
    }

    /// A rule for world-marked branches.
    pub fn modal() -> IdentityIndiscernability {
        IdentityIndiscernability {
            modal: true,
            preds: PredicatedNodes::default(),
        }
    }
}

impl Default for IdentityIndiscernability {
    fn default() -> Self {
        Self::new()
    }
}

fn positive_identity_pair(s: &Sentence) -> Option<(Constant, Constant)> {
    let p = s.predication()?;
    if !p.predicate.is_identity() {
        return None;
    }
    match (p.params[0], p.params[1]) {
        (Parameter::Constant(a), Parameter::Constant(b)) if a != b => Some((a, b)),
        _ => None,
    }
}

impl Rule for IdentityIndiscernability {
    fn name(&self) -> &'static str {
        "IdentityIndiscernability"
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        let mut targets = Vec::new();
        for node in branch.nodes() {
            let Some(sentence) = node.sentence() else { continue };
            let Some((a, b)) = positive_identity_pair(sentence) else {
                continue;
            };
            for pn in self.preds.get(branch.id()) {
                let Some(ps) = pn.sentence() else { continue };
                if ps.predicate().is_some_and(Predicate::is_identity) && ps == sentence {
                    continue;
                }
                for (from, to) in [(a, b), (b, a)] {
                    let rewritten =
                        ps.substitute(Parameter::Constant(to), Parameter::Constant(from));
                    if &rewritten == ps {
                        continue;
                    }
                    let world = pn.world();
                    if branch.has(&NodeQuery::maybe_world(rewritten.clone(), world), None) {
                        continue;
                    }
                    let mut target = Target::on(branch.id())
                        .with_node(pn.clone())
                        .with_adds(smallvec![vec![NodeProps::maybe_world(
                            rewritten.clone(),
                            world
                        )]])
                        .without_tick();
                    target.sentence = Some(rewritten);
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
        let world = if self.modal { Some(0) } else { None };
        let a = Constant::new(0, 0).unwrap();
        let b = Constant::new(1, 0).unwrap();
        let identity = Sentence::predicated(
            Predicate::identity(),
            [Parameter::from(a), Parameter::from(b)],
        )
        .unwrap();
        let p = Predicate::new(0, 0, 1, None).unwrap();
        let pa = Sentence::predicated(p, [Parameter::from(a)]).unwrap();
        vec![
            NodeProps::maybe_world(identity, world),
            NodeProps::maybe_world(pa, world),
        ]
    }

    fn after_branch_add(&mut self, branch: &Branch, parent: Option<BranchId>) {
        self.preds.on_branch_add(branch, parent);
    }

    fn after_node_add(&mut self, node: &NodeRef, branch: &Branch) {
        self.preds.on_node_add(node, branch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_predication_over_identical() {
        let mut rule = IdentityIndiscernability::new();
        let mut branch = Branch::standalone();
        rule.after_branch_add(&branch, None);
        for props in rule.example_nodes() {
            let node = branch.append_props(props);
            rule.after_node_add(&node, &branch);
        }
        let targets = rule.get_targets(&branch).unwrap();
        // P(a) with a = b licenses P(b).
        let expected = {
            let b = Constant::new(1, 0).unwrap();
            let p = Predicate::new(0, 0, 1, None).unwrap();
            Sentence::predicated(p, [Parameter::from(b)]).unwrap()
        };
        assert!(targets.iter().any(|t| t.sentence.as_ref() == Some(&expected)));
    }
}
