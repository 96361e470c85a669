//! Shared rule implementations
//!
//! Most operator rules are data: a shape filter plus an adds-builder
//! wrapped by the generic [`NodeRule`]. Rules with per-branch state
//! (quantifiers, modal operators, identity, closure) are concrete structs
//! in the submodules.

/// Closing rules
pub mod closure;
/// Quantifier rules
pub mod quantifier;
/// Modal operator and access rules
pub mod modal;
/// Identity rules
pub mod identity;

use lexicon::{Atomic, Operator, Parameter, Predicate, Quantifier, Sentence, Variable};
use tableaux::rule::Adds;
use tableaux::{Branch, NodeProps, Rule, Target, World};

/// The node context handed to an adds-builder: the matched sentence with
/// the node's markers.
#[derive(Debug)]
pub struct BuildCtx<'a> {
    /// The matched sentence, negation stripped for negated rules.
    pub s: &'a Sentence,
    /// The node's designation marker.
    pub designated: Option<bool>,
    /// The node's world marker.
    pub world: Option<World>,
}

impl BuildCtx<'_> {
    /// Left operand of the matched sentence.
    pub fn lhs(&self) -> Sentence {
        self.s.lhs().cloned().expect("binary sentence")
    }

    /// Right operand of the matched sentence.
    pub fn rhs(&self) -> Sentence {
        self.s.rhs().cloned().expect("binary sentence")
    }

    /// Sole operand of the matched sentence.
    pub fn operand(&self) -> Sentence {
        self.s.operand().cloned().expect("unary sentence")
    }

    /// A node with an explicit designation marker (FDE family).
    pub fn d(&self, s: Sentence, designated: bool) -> NodeProps {
        NodeProps::designated(s, designated)
    }

    /// A node inheriting the matched node's markers.
    pub fn keep(&self, s: Sentence) -> NodeProps {
        NodeProps {
            sentence: Some(s),
            designated: self.designated,
            world: self.world,
            ..NodeProps::default()
        }
    }
}

/// Builder signature for [`NodeRule`].
pub type BuildFn = fn(&BuildCtx<'_>) -> Adds;

/// The shape filter of a node rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeFilter {
    /// Top-level operator to match (under negation when `negated`).
    pub operator: Option<Operator>,
    /// Top-level quantifier to match (under negation when `negated`).
    pub quantifier: Option<Quantifier>,
    /// Whether a leading negation is required.
    pub negated: bool,
    /// Required designation marker; `None` for marker-free logics.
    pub designation: Option<bool>,
}

impl NodeFilter {
    /// The inner sentence when the node's sentence matches the filter.
    pub fn matches<'a>(&self, sentence: &'a Sentence, designated: Option<bool>) -> Option<&'a Sentence> {
        if self.designation != designated {
            return None;
        }
        let inner = if self.negated {
            sentence.negatum()?
        } else {
            sentence
        };
        if let Some(op) = self.operator {
            if inner.operator() != Some(op) {
                return None;
            }
        }
        if let Some(q) = self.quantifier {
            if inner.quantifier() != Some(q) {
                return None;
            }
        }
        Some(inner)
    }
}

/// A declarative node rule: walks the first unticked nodes matching the
/// filter and applies the built adds-groups.
pub struct NodeRule {
    name: &'static str,
    filter: NodeFilter,
    modal_context: bool,
    branch_level: usize,
    build: BuildFn,
}

impl NodeRule {
    /// An operator rule.
    pub fn operated(
        name: &'static str,
        operator: Operator,
        negated: bool,
        designation: Option<bool>,
        branch_level: usize,
        build: BuildFn,
    ) -> NodeRule {
        NodeRule {
            name,
            filter: NodeFilter {
                operator: Some(operator),
                quantifier: None,
                negated,
                designation,
            },
            modal_context: false,
            branch_level,
            build,
        }
    }

    /// A negated-quantifier rule.
    pub fn quantified(
        name: &'static str,
        quantifier: Quantifier,
        negated: bool,
        designation: Option<bool>,
        build: BuildFn,
    ) -> NodeRule {
        NodeRule {
            name,
            filter: NodeFilter {
                operator: None,
                quantifier: Some(quantifier),
                negated,
                designation,
            },
            modal_context: false,
            branch_level: 1,
            build,
        }
    }

    /// Mark the rule as operating on world-marked nodes.
    pub fn modal(mut self) -> NodeRule {
        self.modal_context = true;
        self
    }

    /// The filter, for tests.
    pub fn filter(&self) -> &NodeFilter {
        &self.filter
    }
}

impl Rule for NodeRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn branch_level(&self) -> usize {
        self.branch_level
    }

    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        let mut targets = Vec::new();
        for node in branch.unticked() {
            let Some(sentence) = node.sentence() else {
                continue;
            };
            let Some(inner) = self.filter.matches(sentence, node.designated()) else {
                continue;
            };
            let ctx = BuildCtx {
                s: inner,
                designated: node.designated(),
                world: node.world(),
            };
            let adds = (self.build)(&ctx);
            let mut target = Target::on(branch.id())
                .with_node(node.clone())
                .with_adds(adds);
            target.sentence = Some(inner.clone());
            targets.push(target);
        }
        if targets.is_empty() {
            None
        } else {
            Some(targets)
        }
    }

    fn score_candidate(&self, target: &Target) -> f64 {
        target
            .node
            .as_ref()
            .map_or(0.0, |n| -(n.branching_complexity() as f64))
    }

    fn example_nodes(&self) -> Vec<NodeProps> {
        let sentence = example_sentence(&self.filter);
        vec![NodeProps {
            sentence: Some(sentence),
            designated: self.filter.designation,
            world: if self.modal_context { Some(0) } else { None },
            ..NodeProps::default()
        }]
    }
}

pub(crate) fn example_sentence(filter: &NodeFilter) -> Sentence {
    let a = Sentence::from(Atomic::new(0, 0).unwrap());
    let b = Sentence::from(Atomic::new(1, 0).unwrap());
    let inner = if let Some(op) = filter.operator {
        match op.arity() {
            1 => Sentence::operated(op, [a]).unwrap(),
            _ => Sentence::operated(op, [a, b]).unwrap(),
        }
    } else if let Some(q) = filter.quantifier {
        let v = Variable::new(0, 0).unwrap();
        let p = Predicate::new(0, 0, 1, None).unwrap();
        let body = Sentence::predicated(p, [Parameter::from(v)]).unwrap();
        Sentence::quantified(q, v, body).unwrap()
    } else {
        a
    };
    if filter.negated {
        inner.negate()
    } else {
        inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn atomic(i: u8) -> Sentence {
        Sentence::from(Atomic::new(i, 0).unwrap())
    }

    #[test]
    fn test_filter_matches_negated_operator() {
        let filter = NodeFilter {
            operator: Some(Operator::Conjunction),
            quantifier: None,
            negated: true,
            designation: Some(true),
        };
        let s = atomic(0).conjoin(&atomic(1)).negate();
        assert!(filter.matches(&s, Some(true)).is_some());
        assert!(filter.matches(&s, Some(false)).is_none());
        assert!(filter.matches(&atomic(0).conjoin(&atomic(1)), Some(true)).is_none());
    }

    #[test]
    fn test_example_nodes_trigger_filter() {
        let rule = NodeRule::operated(
            "ConjunctionDesignated",
            Operator::Conjunction,
            false,
            Some(true),
            1,
            |ctx| smallvec![vec![ctx.d(ctx.lhs(), true), ctx.d(ctx.rhs(), true)]],
        );
        let nodes = rule.example_nodes();
        let s = nodes[0].sentence.clone().unwrap();
        assert!(rule.filter().matches(&s, nodes[0].designated).is_some());
    }
}
