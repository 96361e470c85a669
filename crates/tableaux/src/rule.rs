//! The rule trait, targets, and the grouped rule registry
//!
//! A rule examines a branch for a target and applies it by appending
//! nodes, forking branches, ticking its source node, or closing the
//! branch. Most rules only describe their effect through the target's
//! `adds` groups and use the default apply; closing rules override apply.
//!
//! Rules are registered in a closure group plus ordered named groups. The
//! registry locks on the first branch addition; later mutation is an
//! illegal state.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use lexicon::{Constant, Sentence};

use crate::branch::{Branch, BranchId};
use crate::node::{NodeProps, NodeRef, World};
use crate::stopwatch::StopWatch;
use crate::tableau::TabWriter;
use crate::{TableauError, TableauResult};

/// The node groups a rule application adds: the first group extends the
/// target branch, each further group extends a pre-extension copy.
pub type Adds = SmallVec<[Vec<NodeProps>; 2]>;

/// Scoring stamps applied by the scheduler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetScore {
    /// This candidate's score.
    pub candidate_score: f64,
    /// Minimum score among the rule's candidates.
    pub min_candidate_score: f64,
    /// Maximum score among the rule's candidates.
    pub max_candidate_score: f64,
    /// Number of candidates the rule produced.
    pub total_candidates: usize,
    /// Whether candidate ranking was enabled.
    pub is_rank_optim: bool,
    /// The winning group score, when group optimisation ran.
    pub group_score: Option<f64>,
    /// Minimum group score among the group's targets.
    pub min_group_score: Option<f64>,
    /// Number of targets in the group.
    pub total_group_targets: usize,
    /// Whether group optimisation ran.
    pub is_group_optim: bool,
}

/// What a rule acts on, and how.
#[derive(Debug, Clone)]
pub struct Target {
    /// The branch the target was found on.
    pub branch: BranchId,
    /// The source node, if the rule consumes one.
    pub node: Option<NodeRef>,
    /// The sentence acted on, if relevant.
    pub sentence: Option<Sentence>,
    /// The constant instantiated, for quantifier rules.
    pub constant: Option<Constant>,
    /// The world acted on, for modal rules.
    pub world: Option<World>,
    /// The access pair produced, for access rules.
    pub world_pair: Option<(World, World)>,
    /// The node groups to add.
    pub adds: Adds,
    /// Whether this application emits a quit flag.
    pub is_flag: bool,
    /// Whether the default apply ticks the source node.
    pub ticks: bool,
    /// Scheduler scoring stamps.
    pub score: TargetScore,
}

impl Target {
    /// A target on a branch with no adds; callers fill in the rest.
    pub fn on(branch: BranchId) -> Target {
        Target {
            branch,
            node: None,
            sentence: None,
            constant: None,
            world: None,
            world_pair: None,
            adds: Adds::new(),
            is_flag: false,
            ticks: true,
            score: TargetScore::default(),
        }
    }

    /// Set the source node.
    pub fn with_node(mut self, node: NodeRef) -> Target {
        self.node = Some(node);
        self
    }

    /// Set the adds groups.
    pub fn with_adds(mut self, adds: Adds) -> Target {
        self.adds = adds;
        self
    }

    /// Mark as a quit-flag application.
    pub fn flagging(mut self) -> Target {
        self.is_flag = true;
        self
    }

    /// Keep the source node unticked (all-constants rules).
    pub fn without_tick(mut self) -> Target {
        self.ticks = false;
        self
    }

    /// The number of branches this target produces.
    pub fn branch_count(&self) -> usize {
        self.adds.len().max(1)
    }
}

/// A tableau rule.
///
/// `get_targets` examines a branch; `apply` mutates branches through the
/// writer. The event hooks keep per-rule helper state in sync with the
/// tableau; defaults are no-ops.
pub trait Rule {
    /// The rule name, as shown in stats and history.
    fn name(&self) -> &'static str;

    /// Branches produced per application.
    fn branch_level(&self) -> usize {
        1
    }

    /// Whether this rule closes branches.
    fn is_closure(&self) -> bool {
        false
    }

    /// Whether candidate ranking applies to this rule by default.
    fn rank_optim(&self) -> bool {
        !self.is_closure()
    }

    /// Candidate targets on the branch, or `None`.
    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>>;

    /// Score a candidate target. Default 0.
    fn score_candidate(&self, _target: &Target) -> f64 {
        0.0
    }

    /// Score a target for group optimisation.
    fn group_score(&self, target: &Target) -> f64 {
        self.score_candidate(target) / self.branch_level().max(1) as f64
    }

    /// Apply the target. The default drives the adds/tick protocol.
    fn apply(&mut self, target: &Target, tab: &mut TabWriter<'_>) {
        tab.apply_adds(target);
    }

    /// Whether adding the nodes would close the branch under this rule's
    /// contradiction shape. Closing rules override this for closure
    /// scoring; all other rules never close a branch.
    fn nodes_will_close_branch(&self, _nodes: &[NodeProps], _branch: &Branch) -> bool {
        false
    }

    /// A minimal node configuration that triggers the rule.
    fn example_nodes(&self) -> Vec<NodeProps>;

    /// Called once just before the trunk is built.
    fn before_trunk_build(&mut self, _argument: &lexicon::Argument) {}

    /// Called once after the trunk is built.
    fn after_trunk_build(&mut self, _branches: &[Branch]) {}

    /// Called after a branch is added, with its parent if copied.
    fn after_branch_add(&mut self, _branch: &Branch, _parent: Option<BranchId>) {}

    /// Called after a node is appended to a branch.
    fn after_node_add(&mut self, _node: &NodeRef, _branch: &Branch) {}

    /// Called after a node is ticked on a branch.
    fn after_node_tick(&mut self, _node: &NodeRef, _branch: &Branch) {}

    /// Called after a branch closes.
    fn after_branch_close(&mut self, _branch: &Branch) {}

    /// Called on the applying rule after each of its applications.
    fn after_apply(&mut self, _target: &Target) {}
}

/// One registered rule with its timers and application history.
pub struct RuleEntry {
    pub(crate) rule: Box<dyn Rule>,
    pub(crate) is_rank_optim: bool,
    pub(crate) timers: FxHashMap<&'static str, StopWatch>,
    pub(crate) history: Vec<Target>,
}

impl RuleEntry {
    fn new(rule: Box<dyn Rule>, rank_optim: bool) -> RuleEntry {
        let is_rank_optim = rank_optim && rule.rank_optim();
        let mut timers = FxHashMap::default();
        timers.insert("search", StopWatch::new());
        timers.insert("apply", StopWatch::new());
        RuleEntry {
            rule,
            is_rank_optim,
            timers,
            history: Vec::new(),
        }
    }

    /// The rule name.
    pub fn name(&self) -> &'static str {
        self.rule.name()
    }

    /// The rule itself.
    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    /// Applied targets, in order.
    pub fn history(&self) -> &[Target] {
        &self.history
    }

    /// The rule's timers by name.
    pub fn timers(&self) -> &FxHashMap<&'static str, StopWatch> {
        &self.timers
    }
}

impl std::fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEntry")
            .field("name", &self.rule.name())
            .field("applied", &self.history.len())
            .finish()
    }
}

/// The grouped rule registry of a tableau.
#[derive(Debug, Default)]
pub struct RuleSet {
    pub(crate) closure: Vec<RuleEntry>,
    pub(crate) groups: Vec<Vec<RuleEntry>>,
    pub(crate) locked: bool,
}

impl RuleSet {
    pub(crate) fn new() -> RuleSet {
        RuleSet::default()
    }

    /// Add a closing rule to the closure group.
    pub fn add_closure_rule(
        &mut self,
        rule: Box<dyn Rule>,
        rank_optim: bool,
    ) -> TableauResult<()> {
        self.check_unlocked()?;
        self.closure.push(RuleEntry::new(rule, rank_optim));
        Ok(())
    }

    /// Append a rule group; groups run in insertion order.
    pub fn add_group(
        &mut self,
        rules: Vec<Box<dyn Rule>>,
        rank_optim: bool,
    ) -> TableauResult<()> {
        self.check_unlocked()?;
        self.groups
            .push(rules.into_iter().map(|r| RuleEntry::new(r, rank_optim)).collect());
        Ok(())
    }

    /// All rules in scheduling order: closure group first.
    pub fn iter(&self) -> impl Iterator<Item = &RuleEntry> {
        self.closure.iter().chain(self.groups.iter().flatten())
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut RuleEntry> {
        self.closure.iter_mut().chain(self.groups.iter_mut().flatten())
    }

    /// Find a rule entry by name.
    pub fn get(&self, name: &str) -> Option<&RuleEntry> {
        self.iter().find(|e| e.name() == name)
    }

    /// Total rule count.
    pub fn len(&self) -> usize {
        self.closure.len() + self.groups.iter().map(Vec::len).sum::<usize>()
    }

    /// Whether no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the registry is locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn clear(&mut self) {
        self.closure.clear();
        self.groups.clear();
    }

    pub(crate) fn lock(&mut self) {
        self.locked = true;
    }

    fn check_unlocked(&self) -> TableauResult<()> {
        if self.locked {
            Err(TableauError::IllegalState("rules are locked"))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    impl Rule for Dummy {
        fn name(&self) -> &'static str {
            "Dummy"
        }
        fn get_targets(&self, _branch: &Branch) -> Option<Vec<Target>> {
            None
        }
        fn example_nodes(&self) -> Vec<NodeProps> {
            Vec::new()
        }
    }

    #[test]
    fn test_registry_locks() {
        let mut rules = RuleSet::new();
        rules.add_group(vec![Box::new(Dummy)], true).unwrap();
        rules.lock();
        assert!(matches!(
            rules.add_group(vec![Box::new(Dummy)], true),
            Err(TableauError::IllegalState(_))
        ));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_default_group_score_divides_by_branch_level() {
        struct TwoWay;
        impl Rule for TwoWay {
            fn name(&self) -> &'static str {
                "TwoWay"
            }
            fn branch_level(&self) -> usize {
                2
            }
            fn get_targets(&self, _branch: &Branch) -> Option<Vec<Target>> {
                None
            }
            fn score_candidate(&self, _t: &Target) -> f64 {
                1.0
            }
            fn example_nodes(&self) -> Vec<NodeProps> {
                Vec::new()
            }
        }
        let t = Target::on(0);
        assert_eq!(TwoWay.group_score(&t), 0.5);
    }
}
