//! The driver
//!
//! Owns the branch list, the rule registry, history, timers, and flags.
//! `build()` loops `step()` until no rule applies, then `finish()`
//! computes the result, reads counter-models from open branches, and
//! builds the tree-structure report.
//!
//! Scheduling walks open branches in insertion order and rule groups in
//! declared order; within a group the highest-scoring target wins when
//! group optimisation is on, first-declared otherwise.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lexicon::{Argument, Sentence};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, trace};

use crate::branch::{Branch, BranchId};
use crate::logic::{CounterModel, Logic};
use crate::node::{Node, NodeId, NodeProps, NodeRef};
use crate::rule::{RuleEntry, RuleSet, Target};
use crate::stopwatch::StopWatch;
use crate::tree::{self, TreeStruct};
use crate::{TableauError, TableauResult};

static TABLEAU_IDS: AtomicUsize = AtomicUsize::new(0);

/// Tableau build options.
#[derive(Debug, Clone)]
pub struct TableauOptions {
    /// Select the highest-scoring applicable rule per group.
    pub is_group_optim: bool,
    /// Rank candidates within a rule by `score_candidate`.
    pub is_rank_optim: bool,
    /// Materialise counter-models for invalid results.
    pub is_build_models: bool,
    /// Max milliseconds for `build()`; `None` disables.
    pub build_timeout: Option<u64>,
    /// Upper bound on history length; exceeding sets the premature flag.
    pub max_steps: Option<usize>,
}

impl Default for TableauOptions {
    fn default() -> TableauOptions {
        TableauOptions {
            is_group_optim: true,
            is_rank_optim: true,
            is_build_models: false,
            build_timeout: None,
            max_steps: None,
        }
    }
}

/// One history entry: a rule application.
#[derive(Debug, Clone)]
pub struct StepEntry {
    /// The applied rule's name.
    pub rule: &'static str,
    /// The applied target.
    pub target: Target,
    /// Elapsed milliseconds for search plus apply.
    pub duration_ms: f64,
}

// Branch mutations are queued as events during an application and
// dispatched to every rule afterwards, in registration order.
#[derive(Debug)]
enum PendingEvent {
    BranchAdd {
        branch: BranchId,
        parent: Option<BranchId>,
    },
    NodeAdd {
        branch: BranchId,
        node: NodeRef,
    },
    NodeTick {
        branch: BranchId,
        node: NodeId,
    },
    BranchClose {
        branch: BranchId,
    },
}

#[derive(Debug)]
pub(crate) struct TabCore {
    branches: Vec<Branch>,
    open: Vec<BranchId>,
    events: Vec<PendingEvent>,
    next_node_id: NodeId,
    current_step: u32,
    complexity_fn: fn(&NodeProps) -> u32,
    complexity_memo: FxHashMap<(Option<Sentence>, Option<bool>), u32>,
}

fn zero_complexity(_: &NodeProps) -> u32 {
    0
}

impl TabCore {
    fn new() -> TabCore {
        TabCore {
            branches: Vec::new(),
            open: Vec::new(),
            events: Vec::new(),
            next_node_id: 0,
            current_step: 0,
            complexity_fn: zero_complexity,
            complexity_memo: FxHashMap::default(),
        }
    }

    fn add_branch(&mut self, parent: Option<BranchId>) -> BranchId {
        let id = self.branches.len();
        let branch = match parent {
            None => Branch::new(id, self.current_step),
            Some(p) => self.branches[p].copy(id, self.current_step),
        };
        let closed = branch.is_closed();
        self.branches.push(branch);
        if !closed {
            self.open.push(id);
        }
        self.events.push(PendingEvent::BranchAdd { branch: id, parent });
        id
    }

    fn complexity(&mut self, props: &NodeProps) -> u32 {
        let key = (props.sentence.clone(), props.designated);
        if let Some(&c) = self.complexity_memo.get(&key) {
            return c;
        }
        let c = (self.complexity_fn)(props);
        self.complexity_memo.insert(key, c);
        c
    }

    fn append(&mut self, branch: BranchId, props: NodeProps) -> NodeRef {
        let complexity = self.complexity(&props);
        let id = self.next_node_id;
        self.next_node_id += 1;
        let node = Arc::new(Node::new(id, self.current_step, complexity, props));
        self.branches[branch].append(node.clone());
        self.events.push(PendingEvent::NodeAdd {
            branch,
            node: node.clone(),
        });
        node
    }

    fn tick(&mut self, branch: BranchId, node: NodeId) {
        let step = self.current_step;
        if self.branches[branch].tick(node, step) {
            self.events.push(PendingEvent::NodeTick { branch, node });
        }
    }

    fn close(&mut self, branch: BranchId) {
        if self.branches[branch].is_closed() {
            return;
        }
        // Terminal marker for renderers, then the closed stamp.
        self.append(branch, NodeProps::closure_flag());
        let step = self.current_step;
        self.branches[branch].set_closed(step);
        self.open.retain(|&b| b != branch);
        self.events.push(PendingEvent::BranchClose { branch });
        trace!(branch, step, "branch closed");
    }
}

/// Mutation handle passed to trunk builders and rule applications.
pub struct TabWriter<'a> {
    core: &'a mut TabCore,
}

impl TabWriter<'_> {
    /// Create a new root branch.
    pub fn branch(&mut self) -> BranchId {
        self.core.add_branch(None)
    }

    /// Create a copy of `parent` as a new branch.
    pub fn fork(&mut self, parent: BranchId) -> BranchId {
        self.core.add_branch(Some(parent))
    }

    /// Append a node to a branch.
    pub fn append(&mut self, branch: BranchId, props: NodeProps) -> NodeRef {
        self.core.append(branch, props)
    }

    /// Append several nodes to a branch.
    pub fn extend(&mut self, branch: BranchId, nodes: impl IntoIterator<Item = NodeProps>) {
        for props in nodes {
            self.core.append(branch, props);
        }
    }

    /// Tick a node on a branch.
    pub fn tick(&mut self, branch: BranchId, node: NodeId) {
        self.core.tick(branch, node);
    }

    /// Close a branch.
    pub fn close(&mut self, branch: BranchId) {
        self.core.close(branch);
    }

    /// Read a branch.
    pub fn branch_ref(&self, branch: BranchId) -> &Branch {
        &self.core.branches[branch]
    }

    /// Drive the default adds/tick protocol: the first adds-group extends
    /// the target branch, each further group extends a copy taken before
    /// the extension; the source node is ticked on every branch.
    pub fn apply_adds(&mut self, target: &Target) {
        let forks: Vec<BranchId> = (1..target.adds.len())
            .map(|_| self.fork(target.branch))
            .collect();
        if let Some(first) = target.adds.first() {
            for props in first {
                self.append(target.branch, props.clone());
            }
        }
        if target.ticks {
            if let Some(node) = &target.node {
                self.tick(target.branch, node.id());
            }
        }
        for (fork, group) in forks.into_iter().zip(target.adds.iter().skip(1)) {
            for props in group {
                self.append(fork, props.clone());
            }
            if target.ticks {
                if let Some(node) = &target.node {
                    self.tick(fork, node.id());
                }
            }
        }
    }
}

/// Per-timer stats.
#[derive(Debug, Clone, Serialize)]
pub struct TimerStats {
    /// Accumulated milliseconds.
    pub duration_ms: f64,
    /// Average milliseconds per start.
    pub duration_avg: f64,
    /// Times started.
    pub count: usize,
}

/// Per-rule stats.
#[derive(Debug, Clone, Serialize)]
pub struct RuleStats {
    /// The rule name.
    pub name: &'static str,
    /// How many times the rule applied.
    pub applied: usize,
    /// Timers by name.
    pub timers: BTreeMap<&'static str, TimerStats>,
}

/// The externally-consumable result summary.
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    /// Tableau identity.
    pub id: usize,
    /// `"Valid"`, `"Invalid"`, or `"Unfinished"`.
    pub result: String,
    /// Total branch count.
    pub branches: usize,
    /// Open branches at finish.
    pub open_branches: usize,
    /// Closed branches at finish.
    pub closed_branches: usize,
    /// Rule applications taken.
    pub steps: usize,
    /// Distinct nodes across all branches.
    pub distinct_nodes: usize,
    /// Sum of per-step durations.
    pub rules_duration_ms: f64,
    /// Total build time.
    pub build_duration_ms: f64,
    /// Trunk construction time.
    pub trunk_duration_ms: f64,
    /// Tree-report construction time.
    pub tree_duration_ms: f64,
    /// Model reading time.
    pub models_duration_ms: f64,
    /// Sum of per-rule search and apply time.
    pub rules_time_ms: f64,
    /// Per-rule breakdown.
    pub rules: Vec<RuleStats>,
}

// Scheduling address of a rule: the closure group or a numbered group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupLoc {
    Closure(usize),
    Group(usize, usize),
}

/// A tableau proof of an argument for a logic.
#[derive(Debug)]
pub struct Tableau {
    id: usize,
    logic: Option<&'static Logic>,
    argument: Option<Argument>,
    opts: TableauOptions,
    core: TabCore,
    rules: RuleSet,
    history: Vec<StepEntry>,
    trunk_built: bool,
    finished: bool,
    premature: bool,
    timed_out: bool,
    build_timer: StopWatch,
    trunk_timer: StopWatch,
    tree_timer: StopWatch,
    models_timer: StopWatch,
    models: Vec<Box<dyn CounterModel>>,
    branch_models: FxHashMap<BranchId, usize>,
    tree: Option<TreeStruct>,
    stats: Option<Stats>,
}

impl Tableau {
    /// An empty tableau with the given options.
    pub fn new(opts: TableauOptions) -> Tableau {
        Tableau {
            id: TABLEAU_IDS.fetch_add(1, Ordering::Relaxed),
            logic: None,
            argument: None,
            opts,
            core: TabCore::new(),
            rules: RuleSet::new(),
            history: Vec::new(),
            trunk_built: false,
            finished: false,
            premature: false,
            timed_out: false,
            build_timer: StopWatch::new(),
            trunk_timer: StopWatch::new(),
            tree_timer: StopWatch::new(),
            models_timer: StopWatch::new(),
            models: Vec::new(),
            branch_models: FxHashMap::default(),
            tree: None,
            stats: None,
        }
    }

    /// A tableau for a logic and argument, trunk built.
    pub fn for_argument(
        logic: &'static Logic,
        argument: Argument,
        opts: TableauOptions,
    ) -> TableauResult<Tableau> {
        let mut tab = Tableau::new(opts);
        tab.set_logic(logic)?;
        tab.set_argument(argument)?;
        Ok(tab)
    }

    /// The tableau identity.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The logic, if set.
    pub fn logic(&self) -> Option<&'static Logic> {
        self.logic
    }

    /// The argument, if set.
    pub fn argument(&self) -> Option<&Argument> {
        self.argument.as_ref()
    }

    /// The options.
    pub fn options(&self) -> &TableauOptions {
        &self.opts
    }

    /// Set the logic; clears and reinstalls rules. Illegal once building
    /// has started.
    pub fn set_logic(&mut self, logic: &'static Logic) -> TableauResult<()> {
        self.check_not_started()?;
        self.logic = Some(logic);
        self.core.complexity_fn = logic.branching_complexity;
        self.rules.clear();
        (logic.add_rules)(&mut self.rules, &self.opts);
        if self.argument.is_some() && !self.trunk_built {
            self.build_trunk()?;
        }
        Ok(())
    }

    /// Set the argument; builds the trunk when a logic is present.
    /// Illegal once the trunk is built.
    pub fn set_argument(&mut self, argument: Argument) -> TableauResult<()> {
        if self.trunk_built {
            return Err(TableauError::IllegalState("trunk is already built"));
        }
        self.argument = Some(argument);
        if self.logic.is_some() {
            self.build_trunk()?;
        }
        Ok(())
    }

    fn check_not_started(&self) -> TableauResult<()> {
        if self.trunk_built || !self.history.is_empty() {
            Err(TableauError::IllegalState("proof has already started"))
        } else {
            Ok(())
        }
    }

    fn build_trunk(&mut self) -> TableauResult<()> {
        if self.trunk_built {
            return Err(TableauError::IllegalState("trunk is already built"));
        }
        let logic = self
            .logic
            .ok_or(TableauError::IllegalState("no logic set"))?;
        let Some(argument) = self.argument.clone() else {
            return Err(TableauError::IllegalState("no argument set"));
        };
        self.trunk_timer.start();
        for entry in self.rules.iter_mut() {
            entry.rule.before_trunk_build(&argument);
        }
        {
            let mut writer = TabWriter { core: &mut self.core };
            (logic.build_trunk)(&mut writer, &argument);
        }
        self.trunk_built = true;
        self.core.current_step = 1;
        self.dispatch_events();
        let Tableau { core, rules, .. } = self;
        for entry in rules.iter_mut() {
            entry.rule.after_trunk_build(&core.branches);
        }
        self.trunk_timer.stop();
        debug!(logic = logic.meta.name, branches = self.core.branches.len(), "trunk built");
        Ok(())
    }

    /// Build until no rule applies, a limit is hit, or the timeout fires.
    pub fn build(&mut self) -> TableauResult<&mut Tableau> {
        self.build_timer.start();
        while !self.finished {
            self.check_timeout()?;
            self.step()?;
        }
        self.build_timer.stop();
        Ok(self)
    }

    fn check_timeout(&mut self) -> TableauResult<()> {
        let Some(timeout) = self.opts.build_timeout else {
            return Ok(());
        };
        if self.build_timer.elapsed_ms() > timeout as f64 {
            self.build_timer.stop();
            self.timed_out = true;
            debug!(timeout, "build timed out");
            self.finish();
            return Err(TableauError::Timeout(timeout));
        }
        Ok(())
    }

    /// Take one step: find and apply the next rule application. Returns
    /// `None` when the tableau finishes (or already was finished).
    pub fn step(&mut self) -> TableauResult<Option<&StepEntry>> {
        if self.finished {
            return Ok(None);
        }
        if self.argument.is_some() && !self.trunk_built {
            return Err(TableauError::IllegalState("trunk is not built"));
        }
        let mut step_timer = StopWatch::new();
        step_timer.start();
        let application = if self.max_steps_exceeded() {
            self.premature = true;
            None
        } else {
            self.next_application()
        };
        match application {
            Some((loc, target)) => {
                self.apply_at(loc, target, &mut step_timer);
                Ok(self.history.last())
            }
            None => {
                if !self.max_steps_exceeded() {
                    self.premature = false;
                }
                self.finish();
                Ok(None)
            }
        }
    }

    fn max_steps_exceeded(&self) -> bool {
        self.opts
            .max_steps
            .is_some_and(|max| self.history.len() >= max)
    }

    // Iterate open branches in insertion order; within a branch, the
    // closure group first, then each group in declared order.
    fn next_application(&mut self) -> Option<(GroupLoc, Target)> {
        let open = self.core.open.clone();
        for branch in open {
            if let Some(found) = self.branch_application(branch) {
                return Some(found);
            }
        }
        None
    }

    fn branch_application(&mut self, branch: BranchId) -> Option<(GroupLoc, Target)> {
        let group_count = self.rules.groups.len();
        if let Some(found) = self.group_application(branch, None) {
            return Some(found);
        }
        for g in 0..group_count {
            if let Some(found) = self.group_application(branch, Some(g)) {
                return Some(found);
            }
        }
        None
    }

    // Collect each rule's best target for the branch. Without group
    // optimisation the first non-empty target wins; with it, the target
    // with the highest group score (first wins ties).
    fn group_application(
        &mut self,
        branch: BranchId,
        group: Option<usize>,
    ) -> Option<(GroupLoc, Target)> {
        let is_group_optim = self.opts.is_group_optim;
        let Tableau { core, rules, .. } = self;
        let branch_ref = &core.branches[branch];
        let entries: &mut [RuleEntry] = match group {
            None => &mut rules.closure,
            Some(g) => &mut rules.groups[g],
        };
        let mut results: Vec<(usize, Target)> = Vec::new();
        for (i, entry) in entries.iter_mut().enumerate() {
            let target = rule_target(entry, branch_ref);
            if let Some(mut target) = target {
                let loc = match group {
                    None => GroupLoc::Closure(i),
                    Some(g) => GroupLoc::Group(g, i),
                };
                if !is_group_optim {
                    target.score.total_group_targets = 1;
                    target.score.is_group_optim = false;
                    return Some((loc, target));
                }
                results.push((i, target));
            }
        }
        if results.is_empty() {
            return None;
        }
        let scores: Vec<f64> = results
            .iter()
            .map(|(i, t)| entries[*i].rule.group_score(t))
            .collect();
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let total = results.len();
        let winner = scores.iter().position(|&s| s == max).unwrap_or(0);
        let (i, mut target) = results.swap_remove(winner);
        target.score.group_score = Some(max);
        target.score.min_group_score = Some(min);
        target.score.total_group_targets = total;
        target.score.is_group_optim = true;
        let loc = match group {
            None => GroupLoc::Closure(i),
            Some(g) => GroupLoc::Group(g, i),
        };
        Some((loc, target))
    }

    fn apply_at(&mut self, loc: GroupLoc, target: Target, step_timer: &mut StopWatch) {
        let rule_name;
        {
            let Tableau { core, rules, .. } = self;
            let entry = match loc {
                GroupLoc::Closure(i) => &mut rules.closure[i],
                GroupLoc::Group(g, i) => &mut rules.groups[g][i],
            };
            rule_name = entry.rule.name();
            let timer = entry.timers.get_mut("apply").expect("apply timer");
            timer.start();
            {
                let mut writer = TabWriter { core };
                entry.rule.apply(&target, &mut writer);
            }
            timer.stop();
            entry.history.push(target.clone());
            entry.rule.after_apply(&target);
        }
        self.dispatch_events();
        step_timer.stop();
        trace!(rule = rule_name, branch = target.branch, "rule applied");
        self.history.push(StepEntry {
            rule: rule_name,
            target,
            duration_ms: step_timer.elapsed_ms(),
        });
        self.core.current_step += 1;
    }

    fn dispatch_events(&mut self) {
        loop {
            let events = std::mem::take(&mut self.core.events);
            if events.is_empty() {
                return;
            }
            for event in events {
                let Tableau { core, rules, .. } = self;
                match event {
                    PendingEvent::BranchAdd { branch, parent } => {
                        if !rules.locked {
                            rules.lock();
                        }
                        let b = &core.branches[branch];
                        for entry in rules.iter_mut() {
                            entry.rule.after_branch_add(b, parent);
                        }
                    }
                    PendingEvent::NodeAdd { branch, node } => {
                        let b = &core.branches[branch];
                        for entry in rules.iter_mut() {
                            entry.rule.after_node_add(&node, b);
                        }
                    }
                    PendingEvent::NodeTick { branch, node } => {
                        let b = &core.branches[branch];
                        let node = b.node(node).cloned();
                        if let Some(node) = node {
                            for entry in rules.iter_mut() {
                                entry.rule.after_node_tick(&node, b);
                            }
                        }
                    }
                    PendingEvent::BranchClose { branch } => {
                        let b = &core.branches[branch];
                        for entry in rules.iter_mut() {
                            entry.rule.after_branch_close(b);
                        }
                    }
                }
            }
        }
    }

    /// Mark the tableau finished: read counter-models, build the tree
    /// report, compute stats. Idempotent.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.models_timer.start();
        if self.opts.is_build_models && !self.timed_out && self.invalid() == Some(true) {
            if let Some(logic) = self.logic {
                for &b in &self.core.open {
                    let model_id = self.models.len();
                    let model = (logic.build_model)(
                        &self.core.branches[b],
                        self.argument.as_ref(),
                        model_id,
                    );
                    if !model.is_countermodel() {
                        tracing::warn!(branch = b, model_id, "model fails its argument");
                    }
                    self.branch_models.insert(b, model_id);
                    self.models.push(model);
                }
            }
        }
        self.models_timer.stop();
        self.tree_timer.start();
        if !self.timed_out {
            self.tree = Some(tree::build(&self.core.branches, &self.branch_models));
        }
        self.tree_timer.stop();
        self.stats = Some(self.compute_stats());
        debug!(
            result = self.result_word(),
            branches = self.core.branches.len(),
            steps = self.history.len(),
            "tableau finished"
        );
    }

    /// Whether the tableau is finished.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the build ended prematurely (max steps).
    pub fn is_premature(&self) -> bool {
        self.premature
    }

    /// Whether the build timed out.
    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    /// Whether the trunk has been built.
    pub fn is_trunk_built(&self) -> bool {
        self.trunk_built
    }

    fn completed(&self) -> bool {
        self.finished && !self.premature && !self.timed_out
    }

    /// Valid iff completed with no open branches; `None` when incomplete.
    pub fn valid(&self) -> Option<bool> {
        self.completed().then(|| self.core.open.is_empty())
    }

    /// Invalid iff completed with an open branch; `None` when incomplete.
    pub fn invalid(&self) -> Option<bool> {
        self.completed().then(|| !self.core.open.is_empty())
    }

    fn result_word(&self) -> &'static str {
        match (self.valid(), self.invalid()) {
            (Some(true), _) => "Valid",
            (_, Some(true)) => "Invalid",
            _ => "Unfinished",
        }
    }

    /// The current step number.
    pub fn current_step(&self) -> u32 {
        self.history.len() as u32 + u32::from(self.trunk_built)
    }

    /// The rule-application history.
    pub fn history(&self) -> &[StepEntry] {
        &self.history
    }

    /// All branches, in append order.
    pub fn branches(&self) -> &[Branch] {
        &self.core.branches
    }

    /// A branch by id.
    pub fn branch(&self, id: BranchId) -> &Branch {
        &self.core.branches[id]
    }

    /// Open branch ids, in insertion order.
    pub fn open_branches(&self) -> &[BranchId] {
        &self.core.open
    }

    /// The rule registry.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Mutable rule registry, for rule-level tests. Illegal once locked.
    pub fn rules_mut(&mut self) -> TableauResult<&mut RuleSet> {
        if self.rules.locked {
            Err(TableauError::IllegalState("rules are locked"))
        } else {
            Ok(&mut self.rules)
        }
    }

    /// Add an empty branch, for rule-level tests and trunkless use.
    pub fn add_branch(&mut self) -> BranchId {
        let id = self.core.add_branch(None);
        self.dispatch_events();
        id
    }

    /// Append nodes to a branch outside any rule application.
    pub fn extend_branch(&mut self, branch: BranchId, nodes: impl IntoIterator<Item = NodeProps>) {
        for props in nodes {
            self.core.append(branch, props);
        }
        self.dispatch_events();
    }

    /// The counter-models read on finish.
    pub fn models(&self) -> &[Box<dyn CounterModel>] {
        &self.models
    }

    /// The tree-structure report, after finish.
    pub fn tree(&self) -> Option<&TreeStruct> {
        self.tree.as_ref()
    }

    /// The stats summary, after finish.
    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    fn compute_stats(&self) -> Stats {
        let open = self.core.open.len();
        let branches = self.core.branches.len();
        let distinct_nodes = match &self.tree {
            Some(tree) => tree.distinct_nodes,
            None => {
                let mut seen = rustc_hash::FxHashSet::default();
                for b in &self.core.branches {
                    for n in b.nodes() {
                        seen.insert(n.id());
                    }
                }
                seen.len()
            }
        };
        let rules = self
            .rules
            .iter()
            .map(|entry| RuleStats {
                name: entry.name(),
                applied: entry.history().len(),
                timers: entry
                    .timers()
                    .iter()
                    .map(|(&name, w)| {
                        (
                            name,
                            TimerStats {
                                duration_ms: w.elapsed_ms(),
                                duration_avg: w.elapsed_avg(),
                                count: w.times_started(),
                            },
                        )
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();
        let rules_time_ms = self
            .rules
            .iter()
            .map(|e| {
                e.timers()
                    .values()
                    .map(StopWatch::elapsed_ms)
                    .sum::<f64>()
            })
            .sum();
        Stats {
            id: self.id,
            result: self.result_word().to_string(),
            branches,
            open_branches: open,
            closed_branches: branches - open,
            steps: self.history.len(),
            distinct_nodes,
            rules_duration_ms: self.history.iter().map(|h| h.duration_ms).sum(),
            build_duration_ms: self.build_timer.elapsed_ms(),
            trunk_duration_ms: self.trunk_timer.elapsed_ms(),
            tree_duration_ms: self.tree_timer.elapsed_ms(),
            models_duration_ms: self.models_timer.elapsed_ms(),
            rules_time_ms,
            rules,
        }
    }
}

// Time the search, fetch targets, stamp candidate scores, and select the
// best target for one rule on one branch.
fn rule_target(entry: &mut RuleEntry, branch: &Branch) -> Option<Target> {
    let timer = entry.timers.get_mut("search").expect("search timer");
    timer.start();
    let targets = entry.rule.get_targets(branch);
    timer.stop();
    let mut targets = targets?;
    if targets.is_empty() {
        return None;
    }
    if !entry.is_rank_optim {
        let mut target = targets.swap_remove(0);
        target.score.is_rank_optim = false;
        target.score.total_candidates = targets.len() + 1;
        return Some(target);
    }
    let scores: Vec<f64> = targets
        .iter()
        .map(|t| entry.rule.score_candidate(t))
        .collect();
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let total = targets.len();
    let winner = scores.iter().position(|&s| s == max).unwrap_or(0);
    let mut target = targets.swap_remove(winner);
    target.score.is_rank_optim = true;
    target.score.candidate_score = max;
    target.score.min_candidate_score = min;
    target.score.max_candidate_score = max;
    target.score.total_candidates = total;
    Some(target)
}
