//! Engine behaviour against a minimal inline logic
//!
//! A two-rule bivalent system (contradiction closure plus disjunction
//! split) is enough to exercise the driver: lifecycle guards, stepping,
//! group scheduling, history, flags, the tree report, and stats.

use lexicon::{Argument, Atomic, Operator, Sentence};
use smallvec::smallvec;
use tableaux::rule::Adds;
use tableaux::{
    Branch, CounterModel, Logic, Meta, NodeProps, NodeQuery, Rule, RuleSet, TabWriter, Tableau,
    TableauError, TableauOptions, Target,
};

struct Closure;

impl Rule for Closure {
    fn name(&self) -> &'static str {
        "Closure"
    }
    fn is_closure(&self) -> bool {
        true
    }
    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        for node in branch.nodes() {
            let Some(s) = node.sentence() else { continue };
            if branch.has(&NodeQuery::sentence(s.negative()), None) {
                return Some(vec![Target::on(branch.id()).with_node(node.clone())]);
            }
        }
        None
    }
    fn apply(&mut self, target: &Target, tab: &mut TabWriter<'_>) {
        tab.close(target.branch);
    }
    fn example_nodes(&self) -> Vec<NodeProps> {
        let a = Sentence::from(Atomic::new(0, 0).unwrap());
        vec![NodeProps::sentence(a.clone()), NodeProps::sentence(a.negate())]
    }
}

struct Disjunction;

impl Rule for Disjunction {
    fn name(&self) -> &'static str {
        "Disjunction"
    }
    fn branch_level(&self) -> usize {
        2
    }
    fn get_targets(&self, branch: &Branch) -> Option<Vec<Target>> {
        for node in branch.unticked() {
            let Some(s) = node.sentence() else { continue };
            if s.operator() != Some(Operator::Disjunction) {
                continue;
            }
            let adds: Adds = smallvec![
                vec![NodeProps::sentence(s.lhs().unwrap().clone())],
                vec![NodeProps::sentence(s.rhs().unwrap().clone())],
            ];
            return Some(vec![Target::on(branch.id()).with_node(node.clone()).with_adds(adds)]);
        }
        None
    }
    fn example_nodes(&self) -> Vec<NodeProps> {
        let a = Sentence::from(Atomic::new(0, 0).unwrap());
        let b = Sentence::from(Atomic::new(1, 0).unwrap());
        vec![NodeProps::sentence(a.disjoin(&b))]
    }
}

#[derive(Debug)]
struct NoModel(usize);

impl CounterModel for NoModel {
    fn id(&self) -> usize {
        self.0
    }
    fn is_countermodel(&self) -> bool {
        true
    }
    fn is_countermodel_to(&self, _argument: &Argument) -> bool {
        true
    }
}

fn build_trunk(w: &mut TabWriter<'_>, argument: &Argument) {
    let b = w.branch();
    for premise in argument.premises() {
        w.append(b, NodeProps::sentence(premise.clone()));
    }
    w.append(b, NodeProps::sentence(argument.conclusion().negate()));
}

fn add_rules(rules: &mut RuleSet, opts: &TableauOptions) {
    rules
        .add_closure_rule(Box::new(Closure), opts.is_rank_optim)
        .unwrap();
    rules
        .add_group(vec![Box::new(Disjunction)], opts.is_rank_optim)
        .unwrap();
}

fn branching_complexity(props: &NodeProps) -> u32 {
    match &props.sentence {
        Some(s) if s.operator() == Some(Operator::Disjunction) => 1,
        _ => 0,
    }
}

fn build_model(
    _branch: &Branch,
    _argument: Option<&Argument>,
    id: usize,
) -> Box<dyn CounterModel> {
    Box::new(NoModel(id))
}

static TEST_LOGIC: Logic = Logic {
    meta: Meta {
        name: "MINI",
        title: "Minimal disjunctive logic",
        category: "Test",
        description: "Closure plus disjunction split",
        tags: &[],
        category_order: 0,
    },
    build_trunk,
    add_rules,
    branching_complexity,
    build_model,
};

fn atomic(i: u8) -> Sentence {
    Sentence::from(Atomic::new(i, 0).unwrap())
}

fn derivable() -> Argument {
    // Premises a|a and ~a force every branch closed: valid in this mini
    // logic.
    let a = atomic(0);
    Argument::new(atomic(2), [a.disjoin(&a), a.negate()], None)
}

fn affirm_disjunct() -> Argument {
    // premises a|b; conclusion a: invalid.
    Argument::new(atomic(0), [atomic(0).disjoin(&atomic(1))], None)
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_setters_refuse_after_trunk() {
    let mut tab = Tableau::for_argument(&TEST_LOGIC, derivable(), TableauOptions::default())
        .unwrap();
    assert!(tab.is_trunk_built());
    assert!(matches!(
        tab.set_argument(derivable()),
        Err(TableauError::IllegalState(_))
    ));
    assert!(matches!(
        tab.set_logic(&TEST_LOGIC),
        Err(TableauError::IllegalState(_))
    ));
}

#[test]
fn test_rules_lock_on_first_branch() {
    let mut tab = Tableau::new(TableauOptions::default());
    tab.set_logic(&TEST_LOGIC).unwrap();
    assert!(!tab.rules().is_locked());
    tab.add_branch();
    assert!(tab.rules().is_locked());
    assert!(tab.rules_mut().is_err());
}

#[test]
fn test_current_step_counts_trunk_and_history() {
    let mut tab = Tableau::for_argument(&TEST_LOGIC, affirm_disjunct(), TableauOptions::default())
        .unwrap();
    assert_eq!(tab.current_step(), 1);
    tab.build().unwrap();
    assert_eq!(
        tab.current_step(),
        tab.history().len() as u32 + 1
    );
}

// ============================================================================
// Results and invariants
// ============================================================================

#[test]
fn test_valid_argument_closes_all_branches() {
    let mut tab = Tableau::for_argument(&TEST_LOGIC, derivable(), TableauOptions::default())
        .unwrap();
    tab.build().unwrap();
    assert_eq!(tab.valid(), Some(true));
    assert_eq!(tab.invalid(), Some(false));
    assert!(tab.open_branches().is_empty());
    // Closed branches end with the closure flag node.
    for b in tab.branches() {
        assert!(b.is_closed());
        assert!(b.leaf().unwrap().is_flag());
    }
}

#[test]
fn test_invalid_argument_builds_models() {
    let opts = TableauOptions {
        is_build_models: true,
        ..TableauOptions::default()
    };
    let mut tab = Tableau::for_argument(&TEST_LOGIC, affirm_disjunct(), opts).unwrap();
    tab.build().unwrap();
    assert_eq!(tab.invalid(), Some(true));
    assert_eq!(tab.models().len(), tab.open_branches().len());
    assert!(tab.models().iter().all(|m| m.is_countermodel()));
}

#[test]
fn test_branch_count_invariant() {
    let mut tab = Tableau::for_argument(&TEST_LOGIC, affirm_disjunct(), TableauOptions::default())
        .unwrap();
    tab.build().unwrap();
    let stats = tab.stats().unwrap();
    assert_eq!(stats.branches, stats.open_branches + stats.closed_branches);
    assert_eq!(stats.branches, tab.branches().len());
}

#[test]
fn test_step_after_finish_is_noop() {
    let mut tab = Tableau::for_argument(&TEST_LOGIC, derivable(), TableauOptions::default())
        .unwrap();
    tab.build().unwrap();
    let steps = tab.history().len();
    assert!(tab.step().unwrap().is_none());
    assert_eq!(tab.history().len(), steps);
}

// ============================================================================
// Limits
// ============================================================================

#[test]
fn test_max_steps_sets_premature() {
    let opts = TableauOptions {
        max_steps: Some(0),
        ..TableauOptions::default()
    };
    let mut tab = Tableau::for_argument(&TEST_LOGIC, derivable(), opts).unwrap();
    tab.build().unwrap();
    assert!(tab.is_premature());
    assert_eq!(tab.valid(), None);
    assert_eq!(tab.invalid(), None);
    assert_eq!(tab.stats().unwrap().result, "Unfinished");
}

#[test]
fn test_timeout_raises_and_flags() {
    let opts = TableauOptions {
        build_timeout: Some(0),
        ..TableauOptions::default()
    };
    let mut tab = Tableau::for_argument(&TEST_LOGIC, derivable(), opts).unwrap();
    let result = tab.build();
    assert!(matches!(result, Err(TableauError::Timeout(0))));
    assert!(tab.is_timed_out());
    assert!(tab.is_finished());
    assert!(tab.tree().is_none());
}

// ============================================================================
// Tree report and stats
// ============================================================================

#[test]
fn test_tree_report_counts_distinct_nodes() {
    let mut tab = Tableau::for_argument(&TEST_LOGIC, affirm_disjunct(), TableauOptions::default())
        .unwrap();
    tab.build().unwrap();
    let tree = tab.tree().unwrap();
    let mut seen = std::collections::HashSet::new();
    for b in tab.branches() {
        for n in b.nodes() {
            seen.insert(n.id());
        }
    }
    assert_eq!(tree.distinct_nodes, seen.len());
    assert_eq!(tree.width, tab.branches().len());
    assert_eq!(tab.stats().unwrap().distinct_nodes, seen.len());
}

#[test]
fn test_tree_serializes() {
    let mut tab = Tableau::for_argument(&TEST_LOGIC, affirm_disjunct(), TableauOptions::default())
        .unwrap();
    tab.build().unwrap();
    let json = serde_json::to_value(tab.tree().unwrap()).unwrap();
    assert!(json.get("children").is_some());
    let stats = serde_json::to_value(tab.stats().unwrap()).unwrap();
    assert_eq!(stats["result"], "Invalid");
    assert!(stats["rules"].as_array().is_some());
}

#[test]
fn test_history_records_rule_names() {
    let mut tab = Tableau::for_argument(&TEST_LOGIC, derivable(), TableauOptions::default())
        .unwrap();
    tab.build().unwrap();
    let names: Vec<&str> = tab.history().iter().map(|h| h.rule).collect();
    assert!(names.contains(&"Disjunction"));
    assert!(names.contains(&"Closure"));
}

#[test]
fn test_example_nodes_trigger_rules() {
    let mut tab = Tableau::new(TableauOptions::default());
    tab.set_logic(&TEST_LOGIC).unwrap();
    let b = tab.add_branch();
    tab.extend_branch(b, Disjunction.example_nodes());
    let entry = tab.step().unwrap().cloned();
    let entry = entry.expect("a rule application");
    assert_eq!(entry.rule, "Disjunction");
}
