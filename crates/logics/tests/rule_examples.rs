//! Every rule's example configuration triggers it
//!
//! For each registered logic, each installed rule is given a fresh
//! tableau holding exactly its example nodes and must produce a target.
//! This is the engine-level contract behind the documentation snippets.

use logics::get;
use tableaux::{Tableau, TableauOptions};

fn rule_count(logic: &str) -> usize {
    let mut tab = Tableau::new(TableauOptions::default());
    tab.set_logic(get(logic).unwrap()).unwrap();
    tab.rules().len()
}

fn assert_examples_trigger(logic_name: &str) {
    for index in 0..rule_count(logic_name) {
        let mut tab = Tableau::new(TableauOptions::default());
        tab.set_logic(get(logic_name).unwrap()).unwrap();
        let branch = tab.add_branch();
        let nodes = tab
            .rules()
            .iter()
            .nth(index)
            .map(|e| e.rule().example_nodes())
            .unwrap();
        tab.extend_branch(branch, nodes);
        let entry = tab.rules().iter().nth(index).unwrap();
        assert!(
            entry.rule().get_targets(tab.branch(branch)).is_some(),
            "{logic_name}: example for {} does not trigger",
            entry.name()
        );
    }
}

#[test]
fn fde_examples_trigger() {
    assert_examples_trigger("FDE");
}

#[test]
fn k3_examples_trigger() {
    assert_examples_trigger("K3");
}

#[test]
fn k3w_examples_trigger() {
    assert_examples_trigger("K3W");
}

#[test]
fn lp_examples_trigger() {
    assert_examples_trigger("LP");
}

#[test]
fn l3_examples_trigger() {
    assert_examples_trigger("L3");
}

#[test]
fn g3_examples_trigger() {
    assert_examples_trigger("G3");
}

#[test]
fn rm3_examples_trigger() {
    assert_examples_trigger("RM3");
}

#[test]
fn mh_examples_trigger() {
    assert_examples_trigger("MH");
}

#[test]
fn nh_examples_trigger() {
    assert_examples_trigger("NH");
}

#[test]
fn cpl_examples_trigger() {
    assert_examples_trigger("CPL");
}

#[test]
fn cfol_examples_trigger() {
    assert_examples_trigger("CFOL");
}

#[test]
fn k_examples_trigger() {
    assert_examples_trigger("K");
}

#[test]
fn d_examples_trigger() {
    assert_examples_trigger("D");
}

#[test]
fn t_examples_trigger() {
    assert_examples_trigger("T");
}

#[test]
fn s4_examples_trigger() {
    assert_examples_trigger("S4");
}

#[test]
fn s5_examples_trigger() {
    assert_examples_trigger("S5");
}

// ============================================================================
// Scheduler scoring stamps
// ============================================================================

#[test]
fn group_optimisation_stamps_targets() {
    use notation::Parser;
    let arg = Parser::polish()
        .argument("b", &["Aab", "Acd"], None)
        .unwrap();
    let mut tab = Tableau::for_argument(get("CPL").unwrap(), arg, TableauOptions::default())
        .unwrap();
    tab.build().unwrap();
    let mut saw_group_optim = false;
    for entry in tab.history() {
        let score = &entry.target.score;
        if score.is_group_optim {
            saw_group_optim = true;
            let group = score.group_score.unwrap();
            let min = score.min_group_score.unwrap();
            assert!(group >= min);
            assert!(score.total_group_targets >= 1);
        }
    }
    assert!(saw_group_optim);
}

#[test]
fn group_optimisation_can_be_disabled() {
    use notation::Parser;
    let opts = TableauOptions {
        is_group_optim: false,
        ..TableauOptions::default()
    };
    let arg = Parser::polish().argument("b", &["Aab"], None).unwrap();
    let mut tab = Tableau::for_argument(get("CPL").unwrap(), arg, opts).unwrap();
    tab.build().unwrap();
    assert!(tab
        .history()
        .iter()
        .all(|entry| !entry.target.score.is_group_optim));
}
