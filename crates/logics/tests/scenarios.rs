//! End-to-end scenarios
//!
//! The canonical argument/result pairs, stated in polish notation, plus
//! validity spot-checks for every registered logic drawn from the classic
//! example arguments.

use logics::{examples, get};
use notation::Parser;
use tableaux::{Tableau, TableauOptions};

fn build_opts(logic: &str, conclusion: &str, premises: &[&str], opts: TableauOptions) -> Tableau {
    let logic = get(logic).unwrap();
    let arg = Parser::polish()
        .argument(conclusion, premises, None)
        .unwrap();
    let mut tab = Tableau::for_argument(logic, arg, opts).unwrap();
    let _ = tab.build();
    tab
}

fn build(logic: &str, conclusion: &str, premises: &[&str]) -> Tableau {
    build_opts(logic, conclusion, premises, TableauOptions::default())
}

fn assert_valid(logic: &str, conclusion: &str, premises: &[&str]) {
    let tab = build(logic, conclusion, premises);
    assert_eq!(
        tab.valid(),
        Some(true),
        "{logic}: {premises:?} / {conclusion} should be valid"
    );
}

fn assert_invalid(logic: &str, conclusion: &str, premises: &[&str]) {
    let tab = build(logic, conclusion, premises);
    assert_eq!(
        tab.invalid(),
        Some(true),
        "{logic}: {premises:?} / {conclusion} should be invalid"
    );
}

// ============================================================================
// The seven canonical scenarios
// ============================================================================

#[test]
fn scenario_1_cpl_modus_ponens_valid() {
    assert_valid("CPL", "b", &["Cab", "a"]);
}

#[test]
fn scenario_2_cpl_affirming_the_consequent_countermodel() {
    use logics::{cpl, Model, Value};
    let opts = TableauOptions {
        is_build_models: true,
        ..TableauOptions::default()
    };
    let tab = build_opts("CPL", "a", &["Cab", "b"], opts);
    assert_eq!(tab.invalid(), Some(true));
    assert!(!tab.open_branches().is_empty());
    assert_eq!(tab.models().len(), tab.open_branches().len());
    let arg = tab.argument().unwrap().clone();
    for model in tab.models() {
        assert!(model.is_countermodel());
        assert!(model.is_countermodel_to(&arg));
    }
    // The counter-model reads a = F, b = T off the open branch.
    let branch = &tab.branches()[tab.open_branches()[0]];
    let model = Model::read_branch(&cpl::SEMANTICS, branch, Some(&arg), 0);
    let mut p = Parser::polish();
    assert_eq!(model.value_of(&p.parse("a").unwrap(), 0).unwrap(), Value::F);
    assert_eq!(model.value_of(&p.parse("b").unwrap(), 0).unwrap(), Value::T);
}

#[test]
fn scenario_3_k3_excluded_middle_invalid() {
    assert_invalid("K3", "AaNa", &[]);
}

#[test]
fn scenario_4_lp_explosion_invalid() {
    assert_invalid("LP", "b", &["KaNa"]);
}

#[test]
fn scenario_5_fde_disjunctive_syllogism_invalid() {
    assert_invalid("FDE", "a", &["Aab", "Nb"]);
}

#[test]
fn scenario_6_k_trunk_is_one_world() {
    let tab = build("K", "b", &["CaLMa"]);
    assert_eq!(tab.invalid(), Some(true));
    // Building the trunk for CaLMa must not fan out worlds: every edge
    // on every branch leaves a world at most once per possibility.
    for branch in tab.branches() {
        let mut seen = std::collections::HashSet::new();
        for node in branch.nodes() {
            if let Some(pair) = node.access() {
                assert!(seen.insert(pair), "duplicate access node {pair:?}");
            }
        }
    }
}

#[test]
fn scenario_7_s5_quantified_modal_under_step_cap() {
    let opts = TableauOptions {
        max_steps: Some(200),
        is_build_models: false,
        ..TableauOptions::default()
    };
    let tab = build_opts("S5", "b", &["LVxSyUFxLMGy"], opts);
    // Completes within the cap with an open branch.
    assert!(tab.is_finished());
    assert!(!tab.open_branches().is_empty());
}

// ============================================================================
// Classical logics
// ============================================================================

#[test]
fn cpl_validities() {
    assert_valid("CPL", "a", &["Kab"]);
    assert_valid("CPL", "Aab", &["a"]);
    assert_valid("CPL", "Na", &["Cab", "Nb"]);
    assert_valid("CPL", "Caa", &[]);
    assert_valid("CPL", "b", &["Eab", "a"]);
    assert_valid("CPL", "KNaNb", &["NAab"]);
}

#[test]
fn cpl_invalidities() {
    assert_invalid("CPL", "b", &["a"]);
    assert_invalid("CPL", "a", &[]);
    assert_invalid("CPL", "Cba", &["Cab"]);
    assert_invalid("CPL", "b", &["Cab", "Na"]);
}

#[test]
fn cfol_quantified() {
    assert_valid("CFOL", "Fm", &["VxFx"]);
    assert_valid("CFOL", "VxUFxHx", &["VxUFxGx", "VxUGxHx"]);
    assert_invalid("CFOL", "VxFx", &["SxFx"]);
}

// ============================================================================
// Many-valued logics
// ============================================================================

#[test]
fn fde_family_shared_results() {
    for logic in ["FDE", "K3", "K3W", "LP", "L3", "G3", "RM3"] {
        assert_valid(logic, "a", &["Kab"]);
        assert_invalid(logic, "b", &["a"]);
    }
    // Addition holds everywhere except weak Kleene, where the second
    // disjunct can gap the whole disjunction out.
    for logic in ["FDE", "K3", "LP", "L3", "G3", "RM3"] {
        assert_valid(logic, "Aab", &["a"]);
    }
}

#[test]
fn k3_family_gaps() {
    for logic in ["K3", "K3W", "L3", "G3"] {
        assert_invalid(logic, "AaNa", &[]);
        assert_valid(logic, "b", &["KaNa"]);
    }
}

#[test]
fn lp_family_gluts() {
    for logic in ["LP", "RM3"] {
        assert_valid(logic, "AaNa", &[]);
        assert_invalid(logic, "b", &["KaNa"]);
    }
}

#[test]
fn fde_has_neither() {
    assert_invalid("FDE", "AaNa", &[]);
    assert_invalid("FDE", "b", &["KaNa"]);
    assert_invalid("FDE", "b", &["Cab", "a"]);
    assert_valid("FDE", "ANaNb", &["NKab"]);
}

#[test]
fn k3_modus_ponens_holds() {
    assert_valid("K3", "b", &["Cab", "a"]);
    assert_valid("K3", "a", &["Aab", "Nb"]);
}

#[test]
fn lp_modus_ponens_fails() {
    assert_invalid("LP", "b", &["Cab", "a"]);
    assert_invalid("LP", "a", &["Aab", "Nb"]);
}

#[test]
fn l3_conditional_identity() {
    assert_valid("L3", "Uaa", &[]);
    assert_invalid("L3", "Caa", &[]);
    assert_invalid("L3", "Uab", &["UaUab"]);
}

#[test]
fn rm3_conditional() {
    assert_valid("RM3", "Uaa", &[]);
    assert_valid("RM3", "b", &["Uab", "a"]);
}

#[test]
fn g3_conditional() {
    assert_valid("G3", "Uaa", &[]);
    assert_invalid("G3", "AaNa", &[]);
}

#[test]
fn k3w_infectious_gap() {
    // Addition fails in weak Kleene: b might gap out the disjunction.
    assert_invalid("K3W", "Aab", &["a"]);
    assert_valid("K3W", "a", &["Kab"]);
}

#[test]
fn mh_and_nh_conditionals() {
    assert_valid("MH", "b", &["Uab", "a"]);
    assert_valid("MH", "Uaa", &[]);
    assert_valid("NH", "Uaa", &[]);
    assert_invalid("NH", "b", &["KaNa"]);
}

// ============================================================================
// Modal logics
// ============================================================================

#[test]
fn modal_ladder() {
    // Each step up the ladder validates its characteristic axiom; the
    // logic below does not.
    assert_invalid("K", "CLaMa", &[]);
    assert_valid("D", "CLaMa", &[]);
    assert_invalid("D", "CLaa", &[]);
    assert_valid("T", "CLaa", &[]);
    assert_invalid("T", "CLaLLa", &[]);
    assert_valid("S4", "CLaLLa", &[]);
    assert_invalid("S4", "CaLMa", &[]);
    assert_valid("S5", "CaLMa", &[]);
}

#[test]
fn k_modal_transformations() {
    assert_valid("K", "NMNa", &["La"]);
    assert_valid("K", "La", &["NMNa"]);
    assert_valid("K", "MNa", &["NLa"]);
    assert_invalid("K", "a", &["La"]);
    assert_invalid("K", "Ma", &["a"]);
}

#[test]
fn s4_transitivity_saturates() {
    let tab = build("S4", "LLa", &["La"]);
    assert_eq!(tab.valid(), Some(true));
}

#[test]
fn modal_countermodels_check_out() {
    let opts = TableauOptions {
        is_build_models: true,
        ..TableauOptions::default()
    };
    let tab = build_opts("K", "a", &["La"], opts);
    assert_eq!(tab.invalid(), Some(true));
    assert!(!tab.models().is_empty());
    assert!(tab.models().iter().all(|m| m.is_countermodel()));
}

// ============================================================================
// Example registry against the engine
// ============================================================================

#[test]
fn examples_run_under_cpl() {
    for name in ["Modus Ponens", "Modus Tollens", "Simplification", "Addition"] {
        let arg = examples::argument(name).unwrap();
        let mut tab =
            Tableau::for_argument(get("CPL").unwrap(), arg, TableauOptions::default()).unwrap();
        tab.build().unwrap();
        assert_eq!(tab.valid(), Some(true), "{name} should be CPL-valid");
    }
}

#[test]
fn countermodels_satisfy_their_arguments() {
    let opts = TableauOptions {
        is_build_models: true,
        ..TableauOptions::default()
    };
    for (logic, conclusion, premises) in [
        ("FDE", "a", &["Aab", "Nb"][..]),
        ("K3", "AaNa", &[][..]),
        ("LP", "b", &["KaNa"][..]),
        ("CPL", "a", &["Cab", "b"][..]),
    ] {
        let tab = build_opts(logic, conclusion, premises, opts.clone());
        assert_eq!(tab.invalid(), Some(true), "{logic} setup");
        assert!(!tab.models().is_empty(), "{logic} has no models");
        for model in tab.models() {
            assert!(model.is_countermodel(), "{logic} model fails its argument");
        }
    }
}
