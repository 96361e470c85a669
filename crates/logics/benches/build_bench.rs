//! Build benchmarks over representative arguments.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use logics::get;
use notation::Parser;
use tableaux::{Tableau, TableauOptions};

fn build(logic: &str, conclusion: &str, premises: &[&str]) {
    let logic = get(logic).unwrap();
    let arg = Parser::polish()
        .argument(conclusion, premises, None)
        .unwrap();
    let mut tab = Tableau::for_argument(logic, arg, TableauOptions::default()).unwrap();
    let _ = tab.build();
    black_box(tab.stats());
}

fn bench_builds(c: &mut Criterion) {
    c.bench_function("cpl_modus_ponens", |b| {
        b.iter(|| build("CPL", "b", &["Cab", "a"]))
    });
    c.bench_function("cpl_biconditional_chain", |b| {
        b.iter(|| build("CPL", "Ead", &["Eab", "Ebc", "Ecd"]))
    });
    c.bench_function("fde_demorgan", |b| {
        b.iter(|| build("FDE", "KNaNb", &["NAab"]))
    });
    c.bench_function("s4_transitivity", |b| {
        b.iter(|| build("S4", "CLaLLa", &[]))
    });
    c.bench_function("cfol_syllogism", |b| {
        b.iter(|| build("CFOL", "VxUFxHx", &["VxUFxGx", "VxUGxHx"]))
    });
}

criterion_group!(benches, bench_builds);
criterion_main!(benches);
