use cdcl_solver::{
    DimacsBuilder,
    SatState,
    Variable,
};
use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    BatchSize,
    BenchmarkId,
    Criterion,
};
use std::{
    fs,
    path::Path,
};

fn build(bytes: &[u8]) -> SatState {
    let mut builder = DimacsBuilder::default();
    cnf_parser::parse_cnf(&mut &bytes[..], &mut builder).unwrap();
    builder.finish().unwrap()
}

criterion_group!(
    bench_solve,
    bench_3sat_v150_c645_sat,
    bench_3sat_v150_c645_unsat,
);
criterion_main!(bench_solve);

/// Returns the byte representation of every `.cnf` fixture under `path`,
/// alphabetically sorted by file name.
fn collect_benchmarks_in_path<P>(path: P) -> Vec<Vec<u8>>
where
    P: AsRef<Path>,
{
    let mut dir_entries = fs::read_dir(path)
        .unwrap()
        .filter_map(|dir_entry| {
            let dir_entry = dir_entry.ok()?;
            let path = dir_entry.path();
            (path.extension().and_then(|ext| ext.to_str()) == Some("cnf"))
                .then(|| (path.clone(), fs::read(path).unwrap()))
        })
        .collect::<Vec<_>>();
    dir_entries.sort_by(|(l, _), (r, _)| l.file_name().cmp(&r.file_name()));
    dir_entries.into_iter().map(|(_, bytes)| bytes).collect()
}

/// The lowest-indexed unassigned variable, decided positively — the same
/// placeholder heuristic the `driver` crate uses, kept external to the core
/// under test per the decision-heuristic non-goal.
fn next_decision(state: &SatState) -> Option<Variable> {
    (1..=state.var_count())
        .map(|index| state.index2var(index))
        .find(|&var| !state.instantiated_var(var))
}

fn search(state: &mut SatState) -> bool {
    loop {
        if state.conflict_exists() {
            if state.is_unsat() {
                return false
            }
            while !state.at_assertion_level() {
                state.undo_decide_literal();
            }
            state.assert_clause();
            continue
        }
        match next_decision(state) {
            Some(var) => {
                state.decide_literal(var.pos_literal());
            }
            None => return true,
        }
    }
}

fn bench_3sat_v150_c645_sat(c: &mut Criterion) {
    let mut g = c.benchmark_group("SatState::solve");
    g.sample_size(10);
    g.sampling_mode(criterion::SamplingMode::Flat);
    for (n, input) in collect_benchmarks_in_path("../../cnf/uf150-645/sat/")
        .into_iter()
        .enumerate()
    {
        g.bench_function(BenchmarkId::new("sat", n), |bencher| {
            bencher.iter_batched(
                || build(&input),
                |mut state| {
                    let sat = black_box(search(&mut state));
                    assert!(sat);
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_3sat_v150_c645_unsat(c: &mut Criterion) {
    let mut g = c.benchmark_group("SatState::solve");
    g.sample_size(10);
    g.sampling_mode(criterion::SamplingMode::Flat);
    for (n, input) in collect_benchmarks_in_path("../../cnf/uf150-645/unsat/")
        .into_iter()
        .enumerate()
    {
        g.bench_function(BenchmarkId::new("unsat", n), |bencher| {
            bencher.iter_batched(
                || build(&input),
                |mut state| {
                    let sat = black_box(search(&mut state));
                    assert!(!sat);
                },
                BatchSize::SmallInput,
            )
        });
    }
}
