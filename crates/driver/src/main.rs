use solver::{
    SatState,
    Variable,
};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
struct Opt {
    #[structopt(name = "input .cnf file", parse(from_os_str))]
    input: PathBuf,
}

/// The decision heuristic external to the core: always the lowest-indexed
/// unassigned variable, decided positively.
fn next_decision(state: &SatState) -> Option<Variable> {
    (1..=state.var_count())
        .map(|index| state.index2var(index))
        .find(|&var| !state.instantiated_var(var))
}

/// Drives `state` to a fixpoint by repeated decide / undo-decide / assert,
/// per the control flow the core hands off to its caller.
fn search(state: &mut SatState) -> bool {
    loop {
        if state.conflict_exists() {
            if state.is_unsat() {
                return false
            }
            while !state.at_assertion_level() {
                state.undo_decide_literal();
            }
            log::debug!("asserting learned clause at level {}", state.current_level());
            state.assert_clause();
            continue
        }
        match next_decision(state) {
            Some(var) => {
                log::debug!("deciding variable {}", var.pos_literal());
                state.decide_literal(var.pos_literal());
            }
            None => return true,
        }
    }
}

fn main() {
    env_logger::init();
    let opt = Opt::from_args();
    let mut state = SatState::from_dimacs_path(&opt.input)
        .expect("couldn't properly decode provided input .cnf file");
    log::info!(
        "loaded {} variables and {} clauses from {}",
        state.var_count(),
        state.clause_count(),
        opt.input.display()
    );
    println!("start solving ...");
    if search(&mut state) {
        println!("SAT");
        for index in 1..=state.var_count() {
            let var = state.index2var(index);
            match state.implied_literal(var) {
                Some(literal) => print!("{} ", literal),
                None => print!("{} ", var.pos_literal()),
            }
        }
        println!();
    } else {
        println!("UNSAT");
    }
}
