use crate::{
    Literal,
    SatState,
};

fn lit(index: i32) -> Literal {
    Literal::from(index)
}

#[test]
fn unit_fact_forces_literal_at_construction() {
    let state = SatState::new(1, vec![vec![lit(1)]]).unwrap();
    assert!(state.at_start_level());
    assert!(!state.conflict_exists());
    let var = state.index2var(1);
    assert_eq!(state.implied_literal(var), Some(lit(1)));
}

#[test]
fn implication_chain_without_conflict() {
    // (x1 v x2) ^ (!x1 v x3) ^ (!x2 v !x3) is satisfiable by x1=F,x2=T,x3=F,
    // and unit resolution alone (no decision) cannot settle any of the three
    // variables: nothing here is a unit clause.
    let state = SatState::new(
        3,
        vec![
            vec![lit(1), lit(2)],
            vec![lit(-1), lit(3)],
            vec![lit(-2), lit(-3)],
        ],
    )
    .unwrap();
    assert!(!state.conflict_exists());
    assert!(state.at_start_level());
    for index in 1..=3 {
        assert!(!state.instantiated_var(state.index2var(index)));
    }
}

#[test]
fn contradictory_unit_facts_is_unsat() {
    let state = SatState::new(1, vec![vec![lit(1)], vec![lit(-1)]]).unwrap();
    assert!(state.is_unsat());
    assert!(state.conflict_exists());
    assert!(state.at_start_level());
}

#[test]
fn unit_fact_propagation_chain_reaches_unsat_at_start_level() {
    // (x1 v x2) ^ (x1 v !x2) ^ (!x1): the fact x1=F forces x2=T via the first
    // clause and x2=F via the second, a conflict discovered entirely by
    // initial unit resolution, with no decision ever made.
    let state = SatState::new(
        2,
        vec![vec![lit(1), lit(2)], vec![lit(1), lit(-2)], vec![lit(-1)]],
    )
    .unwrap();
    assert!(state.is_unsat());
    assert!(state.at_start_level());
}

#[test]
fn decide_conflict_learns_unit_clause_and_reaches_sat() {
    // (x1 v x2) ^ (x1 v !x2 v x3) ^ (x1 v !x3): deciding x1=F forces x2=T via
    // the first clause, x3=T via the second, and conflicts with the third
    // (which needs x1 v !x3, both false). First-UIP resolves the whole
    // level-2 segment away and learns the unit clause {x1}.
    let mut state = SatState::new(
        3,
        vec![
            vec![lit(1), lit(2)],
            vec![lit(1), lit(-2), lit(3)],
            vec![lit(1), lit(-3)],
        ],
    )
    .unwrap();
    assert!(!state.conflict_exists());

    let var1 = state.index2var(1);
    assert!(!state.decide_literal(lit(-1)));
    assert!(state.conflict_exists());
    assert!(!state.is_unsat());

    let learned = state.asserted_clause().unwrap();
    assert_eq!(learned.literals, vec![lit(1)]);

    while !state.at_assertion_level() {
        state.undo_decide_literal();
    }
    assert!(state.at_start_level());
    assert!(state.assert_clause());
    assert!(!state.conflict_exists());
    assert_eq!(state.implied_literal(var1), Some(lit(1)));

    // Driving the remaining two variables to a fixpoint by simple positive
    // decisions must not re-trigger a conflict: the learned clause, plus the
    // two original clauses, are all already satisfied by x1=T.
    for index in 2..=3 {
        let var = state.index2var(index);
        if !state.instantiated_var(var) {
            assert!(state.decide_literal(var.pos_literal()));
        }
    }
    for index in 1..=3 {
        assert!(state.instantiated_var(state.index2var(index)));
    }
}

#[test]
fn decide_conflict_learns_multi_literal_clause_with_assertion_level_above_start() {
    // x0 decided first (level 1) contributes nothing on its own. Deciding x1=F
    // (level 2) forces x2=T then x3=T via the first two clauses, conflicting
    // with the third clause (x1 v !x3 v !x0), which only becomes contradictory
    // because x0=T. First-UIP keeps !x0 in the cut, learning (x1 v !x0) with
    // assertion level 1.
    let mut state = SatState::new(
        4,
        vec![
            vec![lit(2), lit(3)],
            vec![lit(2), lit(-3), lit(4)],
            vec![lit(2), lit(-4), lit(-1)],
        ],
    )
    .unwrap();
    // Variable numbering above: 1=x0, 2=x1, 3=x2, 4=x3 (DIMACS is 1-based).
    assert!(!state.conflict_exists());

    let x0 = state.index2var(1);
    let x1 = state.index2var(2);
    assert!(state.decide_literal(x0.pos_literal()));
    assert!(!state.decide_literal(lit(-2)));
    assert!(state.conflict_exists());

    let learned = state.asserted_clause().unwrap();
    assert_eq!(learned.literals.len(), 2);
    assert_eq!(learned.literals[0], lit(2));
    assert!(learned.literals.contains(&lit(-1)));

    while !state.at_assertion_level() {
        state.undo_decide_literal();
    }
    assert_eq!(state.current_level(), 2);
    assert!(state.instantiated_var(x0));
    assert!(!state.instantiated_var(x1));

    assert!(state.assert_clause());
    assert!(!state.conflict_exists());
    assert_eq!(state.implied_literal(x1), Some(lit(2)));
    assert_eq!(state.learned_clause_count(), 1);
}

#[test]
fn undo_decide_literal_fully_restores_prior_state() {
    // (!x1 v x2): deciding x1=true forces x2=true via unit propagation, so the
    // round trip exercises undoing both a decision and its implied literal.
    let mut state = SatState::new(2, vec![vec![lit(-1), lit(2)]]).unwrap();
    let var1 = state.index2var(1);
    let var2 = state.index2var(2);
    assert!(!state.instantiated_var(var1));

    assert!(state.decide_literal(lit(1)));
    assert!(state.instantiated_var(var1));
    assert!(state.instantiated_var(var2));
    assert_eq!(state.implied_literal(var2), Some(lit(2)));

    state.undo_decide_literal();
    assert!(state.at_start_level());
    assert!(!state.instantiated_var(var1));
    assert!(!state.instantiated_var(var2));
}

#[test]
fn subsumed_clause_and_var_occurrences_track_the_assignment() {
    let mut state = SatState::new(2, vec![vec![lit(1), lit(2)]]).unwrap();
    let clause = state.index2clause(1);
    let var1 = state.index2var(1);

    assert_eq!(state.var_occurrences(var1), 1);
    assert!(!state.subsumed_clause(clause));

    assert!(state.decide_literal(lit(1)));
    assert!(state.subsumed_clause(clause));

    state.undo_decide_literal();
    assert!(!state.subsumed_clause(clause));
}

#[test]
fn irrelevant_var_has_no_occurrences() {
    let state = SatState::new(2, vec![vec![lit(1), lit(1)]]).unwrap();
    // A clause of only one distinct literal collapses to a unit fact, so the
    // clause database itself stays empty and neither variable occurs in it.
    let var2 = state.index2var(2);
    assert!(state.irrelevant_var(var2));
    assert_eq!(state.clause_count(), 0);
}

#[test]
fn register_variable_grows_every_arena() {
    let mut state = SatState::new(1, vec![vec![lit(1)]]).unwrap();
    assert_eq!(state.var_count(), 1);

    let fresh = state.register_variable();
    assert_eq!(state.var_count(), 2);
    assert!(!state.instantiated_var(fresh));
    assert!(state.irrelevant_var(fresh));

    assert!(state.decide_literal(fresh.pos_literal()));
    assert_eq!(state.implied_literal(fresh), Some(fresh.pos_literal()));
}

#[test]
fn mark_var_and_mark_clause_round_trip() {
    let mut state = SatState::new(2, vec![vec![lit(1), lit(2)]]).unwrap();
    let var = state.index2var(1);
    let clause = state.index2clause(1);

    assert!(!state.marked_var(var));
    state.mark_var(var);
    assert!(state.marked_var(var));
    state.unmark_var(var);
    assert!(!state.marked_var(var));

    assert!(!state.marked_clause(clause));
    state.mark_clause(clause);
    assert!(state.marked_clause(clause));
    state.unmark_clause(clause);
    assert!(!state.marked_clause(clause));
}
