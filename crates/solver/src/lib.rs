#![deny(unsafe_code)]
#![warn(unsafe_op_in_unsafe_fn)]
#![allow(clippy::len_without_is_empty)]

//! A CDCL search core for a knowledge compiler's SAT back end.
//!
//! This crate does not itself search for a satisfying assignment: it exposes
//! the decide/propagate/analyze/assert/undo primitives a caller drives, and
//! keeps the bookkeeping (watch lists, occurrence lists, the decision trail,
//! counted-false/subsumption state) that those primitives need to stay cheap.
//! The `driver` crate is one such caller.

mod analysis;
mod assignment;
pub mod clause_db;
mod dimacs;
mod entity;
mod meta;
mod occurrence;
mod trail;
mod watch_list;

#[cfg(test)]
mod tests;

use crate::{
    analysis::Analysis,
    assignment::VariableAssignment,
    clause_db::{
        Clause,
        ClauseBuilder,
        ClauseDb,
    },
    meta::ClauseMetaStore,
    occurrence::OccurrenceList,
    trail::Trail,
    watch_list::WatchList,
};
pub use crate::{
    analysis::LearnedClause,
    clause_db::{
        ClauseError,
        ClauseId,
    },
    dimacs::DimacsBuilder,
    entity::{
        Literal,
        Sign,
        Variable,
    },
    meta::ClauseMeta,
    trail::{
        DecisionLevel,
        Reason,
    },
};
use bounded::{
    Bool,
    BoundedBitmap,
    Index,
};
use std::path::Path;

/// Errors raised while constructing or growing a [`SatState`].
#[derive(Debug)]
pub enum Error {
    /// A clause of the input problem was malformed.
    Clause(ClauseError),
    /// An internal arena was indexed out of bounds.
    Bounded(bounded::OutOfBoundsAccess),
    /// Any other construction failure, carrying a diagnostic message.
    Other(&'static str),
}

impl From<ClauseError> for Error {
    fn from(err: ClauseError) -> Self {
        Self::Clause(err)
    }
}

impl From<bounded::OutOfBoundsAccess> for Error {
    fn from(err: bounded::OutOfBoundsAccess) -> Self {
        Self::Bounded(err)
    }
}

impl From<&'static str> for Error {
    fn from(message: &'static str) -> Self {
        Self::Other(message)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Marked(bool);

impl Bool for Marked {
    fn from_bool(value: bool) -> Self {
        Self(value)
    }

    fn into_bool(self) -> bool {
        self.0
    }
}

fn apply_assigned(occurrences: &OccurrenceList, meta: &mut ClauseMetaStore, literal: Literal) {
    for id in occurrences.get(literal).iter() {
        meta.mark_true(id);
    }
    for id in occurrences.get(!literal).iter() {
        meta.mark_false(id);
    }
}

fn apply_unassigned(occurrences: &OccurrenceList, meta: &mut ClauseMetaStore, literal: Literal) {
    for id in occurrences.get(literal).iter() {
        meta.unmark_true(id);
    }
    for id in occurrences.get(!literal).iter() {
        meta.unmark_false(id);
    }
}

/// The mutable state of a single CDCL search: the clause database, the
/// current partial assignment, and every index the search loop needs to move
/// through decide/propagate/analyze/assert/undo cheaply.
///
/// Construction (`state_new`) never returns an already-contradictory state
/// as an error: a problem found unsatisfiable during construction (an empty
/// clause, or conflicting unit facts) is represented as a normal `SatState`
/// with [`SatState::conflict_exists`] already `true`, so callers always go
/// through the same conflict-handling path.
#[derive(Debug)]
pub struct SatState {
    len_variables: usize,
    num_input_clauses: usize,
    clauses: ClauseDb,
    meta: ClauseMetaStore,
    occurrences: OccurrenceList,
    watches: WatchList,
    assignment: VariableAssignment,
    trail: Trail,
    analysis: Analysis,
    clause_builder: ClauseBuilder,
    asserted_clause: Option<LearnedClause>,
    unsat: bool,
    var_marks: BoundedBitmap<Variable, Marked>,
    clause_marks: Vec<bool>,
}

impl SatState {
    /// Builds a fresh search state from `len_variables` variables and the
    /// given clauses (unit clauses are absorbed as root facts rather than
    /// stored in the clause database, per §4.1).
    ///
    /// An empty input clause or a pair of contradictory unit facts leaves the
    /// returned state already conflicting, not an `Err`; malformed clauses
    /// (the same literal and its complement both present) are dropped as
    /// tautologies. Construction runs an initial [`SatState::unit_resolution`]
    /// sweep before returning.
    pub fn new(len_variables: usize, clauses: Vec<Vec<Literal>>) -> Result<Self, Error> {
        let len_literals = len_variables * 2;
        let mut state = Self {
            len_variables,
            num_input_clauses: 0,
            clauses: ClauseDb::default(),
            meta: ClauseMetaStore::default(),
            occurrences: OccurrenceList::with_len(len_literals),
            watches: WatchList::with_len(len_literals),
            assignment: VariableAssignment::with_capacity(len_variables),
            trail: Trail::with_capacity(len_variables),
            analysis: Analysis::with_capacity(len_variables),
            clause_builder: ClauseBuilder::default(),
            asserted_clause: None,
            unsat: false,
            var_marks: BoundedBitmap::with_len(len_variables),
            clause_marks: Vec::new(),
        };

        let mut facts = Vec::new();
        for literals in clauses {
            match Clause::new(literals) {
                Ok(clause) => match clause.unit_literal() {
                    Some(literal) => facts.push(literal),
                    None => {
                        state.push_clause(clause);
                    }
                },
                Err(ClauseError::EmptyClause) => state.unsat = true,
                Err(ClauseError::SelfConflictingClause) => {}
            }
        }
        state.num_input_clauses = state.clauses.len();

        for literal in facts {
            if state.unsat {
                break
            }
            match state.assignment.assign(literal) {
                Ok(()) => {
                    state.trail.push_fact(literal);
                    apply_assigned(&state.occurrences, &mut state.meta, literal);
                }
                // A duplicate unit fact of the same polarity is redundant,
                // not a conflict; only an opposite-polarity duplicate is.
                Err(existing) if existing != literal.sign() => state.unsat = true,
                Err(_) => {}
            }
        }

        if !state.unsat {
            state.unit_resolution();
        }
        log::info!(
            "built SatState with {} variables, {} clauses ({} unit facts folded in)",
            state.len_variables,
            state.num_input_clauses,
            state.trail.literals_at_current_level().len()
        );
        Ok(state)
    }

    /// Parses a DIMACS CNF file and builds the [`SatState`] for it.
    ///
    /// # Errors
    ///
    /// If the file cannot be read, or the input is not valid DIMACS CNF.
    pub fn from_dimacs_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let bytes = std::fs::read(path).map_err(|_| Error::Other("failed to read DIMACS input"))?;
        let mut builder = DimacsBuilder::default();
        cnf_parser::parse_cnf(&mut &bytes[..], &mut builder)
            .map_err(|_| Error::Other("malformed DIMACS input"))?;
        builder.finish()
    }

    fn push_clause(&mut self, clause: Clause) -> ClauseId {
        let literals: Vec<Literal> = (&clause).into_iter().collect();
        let id = self
            .clauses
            .push(clause)
            .unwrap_or_else(|_| unreachable!("caller already filtered out unit clauses"));
        self.meta.push();
        self.clause_marks.push(false);
        for &literal in &literals {
            self.occurrences.register(literal, id);
        }
        self.watches.register(!literals[0], id, literals[1]);
        self.watches.register(!literals[1], id, literals[0]);
        id
    }

    fn force_literal(&mut self, literal: Literal, reason: ClauseId) {
        self.assignment
            .assign(literal)
            .expect("force_literal: literal must be unassigned");
        self.trail.push_implied(literal, reason);
        apply_assigned(&self.occurrences, &mut self.meta, literal);
    }

    fn force_fact(&mut self, literal: Literal) {
        self.assignment
            .assign(literal)
            .expect("force_fact: literal must be unassigned");
        self.trail.push_fact(literal);
        apply_assigned(&self.occurrences, &mut self.meta, literal);
    }

    /// The number of variables currently registered, including those added
    /// after construction by [`SatState::register_variable`].
    pub fn var_count(&self) -> usize {
        self.len_variables
    }

    /// The number of clauses present in the original input problem.
    pub fn clause_count(&self) -> usize {
        self.num_input_clauses
    }

    /// The number of clauses learned by conflict analysis so far.
    pub fn learned_clause_count(&self) -> usize {
        self.clauses.len() - self.num_input_clauses
    }

    /// Maps a 1-based DIMACS variable index to its internal handle.
    pub fn index2var(&self, index: usize) -> Variable {
        assert!(
            index >= 1 && index <= self.len_variables,
            "variable index {} out of range for {} variables",
            index,
            self.len_variables
        );
        Variable::from_index(index - 1)
    }

    /// Maps a signed DIMACS literal index (e.g. `-3`) to its internal handle.
    pub fn index2literal(&self, index: i32) -> Literal {
        Literal::from(index)
    }

    /// Maps a 1-based clause index to its internal handle.
    pub fn index2clause(&self, index: usize) -> ClauseId {
        ClauseId::from_index(index - 1)
    }

    /// The positive-polarity literal of `var`.
    pub fn pos_literal(&self, var: Variable) -> Literal {
        var.pos_literal()
    }

    /// The negative-polarity literal of `var`.
    pub fn neg_literal(&self, var: Variable) -> Literal {
        var.neg_literal()
    }

    /// The variable a literal names.
    pub fn literal_var(&self, literal: Literal) -> Variable {
        literal.variable()
    }

    /// The weight of a literal. Always `1`: this core does not implement
    /// weighted model counting beyond exposing the hook.
    pub fn literal_weight(&self, literal: Literal) -> u32 {
        literal.weight()
    }

    /// The literal currently implied for `var`'s variable, or `None` if it is
    /// unassigned.
    pub fn implied_literal(&self, var: Variable) -> Option<Literal> {
        self.assignment.get(var).map(|sign| var.into_literal(sign))
    }

    /// Registers a fresh variable, growing every arena that needs to know
    /// about it, and returns its handle.
    ///
    /// Not part of the fixed CNF input model of §4.1: a knowledge compiler
    /// driving this core typically introduces auxiliary (Tseitin) variables
    /// at runtime, after `state_new` has already built the initial state.
    pub fn register_variable(&mut self) -> Variable {
        let var = Variable::from_index(self.len_variables);
        self.len_variables += 1;
        let len_literals = self.len_variables * 2;
        self.assignment.resize(self.len_variables);
        self.trail.resize(self.len_variables);
        self.analysis.resize(self.len_variables);
        self.occurrences.resize(len_literals);
        self.watches.resize(len_literals);
        self.var_marks.resize_to_len(self.len_variables);
        var
    }

    /// `true` if `var` currently holds a truth value, whether by decision,
    /// propagation, or as a root fact.
    pub fn instantiated_var(&self, var: Variable) -> bool {
        self.assignment.get(var).is_some()
    }

    /// `true` if some literal of clause `id` is currently satisfied, i.e. the
    /// clause is subsumed by the current partial assignment.
    pub fn subsumed_clause(&self, id: ClauseId) -> bool {
        self.meta.get(id).is_subsumed()
    }

    /// `true` if neither polarity of `var` occurs in any clause.
    pub fn irrelevant_var(&self, var: Variable) -> bool {
        self.occurrences.is_irrelevant(var.pos_literal())
    }

    /// The number of clauses mentioning either polarity of `var`.
    pub fn var_occurrences(&self, var: Variable) -> usize {
        self.occurrences.get(var.pos_literal()).len() + self.occurrences.get(var.neg_literal()).len()
    }

    /// The current decision level, 1-based (the start level, before any
    /// decision, is level `1`).
    pub fn current_level(&self) -> u32 {
        self.trail.current_level().value() + 1
    }

    /// `true` if no decision has been made yet.
    pub fn at_start_level(&self) -> bool {
        self.trail.at_start_level()
    }

    /// `true` if a conflict is pending: either the problem is unconditionally
    /// unsatisfiable, or a learned clause is waiting on [`SatState::assert_clause`].
    pub fn conflict_exists(&self) -> bool {
        self.unsat || self.asserted_clause.is_some()
    }

    /// `true` if the problem has been determined unconditionally
    /// unsatisfiable (a conflict found at the start level).
    pub fn is_unsat(&self) -> bool {
        self.unsat
    }

    /// `true` if the trail is currently at the assertion level of the
    /// pending learned clause, i.e. backtracking has undone enough decisions
    /// that [`SatState::assert_clause`] may now be called.
    pub fn at_assertion_level(&self) -> bool {
        self.asserted_clause
            .as_ref()
            .map_or(false, |learned| self.trail.current_level() == learned.assertion_level)
    }

    /// Returns the clause waiting to be asserted, if any.
    pub fn asserted_clause(&self) -> Option<&LearnedClause> {
        self.asserted_clause.as_ref()
    }

    /// Decides `literal` true, opening a new decision level, and runs unit
    /// propagation to a fixpoint.
    ///
    /// Returns `false` if this decision (or the propagation it triggers)
    /// produces a conflict.
    ///
    /// # Panics
    ///
    /// If a conflict is already pending, or `literal` is already assigned.
    pub fn decide_literal(&mut self, literal: Literal) -> bool {
        assert!(
            !self.conflict_exists(),
            "decide_literal precondition: no conflict may be pending"
        );
        self.assignment
            .assign(literal)
            .expect("decide_literal precondition: literal must be unassigned");
        self.trail.push_decision(literal);
        apply_assigned(&self.occurrences, &mut self.meta, literal);
        let ok = self.unit_resolution();
        log::trace!(
            "decided {} at level {}: {}",
            literal,
            self.current_level(),
            if ok { "ok" } else { "conflict" }
        );
        ok
    }

    /// Undoes the most recent decision and every literal implied above it.
    ///
    /// Does not clear a pending conflict: the driver calls this repeatedly,
    /// checking [`SatState::at_assertion_level`] after each call, until it
    /// reaches the level the pending learned clause must be asserted at.
    ///
    /// # Panics
    ///
    /// If called at the start level.
    pub fn undo_decide_literal(&mut self) {
        assert!(
            !self.trail.at_start_level(),
            "undo_decide_literal precondition: current level must be above the start level"
        );
        let target = DecisionLevel::from_index(self.trail.current_level().into_index() - 1);
        let SatState {
            trail,
            assignment,
            occurrences,
            meta,
            ..
        } = self;
        trail.undo_to_level(target, |literal| {
            assignment.unassign(literal.variable());
            apply_unassigned(occurrences, meta, literal);
        });
    }

    /// Propagates every literal on the trail still awaiting propagation to a
    /// fixpoint.
    ///
    /// Returns `false` and leaves either [`SatState::is_unsat`] or
    /// [`SatState::asserted_clause`] set if a conflict is found: a conflict
    /// at the start level is unconditional unsatisfiability, otherwise the
    /// conflict is analyzed into an asserting clause the caller must
    /// eventually pass through [`SatState::assert_clause`].
    pub fn unit_resolution(&mut self) -> bool {
        loop {
            let literal = match self.trail.next_to_propagate() {
                Some(literal) => literal,
                None => return true,
            };
            let SatState {
                trail,
                assignment,
                clauses,
                watches,
                occurrences,
                meta,
                analysis,
                asserted_clause,
                unsat,
                ..
            } = self;
            match watches.propagate(literal, trail, assignment, clauses, |forced| {
                apply_assigned(occurrences, meta, forced)
            }) {
                watch_list::PropagationResult::Consistent => continue,
                watch_list::PropagationResult::Conflict(conflict) => {
                    if trail.at_start_level() {
                        *unsat = true;
                    } else {
                        *asserted_clause = Some(analysis.analyze(conflict, trail, clauses));
                    }
                    return false
                }
            }
        }
    }

    /// Undoes every literal implied at the current decision level, leaving
    /// that level's decision (if any) and the level itself in place.
    pub fn undo_unit_resolution(&mut self) {
        let SatState {
            trail,
            assignment,
            occurrences,
            meta,
            ..
        } = self;
        trail.undo_implications_at_current_level(|literal| {
            assignment.unassign(literal.variable());
            apply_unassigned(occurrences, meta, literal);
        });
    }

    /// Asserts the pending learned clause: stores it in the clause database
    /// (or, if it is a unit clause, forces it directly as a fact) and
    /// propagates to a fixpoint.
    ///
    /// # Panics
    ///
    /// If no clause is pending, or the trail is not at its assertion level.
    pub fn assert_clause(&mut self) -> bool {
        let learned = self
            .asserted_clause
            .take()
            .expect("assert_clause precondition: a clause must be pending");
        assert!(
            self.trail.current_level() == learned.assertion_level,
            "assert_clause precondition: must be at the clause's assertion level"
        );
        let asserting_literal = learned.literals[0];
        if learned.literals.len() == 1 {
            self.force_fact(asserting_literal);
        } else {
            let verified = self
                .clause_builder
                .build(learned.literals.iter().copied())
                .expect("a first-UIP learned clause is never empty, unit, or tautological");
            let mut literals = verified.literals.to_vec();
            let position = literals
                .iter()
                .position(|&literal| literal == asserting_literal)
                .expect("the asserting literal survives clause verification");
            literals.swap(0, position);
            let clause = Clause::from_verified(literals);
            let id = self.push_clause(clause);
            for &literal in &learned.literals {
                if self.assignment.is_falsified(literal) == Some(true) {
                    self.meta.mark_false(id);
                }
            }
            self.force_literal(asserting_literal, id);
        }
        log::debug!(
            "asserted learned clause forcing {} at level {}",
            asserting_literal,
            self.current_level()
        );
        self.unit_resolution()
    }

    /// Marks `var`, e.g. as visited by a caller-driven graph traversal.
    pub fn mark_var(&mut self, var: Variable) {
        self.var_marks
            .set(var, Marked(true))
            .expect("variable out of bounds");
    }

    /// Clears `var`'s mark.
    pub fn unmark_var(&mut self, var: Variable) {
        self.var_marks
            .set(var, Marked(false))
            .expect("variable out of bounds");
    }

    /// `true` if `var` is currently marked.
    pub fn marked_var(&self, var: Variable) -> bool {
        self.var_marks
            .get(var)
            .expect("variable out of bounds")
            .into_bool()
    }

    /// Marks clause `id`.
    pub fn mark_clause(&mut self, id: ClauseId) {
        self.clause_marks[id.into_index()] = true;
    }

    /// Clears clause `id`'s mark.
    pub fn unmark_clause(&mut self, id: ClauseId) {
        self.clause_marks[id.into_index()] = false;
    }

    /// `true` if clause `id` is currently marked.
    pub fn marked_clause(&self, id: ClauseId) -> bool {
        self.clause_marks[id.into_index()]
    }
}
