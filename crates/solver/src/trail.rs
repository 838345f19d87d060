//! The decision trail: the level-partitioned stack of decided and implied
//! literals, and the per-variable decision level / reason bookkeeping needed
//! to reconstruct the implication graph on demand.
//!
//! Adapted from the teacher's `assignment/trail.rs`: a single combined stack
//! of decisions and their implications, split into decision levels by a
//! vector of per-level start offsets, so that undo only has to rescan the
//! suffix that is actually being popped (§"Design Notes": growable stack,
//! not an intrusive linked list).
//!
//! This type owns no truth values itself — [`crate::assignment::VariableAssignment`]
//! does — so every push/undo here is paired by its caller with the matching
//! assignment update.

use crate::{
    clause_db::ClauseId,
    entity::{
        Literal,
        Variable,
    },
};
use bounded::{
    BoundedMap,
    BoundedStack,
    Index,
};

/// A decision level. `DecisionLevel::START` (`0`) is the level at which no
/// decision has yet been made — every clause of the original problem and
/// every literal forced by unit propagation before the first decision lives
/// there. The first call to [`Trail::push_decision`] moves the trail to
/// level `1`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DecisionLevel(u32);

impl DecisionLevel {
    /// The level before any decision has been made.
    pub const START: Self = Self(0);

    /// Returns the raw numeric value of the decision level.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the decision level one above this one.
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Index for DecisionLevel {
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    fn into_index(self) -> usize {
        self.0 as usize
    }
}

/// Why a variable holds its current value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reason {
    /// The variable was decided by the search.
    Decision,
    /// The variable was forced true by unit propagation of the named clause.
    Forced(ClauseId),
    /// The variable was a root fact: a unit clause of the original problem,
    /// asserted before the search ever made a decision.
    Fact,
}

impl Reason {
    /// Returns the clause this assignment was forced from, if any.
    pub fn clause(self) -> Option<ClauseId> {
        match self {
            Reason::Forced(id) => Some(id),
            Reason::Decision | Reason::Fact => None,
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct VarInfo {
    level: DecisionLevel,
    reason: Reason,
}

/// The decision trail.
#[derive(Debug, Default)]
pub struct Trail {
    /// Index of the next literal in `stack` that still needs to be woken up
    /// by the propagation engine.
    propagate_head: usize,
    /// Decisions and their implications, in the order they were made.
    stack: BoundedStack<Literal>,
    /// `limits[l]` is the offset into `stack` at which level `l` begins.
    limits: Vec<usize>,
    /// Per-variable level and reason, `None` while unassigned.
    info: BoundedMap<Variable, VarInfo>,
}

impl Trail {
    /// Creates a new, empty trail for `len_variables` variables.
    pub fn with_capacity(len_variables: usize) -> Self {
        Self {
            propagate_head: 0,
            stack: {
                let mut stack = BoundedStack::default();
                stack.resize_capacity(len_variables);
                stack
            },
            limits: vec![0],
            info: BoundedMap::with_capacity(len_variables),
        }
    }

    /// Grows the trail to accommodate `len_variables` variables.
    pub fn resize(&mut self, len_variables: usize) {
        self.stack.resize_capacity(len_variables);
        self.info.resize_capacity(len_variables);
    }

    /// Returns the current decision level.
    pub fn current_level(&self) -> DecisionLevel {
        DecisionLevel::from_index(self.limits.len() - 1)
    }

    /// Returns `true` if no decision has been made yet.
    pub fn at_start_level(&self) -> bool {
        self.current_level() == DecisionLevel::START
    }

    /// Returns the decision level at which `variable` was assigned.
    pub fn level_of(&self, variable: Variable) -> Option<DecisionLevel> {
        self.info
            .get(variable)
            .expect("variable out of bounds")
            .map(|info| info.level)
    }

    /// Returns the reason `variable` holds its current value.
    pub fn reason_of(&self, variable: Variable) -> Option<Reason> {
        self.info
            .get(variable)
            .expect("variable out of bounds")
            .map(|info| info.reason)
    }

    fn push(&mut self, literal: Literal, level: DecisionLevel, reason: Reason) {
        self.info
            .insert(literal.variable(), VarInfo { level, reason })
            .expect("variable out of bounds");
        self.stack.push(literal);
    }

    /// Opens a new decision level and pushes `literal` as its decision.
    ///
    /// # Panics
    ///
    /// If `literal`'s variable already holds trail bookkeeping.
    pub fn push_decision(&mut self, literal: Literal) {
        let level = self.current_level().next();
        self.limits.push(self.stack.len());
        self.push(literal, level, Reason::Decision);
    }

    /// Pushes `literal` as forced by unit propagation of `reason`, at the
    /// current decision level.
    ///
    /// # Panics
    ///
    /// If `literal`'s variable already holds trail bookkeeping.
    pub fn push_implied(&mut self, literal: Literal, reason: ClauseId) {
        let level = self.current_level();
        self.push(literal, level, Reason::Forced(reason));
    }

    /// Pushes `literal` as a root fact of the original problem.
    ///
    /// Must only be called at the start level.
    ///
    /// # Panics
    ///
    /// If not at the start level, or if `literal`'s variable already holds
    /// trail bookkeeping.
    pub fn push_fact(&mut self, literal: Literal) {
        assert!(
            self.at_start_level(),
            "root facts can only be pushed before the first decision"
        );
        self.push(literal, DecisionLevel::START, Reason::Fact);
    }

    /// Returns the next literal awaiting propagation, advancing the
    /// propagation head, or `None` if the trail has been fully propagated.
    pub fn next_to_propagate(&mut self) -> Option<Literal> {
        if self.propagate_head >= self.stack.len() {
            return None
        }
        let literal = self.stack[self.propagate_head];
        self.propagate_head += 1;
        Some(literal)
    }

    /// Returns `true` if every enqueued literal has been propagated.
    pub fn is_fully_propagated(&self) -> bool {
        self.propagate_head >= self.stack.len()
    }

    /// Returns the literals assigned at the trail's current decision level.
    pub fn literals_at_current_level(&self) -> &[Literal] {
        let start = *self.limits.last().expect("limits is never empty");
        &self.stack[start..]
    }

    /// Undoes every literal implied at the current decision level, invoking
    /// `on_undo` once per popped literal, but leaves that level's decision
    /// (if any) in place and `current_level` unchanged.
    pub fn undo_implications_at_current_level<F>(&mut self, mut on_undo: F)
    where
        F: FnMut(Literal),
    {
        let level = self.current_level();
        let start = self.limits[level.into_index()];
        let keeps_decision = level != DecisionLevel::START;
        let new_len = start + usize::from(keeps_decision);
        let info = &mut self.info;
        self.stack.pop_to(new_len, |&literal| {
            on_undo(literal);
            info.take(literal.variable())
                .expect("variable out of bounds");
        });
        self.propagate_head = self.propagate_head.min(self.stack.len());
    }

    /// Undoes every decision and implication above `level`, invoking
    /// `on_undo` once per popped literal so the caller can restore its own
    /// assignment and counted-false bookkeeping. A no-op if
    /// `level >= current_level()`.
    pub fn undo_to_level<F>(&mut self, level: DecisionLevel, mut on_undo: F)
    where
        F: FnMut(Literal),
    {
        if level >= self.current_level() {
            return
        }
        let new_len = self.limits[level.into_index() + 1];
        let info = &mut self.info;
        self.stack.pop_to(new_len, |&literal| {
            on_undo(literal);
            info.take(literal.variable())
                .expect("variable out of bounds");
        });
        self.limits.truncate(level.into_index() + 1);
        self.propagate_head = self.propagate_head.min(self.stack.len());
    }
}
