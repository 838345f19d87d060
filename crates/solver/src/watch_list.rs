//! The two-watched-literal scheduling filter.
//!
//! Adapted from the teacher's `assignment/watch_list.rs`. Per §4.4, watches
//! exist purely to cheaply discover which clauses *might* have become unit
//! or conflicting when a literal is falsified — they are never consulted as
//! ground truth. The teacher's version threaded a bare `PropagationResult`
//! variant with no attached clause id through this path; here the
//! conflicting clause id is carried end to end so conflict analysis always
//! has the clause it needs.
//!
//! A clause watching literal `ℓ` is registered under the bucket for `!ℓ`: the
//! clause needs re-examining exactly when `!ℓ` is assigned true, i.e. when
//! `ℓ` is falsified. [`WatchList::propagate`] is therefore always called with
//! the literal that was *just assigned true*, and looks its bucket up
//! directly — matching the teacher's `register_for_lit(!watched, ...)` /
//! `propagate(literal)` pairing.

use crate::{
    assignment::VariableAssignment,
    clause_db::{
        ClauseDb,
        ClauseId,
        ClausePropagationResult,
    },
    entity::Literal,
    trail::Trail,
};
use bounded::BoundedArray;

/// One clause watching `literal`, with a cached blocking literal that lets
/// the propagator skip resolving the clause entirely when the blocker is
/// already satisfied.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Watcher {
    blocker: Literal,
    watched: ClauseId,
}

/// The outcome of waking up every clause watching a single newly-true literal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PropagationResult {
    /// Every watcher either stayed consistent, forced a new literal onto the
    /// trail, or found a new watch; no clause became conflicting.
    Consistent,
    /// This clause now has every literal falsified.
    Conflict(ClauseId),
}

/// Deferred move of a watcher from one literal's list to another.
///
/// Watchers cannot be moved while the list that triggered the propagation is
/// being drained (it would mutate the collection mid-iteration), so new
/// placements are collected here and applied once the draining pass ends.
struct DeferredInsert {
    literal: Literal,
    watcher: Watcher,
}

/// Per-literal lists of the clauses currently watching that literal.
#[derive(Debug, Default)]
pub struct WatchList {
    watchers: BoundedArray<Literal, Vec<Watcher>>,
}

impl WatchList {
    /// Creates an empty watch list for `len_literals` literal slots.
    pub fn with_len(len_literals: usize) -> Self {
        Self {
            watchers: BoundedArray::with_len(len_literals, |_| Vec::new()),
        }
    }

    /// Grows the watch list to accommodate `len_literals` literal slots.
    pub fn resize(&mut self, len_literals: usize) {
        self.watchers.resize_with(len_literals, Vec::new);
    }

    /// Registers `clause` as watching `watched`, blocked by `blocker`.
    ///
    /// The caller is responsible for the `!watched` bucketing convention: to
    /// watch clause literal `ℓ`, call `register(!ℓ, clause, blocker)`.
    pub fn register(&mut self, watched_trigger: Literal, clause: ClauseId, blocker: Literal) {
        self.watchers[watched_trigger].push(Watcher {
            blocker,
            watched: clause,
        });
    }

    /// Wakes up every clause watching `literal`'s complement, pushing any
    /// literal thus forced onto `trail`, and reports whether any watched
    /// clause is now a conflict.
    ///
    /// `literal` must already be assigned true in `assignment`. Stops
    /// scanning as soon as a conflict is found; the remaining watchers stay
    /// exactly as they were, since the caller is about to backjump and undo
    /// this decision level anyway.
    ///
    /// `on_assign` is invoked once for every literal this call forces onto
    /// `trail`, after `assignment` has been updated but before the next
    /// watcher is examined, so the caller can fold in its own counted-false
    /// bookkeeping before it might matter to a later watcher in this same
    /// scan.
    pub fn propagate<F>(
        &mut self,
        literal: Literal,
        trail: &mut Trail,
        assignment: &mut VariableAssignment,
        clauses: &mut ClauseDb,
        mut on_assign: F,
    ) -> PropagationResult
    where
        F: FnMut(Literal),
    {
        let mut deferred = Vec::new();
        let mut conflict = None;
        let watchers = &mut self.watchers[literal];
        let mut keep = Vec::with_capacity(watchers.len());
        let mut drain = watchers.drain(..);
        for watcher in &mut drain {
            if assignment.is_satisfied(watcher.blocker) == Some(true) {
                keep.push(watcher);
                continue
            }
            let mut clause_ref = clauses
                .resolve_mut(watcher.watched)
                .expect("watched clause id must be valid");
            match clause_ref.propagate(literal, assignment) {
                ClausePropagationResult::NewWatchedLiteral {
                    new_watched,
                    new_blocker,
                } => {
                    deferred.push(DeferredInsert {
                        literal: new_watched,
                        watcher: Watcher {
                            blocker: new_blocker,
                            watched: watcher.watched,
                        },
                    });
                }
                ClausePropagationResult::UnitUnderAssignment(unit) => {
                    keep.push(watcher);
                    match assignment.is_satisfied(unit) {
                        Some(true) => {}
                        Some(false) => {
                            conflict = Some(watcher.watched);
                            break
                        }
                        None => {
                            assignment.assign(unit).expect("unit must be unassigned");
                            on_assign(unit);
                            trail.push_implied(unit, watcher.watched);
                        }
                    }
                }
            }
        }
        keep.extend(drain);
        *watchers = keep;
        for insert in deferred {
            self.watchers[insert.literal].push(insert.watcher);
        }
        match conflict {
            Some(id) => PropagationResult::Conflict(id),
            None => PropagationResult::Consistent,
        }
    }
}
