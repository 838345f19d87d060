//! The clause database: flat storage for input and learned clauses.
//!
//! Grounded on the teacher's safe `Vec<Literal>`-backed design rather than
//! its alternate unsafe word-packed one (`#![deny(unsafe_code)]` in
//! [`crate`] rules that one out). Every clause owns a contiguous run of
//! literals plus a small metadata record tracking the counted-false state
//! §4.3 requires to be authoritative.

mod clause;
mod clause_builder;
mod clause_ref;
mod db;

pub use self::{
    clause::{
        Clause,
        Error as ClauseError,
    },
    clause_builder::{
        ClauseBuilder,
        Error as ClauseBuilderError,
        VerifiedClause,
    },
    clause_ref::{
        ClausePropagationResult,
        ClauseRef,
        ClauseRefMut,
    },
    db::{
        ClauseDb,
        ClauseDbIter,
        ClauseId,
        UnitClause,
    },
};
