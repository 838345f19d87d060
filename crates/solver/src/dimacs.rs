//! DIMACS CNF ingestion.
//!
//! Adapted from the teacher's `builder.rs`. The `cnf-parser` crate is an
//! external collaborator, not part of the CDCL core itself: it only ever
//! hands literals to this [`cnf_parser::Output`] implementation, which turns
//! them into the flat clause list [`SatState::new`] expects.

use crate::{
    entity::Literal,
    Error,
    SatState,
};
use cnf_parser::Output;

/// Accumulates the clauses streamed in by the DIMACS parser and builds the
/// resulting [`SatState`] once the whole file has been consumed.
#[derive(Debug, Default)]
pub struct DimacsBuilder {
    num_variables: Option<usize>,
    clauses: Vec<Vec<Literal>>,
    current_clause: Vec<Literal>,
}

impl DimacsBuilder {
    /// Consumes the builder, producing the accumulated problem instance.
    ///
    /// # Panics
    ///
    /// If no problem line was ever seen, i.e. the input was empty.
    pub fn finish(self) -> Result<SatState, Error> {
        let num_variables = self
            .num_variables
            .ok_or(Error::Other("missing DIMACS problem line"))?;
        SatState::new(num_variables, self.clauses)
    }

    fn finalize_current_clause(&mut self) -> Result<(), Error> {
        if self.num_variables.is_none() {
            return Err(Error::Other("missing problem line before clause inputs"))
        }
        self.clauses.push(self.current_clause.drain(..).collect());
        Ok(())
    }
}

impl Output for DimacsBuilder {
    type Error = Error;

    fn problem(&mut self, num_variables: u32, _num_clauses: u32) -> Result<(), Self::Error> {
        self.num_variables = Some(num_variables as usize);
        Ok(())
    }

    fn literal(&mut self, literal: cnf_parser::Literal) -> Result<(), Self::Error> {
        self.current_clause.push(literal.into());
        Ok(())
    }

    fn finalize_clause(&mut self) -> Result<(), Self::Error> {
        self.finalize_current_clause()
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        if !self.current_clause.is_empty() {
            self.finalize_current_clause()?;
        }
        Ok(())
    }
}
