//! The current truth assignment of every variable.
//!
//! This is the thin authoritative map `value: Variable -> {true, false, *}`
//! that both the watch-list propagator and the occurrence-list counted-false
//! bookkeeping consult. It knows nothing about decision levels or reasons —
//! that bookkeeping lives in [`crate::trail::Trail`].

use crate::entity::{
    Literal,
    Sign,
    Variable,
};
use bounded::BoundedMap;

/// The assignment status of every variable of the problem.
#[derive(Debug, Default, Clone)]
pub struct VariableAssignment {
    assignment: BoundedMap<Variable, Sign>,
}

impl VariableAssignment {
    /// Creates a new, fully unassigned, variable assignment for `len_variables`
    /// variables.
    pub fn with_capacity(len_variables: usize) -> Self {
        Self {
            assignment: BoundedMap::with_capacity(len_variables),
        }
    }

    /// Returns the sign assigned to `variable`, or `None` if unassigned.
    #[inline]
    pub fn get(&self, variable: Variable) -> Option<Sign> {
        self.assignment
            .get(variable)
            .expect("variable is out of bounds for the current assignment")
            .copied()
    }

    /// Returns `true` if `literal` is satisfied by the current assignment.
    #[inline]
    pub fn is_satisfied(&self, literal: Literal) -> Option<bool> {
        self.get(literal.variable())
            .map(|sign| sign == literal.sign())
    }

    /// Returns `true` if `literal` is falsified by the current assignment.
    #[inline]
    pub fn is_falsified(&self, literal: Literal) -> Option<bool> {
        self.is_satisfied(!literal)
    }

    /// Assigns `literal`'s variable the sign that satisfies `literal`.
    ///
    /// # Errors
    ///
    /// Returns the previously assigned sign if the variable was already
    /// assigned.
    pub fn assign(&mut self, literal: Literal) -> Result<(), Sign> {
        match self.get(literal.variable()) {
            Some(old) => Err(old),
            None => {
                self.assignment
                    .insert(literal.variable(), literal.sign())
                    .expect("variable is out of bounds for the current assignment");
                Ok(())
            }
        }
    }

    /// Clears the assignment of `variable`, making it unassigned again.
    pub fn unassign(&mut self, variable: Variable) {
        self.assignment
            .take(variable)
            .expect("variable is out of bounds for the current assignment");
    }

    /// Grows the assignment to accommodate `len_variables` variables.
    pub fn resize(&mut self, len_variables: usize) {
        self.assignment.resize_capacity(len_variables);
    }
}
