use crate::entity::Literal;
use core::{
    iter,
    slice,
};
use hashbrown::HashSet as RawHashSet;

/// A slightly faster hash set due to usage of the `ahash` hasher.
type HashSet<T> = RawHashSet<T, ahash::RandomState>;

/// Errors that may occur while constructing a [`Clause`].
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The clause contains no literals.
    EmptyClause,
    /// The clause contains a literal and its complement, e.g. `a OR !a`.
    SelfConflictingClause,
}

/// A clause: a disjunction of literals, sorted and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    /// Creates a new clause from the given literals.
    ///
    /// Deduplicates any duplicated literals and sorts them in the process.
    ///
    /// # Errors
    ///
    /// - If the literals are empty.
    /// - If the literals are self conflicting, e.g. `a AND -a`.
    pub fn new<L>(literals: L) -> Result<Self, Error>
    where
        L: IntoIterator<Item = Literal>,
    {
        let mut literals = literals.into_iter().collect::<Vec<_>>();
        if literals.is_empty() {
            return Err(Error::EmptyClause)
        }
        literals.sort_unstable();
        literals.dedup();
        let mut occurrences = HashSet::with_capacity(literals.len());
        for &literal in &literals {
            if occurrences.contains(&!literal) {
                return Err(Error::SelfConflictingClause)
            }
            occurrences.insert(literal);
        }
        Ok(Self { literals })
    }

    /// Builds a clause from literals already verified and ordered by the
    /// caller (by [`crate::clause_db::ClauseBuilder`], for a clause learned
    /// by conflict analysis). Skips the sort/dedup/self-conflict checks
    /// `new` performs, and preserves the caller's literal order — conflict
    /// analysis relies on the asserting literal staying in place at index 0.
    pub(crate) fn from_verified(literals: Vec<Literal>) -> Self {
        debug_assert!(literals.len() >= 2);
        Self { literals }
    }

    /// Returns the first literal of the clause if the clause is a unit clause.
    pub fn unit_literal(&self) -> Option<Literal> {
        if self.len() == 1 {
            return Some(self.literals[0])
        }
        None
    }

    /// Returns the number of literals in the clause.
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Returns `true` if the clause has no literals.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = Literal;
    type IntoIter = iter::Copied<slice::Iter<'a, Literal>>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Variable;
    use bounded::Index;

    #[test]
    fn new_empty_clause_fails() {
        assert_eq!(Clause::new(vec![]), Err(Error::EmptyClause));
    }

    #[test]
    fn new_self_conflicting_clause_fails() {
        let var = Variable::from_index(0);
        assert_eq!(
            Clause::new(vec![var.pos_literal(), var.neg_literal()]),
            Err(Error::SelfConflictingClause)
        );
    }

    #[test]
    fn new_unit_clause_works() {
        let var = Variable::from_index(0);
        let clause = Clause::new(vec![var.pos_literal()]).unwrap();
        assert_eq!(clause.unit_literal(), Some(var.pos_literal()));
    }

    #[test]
    fn new_complex_clause_works() {
        let a = Variable::from_index(0);
        let b = Variable::from_index(1);
        let c = Variable::from_index(2);
        let clause = Clause::new(vec![a.pos_literal(), b.pos_literal(), c.neg_literal()]).unwrap();
        assert_eq!(clause.len(), 3);
    }

    #[test]
    fn new_clause_with_duplicate_lits_works() {
        let var = Variable::from_index(0);
        let clause = Clause::new(vec![var.pos_literal(), var.pos_literal()]).unwrap();
        assert_eq!(clause.len(), 1);
    }

    #[test]
    fn clause_iter_works() {
        let a = Variable::from_index(0);
        let b = Variable::from_index(1);
        let c = Variable::from_index(2);
        let clause = Clause::new(vec![a.pos_literal(), b.pos_literal(), c.neg_literal()]).unwrap();
        let lits = clause.into_iter().collect::<Vec<_>>();
        assert!(lits.contains(&a.pos_literal()));
        assert!(lits.contains(&b.pos_literal()));
        assert!(lits.contains(&c.neg_literal()));
    }
}
