//! The entity model of the core: variables, their two literals, and signs.
//!
//! Mirrors §3 of the specification: a variable is a positive index, a literal
//! is a signed index whose magnitude names its variable and whose sign names
//! its polarity. Both are handles into the arenas owned by [`crate::SatState`],
//! never owners themselves.

use bounded::{
    Bool,
    Index,
};
use core::{
    convert::TryFrom,
    fmt,
    fmt::{
        Debug,
        Display,
        Formatter,
    },
    ops::Not,
};

/// The sign of a literal.
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Sign(bool);

impl Debug for Sign {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.into_bool() {
            true => write!(f, "Sign::POS"),
            false => write!(f, "Sign::NEG"),
        }
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_neg() {
            write!(f, "-")?;
        }
        Ok(())
    }
}

impl Sign {
    /// The positive sign.
    pub const POS: Self = Self(true);

    /// The negative sign.
    pub const NEG: Self = Self(false);

    /// Returns `true` if the sign has positive polarity.
    pub fn is_pos(self) -> bool {
        self.0
    }

    /// Returns `true` if the sign has negative polarity.
    pub fn is_neg(self) -> bool {
        !self.is_pos()
    }
}

impl Bool for Sign {
    /// Creates a sign from the given `bool` value.
    ///
    /// - `false` becomes `Sign::NEG`
    /// - `true` becomes `Sign::POS`
    #[inline]
    fn from_bool(value: bool) -> Self {
        Self(value)
    }

    /// Converts the sign into a `bool` value.
    ///
    /// - `Sign::POS` becomes `true`
    /// - `Sign::NEG` becomes `false`
    #[inline]
    fn into_bool(self) -> bool {
        self.0
    }
}

impl Not for Sign {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

/// A unique variable `v ∈ [0, n)` (internal, 0-based).
///
/// External-facing operations such as [`crate::SatState::index2var`] use the
/// DIMACS-style 1-based numbering from §6; this type is the internal handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Variable {
    value: u32,
}

impl Variable {
    /// The maximum supported number of unique variables.
    ///
    /// Literal indices must fit in a `u32`, and each variable owns two
    /// literals, so variables are bounded to half the index space.
    pub const MAX_LEN: usize = (u32::MAX >> 1) as usize;

    /// Returns `true` if the given index is a valid variable index.
    #[inline]
    pub(crate) fn is_valid_index(index: usize) -> bool {
        index < Self::MAX_LEN && u32::try_from(index).is_ok()
    }

    /// Returns the positive-polarity literal of this variable.
    #[inline]
    pub fn pos_literal(self) -> Literal {
        self.into_literal(Sign::POS)
    }

    /// Returns the negative-polarity literal of this variable.
    #[inline]
    pub fn neg_literal(self) -> Literal {
        self.into_literal(Sign::NEG)
    }

    /// Returns the literal for this variable with the given polarity.
    #[inline]
    pub fn into_literal(self, sign: Sign) -> Literal {
        let sign = sign.is_neg() as u32;
        Literal {
            value: (self.value << 1) + sign,
        }
    }

    /// Returns the 0-based index of the variable.
    #[inline]
    pub(crate) fn into_index(self) -> usize {
        self.value as usize
    }
}

impl Index for Variable {
    fn from_index(index: usize) -> Self {
        assert!(
            Variable::is_valid_index(index),
            "encountered out of bounds variable index {}",
            index
        );
        Self {
            value: index as u32,
        }
    }

    fn into_index(self) -> usize {
        self.into_index()
    }
}

/// A signed literal `ℓ ∈ [-n, -1] ∪ [1, n]`.
///
/// Encoded as `(variable << 1) | sign_bit` so that negation is a single XOR
/// and both polarities of a variable sit next to each other in index space,
/// which lets literal-keyed arenas (occurrence lists, watch lists) be plain
/// arrays indexed by `2 * variable + polarity`.
#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[repr(transparent)]
pub struct Literal {
    value: u32,
}

impl Literal {
    /// Returns the variable of the literal.
    #[inline]
    pub fn variable(self) -> Variable {
        Variable {
            value: self.value >> 1,
        }
    }

    /// Returns the polarity of the literal.
    #[inline]
    pub fn sign(self) -> Sign {
        Sign((self.value & 1) == 0)
    }

    /// Returns `true` if the literal has positive polarity.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.sign().is_pos()
    }

    /// Returns `true` if the literal has negative polarity.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.sign().is_neg()
    }

    /// The literal weight hook required by §6. Always `1`: this core does not
    /// implement weighted model counting beyond exposing this constant.
    #[inline]
    pub fn weight(self) -> u32 {
        1
    }
}

impl Debug for Literal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}{}", self.sign(), self.variable().into_index() + 1)
    }
}

impl From<i32> for Literal {
    #[inline]
    fn from(x: i32) -> Self {
        debug_assert!(x != 0, "encountered the reserved zero literal");
        let var = x.unsigned_abs() - 1;
        let sign = (x < 0) as u32;
        Literal {
            value: (var << 1) + sign,
        }
    }
}

impl From<cnf_parser::Literal> for Literal {
    #[inline]
    fn from(literal: cnf_parser::Literal) -> Self {
        Self::from(literal.into_value().get())
    }
}

impl Not for Literal {
    type Output = Self;

    /// Returns the complement `comp(ℓ)` of the literal.
    #[inline]
    fn not(self) -> Self::Output {
        Self {
            value: self.value ^ 1,
        }
    }
}

impl Index for Literal {
    /// Creates the literal whose raw encoding equals `index`.
    ///
    /// Used to key literal-indexed arenas (the `2n` slots of §4.1) directly,
    /// without detouring through `Variable` and a sign.
    fn from_index(index: usize) -> Self {
        Self {
            value: index as u32,
        }
    }

    fn into_index(self) -> usize {
        self.value as usize
    }
}
