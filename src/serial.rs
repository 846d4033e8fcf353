use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque handle that tells one world object apart from every other.
///
/// The inner value is private so a `Serial` never mixes with unrelated
/// integers. Use [`Serial::from_raw`] and [`Serial::to_raw`] to cross the
/// boundary explicitly.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Serial(i32);

impl Serial {
    /// The state of a fresh allocator, before anything was issued.
    pub const ZERO: Serial = Serial(0);

    /// Means "no valid serial".
    pub const MINUS_ONE: Serial = Serial(-1);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> i32 {
        self.0
    }

    /// Only strictly positive serials may name an object.
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }

    /// The serial right after this one, or `None` at the end of the range.
    pub fn successor(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

impl fmt::Debug for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Serial({})", self)
    }
}
