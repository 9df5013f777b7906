// Handler precondition flags

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitset of node-state preconditions a handler declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Condition(u8);

impl Condition {
    pub const NO_CONDITION: Condition = Condition(0);
    pub const NEEDS_NETWORK_CONNECTION: Condition = Condition(1);
    pub const NEEDS_CURRENT_LEDGER: Condition = Condition(1 << 1);
    pub const NEEDS_CLOSED_LEDGER: Condition = Condition(1 << 2);

    /// True if every flag in `other` is set in `self`
    pub const fn contains(self, other: Condition) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    /// True if any flag in `other` is set in `self`
    pub const fn intersects(self, other: Condition) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for Condition {
    type Output = Condition;

    fn bitor(self, rhs: Condition) -> Condition {
        Condition(self.0 | rhs.0)
    }
}

impl BitOrAssign for Condition {
    fn bitor_assign(&mut self, rhs: Condition) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = [
            (Condition::NEEDS_NETWORK_CONNECTION, "network"),
            (Condition::NEEDS_CURRENT_LEDGER, "current_ledger"),
            (Condition::NEEDS_CLOSED_LEDGER, "closed_ledger"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| *name)
        .collect();
        f.write_str(&names.join("|"))
    }
}
