// Resource fee classification for RPC requests

use std::fmt;

/// How much a request is charged against the caller's resource budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadType {
    ReferenceRpc,
    ExceptionRpc,
    MediumBurdenRpc,
    HighBurdenRpc,
}

impl LoadType {
    pub fn cost(self) -> u32 {
        match self {
            LoadType::ReferenceRpc => 20,
            LoadType::ExceptionRpc => 100,
            LoadType::MediumBurdenRpc => 400,
            LoadType::HighBurdenRpc => 3000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LoadType::ReferenceRpc => "reference RPC",
            LoadType::ExceptionRpc => "exceptioned RPC",
            LoadType::MediumBurdenRpc => "medium RPC",
            LoadType::HighBurdenRpc => "heavy RPC",
        }
    }

    /// Bill a failed invocation at exception cost
    ///
    /// Only the reference classification moves; a handler that already
    /// raised its own charge keeps it.
    pub fn escalate_on_exception(&mut self) {
        if *self == LoadType::ReferenceRpc {
            *self = LoadType::ExceptionRpc;
        }
    }
}

impl Default for LoadType {
    fn default() -> Self {
        LoadType::ReferenceRpc
    }
}

impl fmt::Display for LoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalation_is_one_way() {
        let mut load = LoadType::ReferenceRpc;
        load.escalate_on_exception();
        assert_eq!(load, LoadType::ExceptionRpc);
        load.escalate_on_exception();
        assert_eq!(load, LoadType::ExceptionRpc);
    }

    #[test]
    fn test_heavier_charges_untouched() {
        let mut load = LoadType::HighBurdenRpc;
        load.escalate_on_exception();
        assert_eq!(load, LoadType::HighBurdenRpc);
    }
}
