// Ledger Master Port
// Read-only ledger freshness queries

use crate::domain::ClosedLedger;
use std::time::Duration;

pub trait LedgerMaster: Send + Sync {
    /// Time since the last validated ledger closed
    fn validated_ledger_age(&self) -> Duration;

    /// Index of the ledger currently being built
    fn current_ledger_index(&self) -> u32;

    /// Index of the last fully validated ledger
    fn valid_ledger_index(&self) -> u32;

    fn closed_ledger(&self) -> Option<ClosedLedger>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub struct LedgerSnapshot {
        pub validated_age: Duration,
        pub current_index: u32,
        pub valid_index: u32,
        pub closed: Option<ClosedLedger>,
    }

    /// Ledger master with freely adjustable state
    pub struct MockLedgerMaster {
        state: Mutex<LedgerSnapshot>,
    }

    impl MockLedgerMaster {
        /// A healthy node: fresh validation, current index just ahead
        pub fn healthy() -> Self {
            Self {
                state: Mutex::new(LedgerSnapshot {
                    validated_age: Duration::from_secs(2),
                    current_index: 101,
                    valid_index: 100,
                    closed: Some(ClosedLedger {
                        seq: 100,
                        hash: "A".repeat(64),
                        close_time_ms: 0,
                    }),
                }),
            }
        }

        pub fn set_validated_age(&self, age: Duration) {
            self.state.lock().unwrap().validated_age = age;
        }

        pub fn set_indices(&self, current: u32, valid: u32) {
            let mut state = self.state.lock().unwrap();
            state.current_index = current;
            state.valid_index = valid;
        }

        pub fn set_closed(&self, closed: Option<ClosedLedger>) {
            self.state.lock().unwrap().closed = closed;
        }
    }

    impl LedgerMaster for MockLedgerMaster {
        fn validated_ledger_age(&self) -> Duration {
            self.state.lock().unwrap().validated_age
        }

        fn current_ledger_index(&self) -> u32 {
            self.state.lock().unwrap().current_index
        }

        fn valid_ledger_index(&self) -> u32 {
            self.state.lock().unwrap().valid_index
        }

        fn closed_ledger(&self) -> Option<ClosedLedger> {
            self.state.lock().unwrap().closed.clone()
        }
    }
}
