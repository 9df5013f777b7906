// Network Operations Port
// Read-only view of connectivity and protocol-amendment status

use crate::domain::OperatingMode;

pub trait NetworkOps: Send + Sync {
    fn operating_mode(&self) -> OperatingMode;

    /// True when the node runs obsolete protocol rules
    fn is_amendment_blocked(&self) -> bool;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    pub struct MockNetworkOps {
        state: Mutex<(OperatingMode, bool)>,
    }

    impl MockNetworkOps {
        pub fn new(mode: OperatingMode) -> Self {
            Self {
                state: Mutex::new((mode, false)),
            }
        }

        pub fn set_mode(&self, mode: OperatingMode) {
            self.state.lock().unwrap().0 = mode;
        }

        pub fn set_amendment_blocked(&self, blocked: bool) {
            self.state.lock().unwrap().1 = blocked;
        }
    }

    impl NetworkOps for MockNetworkOps {
        fn operating_mode(&self) -> OperatingMode {
            self.state.lock().unwrap().0
        }

        fn is_amendment_blocked(&self) -> bool {
            self.state.lock().unwrap().1
        }
    }
}
