// Network state adapter
// Operating mode and amendment status, updated by the node and read by RPC

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use tracing::{info, warn};

use ledger_rpc_core::domain::OperatingMode;
use ledger_rpc_core::port::NetworkOps;

#[derive(Debug)]
pub struct NetworkState {
    mode: AtomicU8,
    amendment_blocked: AtomicBool,
}

impl NetworkState {
    pub fn new(mode: OperatingMode) -> Self {
        Self {
            mode: AtomicU8::new(mode.as_u8()),
            amendment_blocked: AtomicBool::new(false),
        }
    }

    pub fn set_mode(&self, mode: OperatingMode) {
        let previous = self.mode.swap(mode.as_u8(), Ordering::AcqRel);
        if previous != mode.as_u8() {
            let from = OperatingMode::from_u8(previous).unwrap_or(OperatingMode::Disconnected);
            info!(from = %from, to = %mode, "Operating mode changed");
        }
    }

    pub fn set_amendment_blocked(&self, blocked: bool) {
        let previous = self.amendment_blocked.swap(blocked, Ordering::AcqRel);
        if blocked && !previous {
            warn!("Node is amendment blocked; ledger commands are disabled until upgrade");
        }
    }
}

impl NetworkOps for NetworkState {
    fn operating_mode(&self) -> OperatingMode {
        OperatingMode::from_u8(self.mode.load(Ordering::Acquire))
            .unwrap_or(OperatingMode::Disconnected)
    }

    fn is_amendment_blocked(&self) -> bool {
        self.amendment_blocked.load(Ordering::Acquire)
    }
}
