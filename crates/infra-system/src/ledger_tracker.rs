// Ledger tracker adapter
// Tracks working/validated ledger indices and the last closed ledger

use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info};

use ledger_rpc_core::domain::ClosedLedger;
use ledger_rpc_core::port::{LedgerMaster, TimeProvider};

/// Age reported before any ledger has been validated (two weeks)
pub const NO_VALIDATED_LEDGER_AGE: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// First ledger index the node builds
pub const GENESIS_LEDGER_INDEX: u32 = 1;

pub struct LedgerTracker {
    time_provider: Arc<dyn TimeProvider>,
    current_index: AtomicU32,
    valid_index: AtomicU32,
    // 0 until the first validation
    validated_at_ms: AtomicI64,
    closed: RwLock<Option<ClosedLedger>>,
}

impl LedgerTracker {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            time_provider,
            current_index: AtomicU32::new(GENESIS_LEDGER_INDEX),
            valid_index: AtomicU32::new(0),
            validated_at_ms: AtomicI64::new(0),
            closed: RwLock::new(None),
        }
    }

    /// Close the working ledger and open the next one
    pub fn close_ledger(&self, hash: impl Into<String>) -> ClosedLedger {
        let mut closed = self.closed.write().unwrap_or_else(PoisonError::into_inner);
        let seq = self.current_index.fetch_add(1, Ordering::AcqRel);
        let ledger = ClosedLedger {
            seq,
            hash: hash.into(),
            close_time_ms: self.time_provider.now_millis(),
        };
        debug!(seq, hash = %ledger.hash, "Ledger closed");
        *closed = Some(ledger.clone());
        ledger
    }

    /// Record `seq` as fully validated
    ///
    /// Validations older than the current validated ledger are ignored.
    pub fn validate_ledger(&self, seq: u32) -> bool {
        let previous = self.valid_index.fetch_max(seq, Ordering::AcqRel);
        if seq <= previous {
            return false;
        }
        self.validated_at_ms
            .store(self.time_provider.now_millis(), Ordering::Release);
        info!(seq, "Ledger validated");
        true
    }

    /// Standalone close: close the working ledger and validate it at once
    pub fn accept_ledger(&self) -> ClosedLedger {
        let ledger = self.close_ledger(synthetic_hash());
        self.validate_ledger(ledger.seq);
        ledger
    }
}

impl LedgerMaster for LedgerTracker {
    fn validated_ledger_age(&self) -> Duration {
        let validated_at = self.validated_at_ms.load(Ordering::Acquire);
        if validated_at == 0 {
            return NO_VALIDATED_LEDGER_AGE;
        }
        let elapsed = self.time_provider.now_millis().saturating_sub(validated_at);
        Duration::from_millis(u64::try_from(elapsed).unwrap_or(0))
    }

    fn current_ledger_index(&self) -> u32 {
        self.current_index.load(Ordering::Acquire)
    }

    fn valid_ledger_index(&self) -> u32 {
        self.valid_index.load(Ordering::Acquire)
    }

    fn closed_ledger(&self) -> Option<ClosedLedger> {
        self.closed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// 256-bit uppercase hex identifier for locally accepted ledgers
fn synthetic_hash() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
    .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_rpc_core::port::time_provider::mocks::ManualClock;

    fn tracker() -> (Arc<ManualClock>, LedgerTracker) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let tracker = LedgerTracker::new(clock.clone());
        (clock, tracker)
    }

    #[test]
    fn test_fresh_tracker_has_nothing_validated() {
        let (_, tracker) = tracker();
        assert_eq!(tracker.current_ledger_index(), GENESIS_LEDGER_INDEX);
        assert_eq!(tracker.valid_ledger_index(), 0);
        assert_eq!(tracker.validated_ledger_age(), NO_VALIDATED_LEDGER_AGE);
        assert!(tracker.closed_ledger().is_none());
    }

    #[test]
    fn test_accept_advances_and_validates() {
        let (clock, tracker) = tracker();

        let first = tracker.accept_ledger();
        assert_eq!(first.seq, 1);
        assert_eq!(first.hash.len(), 64);
        assert_eq!(tracker.current_ledger_index(), 2);
        assert_eq!(tracker.valid_ledger_index(), 1);
        assert_eq!(tracker.closed_ledger(), Some(first));

        clock.advance_millis(4_000);
        assert_eq!(tracker.validated_ledger_age(), Duration::from_secs(4));
    }

    #[test]
    fn test_stale_validation_ignored() {
        let (clock, tracker) = tracker();
        assert!(tracker.validate_ledger(20));
        clock.advance_millis(10_000);
        assert!(!tracker.validate_ledger(15));
        assert_eq!(tracker.valid_ledger_index(), 20);
        assert_eq!(tracker.validated_ledger_age(), Duration::from_secs(10));
    }

    #[test]
    fn test_close_without_validation() {
        let (_, tracker) = tracker();
        let closed = tracker.close_ledger("ABCD");
        assert_eq!(closed.seq, 1);
        assert_eq!(tracker.valid_ledger_index(), 0);
        assert_eq!(tracker.closed_ledger().unwrap().hash, "ABCD");
    }
}
