// Performance Log Port
// Write-only, fire-and-forget instrumentation sink

/// Receives exactly one `rpc_finish` or `rpc_error` per `rpc_start`
pub trait PerfLog: Send + Sync {
    fn rpc_start(&self, method: &str, request_id: u64);
    fn rpc_finish(&self, method: &str, request_id: u64);
    fn rpc_error(&self, method: &str, request_id: u64);
}

/// Sink that drops every event
pub struct NullPerfLog;

impl PerfLog for NullPerfLog {
    fn rpc_start(&self, _method: &str, _request_id: u64) {}
    fn rpc_finish(&self, _method: &str, _request_id: u64) {}
    fn rpc_error(&self, _method: &str, _request_id: u64) {}
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum PerfEventKind {
        Start,
        Finish,
        Error,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PerfEvent {
        pub kind: PerfEventKind,
        pub method: String,
        pub request_id: u64,
    }

    /// Records every event in arrival order
    #[derive(Default)]
    pub struct RecordingPerfLog {
        events: Mutex<Vec<PerfEvent>>,
    }

    impl RecordingPerfLog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<PerfEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn events_for(&self, request_id: u64) -> Vec<PerfEventKind> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.request_id == request_id)
                .map(|e| e.kind)
                .collect()
        }

        fn record(&self, kind: PerfEventKind, method: &str, request_id: u64) {
            self.events.lock().unwrap().push(PerfEvent {
                kind,
                method: method.to_string(),
                request_id,
            });
        }
    }

    impl PerfLog for RecordingPerfLog {
        fn rpc_start(&self, method: &str, request_id: u64) {
            self.record(PerfEventKind::Start, method, request_id);
        }

        fn rpc_finish(&self, method: &str, request_id: u64) {
            self.record(PerfEventKind::Finish, method, request_id);
        }

        fn rpc_error(&self, method: &str, request_id: u64) {
            self.record(PerfEventKind::Error, method, request_id);
        }
    }
}
