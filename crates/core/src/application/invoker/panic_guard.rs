// Panic isolation for command handlers
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::error;

/// Result of a panic-guarded execution
#[derive(Debug)]
pub enum PanicGuardResult<T> {
    /// Execution completed
    Success(T),
    /// Execution panicked
    Panicked(String),
}

/// Execute a future with panic isolation
///
/// Panics raised while polling are caught here and returned as
/// `PanicGuardResult::Panicked`. The future is wrapped in `AssertUnwindSafe`:
/// callers must not trust state the future was mutating when it panicked.
pub async fn execute_guarded_async<F, T>(future: F) -> PanicGuardResult<T>
where
    F: Future<Output = T>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => PanicGuardResult::Success(result),
        Err(payload) => {
            let panic_msg = panic_message(payload.as_ref());
            error!(panic_msg = %panic_msg, "Handler panicked");
            PanicGuardResult::Panicked(panic_msg)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guarded_async_panic_string() {
        let result = execute_guarded_async(async {
            tokio::task::yield_now().await;
            let n = 3;
            if n == 3 {
                panic!("ledger {} missing", n);
            }
            n
        })
        .await;

        match result {
            PanicGuardResult::Panicked(msg) => assert_eq!(msg, "ledger 3 missing"),
            PanicGuardResult::Success(_) => panic!("panic was not caught"),
        }
    }

    #[tokio::test]
    async fn test_guarded_async_success() {
        match execute_guarded_async(async { "ok" }).await {
            PanicGuardResult::Success(v) => assert_eq!(v, "ok"),
            PanicGuardResult::Panicked(msg) => panic!("unexpected panic: {msg}"),
        }
    }

    #[test]
    fn test_non_string_payload() {
        let result = tokio_test::block_on(execute_guarded_async(async {
            std::panic::panic_any(42_u32);
        }));
        assert!(matches!(result, PanicGuardResult::Panicked(msg) if msg == "Unknown panic"));
    }
}
