// File: testing-framework/src/orchestrator/clock.rs
//
// Clock Abstraction
//
// Query backoff and the simulated ledger's latency sleep through this trait,
// so tests can run them under tokio's paused time instead of waiting.

use std::future::Future;
use std::pin::Pin;
use tokio::time::{self, Duration, Instant};

/// Source of time for everything in the harness that waits
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tokio::time::Duration;
/// use ledger_testing_framework::orchestrator::clock::{Clock, PausedClock};
///
/// #[tokio::test(start_paused = true)]
/// async fn test_backoff_is_instant() {
///     let clock: Arc<dyn Clock> = Arc::new(PausedClock::new());
///     let start = clock.now();
///     clock.sleep(Duration::from_secs(30)).await;
///     assert_eq!(clock.now() - start, Duration::from_secs(30));
/// }
/// ```
pub trait Clock: Send + Sync {
    /// Current instant (simulated under a paused runtime)
    fn now(&self) -> Instant;

    /// Sleep for `d`
    fn sleep(&self, d: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// Wall-clock time, used against a real ledger node
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        time::Instant::now()
    }

    fn sleep(&self, d: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(time::sleep(d))
    }
}

/// Paused tokio time, used with `#[tokio::test(start_paused = true)]`
///
/// Sleeps complete as soon as the runtime has nothing else to do, which lets
/// a retry loop with multi-second backoff finish in microseconds while still
/// observing the same ordering of events.
pub struct PausedClock;

impl PausedClock {
    /// Create the clock and pause tokio time
    ///
    /// Must be called from inside a current-thread tokio runtime.
    pub fn new() -> Self {
        time::pause();
        Self
    }

    /// Move simulated time forward by `d`
    pub async fn advance(&self, d: Duration) {
        time::advance(d).await
    }
}

impl Clock for PausedClock {
    fn now(&self) -> Instant {
        time::Instant::now()
    }

    fn sleep(&self, d: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(time::sleep(d))
    }
}

impl Default for PausedClock {
    fn default() -> Self {
        Self::new()
    }
}
