//! Scope-bound timers.
//!
//! A [`ScopedTimer`] starts a registry timer when constructed and stops it
//! when dropped, so every exit path — normal return, early return, panic
//! unwind — ends the lap. The registry's live-scope counter supplies the
//! instance ordinal, which keeps concurrently active timers sharing a tag on
//! separate registry entries (two threads timing `"fft"` at once get `"fft"`
//! and `"fft #2"`).

use std::sync::Arc;

use crate::registry::{TimerHandle, TimerRegistry};

/// Context label scoped timers register under.
const SCOPE_CONTEXT: &str = "scope";

/// RAII guard that times the enclosing scope.
///
/// # Example
///
/// ```ignore
/// use timing_ledger::ScopedTimer;
///
/// fn solve() {
///     let _t = ScopedTimer::new("solve");
///     // ... work ...
/// } // lap ends here
/// ```
#[derive(Debug)]
pub struct ScopedTimer {
    timer: TimerHandle,
    registry: Arc<TimerRegistry>,
}

impl ScopedTimer {
    /// Time a scope against the global registry.
    pub fn new(tag: &str) -> Self {
        Self::with_registry(TimerRegistry::global(), tag)
    }

    /// Time a scope against an explicitly provided registry.
    pub fn with_registry(registry: &Arc<TimerRegistry>, tag: &str) -> Self {
        let ordinal = registry.enter_scope();
        let timer = registry.timer(tag, SCOPE_CONTEXT, ordinal);
        timer.lock().start();
        Self {
            timer,
            registry: Arc::clone(registry),
        }
    }

    /// The registry timer this guard drives.
    ///
    /// The handle outlives the guard; use it to report or read accumulated
    /// totals after the scope has closed.
    pub fn timer(&self) -> TimerHandle {
        self.timer.clone()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        self.timer.lock().stop();
        self.registry.exit_scope();
    }
}

/// Time the enclosing scope against the global registry.
///
/// With no argument the tag is the enclosing module path.
///
/// ```ignore
/// use timing_ledger::scoped_timer;
///
/// fn accumulate() {
///     let _t = scoped_timer!("accumulate");
///     // ... work ...
/// }
/// ```
#[macro_export]
macro_rules! scoped_timer {
    () => {
        $crate::ScopedTimer::new(module_path!())
    };
    ($tag:expr) => {
        $crate::ScopedTimer::new($tag)
    };
}
