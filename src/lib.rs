//! # timing-ledger
//!
//! Thread-safe named timers with lap aggregation and template-driven
//! reports.
//!
//! This crate instruments arbitrary code regions with three clocks —
//! wall-clock, user-CPU and system-CPU time — plus a derived CPU-utilization
//! percentage, aggregates repeated measurements ("laps"), and renders them
//! through a small format-string language:
//!
//! | token | meaning                  |
//! |-------|--------------------------|
//! | `%w`  | wall-clock seconds       |
//! | `%u`  | user-CPU seconds         |
//! | `%s`  | system-CPU seconds       |
//! | `%t`  | total CPU seconds        |
//! | `%p`  | CPU utilization percent  |
//!
//! Everything else in a template is literal text. There is no escape for a
//! literal token — a known limitation, kept for simplicity.
//!
//! ## Quick Start
//!
//! ```ignore
//! use timing_ledger::{scoped_timer, TimerRegistry};
//!
//! fn project_signal() {
//!     let _t = scoped_timer!("project_signal");
//!     // ... work ...
//! } // lap recorded here
//!
//! // at end of run:
//! TimerRegistry::global().report_all();
//! ```
//!
//! Timers can also be driven directly, with full control over precision,
//! template and destination:
//!
//! ```ignore
//! use timing_ledger::{Sink, Timer};
//!
//! let sink = Sink::memory();
//! let mut timer = Timer::new(2, "wall=%w cpu=%t [%p%]", sink.clone());
//! // ... work (the first lap starts at construction) ...
//! timer.stop();
//! timer.report();
//! println!("{}", sink.contents().unwrap());
//! ```
//!
//! ## Design notes
//!
//! Instrumentation must never take the instrumented program down: malformed
//! templates are inert text, stopping an idle timer is a no-op, write errors
//! are swallowed, and poisoned locks are ignored. The one fatal condition is
//! internal corruption of a compiled format table, which asserts.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod clock;
mod config;
mod format;
mod registry;
mod scope;
mod sink;
mod timer;

pub mod output;

pub use config::{TimerConfig, DEFAULT_FORMAT, DEFAULT_PRECISION};
pub use format::{ClockField, ClockFormat, Elapsed, FormatPosition};
pub use registry::{TimerHandle, TimerKey, TimerRegistry, TimerSummary};
pub use scope::ScopedTimer;
pub use sink::Sink;
pub use timer::Timer;

/// Time the enclosing scope against the global registry.
///
/// Convenience wrapper over [`ScopedTimer::new`]; prefer
/// [`ScopedTimer::with_registry`] when injecting a registry explicitly.
pub fn scoped(tag: &str) -> ScopedTimer {
    ScopedTimer::new(tag)
}

/// Report every timer in the global registry to its own sink.
pub fn report_all() {
    TimerRegistry::global().report_all();
}
