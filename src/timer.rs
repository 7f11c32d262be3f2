//! The lap-accumulating timer at the heart of the crate.

use crate::clock::ClockSample;
use crate::config::TimerConfig;
use crate::format::{ClockFormat, Elapsed};
use crate::sink::Sink;

/// Measures wall-clock, user-CPU and system-CPU time for a code region and
/// renders the readings through a compiled report template.
///
/// A timer accumulates across repeated start/stop cycles ("laps"): each
/// `stop()` adds the lap's deltas to the running totals and bumps the lap
/// count, which is what makes `(average of N laps)` reporting meaningful.
/// [`reset`](Timer::reset) is the way back to zero.
///
/// Construction starts the first lap immediately; call
/// [`stop`](Timer::stop) (or just drop the timer) to finish it.
///
/// A timer is driven by one logical control flow at a time. Share one across
/// threads only behind the registry's handle, which wraps it in a mutex.
#[derive(Debug)]
pub struct Timer {
    precision: usize,
    format: ClockFormat,
    sink: Sink,
    /// In-flight lap start; `None` while stopped.
    started: Option<ClockSample>,
    elapsed: Elapsed,
    /// True once `stop()` has made the elapsed totals authoritative.
    valid_times: bool,
    lap_count: u64,
}

impl Timer {
    /// Create a timer and start its first lap.
    ///
    /// The template is compiled once here; the sink is borrowed for the
    /// timer's lifetime and never closed by it.
    pub fn new(precision: usize, format: impl Into<String>, sink: Sink) -> Self {
        let mut timer = Self {
            precision,
            format: ClockFormat::compile(format),
            sink,
            started: None,
            elapsed: Elapsed::default(),
            valid_times: false,
            lap_count: 0,
        };
        timer.start();
        timer
    }

    /// Create a timer from a config's precision, template and sink.
    pub fn with_config(config: &TimerConfig) -> Self {
        Self::new(config.precision, config.format.clone(), config.sink.clone())
    }

    /// Begin a lap.
    ///
    /// Calling `start` while a lap is already running abandons the
    /// in-progress lap and begins a new one; a warning is logged.
    /// Accumulated totals from completed laps are untouched either way.
    pub fn start(&mut self) {
        if self.started.is_some() {
            tracing::warn!("start() on a running timer; restarting the current lap");
        }
        self.started = Some(ClockSample::now());
    }

    /// Finish the current lap, folding its deltas into the totals.
    ///
    /// A no-op when no lap is running: the existing totals stay as they are.
    pub fn stop(&mut self) {
        let Some(start) = self.started.take() else {
            return;
        };
        let end = ClockSample::now();
        self.elapsed.wall += end.wall.duration_since(start.wall).as_secs_f64();
        self.elapsed.user += (end.user - start.user).max(0.0);
        self.elapsed.system += (end.system - start.system).max(0.0);
        self.lap_count += 1;
        self.valid_times = true;
    }

    /// Accumulated wall-clock seconds across completed laps.
    pub fn real_elapsed(&self) -> f64 {
        self.elapsed.wall
    }

    /// Accumulated user-CPU seconds across completed laps.
    pub fn user_elapsed(&self) -> f64 {
        self.elapsed.user
    }

    /// Accumulated system-CPU seconds across completed laps.
    pub fn system_elapsed(&self) -> f64 {
        self.elapsed.system
    }

    /// Accumulated total CPU seconds (user + system).
    pub fn cpu_elapsed(&self) -> f64 {
        self.elapsed.cpu()
    }

    /// The accumulated readings as one value.
    pub fn elapsed(&self) -> Elapsed {
        self.elapsed
    }

    /// Completed start/stop cycles.
    pub fn laps(&self) -> u64 {
        self.lap_count
    }

    /// Whether a lap is currently running.
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// The sink this timer reports to.
    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    /// The template this timer renders with.
    pub fn format(&self) -> &ClockFormat {
        &self.format
    }

    /// Clear the accumulated totals and lap count.
    ///
    /// Any in-progress lap is abandoned; the timer is left stopped.
    pub fn reset(&mut self) {
        self.started = None;
        self.elapsed = Elapsed::default();
        self.valid_times = false;
        self.lap_count = 0;
    }

    /// Render the report line without writing it anywhere.
    ///
    /// A timer that was never finalized is stopped first, so rendering an
    /// unstopped timer implicitly ends its lap. With `average`, duration
    /// fields are divided by the lap count (when non-zero) and an
    /// `" (average of N laps)"` suffix is appended. With `endline`, a
    /// newline terminates the string.
    pub fn render_report(&mut self, endline: bool, average: bool) -> String {
        if !self.valid_times {
            self.stop();
        }
        let divisor = if average && self.lap_count > 0 {
            1.0 / self.lap_count as f64
        } else {
            1.0
        };
        let mut out = self.format.render(&self.elapsed, self.precision, divisor);
        if average {
            out.push_str(&format!(" (average of {} laps)", self.lap_count));
        }
        if endline {
            out.push('\n');
        }
        out
    }

    /// Write a report line to the timer's own sink.
    pub fn report(&mut self) {
        let sink = self.sink.clone();
        self.report_to(&sink, true, false);
    }

    /// Write a per-lap average report line to the timer's own sink.
    pub fn report_average(&mut self) {
        let sink = self.sink.clone();
        self.report_to(&sink, true, true);
    }

    /// Write a report line to an arbitrary sink.
    ///
    /// The fully assembled string goes out in one write under the sink's
    /// lock, so reports from timers sharing a destination never interleave.
    pub fn report_to(&mut self, sink: &Sink, endline: bool, average: bool) {
        let line = self.render_report(endline, average);
        sink.write_str(&line);
    }
}

impl Drop for Timer {
    /// A timer that was never explicitly stopped finalizes itself: stop,
    /// then report — unless the sink is a console stream, which stays
    /// silent at teardown.
    fn drop(&mut self) {
        if !self.valid_times {
            self.stop();
            if !self.sink.is_console() {
                self.report();
            }
        }
    }
}
