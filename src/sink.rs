//! Report output destinations.
//!
//! A [`Sink`] is a cheap, clonable handle to somewhere report text can be
//! written: a console stream, an in-memory buffer, or any [`io::Write`]
//! implementor. Handles cloned from the same sink share a single lock, so
//! timers reporting to the same destination serialize their writes while
//! timers on unrelated sinks never contend. Timers borrow sinks; a sink is
//! never closed by the timers writing to it.
//!
//! Write failures are swallowed: instrumentation must never take the host
//! program down with it. A failed write is logged at debug level and
//! otherwise ignored.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// A destination for rendered report lines.
#[derive(Clone)]
pub struct Sink {
    inner: SinkInner,
}

#[derive(Clone)]
enum SinkInner {
    Stdout,
    Stderr,
    Memory(Arc<Mutex<Vec<u8>>>),
    Writer(Arc<Mutex<Box<dyn Write + Send>>>),
}

impl Sink {
    /// The process standard output stream.
    pub fn stdout() -> Self {
        Self {
            inner: SinkInner::Stdout,
        }
    }

    /// The process standard error stream.
    pub fn stderr() -> Self {
        Self {
            inner: SinkInner::Stderr,
        }
    }

    /// An in-memory buffer, readable back through [`Sink::contents`].
    ///
    /// Clones of the handle share the buffer; the usual pattern is to hand a
    /// clone to a timer and keep one for inspection.
    pub fn memory() -> Self {
        Self {
            inner: SinkInner::Memory(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    /// Wrap an arbitrary writer (a file, a pipe, a network stream).
    pub fn writer(w: impl Write + Send + 'static) -> Self {
        Self {
            inner: SinkInner::Writer(Arc::new(Mutex::new(Box::new(w)))),
        }
    }

    /// Whether this sink is a console stream.
    ///
    /// Drop-time auto-reports are suppressed for console sinks: a timer that
    /// was never explicitly finalized stays silent on stdout/stderr instead
    /// of surprising the terminal at process teardown.
    pub fn is_console(&self) -> bool {
        matches!(self.inner, SinkInner::Stdout | SinkInner::Stderr)
    }

    /// Whether two handles write to the same destination through the same
    /// lock.
    pub fn same_destination(&self, other: &Sink) -> bool {
        match (&self.inner, &other.inner) {
            (SinkInner::Stdout, SinkInner::Stdout) => true,
            (SinkInner::Stderr, SinkInner::Stderr) => true,
            (SinkInner::Memory(a), SinkInner::Memory(b)) => Arc::ptr_eq(a, b),
            (SinkInner::Writer(a), SinkInner::Writer(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Write one fully assembled report string atomically.
    ///
    /// The whole string goes out under the sink's lock, so interleaved
    /// reports from timers sharing this sink arrive whole. Console variants
    /// rely on the stream's own process-wide lock, which serializes them
    /// even across independently constructed handles.
    pub fn write_str(&self, s: &str) {
        let result = match &self.inner {
            SinkInner::Stdout => io::stdout().lock().write_all(s.as_bytes()),
            SinkInner::Stderr => io::stderr().lock().write_all(s.as_bytes()),
            SinkInner::Memory(buf) => {
                lock_ignore_poison(buf).extend_from_slice(s.as_bytes());
                Ok(())
            }
            SinkInner::Writer(w) => lock_ignore_poison(w).write_all(s.as_bytes()),
        };
        if let Err(err) = result {
            tracing::debug!("report write dropped: {err}");
        }
    }

    /// Flush the underlying stream.
    pub fn flush(&self) {
        let result = match &self.inner {
            SinkInner::Stdout => io::stdout().lock().flush(),
            SinkInner::Stderr => io::stderr().lock().flush(),
            SinkInner::Memory(_) => Ok(()),
            SinkInner::Writer(w) => lock_ignore_poison(w).flush(),
        };
        if let Err(err) = result {
            tracing::debug!("sink flush failed: {err}");
        }
    }

    /// The accumulated text of a memory sink; `None` for other variants.
    pub fn contents(&self) -> Option<String> {
        match &self.inner {
            SinkInner::Memory(buf) => {
                Some(String::from_utf8_lossy(&lock_ignore_poison(buf)).into_owned())
            }
            _ => None,
        }
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.inner {
            SinkInner::Stdout => "Sink::stdout",
            SinkInner::Stderr => "Sink::stderr",
            SinkInner::Memory(_) => "Sink::memory",
            SinkInner::Writer(_) => "Sink::writer",
        };
        f.write_str(name)
    }
}

/// Lock a mutex, treating a poisoned lock as usable.
///
/// A panic elsewhere must not silence every report for the rest of the
/// process; the guarded data (a byte buffer or writer) stays coherent across
/// a mid-write unwind.
fn lock_ignore_poison<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_accumulates_writes() {
        let sink = Sink::memory();
        sink.write_str("one ");
        sink.write_str("two");
        assert_eq!(sink.contents().unwrap(), "one two");
    }

    #[test]
    fn clones_share_the_buffer() {
        let sink = Sink::memory();
        let clone = sink.clone();
        clone.write_str("via clone");
        assert_eq!(sink.contents().unwrap(), "via clone");
        assert!(sink.same_destination(&clone));
    }

    #[test]
    fn independent_memory_sinks_do_not_share() {
        let a = Sink::memory();
        let b = Sink::memory();
        a.write_str("a only");
        assert_eq!(b.contents().unwrap(), "");
        assert!(!a.same_destination(&b));
    }

    #[test]
    fn console_detection() {
        assert!(Sink::stdout().is_console());
        assert!(Sink::stderr().is_console());
        assert!(!Sink::memory().is_console());
    }

    #[test]
    fn writer_sink_receives_bytes() {
        let sink = Sink::writer(Vec::new());
        sink.write_str("hello");
        sink.flush();
        // no contents() view for writer sinks
        assert!(sink.contents().is_none());
    }

    #[test]
    fn concurrent_writes_arrive_whole() {
        let sink = Sink::memory();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let sink = sink.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        sink.write_str(&format!("[line from {i}]\n"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let text = sink.contents().unwrap();
        assert_eq!(text.lines().count(), 400);
        for line in text.lines() {
            assert!(line.starts_with("[line from "));
            assert!(line.ends_with(']'));
        }
    }
}
