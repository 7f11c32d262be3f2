//! Raw wall-clock and CPU-time readings.
//!
//! Wall time comes from the monotonic [`std::time::Instant`] clock. User and
//! system CPU time come from `getrusage(RUSAGE_SELF)` on unix targets; on
//! other platforms the CPU readings fall back to zero and only wall time is
//! meaningful.

use std::time::Instant;

/// One snapshot of the three clocks a timer tracks.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClockSample {
    /// Monotonic wall-clock reading.
    pub wall: Instant,
    /// User-mode CPU seconds consumed by the process so far.
    pub user: f64,
    /// Kernel-mode CPU seconds consumed by the process so far.
    pub system: f64,
}

impl ClockSample {
    /// Capture all three clocks now.
    pub fn now() -> Self {
        let (user, system) = cpu_times();
        Self {
            wall: Instant::now(),
            user,
            system,
        }
    }
}

/// Current process user/system CPU consumption in seconds.
#[cfg(unix)]
pub(crate) fn cpu_times() -> (f64, f64) {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
    // getrusage can only fail for an invalid `who` argument
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if rc != 0 {
        return (0.0, 0.0);
    }
    let usage = unsafe { usage.assume_init() };
    (timeval_secs(usage.ru_utime), timeval_secs(usage.ru_stime))
}

#[cfg(unix)]
fn timeval_secs(tv: libc::timeval) -> f64 {
    tv.tv_sec as f64 + tv.tv_usec as f64 * 1e-6
}

#[cfg(not(unix))]
pub(crate) fn cpu_times() -> (f64, f64) {
    (0.0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_advances() {
        let a = ClockSample::now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = ClockSample::now();
        assert!(b.wall > a.wall);
    }

    #[test]
    fn cpu_times_are_non_negative() {
        let (user, system) = cpu_times();
        assert!(user >= 0.0);
        assert!(system >= 0.0);
    }

    #[cfg(unix)]
    #[test]
    fn busy_loop_consumes_user_cpu() {
        let before = ClockSample::now();
        let mut acc = 0u64;
        for i in 0..20_000_000u64 {
            acc = acc.wrapping_mul(31).wrapping_add(i);
        }
        std::hint::black_box(acc);
        let after = ClockSample::now();
        assert!(after.user >= before.user);
    }
}
