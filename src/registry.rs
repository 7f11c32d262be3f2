//! Process-wide named-timer table.
//!
//! The registry maps a composite key — tag, context label, instance ordinal
//! — to a shared timer. Lookups of existing entries proceed concurrently;
//! inserting a new entry is mutually exclusive. Entries are never evicted:
//! the table is an append-only cache that lives as long as the registry,
//! which for [`TimerRegistry::global`] is the process lifetime.
//!
//! The registry is an explicitly constructed service object: create one with
//! [`TimerRegistry::new`] and pass it around, or use the lazily initialized
//! global instance when the whole process shares one table.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, RwLock};

use serde::{Deserialize, Serialize};

use crate::config::TimerConfig;
use crate::timer::Timer;

/// Composite key identifying one timer in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerKey {
    /// Caller-chosen identifier for the timed region.
    pub tag: String,
    /// Label for the calling context (scoped timers use `"scope"`).
    pub context: String,
    /// Disambiguates concurrently live timers sharing a tag.
    pub ordinal: u64,
}

impl TimerKey {
    /// Build a key.
    pub fn new(tag: impl Into<String>, context: impl Into<String>, ordinal: u64) -> Self {
        Self {
            tag: tag.into(),
            context: context.into(),
            ordinal,
        }
    }
}

/// Clonable shared handle to a registry-owned timer.
///
/// The handle wraps the timer in a mutex: a single timer is meant to be
/// driven by one logical control flow at a time, and the lock enforces
/// exclusive access for callers that end up sharing one.
#[derive(Debug, Clone)]
pub struct TimerHandle(Arc<Mutex<Timer>>);

impl TimerHandle {
    fn new(timer: Timer) -> Self {
        Self(Arc::new(Mutex::new(timer)))
    }

    /// Lock the timer for use.
    ///
    /// A poisoned lock is treated as usable: a panic in some other scope
    /// must not disable instrumentation for the rest of the process.
    pub fn lock(&self) -> MutexGuard<'_, Timer> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether two handles refer to the same underlying timer.
    pub fn same_timer(&self, other: &TimerHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// One registry entry flattened for reporting and serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSummary {
    /// The timed region's tag.
    pub tag: String,
    /// The context label the timer was registered under.
    pub context: String,
    /// The instance ordinal the timer was registered under.
    pub ordinal: u64,
    /// Completed laps.
    pub laps: u64,
    /// Accumulated wall-clock seconds.
    pub wall: f64,
    /// Accumulated user-CPU seconds.
    pub user: f64,
    /// Accumulated system-CPU seconds.
    pub system: f64,
    /// Accumulated total CPU seconds.
    pub cpu: f64,
    /// CPU utilization percentage (zero when no wall time has elapsed).
    pub percent: f64,
}

/// Named-timer table shared across a process.
#[derive(Debug)]
pub struct TimerRegistry {
    timers: RwLock<HashMap<TimerKey, TimerHandle>>,
    config: TimerConfig,
    live_scopes: AtomicU64,
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerRegistry {
    /// Create an empty registry with default timer configuration.
    pub fn new() -> Self {
        Self::with_config(TimerConfig::default())
    }

    /// Create an empty registry whose timers use `config`.
    pub fn with_config(config: TimerConfig) -> Self {
        Self {
            timers: RwLock::new(HashMap::new()),
            config,
            live_scopes: AtomicU64::new(0),
        }
    }

    /// The lazily initialized process-global registry.
    pub fn global() -> &'static Arc<TimerRegistry> {
        static GLOBAL: OnceLock<Arc<TimerRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(TimerRegistry::new()))
    }

    /// The configuration applied to timers this registry creates.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Look up the timer for `(tag, context, ordinal)`, creating it on first
    /// use.
    ///
    /// The returned handle stays valid for the registry's lifetime; repeated
    /// lookups with the same key hand back the same timer. Existing entries
    /// are found under a shared read lock; only a genuinely new entry takes
    /// the write lock.
    pub fn timer(&self, tag: &str, context: &str, ordinal: u64) -> TimerHandle {
        let key = TimerKey::new(tag, context, ordinal);
        if let Some(handle) = read_lock(&self.timers).get(&key) {
            return handle.clone();
        }
        let mut map = write_lock(&self.timers);
        map.entry(key)
            .or_insert_with(|| TimerHandle::new(self.build_timer(tag, ordinal)))
            .clone()
    }

    /// Construct a timer for a new entry, with the tag baked into the
    /// template so a bare `report()` is self-identifying.
    fn build_timer(&self, tag: &str, ordinal: u64) -> Timer {
        let label = if ordinal > 1 {
            format!("{tag} #{ordinal}")
        } else {
            tag.to_string()
        };
        let format = format!(
            "{label:<width$} : {}",
            self.config.format,
            width = self.config.tag_width
        );
        let mut timer = Timer::new(self.config.precision, format, self.config.sink.clone());
        // registry entries begin idle; the first caller decides when the
        // first lap starts
        timer.reset();
        timer
    }

    /// Whether a timer exists for the key.
    pub fn contains(&self, tag: &str, context: &str, ordinal: u64) -> bool {
        read_lock(&self.timers).contains_key(&TimerKey::new(tag, context, ordinal))
    }

    /// Number of registered timers.
    pub fn len(&self) -> usize {
        read_lock(&self.timers).len()
    }

    /// Whether the registry holds no timers.
    pub fn is_empty(&self) -> bool {
        read_lock(&self.timers).is_empty()
    }

    /// All keys, sorted by tag, context, ordinal.
    pub fn keys(&self) -> Vec<TimerKey> {
        let mut keys: Vec<TimerKey> = read_lock(&self.timers).keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Write a report line for every registered timer to its own sink, in
    /// key order.
    ///
    /// Handles are collected under the map's read lock and the lock released
    /// before any timer or sink lock is taken.
    pub fn report_all(&self) {
        for (_, handle) in self.entries() {
            handle.lock().report();
        }
    }

    /// Write a per-lap average report line for every registered timer.
    pub fn report_all_average(&self) {
        for (_, handle) in self.entries() {
            handle.lock().report_average();
        }
    }

    /// Reset every registered timer's accumulated totals and lap counts.
    pub fn reset_all(&self) {
        for (_, handle) in self.entries() {
            handle.lock().reset();
        }
    }

    /// Snapshot every entry's readings, sorted by key.
    ///
    /// Running timers are reported as-is: the snapshot reflects completed
    /// laps only and does not force-stop anything.
    pub fn summaries(&self) -> Vec<TimerSummary> {
        self.entries()
            .into_iter()
            .map(|(key, handle)| {
                let timer = handle.lock();
                let elapsed = timer.elapsed();
                TimerSummary {
                    tag: key.tag,
                    context: key.context,
                    ordinal: key.ordinal,
                    laps: timer.laps(),
                    wall: elapsed.wall,
                    user: elapsed.user,
                    system: elapsed.system,
                    cpu: elapsed.cpu(),
                    percent: elapsed.utilization(),
                }
            })
            .collect()
    }

    /// Sorted (key, handle) pairs, collected under the read lock.
    fn entries(&self) -> Vec<(TimerKey, TimerHandle)> {
        let mut entries: Vec<(TimerKey, TimerHandle)> = read_lock(&self.timers)
            .iter()
            .map(|(k, h)| (k.clone(), h.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Register a live scope, returning its instance ordinal.
    pub fn enter_scope(&self) -> u64 {
        self.live_scopes.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Unregister a live scope.
    ///
    /// Decrementing an already-zero counter is a no-op, so a stray extra
    /// exit can never underflow it.
    pub fn exit_scope(&self) {
        let _ = self
            .live_scopes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    /// Currently live scoped timers on this registry.
    pub fn live_scopes(&self) -> u64 {
        self.live_scopes.load(Ordering::SeqCst)
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
