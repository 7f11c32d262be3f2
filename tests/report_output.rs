//! End-to-end checks of rendered report text.

use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use timing_ledger::{
    output, ScopedTimer, Sink, Timer, TimerConfig, TimerRegistry, DEFAULT_FORMAT,
};

#[test]
fn literal_template_round_trips() {
    let sink = Sink::memory();
    let mut timer = Timer::new(3, "nothing to substitute", sink.clone());
    timer.stop();
    timer.report_to(&sink, false, false);
    assert_eq!(sink.contents().unwrap(), "nothing to substitute");
}

#[test]
fn default_template_renders_all_fields() {
    let sink = Sink::memory();
    let mut timer = Timer::new(3, DEFAULT_FORMAT, sink.clone());
    sleep(Duration::from_millis(10));
    timer.stop();
    timer.report();

    let text = sink.contents().unwrap();
    assert!(text.contains("wall"), "got {text:?}");
    assert!(text.contains("user"));
    assert!(text.contains("sys"));
    assert!(text.contains("cpu"));
    assert!(text.contains('%'));
    assert!(text.ends_with('\n'));
    // no template tokens leaked through
    for token in ["%w", "%u", "%s", "%t", "%p"] {
        assert!(!text.contains(token), "unsubstituted {token} in {text:?}");
    }
}

#[test]
fn average_report_names_the_lap_count() {
    let sink = Sink::memory();
    let mut timer = Timer::new(2, "t=%w", sink.clone());
    timer.stop();
    for _ in 0..3 {
        timer.start();
        timer.stop();
    }
    timer.report_average();
    let text = sink.contents().unwrap();
    assert!(
        text.trim_end().ends_with("(average of 4 laps)"),
        "got {text:?}"
    );
}

#[test]
fn registry_lines_carry_the_tag() {
    let sink = Sink::memory();
    let registry = TimerRegistry::with_config(TimerConfig::default().sink(sink.clone()));

    let handle = registry.timer("accumulate", "kernel", 1);
    {
        let mut timer = handle.lock();
        timer.start();
        sleep(Duration::from_millis(5));
        timer.stop();
    }
    registry.report_all();

    let text = sink.contents().unwrap();
    let line = text.lines().next().expect("one report line");
    assert!(line.starts_with("accumulate"), "got {line:?}");
    assert!(line.contains(" : "), "got {line:?}");
}

#[test]
fn summary_table_lists_scoped_timers() {
    let sink = Sink::memory();
    let registry = Arc::new(TimerRegistry::with_config(
        TimerConfig::default().sink(sink),
    ));
    for _ in 0..2 {
        let _guard = ScopedTimer::with_registry(&registry, "stage-one");
    }
    {
        let _guard = ScopedTimer::with_registry(&registry, "stage-two");
    }

    let summaries = registry.summaries();
    let table = output::render_summary(&summaries);
    assert!(table.contains("stage-one"));
    assert!(table.contains("stage-two"));

    let stage_one = summaries.iter().find(|s| s.tag == "stage-one").unwrap();
    assert_eq!(stage_one.laps, 2);
}

#[test]
fn json_dump_round_trips() {
    let sink = Sink::memory();
    let registry = Arc::new(TimerRegistry::with_config(
        TimerConfig::default().sink(sink),
    ));
    {
        let _guard = ScopedTimer::with_registry(&registry, "serialize-me");
    }

    let summaries = registry.summaries();
    let json = output::to_json(&summaries).unwrap();
    let parsed: Vec<timing_ledger::TimerSummary> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, summaries);
    assert_eq!(parsed[0].tag, "serialize-me");
    assert_eq!(parsed[0].laps, 1);
}

#[test]
fn cpu_fields_track_a_busy_region() {
    let sink = Sink::memory();
    let registry = Arc::new(TimerRegistry::with_config(
        TimerConfig::default().sink(sink),
    ));
    {
        let _guard = ScopedTimer::with_registry(&registry, "busy");
        let mut acc = 0u64;
        for i in 0..5_000_000u64 {
            acc = acc.wrapping_mul(31).wrapping_add(i);
        }
        std::hint::black_box(acc);
    }

    let summary = &registry.summaries()[0];
    assert!(summary.wall > 0.0);
    assert!(summary.cpu >= 0.0);
    assert!(summary.percent >= 0.0);
}
