//! Terminal summary table with colors.

use colored::Colorize;

use crate::registry::TimerSummary;

/// Format registry summaries as a human-readable table.
///
/// One row per timer, sorted the way the registry hands them out (by tag,
/// context, ordinal). Durations are in seconds.
pub fn render_summary(summaries: &[TimerSummary]) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(78);

    output.push_str(&format!("{}\n", "timing-ledger summary".bold()));
    output.push_str(&sep);
    output.push('\n');

    if summaries.is_empty() {
        output.push_str("  no timers registered\n");
        output.push_str(&sep);
        output.push('\n');
        return output;
    }

    output.push_str(&format!(
        "  {:<28} {:>6} {:>10} {:>10} {:>10} {:>7}\n",
        "timer".cyan(),
        "laps".cyan(),
        "wall".cyan(),
        "user".cyan(),
        "sys".cyan(),
        "cpu%".cyan()
    ));

    for s in summaries {
        let label = if s.ordinal > 1 {
            format!("{} #{}", s.tag, s.ordinal)
        } else {
            s.tag.clone()
        };
        output.push_str(&format!(
            "  {:<28} {:>6} {:>10.3} {:>10.3} {:>10.3} {:>7.1}\n",
            label, s.laps, s.wall, s.user, s.system, s.percent
        ));
    }

    output.push_str(&sep);
    output.push('\n');
    output
}
