//! JSON serialization for timer summaries.

use crate::registry::TimerSummary;

/// Serialize registry summaries to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// `TimerSummary`).
pub fn to_json(summaries: &[TimerSummary]) -> Result<String, serde_json::Error> {
    serde_json::to_string(summaries)
}

/// Serialize registry summaries to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// `TimerSummary`).
pub fn to_json_pretty(summaries: &[TimerSummary]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_summary() -> TimerSummary {
        TimerSummary {
            tag: "projector".to_string(),
            context: "scope".to_string(),
            ordinal: 1,
            laps: 4,
            wall: 4.0,
            user: 3.2,
            system: 0.4,
            cpu: 3.6,
            percent: 90.0,
        }
    }

    #[test]
    fn serializes_to_json() {
        let json = to_json(&[make_summary()]).unwrap();
        assert!(json.contains("\"tag\":\"projector\""));
        assert!(json.contains("\"laps\":4"));
    }

    #[test]
    fn pretty_output_is_multiline() {
        let json = to_json_pretty(&[make_summary()]).unwrap();
        assert!(json.contains('\n'));
    }

    #[test]
    fn round_trips_through_serde() {
        let original = vec![make_summary()];
        let json = to_json(&original).unwrap();
        let parsed: Vec<TimerSummary> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
