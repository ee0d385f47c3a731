use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Turns a machine key such as `created_date` into `Created Date`.
pub fn prepare_label(key: &str) -> String {
    key.replace('_', " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `HH:MM:SS`, hours unbounded.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Whole seconds elapsed between `created` and `now`, clamped at zero.
pub fn elapsed_secs(created: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - created).num_seconds().max(0) as u64
}

/// Accepts RFC 3339, naive ISO-8601 (read as UTC) and the RFC 2822 form
/// Flask emits for datetimes.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(naive.and_utc());
        }
    }
    DateTime::parse_from_rfc2822(&text.replace("GMT", "+0000"))
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Text shown for a loosely typed value cell.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn labels_split_and_capitalize() {
        assert_eq!(prepare_label("created_date"), "Created Date");
        assert_eq!(prepare_label("has_graph"), "Has Graph");
        assert_eq!(prepare_label("last_updated_date"), "Last Updated Date");
        assert_eq!(prepare_label("STATUS"), "Status");
        assert_eq!(prepare_label("Status"), "Status");
        assert_eq!(prepare_label(""), "");
    }

    #[test]
    fn durations_are_zero_padded() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(59), "00:00:59");
        assert_eq!(format_duration(3661), "01:01:01");
        assert_eq!(format_duration(360_000), "100:00:00");
    }

    #[test]
    fn elapsed_never_goes_negative() {
        let created = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 2, 1, 13, 1, 1).unwrap();
        assert_eq!(elapsed_secs(created, later), 3661);
        assert_eq!(elapsed_secs(later, created), 0);
    }

    #[test]
    fn timestamps_in_server_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2026-02-01T12:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2026-02-01T14:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-02-01T12:00:00.000"), Some(expected));
        assert_eq!(
            parse_timestamp("Sun, 01 Feb 2026 12:00:00 GMT"),
            Some(expected)
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn values_render_without_json_quotes() {
        assert_eq!(format_value(&Value::String("RUNNING".into())), "RUNNING");
        assert_eq!(format_value(&serde_json::json!(3)), "3");
        assert_eq!(format_value(&serde_json::json!(true)), "true");
        assert_eq!(format_value(&Value::Null), "");
        assert_eq!(format_value(&serde_json::json!([1, 2])), "[1,2]");
    }
}
