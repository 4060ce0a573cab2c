//! `HH:MM:SS` parsing/formatting and the 12-hour display helper.

use chrono::NaiveTime;

/// Parse a `HH:MM:SS` (or `HH:MM`) string into a `NaiveTime`.
pub fn parse_hms(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S").or_else(|_| NaiveTime::parse_from_str(s, "%H:%M")).ok()
}

/// Format a `NaiveTime` as `HH:MM:SS`.
pub fn format_hms(t: NaiveTime) -> String {
    t.format("%H:%M:%S").to_string()
}

/// Convert a `HH:MM:SS` string to 12-hour `h:MM AM/PM` display form.
/// Returns the input unchanged if it does not parse.
pub fn to_12h(s: &str) -> String {
    match parse_hms(s) {
        Some(t) => t.format("%-I:%M %p").to_string(),
        None => s.to_string(),
    }
}

/// Duration between two `HH:MM:SS` strings in hours, rounded to 0.1h.
/// Returns `None` if either fails to parse or `end <= start`.
pub fn duration_hours(start: &str, end: &str) -> Option<f64> {
    let s = parse_hms(start)?;
    let e = parse_hms(end)?;
    if e <= s {
        return None;
    }
    let minutes = (e - s).num_minutes() as f64;
    Some((minutes / 60.0 * 10.0).round() / 10.0)
}

/// Add `hours` to a `HH:MM:SS` start time, producing the `HH:MM:SS` end time.
/// Used to truncate a catalog window down to a session's actual duration.
pub fn add_hours(start: &str, hours: f64) -> Option<String> {
    let s = parse_hms(start)?;
    let minutes = (hours * 60.0).round() as i64;
    let end = s + chrono::Duration::minutes(minutes);
    Some(format_hms(end))
}

/// Whether `[start, end)` overlaps `[12:00:00, 12:59:59]` at all.
pub fn overlaps_lunch(start: &str, end: &str) -> bool {
    let (Some(s), Some(e)) = (parse_hms(start), parse_hms(end)) else {
        return false;
    };
    let lunch_start = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    let lunch_end = NaiveTime::from_hms_opt(13, 0, 0).unwrap();
    s < lunch_end && e > lunch_start
}

/// Whether `[s1, e1)` and `[s2, e2)` overlap, given already-parsed times.
pub fn ranges_overlap(s1: NaiveTime, e1: NaiveTime, s2: NaiveTime, e2: NaiveTime) -> bool {
    s1 < e2 && s2 < e1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_hours_rounds_to_tenth() {
        assert_eq!(duration_hours("07:30:00", "09:00:00"), Some(1.5));
        assert_eq!(duration_hours("13:00:00", "16:30:00"), Some(3.5));
    }

    #[test]
    fn lunch_violation_detector_matches_spec_examples() {
        assert!(overlaps_lunch("11:30:00", "12:15:00"));
        assert!(overlaps_lunch("12:45:00", "13:30:00"));
        assert!(!overlaps_lunch("11:00:00", "12:00:00"));
        assert!(!overlaps_lunch("13:00:00", "14:00:00"));
    }

    #[test]
    fn add_hours_truncates_a_window_to_a_session_length() {
        assert_eq!(add_hours("09:00:00", 1.5).as_deref(), Some("10:30:00"));
        assert_eq!(add_hours("13:00:00", 3.0).as_deref(), Some("16:00:00"));
    }

    #[test]
    fn to_12h_converts_display_form() {
        assert_eq!(to_12h("13:00:00"), "1:00 PM");
        assert_eq!(to_12h("07:30:00"), "7:30 AM");
    }
}
