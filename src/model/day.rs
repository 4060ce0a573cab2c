//! Canonical weekday ordering (Monday..Saturday) and day-string normalization.

use std::cmp::Ordering;
use std::fmt;

/// Canonical Monday-first weekday order used across the scheduler.
pub const DAYS: [&str; 6] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

/// A day of the week, ordinal 0 (Monday)..5 (Saturday), or an unrecognized
/// input preserved verbatim for diagnostic display.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Day {
    Known(u8),
    Unknown(String),
}

impl Day {
    /// Normalize a free-form day string (case-insensitive, common
    /// abbreviations) to a canonical `Day`. Unrecognized input is kept as
    /// `Day::Unknown` rather than rejected here; validation happens at the
    /// driver boundary.
    pub fn normalize(input: &str) -> Day {
        let trimmed = input.trim().to_lowercase();
        let canonical = match trimmed.as_str() {
            "m" | "mon" | "monday" => Some(0u8),
            "t" | "tue" | "tues" | "tuesday" => Some(1),
            "w" | "wed" | "wednesday" => Some(2),
            "th" | "thu" | "thur" | "thurs" | "thursday" => Some(3),
            "f" | "fri" | "friday" => Some(4),
            "s" | "sat" | "saturday" => Some(5),
            _ => None,
        };
        match canonical {
            Some(idx) => Day::Known(idx),
            None => Day::Unknown(input.trim().to_string()),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Day::Known(_))
    }

    /// Ordinal index (0=Monday..5=Saturday), if known.
    pub fn index(&self) -> Option<u8> {
        match self {
            Day::Known(idx) => Some(*idx),
            Day::Unknown(_) => None,
        }
    }

    /// Canonical full name, or the original (unrecognized) string.
    pub fn name(&self) -> &str {
        match self {
            Day::Known(idx) => DAYS[*idx as usize],
            Day::Unknown(s) => s,
        }
    }

    /// The next canonical day, wrapping Saturday -> Monday. Panics on an
    /// unknown day; callers validate before reaching this point.
    pub fn next(&self) -> Day {
        let idx = self.index().expect("next_day called on an unrecognized day");
        Day::Known((idx + 1) % 6)
    }

    /// Compact single/double-letter abbreviation: M, T, W, Th, F, Sat.
    pub fn abbreviation(&self) -> &str {
        match self.index() {
            Some(0) => "M",
            Some(1) => "T",
            Some(2) => "W",
            Some(3) => "Th",
            Some(4) => "F",
            Some(5) => "Sat",
            _ => self.name(),
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl PartialOrd for Day {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Known days sort by ordinal; unknown days sort last, preserving their
/// relative input order (a stable sort upstream is required for that part).
impl Ord for Day {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.index(), other.index()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Build a compact label from a list of day strings: normalize, sort into
/// canonical order, suppress duplicates, join abbreviations.
/// `compact_label(["wed", "Mon", "fri", "FRI"])` == "MWF".
pub fn compact_label<I, S>(days: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<Day> = days.into_iter().map(|s| Day::normalize(s.as_ref())).collect();
    normalized.sort();
    normalized.dedup();
    normalized.iter().map(Day::abbreviation).collect()
}

/// Suggest a day pattern for a given number of weekly sessions.
/// 1 -> a random day; 2 -> [Mon, Fri]; 3 -> [Mon, Wed, Fri];
/// >=4 -> round-robin Mon..Sat.
pub fn suggest_pattern<R: rand::Rng + ?Sized>(num_sessions: usize, rng: &mut R) -> Vec<Day> {
    match num_sessions {
        0 => Vec::new(),
        1 => vec![Day::Known(rng.random_range(0u8..6))],
        2 => vec![Day::Known(0), Day::Known(4)],
        3 => vec![Day::Known(0), Day::Known(2), Day::Known(4)],
        n => (0..n).map(|i| Day::Known((i % 6) as u8)).collect(),
    }
}

/// Group items by day, then order each bucket internally by a caller-supplied
/// start-time key. Unknown-day items are bucketed under their verbatim string.
pub fn group_by_day<T, F, K>(items: Vec<T>, day_of: F, start_key: impl Fn(&T) -> K) -> Vec<(Day, Vec<T>)>
where
    F: Fn(&T) -> Day,
    K: Ord,
{
    let mut buckets: Vec<(Day, Vec<T>)> = Vec::new();
    for item in items {
        let day = day_of(&item);
        match buckets.iter_mut().find(|(d, _)| *d == day) {
            Some(bucket) => bucket.1.push(item),
            None => buckets.push((day, vec![item])),
        }
    }
    buckets.sort_by(|a, b| a.0.cmp(&b.0));
    for (_, items) in buckets.iter_mut() {
        items.sort_by_key(&start_key);
    }
    buckets
}
