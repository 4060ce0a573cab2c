//! Weekly time-window catalog: template expansion, day interleaving, and the
//! employment-type preference filter.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::day::{Day, DAYS};
use super::time::{duration_hours, parse_hms};
use crate::model::EmploymentType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Morning,
    Afternoon,
    AfternoonLong,
    Evening,
}

impl Period {
    pub fn tag(&self) -> &'static str {
        match self {
            Period::Morning => "morning",
            Period::Afternoon => "afternoon",
            Period::AfternoonLong => "afternoon_long",
            Period::Evening => "evening",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Window {
    pub day: Day,
    pub start: String,
    pub end: String,
    pub period: Period,
}

impl Window {
    pub fn duration_hours(&self) -> f64 {
        duration_hours(&self.start, &self.end).unwrap_or(0.0)
    }

    pub fn overlaps(&self, other: &Window) -> bool {
        if self.day != other.day {
            return false;
        }
        let (Some(s1), Some(e1)) = (parse_hms(&self.start), parse_hms(&self.end)) else {
            return false;
        };
        let (Some(s2), Some(e2)) = (parse_hms(&other.start), parse_hms(&other.end)) else {
            return false;
        };
        super::time::ranges_overlap(s1, e1, s2, e2)
    }
}

const MORNING: [(&str, &str); 3] = [("07:30:00", "09:00:00"), ("09:00:00", "10:30:00"), ("10:30:00", "12:00:00")];

const AFTERNOON: [(&str, &str); 4] =
    [("13:00:00", "14:30:00"), ("14:30:00", "16:00:00"), ("16:00:00", "17:30:00"), ("15:00:00", "16:30:00")];

const AFTERNOON_LONG: [(&str, &str); 5] = [
    ("13:00:00", "16:30:00"),
    ("13:00:00", "17:30:00"),
    ("13:00:00", "17:00:00"),
    ("13:00:00", "18:00:00"),
    ("16:00:00", "19:00:00"),
];

const EVENING: [(&str, &str); 4] =
    [("17:00:00", "20:00:00"), ("17:00:00", "18:30:00"), ("18:00:00", "19:30:00"), ("18:30:00", "20:00:00")];

/// Generate the full weekly catalog: every template expanded across every
/// day, shuffled, then re-interleaved by a randomized day order so that
/// consecutive entries rotate through days instead of clustering on the
/// first day in the list.
pub fn generate_catalog<R: Rng + ?Sized>(rng: &mut R) -> Vec<Window> {
    let mut per_day: Vec<Vec<Window>> = DAYS
        .iter()
        .map(|name| {
            let day = Day::normalize(name);
            let mut windows = Vec::new();
            for (start, end) in MORNING {
                windows.push(Window { day: day.clone(), start: start.into(), end: end.into(), period: Period::Morning });
            }
            for (start, end) in AFTERNOON {
                windows.push(Window {
                    day: day.clone(),
                    start: start.into(),
                    end: end.into(),
                    period: Period::Afternoon,
                });
            }
            for (start, end) in AFTERNOON_LONG {
                windows.push(Window {
                    day: day.clone(),
                    start: start.into(),
                    end: end.into(),
                    period: Period::AfternoonLong,
                });
            }
            for (start, end) in EVENING {
                windows.push(Window { day: day.clone(), start: start.into(), end: end.into(), period: Period::Evening });
            }
            windows.shuffle(rng);
            windows
        })
        .collect();

    let mut day_order: Vec<usize> = (0..per_day.len()).collect();
    day_order.shuffle(rng);

    let mut catalog = Vec::new();
    loop {
        let mut advanced = false;
        for &day_idx in &day_order {
            if let Some(window) = per_day[day_idx].pop() {
                catalog.push(window);
                advanced = true;
            }
        }
        if !advanced {
            break;
        }
    }
    catalog
}

/// Filter and order a catalog for an employment type's preferences.
/// PART-TIME prefers evening, then afternoon, then morning; FULL-TIME
/// accepts every window within the 07:00-20:00 span (the whole catalog,
/// since the catalog is generated within that span already).
pub fn filter_for_employment(catalog: &[Window], employment_type: EmploymentType) -> Vec<Window> {
    match employment_type {
        EmploymentType::PartTime => {
            let mut evening = Vec::new();
            let mut afternoon = Vec::new();
            let mut morning = Vec::new();
            for w in catalog {
                let start = parse_hms(&w.start).unwrap_or_default();
                if start >= parse_hms("17:00:00").unwrap() {
                    evening.push(w.clone());
                } else if start >= parse_hms("13:00:00").unwrap() {
                    afternoon.push(w.clone());
                } else {
                    morning.push(w.clone());
                }
            }
            evening.into_iter().chain(afternoon).chain(morning).collect()
        }
        EmploymentType::FullTime => catalog.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn catalog_has_expected_size_per_day() {
        let catalog = generate_catalog(&mut rng());
        assert_eq!(catalog.len(), 6 * (3 + 4 + 5 + 4));
    }

    #[test]
    fn catalog_windows_are_well_formed() {
        for w in generate_catalog(&mut rng()) {
            assert!(w.day.is_valid());
            let start = parse_hms(&w.start).unwrap();
            let end = parse_hms(&w.end).unwrap();
            assert!(start < end);
            assert!(start >= parse_hms("07:00:00").unwrap());
            assert!(end <= parse_hms("20:00:00").unwrap());
        }
    }

    #[test]
    fn catalog_interleaves_across_days() {
        let catalog = generate_catalog(&mut rng());
        let first_ten_days: std::collections::HashSet<_> = catalog.iter().take(10).map(|w| w.day.name()).collect();
        assert!(first_ten_days.len() > 1, "first ten windows should span more than one day");
    }

    #[test]
    fn part_time_orders_evening_before_afternoon_before_morning() {
        let catalog = generate_catalog(&mut rng());
        let filtered = filter_for_employment(&catalog, EmploymentType::PartTime);
        let evening_end = filtered.iter().position(|w| parse_hms(&w.start).unwrap() < parse_hms("17:00:00").unwrap());
        if let Some(idx) = evening_end {
            assert!(filtered[..idx].iter().all(|w| parse_hms(&w.start).unwrap() >= parse_hms("17:00:00").unwrap()));
        }
    }

    #[test]
    fn full_time_keeps_every_window() {
        let catalog = generate_catalog(&mut rng());
        let filtered = filter_for_employment(&catalog, EmploymentType::FullTime);
        assert_eq!(filtered.len(), catalog.len());
    }
}
