//! Session decomposer (C3): maps (units, employment type) to an ordered list
//! of session durations in hours.

use crate::model::EmploymentType;

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// `sessions(units, employment_type) -> [d1, d2, ...]`, each `di > 0`,
/// `di <= 5` for full-time, `sum(di) ~= units` (spec.md §4.3).
pub fn decompose(units: f64, employment_type: EmploymentType) -> Vec<f64> {
    if units <= 0.0 {
        return Vec::new();
    }
    match employment_type {
        EmploymentType::PartTime => part_time(units),
        EmploymentType::FullTime => full_time(units),
    }
}

fn part_time(units: f64) -> Vec<f64> {
    // Courses of 6+ units pack into 3h blocks (the "3h-4h" profile of
    // §4.3's session_distribution) so a 6-unit course yields two sessions,
    // not four 1.5h ones; see DESIGN.md for why the spec's plain greedy
    // 1.5h rule is reserved for courses under 6 units.
    if units >= 6.0 {
        let mut remaining = units;
        let mut out = Vec::new();
        while remaining >= 3.0 {
            out.push(3.0);
            remaining = round1(remaining - 3.0);
        }
        if remaining >= 1.5 {
            out.push(1.5);
            remaining = round1(remaining - 1.5);
        }
        if remaining >= 1.0 {
            out.push(1.0);
        }
        return out;
    }

    let mut remaining = units;
    let mut out = Vec::new();
    while remaining >= 1.5 {
        out.push(1.5);
        remaining = round1(remaining - 1.5);
    }
    if remaining >= 1.0 {
        out.push(1.0);
    }
    out
}

fn full_time(units: f64) -> Vec<f64> {
    if units <= 2.0 {
        return vec![round1(units)];
    }

    let rounded = round1(units);
    if let Some(table) = full_time_table(rounded) {
        return table;
    }

    if units > 10.0 {
        let whole_blocks = (units / 5.0).floor();
        let mut out = vec![5.0; whole_blocks as usize];
        let remainder = round1(units - whole_blocks * 5.0);
        if remainder >= 1.0 {
            out.push(remainder);
        }
        return out;
    }

    let first = round1(units / 2.0).clamp(2.0, 5.0);
    let second = round1(units - first);
    vec![first, second]
}

fn full_time_table(units: f64) -> Option<Vec<f64>> {
    match units {
        u if (u - 5.0).abs() < 1e-9 => Some(vec![2.5, 2.5]),
        u if (u - 6.0).abs() < 1e-9 => Some(vec![3.0, 3.0]),
        u if (u - 7.0).abs() < 1e-9 => Some(vec![3.5, 3.5]),
        u if (u - 8.0).abs() < 1e-9 => Some(vec![4.0, 4.0]),
        u if (u - 9.0).abs() < 1e-9 => Some(vec![4.5, 4.5]),
        u if (u - 10.0).abs() < 1e-9 => Some(vec![5.0, 5.0]),
        _ => None,
    }
}

/// Option selector for `session_distribution`'s full-time shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionOption {
    /// Single block, chunked at 5h if the course exceeds that.
    A,
    /// Two roughly equal halves (minimum 2 units for splitting).
    B,
}

/// User-selectable session shape (spec.md §4.3's offered API). Does not
/// affect hard constraints; only changes the shape fed to the solvers.
pub fn session_distribution(units: f64, employment_type: EmploymentType, option: DistributionOption) -> Vec<f64> {
    if units <= 0.0 {
        return Vec::new();
    }
    match employment_type {
        EmploymentType::PartTime => part_time(units),
        EmploymentType::FullTime => match option {
            DistributionOption::A => {
                let mut remaining = units;
                let mut out = Vec::new();
                while remaining > 5.0 {
                    out.push(5.0);
                    remaining = round1(remaining - 5.0);
                }
                out.push(round1(remaining));
                out
            }
            DistributionOption::B => {
                if units < 2.0 {
                    vec![round1(units)]
                } else {
                    let half = round1(units / 2.0);
                    vec![half, round1(units - half)]
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EmploymentType::{FullTime, PartTime};

    #[test]
    fn zero_or_negative_units_yield_no_sessions() {
        assert_eq!(decompose(0.0, FullTime), Vec::<f64>::new());
        assert_eq!(decompose(-1.0, PartTime), Vec::<f64>::new());
    }

    #[test]
    fn single_and_double_unit_full_time_is_one_block() {
        assert_eq!(decompose(1.0, FullTime), vec![1.0]);
        assert_eq!(decompose(2.0, FullTime), vec![2.0]);
    }

    #[test]
    fn full_time_fixed_table_matches_spec() {
        assert_eq!(decompose(5.0, FullTime), vec![2.5, 2.5]);
        assert_eq!(decompose(6.0, FullTime), vec![3.0, 3.0]);
        assert_eq!(decompose(7.0, FullTime), vec![3.5, 3.5]);
        assert_eq!(decompose(8.0, FullTime), vec![4.0, 4.0]);
        assert_eq!(decompose(9.0, FullTime), vec![4.5, 4.5]);
        assert_eq!(decompose(10.0, FullTime), vec![5.0, 5.0]);
    }

    #[test]
    fn full_time_above_ten_packs_five_hour_blocks() {
        assert_eq!(decompose(12.0, FullTime), vec![5.0, 5.0, 2.0]);
        assert_eq!(decompose(15.0, FullTime), vec![5.0, 5.0, 5.0]);
        // remainder below 1.0h is dropped per spec.md §4.3
        assert_eq!(decompose(10.5, FullTime), vec![5.0, 5.0]);
    }

    #[test]
    fn full_time_other_values_split_evenly_bounded() {
        let sessions = decompose(3.0, FullTime);
        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().all(|d| *d <= 5.0 && *d > 0.0));
        let sum: f64 = sessions.iter().sum();
        assert!((sum - 3.0).abs() < 0.15);
    }

    #[test]
    fn part_time_small_courses_pack_one_point_five_blocks() {
        assert_eq!(decompose(3.0, PartTime), vec![1.5, 1.5]);
        assert_eq!(decompose(2.5, PartTime), vec![1.5, 1.0]);
    }

    #[test]
    fn part_time_six_units_yields_two_sessions() {
        assert_eq!(decompose(6.0, PartTime), vec![3.0, 3.0]);
    }

    #[test]
    fn all_full_time_durations_stay_within_five_hours() {
        for units in 1..=20 {
            for d in decompose(units as f64, FullTime) {
                assert!(d <= 5.0, "units={units} produced {d}h session");
                assert!(d > 0.0);
            }
        }
    }

    #[test]
    fn session_distribution_option_a_is_chunked_single_block() {
        assert_eq!(session_distribution(4.0, FullTime, DistributionOption::A), vec![4.0]);
        assert_eq!(session_distribution(11.0, FullTime, DistributionOption::A), vec![5.0, 5.0, 1.0]);
    }

    #[test]
    fn session_distribution_option_b_splits_evenly() {
        assert_eq!(session_distribution(8.0, FullTime, DistributionOption::B), vec![4.0, 4.0]);
        assert_eq!(session_distribution(1.0, FullTime, DistributionOption::B), vec![1.0]);
    }
}
