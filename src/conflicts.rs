//! Shared conflict detectors. Both the CP path (for its soft penalties) and
//! the GA path (for its fitness function) report against the same taxonomy,
//! per spec.md §9 ("Keep the conflict detectors in one module").

use crate::model::{EmploymentType, Period, ScheduledSession};

/// Count pairs of sessions that share an instructor and overlap in time.
pub fn instructor_overlaps(sessions: &[ScheduledSession]) -> u32 {
    count_pairs(sessions, |a, b| a.instructor_id == b.instructor_id && a.overlaps_time(b))
}

/// Count pairs of sessions that share a room and overlap in time.
pub fn room_overlaps(sessions: &[ScheduledSession]) -> u32 {
    count_pairs(sessions, |a, b| match (a.room_id, b.room_id) {
        (Some(r1), Some(r2)) => r1 == r2 && a.overlaps_time(b),
        _ => false,
    })
}

/// Same section scheduled twice at the exact same (day, start, end).
pub fn section_exact_duplicates(sessions: &[ScheduledSession]) -> u32 {
    count_pairs(sessions, |a, b| {
        a.section == b.section && a.day == b.day && a.start == b.start && a.end == b.end
    })
}

/// Same course code, different sections, scheduled at the exact same window.
pub fn course_code_clashes(sessions: &[ScheduledSession]) -> u32 {
    count_pairs(sessions, |a, b| {
        a.course_code == b.course_code && a.section != b.section && a.day == b.day && a.start == b.start && a.end == b.end
    })
}

/// Same section, same day, overlapping (but not necessarily identical) windows.
pub fn section_time_overlaps(sessions: &[ScheduledSession]) -> u32 {
    count_pairs(sessions, |a, b| a.section == b.section && a.overlaps_time(b))
}

/// Sessions whose [start, end) overlaps the 12:00-13:00 lunch hour.
pub fn lunch_violations(sessions: &[ScheduledSession]) -> u32 {
    sessions.iter().filter(|s| crate::model::time::overlaps_lunch(&s.start, &s.end)).count() as u32
}

/// Employment-type/period mismatches: part-time outside evening, full-time
/// in evening, with an extra penalty for part-time in the morning
/// (spec.md §4.5's soft-penalty table).
pub fn employment_mismatch_weight(sessions: &[ScheduledSession]) -> u32 {
    sessions
        .iter()
        .map(|s| match (s.employment_type, s.period) {
            (EmploymentType::PartTime, Period::Evening) => 0,
            (EmploymentType::PartTime, Period::Morning) => 2 + 5,
            (EmploymentType::PartTime, _) => 2,
            (EmploymentType::FullTime, Period::Evening) => 3,
            (EmploymentType::FullTime, _) => 0,
        })
        .sum()
}

/// Count of sessions placed in a room whose capacity fails §4.4's
/// suitability threshold for that session's estimated headcount.
pub fn room_capacity_violations(sessions: &[ScheduledSession], rooms: &[crate::model::Room]) -> u32 {
    sessions
        .iter()
        .filter(|s| match s.room_id {
            Some(room_id) => match rooms.iter().find(|r| r.room_id == room_id) {
                Some(room) => !crate::rooms::is_suitable(room, s.units, s.session_type.requires_lab()),
                None => true,
            },
            None => false,
        })
        .count() as u32
}

fn count_pairs(sessions: &[ScheduledSession], matches: impl Fn(&ScheduledSession, &ScheduledSession) -> bool) -> u32 {
    let mut count = 0u32;
    for i in 0..sessions.len() {
        for j in (i + 1)..sessions.len() {
            if matches(&sessions[i], &sessions[j]) {
                count += 1;
            }
        }
    }
    count
}

/// Build the output envelope's conflict tally (§6's `conflicts` object) from
/// a finished schedule.
pub fn tally(sessions: &[ScheduledSession], rooms: &[crate::model::Room]) -> crate::model::ConflictCounts {
    crate::model::ConflictCounts {
        instructor_overlap: instructor_overlaps(sessions),
        room_overlap: room_overlaps(sessions),
        section_exact_duplicate: section_exact_duplicates(sessions),
        course_code_clash: course_code_clashes(sessions),
        section_time_overlap: section_time_overlaps(sessions),
        lunch_break: lunch_violations(sessions),
        employment_type: employment_mismatch_weight(sessions),
        room_capacity: room_capacity_violations(sessions, rooms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Day, SessionType};

    fn session(instructor_id: u32, section: &str, course_code: &str, day: &str, start: &str, end: &str, room_id: Option<i64>) -> ScheduledSession {
        ScheduledSession {
            demand_index: 0,
            instructor_id,
            instructor_name: format!("I{instructor_id}"),
            course_code: course_code.to_string(),
            subject: "Subject".into(),
            units: 3,
            day: Day::normalize(day),
            start: start.to_string(),
            end: end.to_string(),
            period: Period::Morning,
            block: "A".into(),
            year_level: "1".into(),
            employment_type: EmploymentType::FullTime,
            session_type: SessionType::NonLab,
            room_id,
            dept: "CS".into(),
            section: section.to_string(),
        }
    }

    #[test]
    fn detects_instructor_overlap() {
        let sessions = vec![
            session(1, "CS-1 A", "CS101", "Monday", "09:00:00", "10:30:00", Some(1)),
            session(1, "CS-1 B", "CS102", "Monday", "09:30:00", "11:00:00", Some(2)),
        ];
        assert_eq!(instructor_overlaps(&sessions), 1);
    }

    #[test]
    fn no_overlap_for_disjoint_windows() {
        let sessions = vec![
            session(1, "CS-1 A", "CS101", "Monday", "09:00:00", "10:30:00", Some(1)),
            session(1, "CS-1 B", "CS102", "Monday", "10:30:00", "12:00:00", Some(1)),
        ];
        assert_eq!(instructor_overlaps(&sessions), 0);
        assert_eq!(room_overlaps(&sessions), 0);
    }

    #[test]
    fn detects_room_overlap_across_instructors() {
        let sessions = vec![
            session(1, "CS-1 A", "CS101", "Monday", "09:00:00", "10:30:00", Some(1)),
            session(2, "IT-1 A", "IT101", "Monday", "09:30:00", "11:00:00", Some(1)),
        ];
        assert_eq!(room_overlaps(&sessions), 1);
    }

    #[test]
    fn detects_section_time_overlap_and_exact_duplicate() {
        let exact = vec![
            session(1, "CS-1 A", "CS101", "Monday", "09:00:00", "10:30:00", Some(1)),
            session(2, "CS-1 A", "CS105", "Monday", "09:00:00", "10:30:00", Some(2)),
        ];
        assert_eq!(section_exact_duplicates(&exact), 1);
        assert_eq!(section_time_overlaps(&exact), 1);

        let partial = vec![
            session(1, "CS-1 A", "CS101", "Monday", "09:00:00", "10:30:00", Some(1)),
            session(2, "CS-1 A", "CS105", "Monday", "10:00:00", "11:30:00", Some(2)),
        ];
        assert_eq!(section_exact_duplicates(&partial), 0);
        assert_eq!(section_time_overlaps(&partial), 1);
    }

    #[test]
    fn lunch_violation_detector_matches_spec_examples() {
        let sessions = vec![
            session(1, "CS-1 A", "CS101", "Monday", "11:30:00", "12:15:00", Some(1)),
            session(2, "CS-1 B", "CS102", "Monday", "11:00:00", "12:00:00", Some(2)),
        ];
        assert_eq!(lunch_violations(&sessions), 1);
    }
}
