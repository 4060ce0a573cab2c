//! End-to-end scenarios driving the crate's public `solve` entry point
//! directly against a fixed room roster: 1 and 2 are 40-capacity non-lab
//! rooms, 3 is a 30-capacity lab room, all active.

use sectionweave::model::{EmploymentType, InstructorDataRow, Room, ScheduleRequest, SessionType};
use sectionweave::solve;

fn rooms() -> Vec<Room> {
    vec![
        Room { room_id: 1, room_name: "Room 1".into(), capacity: 40, is_lab: false, is_active: true },
        Room { room_id: 2, room_name: "Room 2".into(), capacity: 40, is_lab: false, is_active: true },
        Room { room_id: 3, room_name: "Lab 1".into(), capacity: 30, is_lab: true, is_active: true },
    ]
}

fn demand(
    name: &str,
    code: &str,
    unit: i32,
    block: &str,
    employment: EmploymentType,
    session_type: SessionType,
) -> InstructorDataRow {
    InstructorDataRow {
        name: name.into(),
        course_code: code.into(),
        subject: format!("{code} lecture"),
        unit,
        year_level: "1".into(),
        block: block.into(),
        employment_type: employment,
        dept: "CS".into(),
        session_type,
    }
}

fn request(rows: Vec<InstructorDataRow>) -> ScheduleRequest {
    ScheduleRequest { instructor_data: rows, rooms: rooms(), time_limit_sec: Some(10), seed: Some(1234) }
}

fn duration_hours(start: &str, end: &str) -> f64 {
    sectionweave::model::time::duration_hours(start, end).unwrap_or(0.0)
}

#[test]
fn scenario_1_single_full_time_demand_gets_one_three_hour_session() {
    let response = solve(request(vec![demand("Alice", "CS101", 3, "A", EmploymentType::FullTime, SessionType::NonLab)]))
        .expect("should solve");
    assert!(response.success);
    assert_eq!(response.schedules.len(), 1);
    let row = &response.schedules[0];
    assert!((duration_hours(&row.start_time, &row.end_time) - 3.0).abs() < 0.15);
    assert!(matches!(row.room_id, Some(1) | Some(2)));
}

#[test]
fn scenario_2_six_unit_full_time_demand_splits_across_two_days() {
    let response = solve(request(vec![demand("Alice", "CS101", 6, "A", EmploymentType::FullTime, SessionType::NonLab)]))
        .expect("should solve");
    assert!(response.success);
    assert_eq!(response.schedules.len(), 2);
    for row in &response.schedules {
        assert!((duration_hours(&row.start_time, &row.end_time) - 3.0).abs() < 0.15);
    }
    assert_ne!(response.schedules[0].day, response.schedules[1].day);
}

#[test]
fn scenario_3_shared_instructor_demands_land_on_non_overlapping_windows() {
    let response = solve(request(vec![
        demand("Alice", "CS101", 3, "A", EmploymentType::FullTime, SessionType::NonLab),
        demand("Alice", "CS102", 3, "B", EmploymentType::FullTime, SessionType::NonLab),
    ]))
    .expect("should solve");
    assert!(response.success);
    assert_eq!(response.schedules.len(), 2);
    let a = &response.schedules[0];
    let b = &response.schedules[1];
    if a.day == b.day {
        let (s1, e1) = (a.start_time.clone(), a.end_time.clone());
        let (s2, e2) = (b.start_time.clone(), b.end_time.clone());
        assert!(s1 >= e2 || s2 >= e1, "instructor double-booked: {a:?} vs {b:?}");
    }
    assert_eq!(response.conflicts.as_ref().map(|c| c.instructor_overlap), Some(0));
}

#[test]
fn scenario_4_compound_block_expands_into_two_independent_sections() {
    let response = solve(request(vec![demand("Alice", "CS101", 3, "A & B", EmploymentType::FullTime, SessionType::NonLab)]))
        .expect("should solve");
    assert!(response.success);
    assert_eq!(response.schedules.len(), 2);
    assert_ne!(response.schedules[0].section, response.schedules[1].section);
}

#[test]
fn scenario_5_lab_demand_with_no_lab_rooms_still_schedules_without_a_room() {
    let only_non_lab_rooms = vec![
        Room { room_id: 1, room_name: "Room 1".into(), capacity: 40, is_lab: false, is_active: true },
        Room { room_id: 2, room_name: "Room 2".into(), capacity: 40, is_lab: false, is_active: true },
    ];
    let req = ScheduleRequest {
        instructor_data: vec![demand("Alice", "CS101", 3, "A", EmploymentType::FullTime, SessionType::Lab)],
        rooms: only_non_lab_rooms,
        time_limit_sec: Some(10),
        seed: Some(5),
    };
    let response = solve(req).expect("should solve");
    assert_eq!(response.schedules.len(), 1);
    assert_eq!(response.schedules[0].room_id, None);
    assert!(!response.errors.is_empty(), "expected a lab-shortage warning in errors");
}

#[test]
fn scenario_6_part_time_six_units_has_an_evening_session() {
    let response = solve(request(vec![demand("Bob", "CS201", 6, "A", EmploymentType::PartTime, SessionType::NonLab)]))
        .expect("should solve");
    assert!(response.success);
    assert_eq!(response.schedules.len(), 2);
    let has_evening = response.schedules.iter().any(|row| row.start_time.as_str() >= "17:00:00");
    assert!(has_evening, "expected at least one evening session: {:?}", response.schedules);
}

#[test]
fn universal_invariant_no_instructor_or_room_double_booking_across_a_larger_request() {
    let response = solve(request(vec![
        demand("Alice", "CS101", 3, "A", EmploymentType::FullTime, SessionType::NonLab),
        demand("Alice", "CS102", 3, "B", EmploymentType::FullTime, SessionType::NonLab),
        demand("Bob", "CS103", 6, "A", EmploymentType::PartTime, SessionType::NonLab),
        demand("Carol", "IT201", 3, "C", EmploymentType::FullTime, SessionType::Lab),
    ]))
    .expect("should solve");
    assert!(response.success);
    let counts = response.conflicts.expect("conflict tally present");
    assert_eq!(counts.instructor_overlap, 0);
    assert_eq!(counts.room_overlap, 0);
    assert_eq!(counts.section_exact_duplicate, 0);
    assert_eq!(counts.section_time_overlap, 0);
}

#[test]
fn rejects_empty_instructor_data_without_invoking_any_solver() {
    let req = ScheduleRequest { instructor_data: Vec::new(), rooms: rooms(), time_limit_sec: None, seed: None };
    assert!(solve(req).is_err());
}

#[test]
fn rejects_empty_room_roster() {
    let req = ScheduleRequest {
        instructor_data: vec![demand("Alice", "CS101", 3, "A", EmploymentType::FullTime, SessionType::NonLab)],
        rooms: Vec::new(),
        time_limit_sec: None,
        seed: None,
    };
    assert!(solve(req).is_err());
}
