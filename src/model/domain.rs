//! Core scheduling entities: course demand, room, instructor, scheduled
//! session, and the JSON request/response envelopes (spec.md §6).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EmploymentType {
    #[serde(rename = "FULL-TIME")]
    FullTime,
    #[serde(rename = "PART-TIME")]
    PartTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionType {
    #[serde(rename = "Lab session")]
    Lab,
    #[serde(rename = "Non-Lab session")]
    NonLab,
}

impl SessionType {
    pub fn requires_lab(&self) -> bool {
        matches!(self, SessionType::Lab)
    }
}

/// One row of `instructorData`, after compound blocks have been expanded
/// (§3: a demand with `block = "A & B"` becomes one demand per block).
#[derive(Debug, Clone)]
pub struct CourseDemand {
    pub instructor_name: String,
    pub course_code: String,
    pub subject: String,
    pub units: i32,
    pub year_level: String,
    pub block: String,
    pub employment_type: EmploymentType,
    pub dept: String,
    pub session_type: SessionType,
}

impl CourseDemand {
    pub fn section(&self) -> String {
        format!("{}-{} {}", self.dept, self.year_level, self.block)
    }
}

/// A schedulable room (§3). Only `is_active` rooms participate in solving.
#[derive(Debug, Clone, Deserialize)]
pub struct Room {
    pub room_id: i64,
    pub room_name: String,
    pub capacity: i32,
    pub is_lab: bool,
    pub is_active: bool,
}

/// An instructor derived from the demand list, one per distinct name, with
/// the employment type of its first-seen demand.
#[derive(Debug, Clone)]
pub struct Instructor {
    pub instructor_id: u32,
    pub name: String,
    pub employment_type: EmploymentType,
}

/// Builds the dense (1..N), first-appearance-ordered instructor roster from
/// a demand list.
pub fn derive_instructors(demands: &[CourseDemand]) -> Vec<Instructor> {
    let mut seen = std::collections::HashSet::new();
    let mut instructors = Vec::new();
    let mut next_id = 1u32;
    for d in demands {
        if seen.insert(d.instructor_name.clone()) {
            instructors.push(Instructor {
                instructor_id: next_id,
                name: d.instructor_name.clone(),
                employment_type: d.employment_type,
            });
            next_id += 1;
        }
    }
    instructors
}

/// One scheduled meeting: a (demand, session index) placed at a window and,
/// possibly, a room.
#[derive(Debug, Clone)]
pub struct ScheduledSession {
    pub demand_index: usize,
    pub instructor_id: u32,
    pub instructor_name: String,
    pub course_code: String,
    pub subject: String,
    pub units: i32,
    pub day: crate::model::Day,
    pub start: String,
    pub end: String,
    pub period: crate::model::Period,
    pub block: String,
    pub year_level: String,
    pub employment_type: EmploymentType,
    pub session_type: SessionType,
    pub room_id: Option<i64>,
    pub dept: String,
    pub section: String,
}

impl ScheduledSession {
    pub fn duration_hours(&self) -> f64 {
        crate::model::time::duration_hours(&self.start, &self.end).unwrap_or(0.0)
    }

    pub fn overlaps_time(&self, other: &ScheduledSession) -> bool {
        if self.day != other.day {
            return false;
        }
        let (Some(s1), Some(e1)) = (crate::model::time::parse_hms(&self.start), crate::model::time::parse_hms(&self.end))
        else {
            return false;
        };
        let (Some(s2), Some(e2)) =
            (crate::model::time::parse_hms(&other.start), crate::model::time::parse_hms(&other.end))
        else {
            return false;
        };
        crate::model::time::ranges_overlap(s1, e1, s2, e2)
    }
}

// ---- Request / response envelopes (spec.md §6) ----------------------------

#[derive(Debug, Deserialize)]
pub struct InstructorDataRow {
    pub name: String,
    #[serde(rename = "courseCode")]
    pub course_code: String,
    pub subject: String,
    pub unit: i32,
    #[serde(rename = "yearLevel")]
    pub year_level: String,
    pub block: String,
    #[serde(rename = "employmentType")]
    pub employment_type: EmploymentType,
    pub dept: String,
    #[serde(rename = "sessionType")]
    pub session_type: SessionType,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    #[serde(rename = "instructorData")]
    pub instructor_data: Vec<InstructorDataRow>,
    pub rooms: Vec<Room>,
    #[serde(rename = "timeLimitSec")]
    pub time_limit_sec: Option<u64>,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleRow {
    pub instructor: String,
    pub instructor_id: u32,
    pub subject_code: String,
    pub subject_description: String,
    pub unit: i32,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub block: String,
    pub year_level: String,
    pub employment_type: EmploymentType,
    #[serde(rename = "sessionType")]
    pub session_type: SessionType,
    pub room_id: Option<i64>,
    pub dept: String,
    pub section: String,
}

impl From<&ScheduledSession> for ScheduleRow {
    fn from(s: &ScheduledSession) -> Self {
        ScheduleRow {
            instructor: s.instructor_name.clone(),
            instructor_id: s.instructor_id,
            subject_code: s.course_code.clone(),
            subject_description: s.subject.clone(),
            unit: s.units,
            day: s.day.name().to_string(),
            start_time: s.start.clone(),
            end_time: s.end.clone(),
            block: s.block.clone(),
            year_level: s.year_level.clone(),
            employment_type: s.employment_type,
            session_type: s.session_type,
            room_id: s.room_id,
            dept: s.dept.clone(),
            section: s.section.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ConflictCounts {
    pub instructor_overlap: u32,
    pub room_overlap: u32,
    pub section_exact_duplicate: u32,
    pub course_code_clash: u32,
    pub section_time_overlap: u32,
    pub lunch_break: u32,
    pub employment_type: u32,
    pub room_capacity: u32,
}

impl ConflictCounts {
    pub fn total(&self) -> u32 {
        self.instructor_overlap
            + self.room_overlap
            + self.section_exact_duplicate
            + self.course_code_clash
            + self.section_time_overlap
            + self.lunch_break
            + self.employment_type
            + self.room_capacity
    }
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub success: bool,
    pub message: String,
    pub schedules: Vec<ScheduleRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<ConflictCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_conflicts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generations_run: Option<u32>,
    pub errors: Vec<String>,
}
