//! Scheduling data model: days, time windows, rooms, demands, instructors,
//! and scheduled sessions (spec.md §3).

pub mod day;
pub mod domain;
pub mod expand;
pub mod time;
pub mod window;

pub use day::Day;
pub use domain::{
    derive_instructors, ConflictCounts, CourseDemand, EmploymentType, Instructor,
    InstructorDataRow, Room, ScheduleRequest, ScheduleResponse, ScheduleRow, ScheduledSession,
    SessionType,
};
pub use window::{Period, Window};
