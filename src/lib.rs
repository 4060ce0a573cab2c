//! Academic scheduling core: turns instructor course demands and a room
//! roster into a conflict-minimized weekly timetable.
//!
//! The solve path tries exact constraint programming first, falls back to a
//! genetic algorithm, and falls back once more to a greedy construction if
//! both fail to produce even one feasible placement.

pub mod config;
pub mod conflicts;
pub mod cp;
pub mod driver;
pub mod error;
pub mod ga;
pub mod model;
pub mod rooms;
pub mod sessions;

pub use driver::solve;
pub use error::ScheduleError;
pub use model::{ScheduleRequest, ScheduleResponse};
