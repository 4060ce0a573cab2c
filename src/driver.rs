//! Driver (C8): parses the request, expands compound blocks, runs the CP
//! solver first and falls back to the GA on any CP failure, assigns rooms,
//! and builds the response envelope. Grounded on the teacher's `main.rs`
//! orchestration style (log at entry/exit, one fallible call chain) but
//! reshaped around this crate's single stdin-document contract (spec.md §6).

use log::{info, warn};

use crate::config::SolveConfig;
use crate::error::{InputError, ScheduleError};
use crate::model::{expand, ConflictCounts, ScheduleRequest, ScheduleResponse, ScheduleRow};
use crate::{conflicts, cp, ga, rooms};

/// Run one full solve from a parsed request, returning the response
/// envelope. Never returns `Err` for a solvable-but-imperfect schedule;
/// `Err` is reserved for malformed input (§7 class 1).
pub fn solve(request: ScheduleRequest) -> Result<ScheduleResponse, ScheduleError> {
    if request.instructor_data.is_empty() {
        return Err(InputError::MissingField { field: "instructorData" }.into());
    }
    if request.rooms.is_empty() {
        return Err(InputError::MissingField { field: "rooms" }.into());
    }

    let config = SolveConfig::from_request(request.time_limit_sec, request.seed);
    let demands = expand::expand_all(&request.instructor_data);
    let rooms_list = request.rooms;

    info!(
        "driver: {} demands (expanded), {} rooms, time_limit={:?}",
        demands.len(),
        rooms_list.len(),
        config.time_limit
    );

    let (path, mut sessions, status, fitness, generations): (&str, Vec<_>, &str, Option<f64>, Option<u32>) =
        match cp::solve(&demands, &config) {
            Ok((status, sessions)) => {
                info!("driver: CP path succeeded with status {}", status.as_str());
                ("CP", sessions, status.as_str(), None, None)
            }
            Err(e) => {
                warn!("driver: CP path failed ({e}), falling back to GA");
                match ga::solve(&demands, &rooms_list, &config) {
                    Ok((sessions, fitness, generations)) => {
                        ("GA", sessions, "FEASIBLE", Some(fitness), Some(generations))
                    }
                    Err(e) => {
                        warn!("driver: GA path failed ({e}), using greedy fallback");
                        let sessions = ga::greedy_fallback(&demands, &rooms_list, &config)?;
                        ("GREEDY_FALLBACK", sessions, "FEASIBLE", None, None)
                    }
                }
            }
        };

    let mut warnings: Vec<String> = Vec::new();

    let mut assigner = rooms::RoomAssigner::new(&rooms_list);
    for session in sessions.iter_mut() {
        if session.room_id.is_none() {
            session.room_id = assigner.assign(
                session.units,
                session.session_type.requires_lab(),
                &session.day,
                &session.start,
                &session.end,
            );
            if session.room_id.is_none() {
                let message = format!(
                    "no suitable room for section {} ({}): lab shortage or capacity exhausted",
                    session.section, session.course_code
                );
                warn!("driver: {message}");
                warnings.push(message);
            }
        }
    }

    for (di, demand) in demands.iter().enumerate() {
        let scheduled: f64 = sessions.iter().filter(|s| s.demand_index == di).map(|s| s.duration_hours()).sum();
        if (scheduled - demand.units as f64).abs() > 0.15 {
            let message = format!(
                "unit-coverage mismatch for {} ({}): scheduled {scheduled:.1}h against {} units",
                demand.course_code, demand.instructor_name, demand.units
            );
            warn!("driver: {message}");
            warnings.push(message);
        }
    }

    let conflict_counts: ConflictCounts = conflicts::tally(&sessions, &rooms_list);
    let total_conflicts = conflict_counts.total();
    let schedules: Vec<ScheduleRow> = sessions.iter().map(ScheduleRow::from).collect();

    info!("driver: path={path} status={status} sessions={} conflicts={total_conflicts}", schedules.len());

    Ok(ScheduleResponse {
        success: true,
        message: format!("Schedule produced via {path} ({status})"),
        schedules,
        conflicts: Some(conflict_counts),
        fitness,
        total_conflicts: Some(total_conflicts),
        generations_run: generations,
        errors: warnings,
    })
}

/// Build the JSON error envelope for a failed request (§7).
pub fn error_response(err: &ScheduleError) -> ScheduleResponse {
    ScheduleResponse {
        success: false,
        message: err.to_string(),
        schedules: Vec::new(),
        conflicts: None,
        fitness: None,
        total_conflicts: None,
        generations_run: None,
        errors: vec![err.to_string()],
    }
}
