//! Constraint model (C5): builds an ILP over the window catalog and solves it
//! with HiGHs. Grounded on the teacher's closest analog in the pack, the
//! course/room/timeslot ILP in `schedule_solver`'s `solver.rs` — the decision
//! variable shape, the `constraint!`/`Expression` sum-per-slot pattern, and
//! the `.using(default_solver).set_option(...)` setup all carry over, with
//! the variable's third index generalized from a flat timeslot to a window
//! in the weekly catalog and the objective flipped to a minimized weighted
//! penalty (spec.md §4.5).

use std::collections::HashMap;
use std::time::Instant;

use good_lp::{constraint, default_solver, variable, Expression, ProblemVariables, Solution, SolverModel, Variable};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::SolveConfig;
use crate::error::SolveError;
use crate::model::{
    time::add_hours, window, CourseDemand, EmploymentType, Period, ScheduledSession, Window,
};
use crate::sessions;

/// Outcome of a CP solve attempt, approximating CP-SAT's status granularity
/// from what good_lp/HiGHs exposes: a solver error or a missing solution
/// before the time limit elapsed is `Infeasible`; a solution found once the
/// configured time limit has already elapsed is `Timeout` rather than
/// `Optimal`, since the HiGHs binding used here has no direct "proved
/// optimal" flag (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpStatus {
    Optimal,
    Feasible,
    Infeasible,
    Timeout,
}

impl CpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CpStatus::Optimal => "OPTIMAL",
            CpStatus::Feasible => "FEASIBLE",
            CpStatus::Infeasible => "INFEASIBLE",
            CpStatus::Timeout => "TIMEOUT",
        }
    }
}

/// A single (demand, session-within-demand) unit placed at a candidate
/// window. Sessions within one demand are distinguished by `session_index`
/// since they share every other field until placed.
#[derive(Debug, Clone, Copy)]
struct SessionKey {
    demand_index: usize,
    session_index: usize,
}

/// Run the CP solve for every demand's decomposed sessions, returning the
/// placed (unroomed) sessions on success. Rooms are assigned afterwards by
/// the shared `rooms::RoomAssigner` (C6), not inside this module.
pub fn solve(demands: &[CourseDemand], config: &SolveConfig) -> Result<(CpStatus, Vec<ScheduledSession>), SolveError> {
    let start_time = Instant::now();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let catalog = window::generate_catalog(&mut rng);

    // Per-demand candidate window lists, already ordered by employment-type
    // preference (spec.md §4.2).
    let mut demand_catalog: Vec<Vec<Window>> = Vec::with_capacity(demands.len());
    for d in demands {
        demand_catalog.push(window::filter_for_employment(&catalog, d.employment_type));
    }

    // Decompose every demand into (duration) sessions and keep the keys that
    // will become decision variables.
    let mut sessions_by_demand: Vec<Vec<f64>> = Vec::with_capacity(demands.len());
    for d in demands {
        sessions_by_demand.push(sessions::decompose(d.units as f64, d.employment_type));
    }

    let mut problem = ProblemVariables::new();
    // (demand_index, session_index, window_index) -> decision variable.
    let mut vars: HashMap<(usize, usize, usize), Variable> = HashMap::new();
    let mut keys: Vec<SessionKey> = Vec::new();

    for (di, durations) in sessions_by_demand.iter().enumerate() {
        let candidates = &demand_catalog[di];
        for (si, duration) in durations.iter().enumerate() {
            keys.push(SessionKey { demand_index: di, session_index: si });
            for (wi, window) in candidates.iter().enumerate() {
                if window.duration_hours() + 1e-6 >= *duration {
                    let var = problem.add(variable().binary());
                    vars.insert((di, si, wi), var);
                }
            }
        }
    }

    if vars.is_empty() {
        return Err(SolveError::Infeasible { status: "INFEASIBLE" });
    }

    info!(
        "CP: {} demands, {} sessions, {} candidate variables",
        demands.len(),
        keys.len(),
        vars.len()
    );

    // ---- objective: minimize the weighted soft-penalty sum -----------
    let mut objective = Expression::from(0.0);
    for (&(di, si, wi), &var) in vars.iter() {
        let demand = &demands[di];
        let w = &demand_catalog[di][wi];
        let duration = sessions_by_demand[di][si];
        let actual_end = add_hours(&w.start, duration).unwrap_or_else(|| w.end.clone());
        let weight = soft_penalty_weight(demand.employment_type, w.period, &w.start, &actual_end);
        if weight != 0.0 {
            objective = objective + weight * var;
        }
    }

    let mut model = problem
        .minimise(objective)
        .using(default_solver)
        .set_option("threads", config.cp_workers as i32)
        .set_option("time_limit", config.time_limit.as_secs_f64())
        .set_option("random_seed", config.seed as i32);

    // H1: every (demand, session) is placed exactly once.
    for (di, durations) in sessions_by_demand.iter().enumerate() {
        for si in 0..durations.len() {
            let placed: Expression = demand_catalog[di]
                .iter()
                .enumerate()
                .filter_map(|(wi, _)| vars.get(&(di, si, wi)).copied())
                .sum();
            model.add_constraint(constraint!(placed == 1));
        }
    }

    // H2: no instructor double-booked in the exact same catalog window.
    // Window identity is keyed by (day, start, end) rather than a per-demand
    // index, since each demand filters the shared weekly catalog down to its
    // own candidate subset.
    let mut by_instructor: HashMap<&str, Vec<usize>> = HashMap::new();
    for (di, d) in demands.iter().enumerate() {
        by_instructor.entry(d.instructor_name.as_str()).or_default().push(di);
    }
    for (_, demand_indices) in by_instructor.iter() {
        let mut by_slot: HashMap<(String, String, String), Vec<Variable>> = HashMap::new();
        for &di in demand_indices {
            for (si, _) in sessions_by_demand[di].iter().enumerate() {
                for (wi, w) in demand_catalog[di].iter().enumerate() {
                    if let Some(&var) = vars.get(&(di, si, wi)) {
                        by_slot
                            .entry((w.day.name().to_string(), w.start.clone(), w.end.clone()))
                            .or_default()
                            .push(var);
                    }
                }
            }
        }
        for (_, group) in by_slot {
            if group.len() > 1 {
                let sum: Expression = group.into_iter().sum();
                model.add_constraint(constraint!(sum <= 1));
            }
        }
    }

    // H3: no section double-booked across overlapping windows of the same day.
    let mut by_section: HashMap<String, Vec<usize>> = HashMap::new();
    for (di, d) in demands.iter().enumerate() {
        by_section.entry(d.section()).or_default().push(di);
    }
    for (_, demand_indices) in by_section.iter() {
        for &di in demand_indices {
            for si in 0..sessions_by_demand[di].len() {
                for (wi, w) in demand_catalog[di].iter().enumerate() {
                    let Some(&anchor_var) = vars.get(&(di, si, wi)) else { continue };
                    let mut sum = Expression::from(anchor_var);
                    let mut any = false;
                    for &other_di in demand_indices {
                        if other_di == di {
                            continue;
                        }
                        for osi in 0..sessions_by_demand[other_di].len() {
                            for (owi, ow) in demand_catalog[other_di].iter().enumerate() {
                                if ow.overlaps(w) {
                                    if let Some(&ov) = vars.get(&(other_di, osi, owi)) {
                                        sum = sum + ov;
                                        any = true;
                                    }
                                }
                            }
                        }
                    }
                    if any {
                        model.add_constraint(constraint!(sum <= 1));
                    }
                }
            }
        }
    }

    let solution = match model.solve() {
        Ok(s) => s,
        Err(e) => {
            warn!("CP solver returned no solution: {e}");
            return Err(SolveError::SolverFailure(e.to_string()));
        }
    };

    let elapsed = start_time.elapsed();
    let status = if elapsed >= config.time_limit { CpStatus::Timeout } else { CpStatus::Optimal };
    debug!("CP solve finished in {elapsed:.2?} with status {}", status.as_str());

    let instructor_roster = crate::model::derive_instructors(demands);
    let instructor_id_of = |name: &str| -> u32 {
        instructor_roster.iter().find(|i| i.name == name).map(|i| i.instructor_id).unwrap_or(0)
    };

    let mut placed: Vec<ScheduledSession> = Vec::with_capacity(keys.len());
    for key in &keys {
        let di = key.demand_index;
        let si = key.session_index;
        let duration = sessions_by_demand[di][si];
        let chosen = demand_catalog[di]
            .iter()
            .enumerate()
            .find(|(wi, _)| vars.get(&(di, si, *wi)).map(|v| solution.value(*v) > 0.9).unwrap_or(false));
        let Some((_, window)) = chosen else {
            return Err(SolveError::Infeasible { status: "INFEASIBLE" });
        };
        let demand = &demands[di];
        let end = add_hours(&window.start, duration).unwrap_or_else(|| window.end.clone());
        placed.push(ScheduledSession {
            demand_index: di,
            instructor_id: instructor_id_of(&demand.instructor_name),
            instructor_name: demand.instructor_name.clone(),
            course_code: demand.course_code.clone(),
            subject: demand.subject.clone(),
            units: demand.units,
            day: window.day.clone(),
            start: window.start.clone(),
            end,
            period: window.period,
            block: demand.block.clone(),
            year_level: demand.year_level.clone(),
            employment_type: demand.employment_type,
            session_type: demand.session_type,
            room_id: None,
            dept: demand.dept.clone(),
            section: demand.section(),
        });
    }

    Ok((status, placed))
}

/// Soft-penalty weight for placing `employment_type` into a window of the
/// given `period`, plus the lunch-hour penalty, per spec.md §4.5's table
/// (weight 10 for any lunch overlap, the conflicts module's employment-
/// mismatch weights otherwise).
fn soft_penalty_weight(employment_type: EmploymentType, period: Period, start: &str, end: &str) -> f64 {
    let mismatch = match (employment_type, period) {
        (EmploymentType::PartTime, Period::Evening) => 0,
        (EmploymentType::PartTime, Period::Morning) => 7,
        (EmploymentType::PartTime, _) => 2,
        (EmploymentType::FullTime, Period::Evening) => 3,
        (EmploymentType::FullTime, _) => 0,
    };
    let lunch = if crate::model::time::overlaps_lunch(start, end) { 10 } else { 0 };
    (mismatch + lunch) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionType;

    fn demand(name: &str, code: &str, units: i32, employment_type: EmploymentType) -> CourseDemand {
        CourseDemand {
            instructor_name: name.into(),
            course_code: code.into(),
            subject: "Subject".into(),
            units,
            year_level: "1".into(),
            block: "A".into(),
            employment_type,
            dept: "CS".into(),
            session_type: SessionType::NonLab,
        }
    }

    #[test]
    fn solves_a_single_small_demand() {
        let demands = vec![demand("Alice", "CS101", 3, EmploymentType::FullTime)];
        let config = SolveConfig::builder().time_limit_sec(5).seed(7).build();
        let (status, sessions) = solve(&demands, &config).expect("should be solvable");
        assert!(matches!(status, CpStatus::Optimal | CpStatus::Feasible | CpStatus::Timeout));
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn keeps_two_instructors_with_non_overlapping_windows_apart() {
        let demands = vec![
            demand("Alice", "CS101", 3, EmploymentType::FullTime),
            demand("Bob", "CS102", 3, EmploymentType::FullTime),
        ];
        let config = SolveConfig::builder().time_limit_sec(5).seed(11).build();
        let (_, sessions) = solve(&demands, &config).expect("should be solvable");
        assert_eq!(sessions.len(), 2);
    }
}
