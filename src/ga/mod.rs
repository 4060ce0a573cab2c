//! Genetic-algorithm fallback (C7). Grounded on the teacher-adjacent
//! `constraint-solver` employee-scheduling example for the reproducible-RNG
//! idea (a `ChaCha` generator seeded once per run, not per call), adapted
//! into a population/fitness/tournament-selection GA rather than that
//! example's iterated-local-search framework, since the spec's population,
//! crossover, and mutation-operator shape (spec.md §4.7) is a classic GA, not
//! a single-trajectory local search.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::SolveConfig;
use crate::conflicts;
use crate::error::SolveError;
use crate::model::{window, CourseDemand, Room, ScheduledSession};
use crate::rooms::RoomAssigner;
use crate::sessions;

const POPULATION_SIZE: usize = 50;
const MAX_GENERATIONS: u32 = 30;
const MAX_WALL_TIME: Duration = Duration::from_secs(45);
const GOOD_ENOUGH_FITNESS: f64 = 50_000.0;
const TOURNAMENT_SIZE: usize = 4;
const CROSSOVER_PROBABILITY: f64 = 0.8;
const ELITE_SIZE: usize = 8;
const STAGNATION_RESTART: u32 = 10;
const STAGNATION_SLOW: u32 = 5;

type Individual = Vec<ScheduledSession>;

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Time,
    Room,
    Swap,
    AddRemove,
    Instructor,
}

const MUTATIONS: [Mutation; 5] = [Mutation::Time, Mutation::Room, Mutation::Swap, Mutation::AddRemove, Mutation::Instructor];

/// Run the GA to completion, returning the best individual found, its
/// fitness, and the number of generations actually run.
pub fn solve(
    demands: &[CourseDemand],
    rooms: &[Room],
    config: &SolveConfig,
) -> Result<(Individual, f64, u32), SolveError> {
    let start_time = Instant::now();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let catalog = window::generate_catalog(&mut rng);
    let sessions_by_demand: Vec<Vec<f64>> =
        demands.iter().map(|d| sessions::decompose(d.units as f64, d.employment_type)).collect();
    let instructor_roster = crate::model::derive_instructors(demands);

    let mut mutation_rate = 0.25_f64;

    let mut population: Vec<Individual> = (0..POPULATION_SIZE)
        .map(|_| seed_individual(demands, &sessions_by_demand, &catalog, rooms, &instructor_roster, &mut rng))
        .collect();

    if population.is_empty() || population.iter().all(|i| i.is_empty()) {
        return Err(SolveError::GaExhausted);
    }

    let mut best: Individual = population[0].clone();
    let mut best_fitness = fitness(&best, demands, &sessions_by_demand, rooms);
    let mut stagnation = 0u32;
    let mut generation = 0u32;

    while generation < MAX_GENERATIONS && start_time.elapsed() < MAX_WALL_TIME {
        let mut scored: Vec<(f64, usize)> =
            population.iter().enumerate().map(|(i, ind)| (fitness(ind, demands, &sessions_by_demand, rooms), i)).collect();
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        let gen_best_fitness = scored[0].0;
        if gen_best_fitness < best_fitness {
            best_fitness = gen_best_fitness;
            best = population[scored[0].1].clone();
            stagnation = 0;
        } else {
            stagnation += 1;
        }

        if best_fitness <= 0.0 || best_fitness < GOOD_ENOUGH_FITNESS {
            break;
        }

        if stagnation > STAGNATION_RESTART {
            mutation_rate = (mutation_rate * 1.1).min(0.30);
            log::info!("GA: stagnation restart at generation {generation}, fitness {best_fitness}");
            let mut refreshed: Vec<Individual> = vec![best.clone()];
            refreshed.extend((1..POPULATION_SIZE).map(|_| {
                seed_individual(demands, &sessions_by_demand, &catalog, rooms, &instructor_roster, &mut rng)
            }));
            population = refreshed;
            stagnation = 0;
            generation += 1;
            continue;
        } else if stagnation < STAGNATION_SLOW {
            mutation_rate = (mutation_rate * 0.95).max(0.05);
        }

        let elites: Vec<Individual> =
            scored.iter().take(ELITE_SIZE).map(|(_, idx)| population[*idx].clone()).collect();

        let mut next_gen: Vec<Individual> = elites.clone();
        while next_gen.len() < POPULATION_SIZE {
            let parent_a = tournament_select(&population, &scored, &mut rng);
            let parent_b = tournament_select(&population, &scored, &mut rng);
            let mut child = if rng.random::<f64>() < CROSSOVER_PROBABILITY {
                crossover(parent_a, parent_b, demands, &mut rng)
            } else {
                parent_a.clone()
            };
            if rng.random::<f64>() < mutation_rate {
                mutate(&mut child, demands, &sessions_by_demand, &catalog, rooms, &mut rng);
            }
            repair(&mut child, demands, &catalog, rooms);
            next_gen.push(child);
        }

        population = next_gen;
        generation += 1;
        log::debug!("GA: generation {generation} best fitness {best_fitness}");
    }

    log::info!("GA finished after {generation} generations, best fitness {best_fitness}");
    Ok((best, best_fitness, generation))
}

/// First-fit greedy placement used both as the per-individual seeder and as
/// the documented fallback when the GA produces no usable individual at all.
fn seed_individual<R: Rng + ?Sized>(
    demands: &[CourseDemand],
    sessions_by_demand: &[Vec<f64>],
    catalog: &[crate::model::Window],
    rooms: &[Room],
    instructor_roster: &[crate::model::Instructor],
    rng: &mut R,
) -> Individual {
    let mut day_usage: HashMap<String, u32> = HashMap::new();
    let mut assigner = RoomAssigner::new(rooms);
    let mut individual = Individual::new();

    for (di, demand) in demands.iter().enumerate() {
        let candidates = window::filter_for_employment(catalog, demand.employment_type);
        if candidates.is_empty() {
            continue;
        }
        let instructor_id = instructor_roster
            .iter()
            .find(|i| i.name == demand.instructor_name)
            .map(|i| i.instructor_id)
            .unwrap_or(0);

        for duration in &sessions_by_demand[di] {
            let fitting: Vec<&crate::model::Window> =
                candidates.iter().filter(|w| w.duration_hours() + 1e-6 >= *duration).collect();
            let Some(window) = weighted_pick(&fitting, &day_usage, rng) else { continue };
            *day_usage.entry(window.day.name().to_string()).or_insert(0) += 1;
            let end = crate::model::time::add_hours(&window.start, *duration).unwrap_or_else(|| window.end.clone());
            let room_id = assigner.assign(demand.units, demand.session_type.requires_lab(), &window.day, &window.start, &end);
            individual.push(ScheduledSession {
                demand_index: di,
                instructor_id,
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
                room_id,
                dept: demand.dept.clone(),
                section: demand.section(),
            });
        }
    }
    individual
}

/// Inverse-frequency weighted pick among windows that fit, biased toward
/// days used less so far in this individual.
fn weighted_pick<'a, R: Rng + ?Sized>(
    candidates: &[&'a crate::model::Window],
    day_usage: &HashMap<String, u32>,
    rng: &mut R,
) -> Option<&'a crate::model::Window> {
    if candidates.is_empty() {
        return None;
    }
    let weighted: Vec<(&'a crate::model::Window, f64)> = candidates
        .iter()
        .copied()
        .map(|w| {
            let count = *day_usage.get(w.day.name()).unwrap_or(&0) as f64;
            (w, 1.0 / (1.0 + count))
        })
        .collect();
    weighted.choose_weighted(rng, |(_, weight)| *weight).ok().map(|(w, _)| *w)
}

fn tournament_select<'a, R: Rng + ?Sized>(
    population: &'a [Individual],
    scored: &[(f64, usize)],
    rng: &mut R,
) -> &'a Individual {
    let mut best_idx = scored.choose(rng).unwrap().1;
    let mut best_fit = scored.iter().find(|(_, i)| *i == best_idx).unwrap().0;
    for _ in 1..TOURNAMENT_SIZE {
        let (fit, idx) = *scored.choose(rng).unwrap();
        if fit < best_fit {
            best_fit = fit;
            best_idx = idx;
        }
    }
    &population[best_idx]
}

/// Course-level uniform recombination: each course code's entire session
/// list comes from one parent or the other.
fn crossover<R: Rng + ?Sized>(a: &Individual, b: &Individual, demands: &[CourseDemand], rng: &mut R) -> Individual {
    let mut child = Individual::new();
    let course_codes: Vec<&str> = {
        let mut codes: Vec<&str> = demands.iter().map(|d| d.course_code.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    };
    for code in course_codes {
        let source = if rng.random::<bool>() { a } else { b };
        for session in source.iter().filter(|s| demands[s.demand_index].course_code == code) {
            child.push(session.clone());
        }
    }
    child
}

fn mutate<R: Rng + ?Sized>(
    individual: &mut Individual,
    demands: &[CourseDemand],
    sessions_by_demand: &[Vec<f64>],
    catalog: &[crate::model::Window],
    rooms: &[Room],
    rng: &mut R,
) {
    if individual.is_empty() {
        return;
    }
    match *MUTATIONS.choose(rng).unwrap() {
        Mutation::Instructor => {}
        Mutation::Time => {
            let idx = rng.random_range(0..individual.len());
            let di = individual[idx].demand_index;
            let duration = individual[idx].duration_hours();
            let candidates = window::filter_for_employment(catalog, demands[di].employment_type);
            let fitting: Vec<&crate::model::Window> =
                candidates.iter().filter(|w| w.duration_hours() + 1e-6 >= duration).collect();
            if let Some(window) = fitting.choose(rng) {
                individual[idx].day = window.day.clone();
                individual[idx].start = window.start.clone();
                individual[idx].period = window.period;
                individual[idx].end =
                    crate::model::time::add_hours(&window.start, duration).unwrap_or_else(|| window.end.clone());
            }
        }
        Mutation::Room => {
            let idx = rng.random_range(0..individual.len());
            let requires_lab = individual[idx].session_type.requires_lab();
            let suitable: Vec<&Room> =
                rooms.iter().filter(|r| crate::rooms::is_suitable(r, individual[idx].units, requires_lab)).collect();
            if let Some(room) = suitable.choose(rng) {
                individual[idx].room_id = Some(room.room_id);
            }
        }
        Mutation::Swap => {
            if individual.len() < 2 {
                return;
            }
            let i = rng.random_range(0..individual.len());
            let mut j = rng.random_range(0..individual.len());
            if j == i {
                j = (j + 1) % individual.len();
            }
            let (day_i, start_i, end_i, period_i) =
                (individual[i].day.clone(), individual[i].start.clone(), individual[i].end.clone(), individual[i].period);
            individual[i].day = individual[j].day.clone();
            individual[i].start = individual[j].start.clone();
            individual[i].end = individual[j].end.clone();
            individual[i].period = individual[j].period;
            individual[j].day = day_i;
            individual[j].start = start_i;
            individual[j].end = end_i;
            individual[j].period = period_i;
        }
        Mutation::AddRemove => {
            let cap = demands.len() * 3;
            if individual.len() < cap && rng.random::<bool>() {
                let di = rng.random_range(0..demands.len());
                let durations = &sessions_by_demand[di];
                if let Some(&duration) = durations.choose(rng) {
                    let candidates = window::filter_for_employment(catalog, demands[di].employment_type);
                    let fitting: Vec<&crate::model::Window> =
                        candidates.iter().filter(|w| w.duration_hours() + 1e-6 >= duration).collect();
                    if let Some(window) = fitting.choose(rng) {
                        let demand = &demands[di];
                        let end = crate::model::time::add_hours(&window.start, duration).unwrap_or_else(|| window.end.clone());
                        let instructor_id =
                            individual.iter().find(|s| s.demand_index == di).map(|s| s.instructor_id).unwrap_or(0);
                        individual.push(ScheduledSession {
                            demand_index: di,
                            instructor_id,
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
                }
            } else {
                let mut counts: HashMap<usize, u32> = HashMap::new();
                for s in individual.iter() {
                    *counts.entry(s.demand_index).or_insert(0) += 1;
                }
                let removable: Vec<usize> = individual
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| *counts.get(&s.demand_index).unwrap_or(&0) > 1)
                    .map(|(i, _)| i)
                    .collect();
                if let Some(&idx) = removable.choose(rng) {
                    individual.remove(idx);
                }
            }
        }
    }
}

/// Bounded deterministic repair: section time overlaps, then lunch
/// violations, then cross-section clashes, then instructor/room clashes.
fn repair(individual: &mut Individual, demands: &[CourseDemand], catalog: &[crate::model::Window], rooms: &[Room]) {
    for _ in 0..10 {
        if conflicts::section_time_overlaps(individual) == 0
            && conflicts::lunch_violations(individual) == 0
            && conflicts::course_code_clashes(individual) == 0
            && conflicts::instructor_overlaps(individual) == 0
            && conflicts::room_overlaps(individual) == 0
        {
            break;
        }

        let offender = find_first_offender(individual);
        let Some(idx) = offender else { break };
        let di = individual[idx].demand_index;
        let duration = individual[idx].duration_hours();
        let candidates = window::filter_for_employment(catalog, demands[di].employment_type);
        let relocated = candidates.iter().filter(|w| w.duration_hours() + 1e-6 >= duration).find(|w| {
            let end = crate::model::time::add_hours(&w.start, duration).unwrap_or_else(|| w.end.clone());
            !conflicts_with_others(individual, idx, *w, &end)
        });
        if let Some(window) = relocated {
            let end = crate::model::time::add_hours(&window.start, duration).unwrap_or_else(|| window.end.clone());
            individual[idx].day = window.day.clone();
            individual[idx].start = window.start.clone();
            individual[idx].period = window.period;
            individual[idx].end = end;
        } else {
            let requires_lab = individual[idx].session_type.requires_lab();
            if let Some(room) = rooms.iter().find(|r| crate::rooms::is_suitable(r, individual[idx].units, requires_lab)) {
                individual[idx].room_id = Some(room.room_id);
            }
        }
    }
}

fn find_first_offender(individual: &[ScheduledSession]) -> Option<usize> {
    let checks: [fn(&ScheduledSession, &ScheduledSession) -> bool; 5] = [
        |a, b| a.section == b.section && a.overlaps_time(b),
        |a, _| crate::model::time::overlaps_lunch(&a.start, &a.end),
        |a, b| a.course_code == b.course_code && a.section != b.section && a.day == b.day && a.start == b.start && a.end == b.end,
        |a, b| a.instructor_id == b.instructor_id && a.overlaps_time(b),
        |a, b| matches!((a.room_id, b.room_id), (Some(r1), Some(r2)) if r1 == r2) && a.overlaps_time(b),
    ];
    for check in checks {
        for i in 0..individual.len() {
            for j in 0..individual.len() {
                if i != j && check(&individual[i], &individual[j]) {
                    return Some(i.max(j));
                }
            }
        }
    }
    None
}

fn conflicts_with_others(
    individual: &[ScheduledSession],
    idx: usize,
    window: &crate::model::Window,
    end: &str,
) -> bool {
    let moved = &individual[idx];
    individual.iter().enumerate().any(|(i, other)| {
        if i == idx {
            return false;
        }
        if other.day != window.day {
            return false;
        }
        let (Some(s1), Some(e1)) =
            (crate::model::time::parse_hms(&window.start), crate::model::time::parse_hms(end))
        else {
            return false;
        };
        let (Some(s2), Some(e2)) =
            (crate::model::time::parse_hms(&other.start), crate::model::time::parse_hms(&other.end))
        else {
            return false;
        };
        if !crate::model::time::ranges_overlap(s1, e1, s2, e2) {
            return false;
        }
        other.instructor_id == moved.instructor_id
            || other.section == moved.section
            || (other.room_id.is_some() && other.room_id == moved.room_id)
    })
}

/// Weighted sum of conflicts plus GA-only distributional penalties
/// (spec.md §4.7's fitness table).
fn fitness(individual: &Individual, demands: &[CourseDemand], sessions_by_demand: &[Vec<f64>], rooms: &[Room]) -> f64 {
    if individual.is_empty() {
        return f64::MAX;
    }
    let mut score = 0.0;
    score += conflicts::instructor_overlaps(individual) as f64 * 200.0;
    score += conflicts::room_overlaps(individual) as f64 * 200.0;
    score += conflicts::section_exact_duplicates(individual) as f64 * 400.0;
    score += conflicts::course_code_clashes(individual) as f64 * 300.0;
    score += conflicts::section_time_overlaps(individual) as f64 * 500.0;
    score += conflicts::lunch_violations(individual) as f64 * 300.0;
    score += conflicts::employment_mismatch_weight(individual) as f64 * 100.0;
    score += conflicts::room_capacity_violations(individual, rooms) as f64 * 50.0;

    score += day_distribution_penalty(individual) * 20.0;
    score += instructor_load_variance(individual) * 30.0;
    score += room_utilization_deviation(individual) * 15.0;
    score += meeting_pattern_penalty(individual, demands) * 25.0;
    score += units_coverage_deviation(individual, demands) * 100.0;

    if has_expected_session_counts(individual, sessions_by_demand) {
        score -= 100.0;
    }

    score
}

fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

fn day_distribution_penalty(individual: &[ScheduledSession]) -> f64 {
    let mut counts: HashMap<&str, f64> = HashMap::new();
    for s in individual {
        *counts.entry(s.day.name()).or_insert(0.0) += 1.0;
    }
    variance(&counts.into_values().collect::<Vec<_>>())
}

fn instructor_load_variance(individual: &[ScheduledSession]) -> f64 {
    let mut counts: HashMap<u32, f64> = HashMap::new();
    for s in individual {
        *counts.entry(s.instructor_id).or_insert(0.0) += s.duration_hours();
    }
    variance(&counts.into_values().collect::<Vec<_>>())
}

fn room_utilization_deviation(individual: &[ScheduledSession]) -> f64 {
    let mut counts: HashMap<i64, f64> = HashMap::new();
    for s in individual.iter().filter_map(|s| s.room_id.map(|r| (r, s))) {
        *counts.entry(s.0).or_insert(0.0) += 1.0;
    }
    variance(&counts.into_values().collect::<Vec<_>>())
}

fn meeting_pattern_penalty(individual: &[ScheduledSession], demands: &[CourseDemand]) -> f64 {
    let mut by_demand: HashMap<usize, Vec<&ScheduledSession>> = HashMap::new();
    for s in individual {
        by_demand.entry(s.demand_index).or_default().push(s);
    }
    let mut penalty = 0.0;
    for (di, sessions) in by_demand {
        let Some(demand) = demands.get(di) else { continue };
        if demand.units > 2 && sessions.len() == 1 {
            penalty += 1.0;
        }
        if sessions.len() > 1 && sessions.iter().all(|s| s.day == sessions[0].day) {
            penalty += 1.0;
        }
    }
    penalty
}

fn units_coverage_deviation(individual: &[ScheduledSession], demands: &[CourseDemand]) -> f64 {
    let mut by_demand: HashMap<usize, f64> = HashMap::new();
    for s in individual {
        *by_demand.entry(s.demand_index).or_insert(0.0) += s.duration_hours();
    }
    demands
        .iter()
        .enumerate()
        .map(|(di, d)| (by_demand.get(&di).copied().unwrap_or(0.0) - d.units as f64).abs())
        .sum()
}

fn has_expected_session_counts(individual: &[ScheduledSession], sessions_by_demand: &[Vec<f64>]) -> bool {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for s in individual {
        *counts.entry(s.demand_index).or_insert(0) += 1;
    }
    sessions_by_demand.iter().enumerate().all(|(di, durations)| counts.get(&di).copied().unwrap_or(0) == durations.len())
}

/// Greedy fallback: first-fit placement with no repair, used when the GA
/// loop itself could not produce any individual at all (spec.md §4.7).
pub fn greedy_fallback(demands: &[CourseDemand], rooms: &[Room], config: &SolveConfig) -> Result<Individual, SolveError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let catalog = window::generate_catalog(&mut rng);
    let sessions_by_demand: Vec<Vec<f64>> =
        demands.iter().map(|d| sessions::decompose(d.units as f64, d.employment_type)).collect();
    let instructor_roster = crate::model::derive_instructors(demands);
    let individual = seed_individual(demands, &sessions_by_demand, &catalog, rooms, &instructor_roster, &mut rng);
    if individual.is_empty() {
        return Err(SolveError::GaExhausted);
    }
    Ok(individual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EmploymentType, SessionType};

    fn demand(name: &str, code: &str, units: i32) -> CourseDemand {
        CourseDemand {
            instructor_name: name.into(),
            course_code: code.into(),
            subject: "Subject".into(),
            units,
            year_level: "1".into(),
            block: "A".into(),
            employment_type: EmploymentType::FullTime,
            dept: "CS".into(),
            session_type: SessionType::NonLab,
        }
    }

    fn rooms() -> Vec<Room> {
        vec![
            Room { room_id: 1, room_name: "R1".into(), capacity: 40, is_lab: false, is_active: true },
            Room { room_id: 2, room_name: "R2".into(), capacity: 40, is_lab: false, is_active: true },
        ]
    }

    #[test]
    fn solves_a_small_problem_and_runs_at_least_one_generation() {
        let demands = vec![demand("Alice", "CS101", 3), demand("Bob", "CS102", 3)];
        let config = SolveConfig::builder().seed(99).build();
        let (individual, fitness_value, generations) = solve(&demands, &rooms(), &config).expect("ga should produce a result");
        assert!(!individual.is_empty());
        assert!(fitness_value.is_finite());
        assert!(generations >= 1);
    }

    #[test]
    fn greedy_fallback_places_every_demand_at_least_once() {
        let demands = vec![demand("Alice", "CS101", 3)];
        let config = SolveConfig::default();
        let individual = greedy_fallback(&demands, &rooms(), &config).expect("fallback should place something");
        assert!(individual.iter().any(|s| s.demand_index == 0));
    }
}
