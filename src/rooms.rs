//! Room suitability (C4) and the post-hoc conflict-free room assigner (C6).

use std::collections::HashMap;

use crate::model::{time::ranges_overlap, Day, Room};

/// `clamp(20, units * 10, 50)` — the estimated headcount for a course.
pub fn estimated_students(units: i32) -> i32 {
    (units * 10).clamp(20, 50)
}

/// Whether `room` can legally host a session of `units` hours that does or
/// does not require a lab. Both directions of lab exclusivity are enforced:
/// a lab session must land in a lab room and vice versa.
pub fn is_suitable(room: &Room, units: i32, requires_lab: bool) -> bool {
    if !room.is_active {
        return false;
    }
    if room.is_lab != requires_lab {
        return false;
    }
    let estimated = estimated_students(units) as f64;
    room.capacity as f64 >= 0.8 * estimated
}

/// Greedy, conflict-free room assignment shared by the CP and GA paths.
/// Tracks per-room usage so repeated calls balance load across rooms, and
/// round-robins among comparably-scored candidates via a persistent pointer.
pub struct RoomAssigner<'a> {
    rooms: &'a [Room],
    total_uses: HashMap<i64, u32>,
    day_uses: HashMap<(i64, String), u32>,
    placements: Vec<(i64, String, String, String)>, // room_id, day name, start, end
    rr_pointer: usize,
}

impl<'a> RoomAssigner<'a> {
    pub fn new(rooms: &'a [Room]) -> Self {
        RoomAssigner {
            rooms,
            total_uses: HashMap::new(),
            day_uses: HashMap::new(),
            placements: Vec::new(),
            rr_pointer: 0,
        }
    }

    fn is_available(&self, room_id: i64, day: &Day, start: &str, end: &str) -> bool {
        let (Some(s1), Some(e1)) = (crate::model::time::parse_hms(start), crate::model::time::parse_hms(end)) else {
            return true;
        };
        !self.placements.iter().any(|(rid, d, s, e)| {
            if *rid != room_id || d != day.name() {
                return false;
            }
            let (Some(s2), Some(e2)) = (crate::model::time::parse_hms(s), crate::model::time::parse_hms(e)) else {
                return false;
            };
            ranges_overlap(s1, e1, s2, e2)
        })
    }

    fn score(&self, room: &Room, day: &Day) -> f64 {
        let total = *self.total_uses.get(&room.room_id).unwrap_or(&0) as f64;
        let on_day = *self.day_uses.get(&(room.room_id, day.name().to_string())).unwrap_or(&0) as f64;
        (100.0 - total) + (50.0 - on_day) + 20.0 * (room.capacity as f64 / 50.0).min(1.0)
    }

    fn right_lab_class(&self, requires_lab: bool) -> Vec<&'a Room> {
        self.rooms.iter().filter(|r| r.is_active && r.is_lab == requires_lab).collect()
    }

    /// Assign a room for a session of the given shape, or `None` if no room
    /// of the right lab-class exists at all (surfaced upstream as a
    /// lab-shortage warning, per spec.md §4.4).
    pub fn assign(&mut self, units: i32, requires_lab: bool, day: &Day, start: &str, end: &str) -> Option<i64> {
        let suitable: Vec<&Room> =
            self.rooms.iter().filter(|r| is_suitable(r, units, requires_lab)).collect();

        let candidates: Vec<&Room> = if suitable.is_empty() {
            self.right_lab_class(requires_lab).into_iter().take(3).collect()
        } else {
            suitable
        };

        if candidates.is_empty() {
            return None;
        }

        let mut available: Vec<&Room> =
            candidates.iter().copied().filter(|r| self.is_available(r.room_id, day, start, end)).collect();

        if available.is_empty() {
            available = self.right_lab_class(requires_lab).into_iter().take(1).collect();
            if available.is_empty() {
                return None;
            }
        }

        available.sort_by(|a, b| self.score(b, day).partial_cmp(&self.score(a, day)).unwrap());
        let top = &available[..available.len().min(3)];
        let chosen = top[self.rr_pointer % top.len()];
        self.rr_pointer += 1;

        *self.total_uses.entry(chosen.room_id).or_insert(0) += 1;
        *self.day_uses.entry((chosen.room_id, day.name().to_string())).or_insert(0) += 1;
        self.placements.push((chosen.room_id, day.name().to_string(), start.to_string(), end.to_string()));

        Some(chosen.room_id)
    }
}
