// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Five-step greedy construction of a near-feasible starting roster.
//!
//! 1. Pre-assigned leave.
//! 2. Weekend cover, preferring employees with the fewest weekends worked.
//! 3. The first four weekdays, preferring the lowest workload.
//! 4. The remaining weekdays, tie-breaking on (current work streak, workload).
//! 5. Hour top-up for employees below their minimum minutes.
//!
//! Best-effort: the result is a good starting point, not necessarily
//! feasible.

use nurse_roster_model::common::{DAY_OFF, complete_weekends, is_weekend, weekend_of};
use nurse_roster_model::prelude::{Instance, Schedule};

/// Shifts shorter than this never help the hour top-up unless the deficit
/// itself is smaller.
const TOP_UP_FLOOR_MINUTES: u64 = 60;

#[derive(Debug, Clone, Copy)]
pub struct GreedyOpening<'a> {
    instance: &'a Instance,
}

impl<'a> GreedyOpening<'a> {
    #[inline]
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    pub fn generate(&self) -> Schedule {
        let instance = self.instance;
        let mut schedule = Schedule::new(
            instance.num_employees(),
            instance.horizon(),
            instance.num_shift_types(),
        );

        self.assign_annual_leave(&mut schedule);
        self.assign_weekends(&mut schedule);
        self.assign_weekdays(&mut schedule, 0, 4.min(instance.horizon()), false);
        self.assign_weekdays(&mut schedule, 4.min(instance.horizon()), instance.horizon(), true);
        self.top_up_hours(&mut schedule);

        tracing::debug!(
            "greedy opening placed {} assignments",
            (0..instance.num_employees())
                .map(|e| instance.horizon() - schedule.shift_count(e, DAY_OFF) as usize)
                .sum::<usize>()
        );
        schedule
    }

    fn assign_annual_leave(&self, schedule: &mut Schedule) {
        for employee in 0..self.instance.num_employees() {
            for &day in self.instance.days_off(employee) {
                schedule.set(employee, day, DAY_OFF);
            }
        }
    }

    fn assign_weekends(&self, schedule: &mut Schedule) {
        let instance = self.instance;
        for weekend in 0..complete_weekends(instance.horizon()) {
            let saturday = weekend * 7 + 5;
            for day in [saturday, saturday + 1] {
                for shift in 1..=instance.num_shift_types() {
                    let required = instance.cover_requirement(day, shift);
                    while schedule.coverage(day, shift) < required {
                        let candidate = (0..instance.num_employees())
                            .filter(|&e| self.can_assign(schedule, e, day, shift))
                            .min_by_key(|&e| schedule.worked_weekends(e));
                        let Some(employee) = candidate else { break };
                        schedule.set(employee, day, shift);
                    }
                }
            }
        }
    }

    fn assign_weekdays(
        &self,
        schedule: &mut Schedule,
        from_day: usize,
        to_day: usize,
        streak_tie_break: bool,
    ) {
        let instance = self.instance;
        for day in from_day..to_day {
            if is_weekend(day) {
                continue;
            }
            for shift in self.under_covered_shifts(schedule, day) {
                let required = instance.cover_requirement(day, shift);
                while schedule.coverage(day, shift) < required {
                    let candidate = (0..instance.num_employees())
                        .filter(|&e| self.can_assign(schedule, e, day, shift))
                        .min_by_key(|&e| {
                            let minutes = schedule.total_minutes(e, instance.minutes_table());
                            if streak_tie_break {
                                (work_streak_before(schedule, e, day), minutes)
                            } else {
                                (0, minutes)
                            }
                        });
                    let Some(employee) = candidate else { break };
                    schedule.set(employee, day, shift);
                }
            }
        }
    }

    fn top_up_hours(&self, schedule: &mut Schedule) {
        let instance = self.instance;
        for employee in 0..instance.num_employees() {
            let minimum = instance.staff_at(employee).min_total_minutes() as u64;
            let worked = schedule.total_minutes(employee, instance.minutes_table());
            if worked >= minimum {
                continue;
            }
            let mut remaining = minimum - worked;

            for day in 0..instance.horizon() {
                if remaining == 0 {
                    break;
                }
                if schedule.get(employee, day) != DAY_OFF || instance.is_blocked(employee, day) {
                    continue;
                }
                for shift in 1..=instance.num_shift_types() {
                    let minutes = instance.shift_minutes(shift) as u64;
                    if minutes < remaining.min(TOP_UP_FLOOR_MINUTES) {
                        continue;
                    }
                    if self.can_assign(schedule, employee, day, shift) {
                        schedule.set(employee, day, shift);
                        remaining = remaining.saturating_sub(minutes);
                        break;
                    }
                }
            }
        }
    }

    /// Shifts still short of their requirement on `day`, worst deficit
    /// first.
    fn under_covered_shifts(&self, schedule: &Schedule, day: usize) -> Vec<usize> {
        let instance = self.instance;
        let mut shifts: Vec<usize> = (1..=instance.num_shift_types())
            .filter(|&s| schedule.coverage(day, s) < instance.cover_requirement(day, s))
            .collect();
        shifts.sort_by_key(|&s| {
            -(instance.cover_requirement(day, s) as i64 - schedule.coverage(day, s) as i64)
        });
        shifts
    }

    /// Legality of placing (employee, day, shift) given the construction
    /// state so far: not blocked, cell free, rotation-safe against both
    /// neighbouring days, and within the consecutive / minutes / weekend
    /// limits.
    fn can_assign(&self, schedule: &Schedule, employee: usize, day: usize, shift: usize) -> bool {
        let instance = self.instance;
        if instance.is_blocked(employee, day) || schedule.get(employee, day) != DAY_OFF {
            return false;
        }
        if instance.shift_cap(employee, shift) == Some(0) {
            return false;
        }

        if day > 0 && instance.is_forbidden_succession(schedule.get(employee, day - 1), shift) {
            return false;
        }
        if instance.is_forbidden_succession(shift, schedule.get(employee, day + 1)) {
            return false;
        }

        let staff = instance.staff_at(employee);
        let run = work_streak_before(schedule, employee, day)
            + 1
            + schedule.consecutive_working(employee, day + 1);
        if run as u32 > staff.max_consecutive_shifts() {
            return false;
        }

        let minutes = schedule.total_minutes(employee, instance.minutes_table())
            + instance.shift_minutes(shift) as u64;
        if minutes > staff.max_total_minutes() as u64 {
            return false;
        }

        if is_weekend(day)
            && !schedule.works_weekend(employee, weekend_of(day))
            && schedule.worked_weekends(employee) >= staff.max_weekends()
        {
            return false;
        }

        true
    }
}

/// Length of the work run ending on the day before `day`.
fn work_streak_before(schedule: &Schedule, employee: usize, day: usize) -> usize {
    let mut streak = 0;
    let mut d = day;
    while d > 0 && schedule.get(employee, d - 1) != DAY_OFF {
        streak += 1;
        d -= 1;
    }
    streak
}
