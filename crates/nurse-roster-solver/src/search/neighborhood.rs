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

//! Candidate-move generation.
//!
//! While the roster is infeasible the sampler is biased towards two
//! repair-directed generators (workload rebalancing and work-run
//! consolidation); otherwise moves are drawn uniformly from the five kinds.
//! Every targeted generator falls back to a random `Change` when it finds
//! nothing to repair.

use crate::search::moves::Move;
use nurse_roster_model::common::DAY_OFF;
use nurse_roster_model::prelude::{Instance, Schedule};
use rand::Rng;

const DEFAULT_BLOCK_SIZE: usize = 2;
const REPAIR_BIAS_PERCENT: u32 = 40;

#[derive(Debug, Clone, Copy)]
pub struct Neighborhood<'a> {
    instance: &'a Instance,
}

impl<'a> Neighborhood<'a> {
    #[inline]
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// One candidate move for the current roster. `current_hard` is the
    /// cached hard score; a negative value engages the repair bias.
    pub fn random_move<R: Rng>(
        &self,
        schedule: &Schedule,
        current_hard: i64,
        rng: &mut R,
    ) -> Move {
        if current_hard < 0 {
            let roll = rng.random_range(0..100);
            if roll < REPAIR_BIAS_PERCENT {
                if let Some(mv) = self.rebalance_workload(schedule, rng) {
                    return mv;
                }
                return self.random_change(schedule, rng);
            } else if roll < 2 * REPAIR_BIAS_PERCENT {
                if let Some(mv) = self.consolidate_work(schedule) {
                    return mv;
                }
                return self.random_change(schedule, rng);
            }
            // Remaining 20%: fall through to the uniform mix.
        }

        match rng.random_range(0..5) {
            0 => self.random_change(schedule, rng),
            1 => self.random_swap(schedule, rng),
            2 => self.random_block_swap(schedule, rng),
            3 => self.random_ruin(schedule, rng),
            _ => self.fix_shift_rotation(schedule, rng),
        }
    }

    pub fn random_change<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Move {
        Move::Change {
            employee: rng.random_range(0..schedule.employees()),
            day: rng.random_range(0..schedule.horizon()),
            new_shift: rng.random_range(0..=schedule.num_shifts()),
        }
    }

    pub fn random_swap<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Move {
        Move::Swap {
            employee1: rng.random_range(0..schedule.employees()),
            day1: rng.random_range(0..schedule.horizon()),
            employee2: rng.random_range(0..schedule.employees()),
            day2: rng.random_range(0..schedule.horizon()),
        }
    }

    pub fn random_block_swap<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Move {
        // Latest start that still fits a whole block; clamped by the
        // evaluator when the horizon is shorter than the block.
        let starts = schedule.horizon().saturating_sub(DEFAULT_BLOCK_SIZE) + 1;
        Move::BlockSwap {
            employee1: rng.random_range(0..schedule.employees()),
            employee2: rng.random_range(0..schedule.employees()),
            start_day: rng.random_range(0..starts),
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }

    pub fn random_ruin<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Move {
        Move::RuinAndRecreate {
            employee: rng.random_range(0..schedule.employees()),
        }
    }

    /// Targets a forbidden-successor violation and proposes clearing its
    /// second day. Falls back to a random change on clean rosters.
    pub fn fix_shift_rotation<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Move {
        let mut violations = Vec::new();
        for employee in 0..schedule.employees() {
            for day in 0..schedule.horizon().saturating_sub(1) {
                let current = schedule.get(employee, day);
                let next = schedule.get(employee, day + 1);
                if self.instance.is_forbidden_succession(current, next) {
                    violations.push((employee, day + 1));
                }
            }
        }
        if violations.is_empty() {
            return self.random_change(schedule, rng);
        }
        let (employee, day) = violations[rng.random_range(0..violations.len())];
        Move::FixShiftRotation {
            employee,
            day,
            new_shift: DAY_OFF,
        }
    }

    /// Hands one working day from an employee over their maximum minutes to
    /// one under their minimum, provided the receiver may work that shift
    /// type on that day.
    pub fn rebalance_workload<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Option<Move> {
        let minutes = self.instance.minutes_table();
        let mut overworked = Vec::new();
        let mut underworked = Vec::new();
        for employee in 0..schedule.employees() {
            let staff = self.instance.staff_at(employee);
            let total = schedule.total_minutes(employee, minutes);
            if total > staff.max_total_minutes() as u64 {
                overworked.push(employee);
            } else if total < staff.min_total_minutes() as u64 {
                underworked.push(employee);
            }
        }
        if overworked.is_empty() || underworked.is_empty() {
            return None;
        }

        let over = overworked[rng.random_range(0..overworked.len())];
        let under = underworked[rng.random_range(0..underworked.len())];

        let mut candidate_days = Vec::new();
        for day in 0..schedule.horizon() {
            let shift = schedule.get(over, day);
            if shift == DAY_OFF || schedule.get(under, day) != DAY_OFF {
                continue;
            }
            if self.instance.shift_cap(under, shift) == Some(0) {
                continue;
            }
            if self.instance.is_blocked(under, day) {
                continue;
            }
            candidate_days.push(day);
        }
        let day = *candidate_days.get(rng.random_range(0..candidate_days.len().max(1)))?;

        Some(Move::Swap {
            employee1: over,
            day1: day,
            employee2: under,
            day2: day,
        })
    }

    /// Finds a work run shorter than the employee's minimum and swaps its
    /// first day with a day off that touches other work.
    pub fn consolidate_work(&self, schedule: &Schedule) -> Option<Move> {
        for employee in 0..schedule.employees() {
            let min_run = self.instance.staff_at(employee).min_consecutive_shifts();
            let mut day = 0;
            while day < schedule.horizon() {
                if schedule.get(employee, day) == DAY_OFF {
                    day += 1;
                    continue;
                }
                let run = schedule.consecutive_working(employee, day);
                if (run as u32) < min_run {
                    let run_end = day + run;
                    for target in 0..schedule.horizon() {
                        if schedule.get(employee, target) != DAY_OFF {
                            continue;
                        }
                        // Ignore slots hugging the short run itself.
                        if target + 1 == day || target == run_end {
                            continue;
                        }
                        let before_works =
                            target > 0 && schedule.get(employee, target - 1) != DAY_OFF;
                        let after_works = target + 1 < schedule.horizon()
                            && schedule.get(employee, target + 1) != DAY_OFF;
                        if before_works || after_works {
                            return Some(Move::Swap {
                                employee1: employee,
                                day1: day,
                                employee2: employee,
                                day2: target,
                            });
                        }
                    }
                }
                day += run;
            }
        }
        None
    }

    /// Shakes the roster by rewriting `⌊rate · N · D⌋` random cells in
    /// place. The caller must reset its incremental evaluator afterwards.
    pub fn perturb<R: Rng>(&self, schedule: &mut Schedule, rate: f64, rng: &mut R) {
        let cells = (schedule.employees() * schedule.horizon()) as f64;
        let rewrites = (cells * rate).floor() as usize;
        for _ in 0..rewrites {
            let employee = rng.random_range(0..schedule.employees());
            let day = rng.random_range(0..schedule.horizon());
            let shift = rng.random_range(0..=schedule.num_shifts());
            schedule.set(employee, day, shift);
        }
    }
}
