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

//! Soft-constraint families: shift-on requests (reward), shift-off requests
//! (penalty) and coverage (penalty on both under- and over-staffing).
//!
//! Requests decompose per employee; coverage is intrinsically day-scoped and
//! instead offers an O(1) per-(day, shift) delta for move evaluation.

use nurse_roster_model::common::DAY_OFF;
use nurse_roster_model::prelude::{Instance, Schedule};

#[derive(Debug, Clone, Copy)]
pub struct SoftConstraints<'a> {
    instance: &'a Instance,
}

impl<'a> SoftConstraints<'a> {
    #[inline]
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    #[inline]
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub fn shift_on_requests(&self, schedule: &Schedule) -> i64 {
        (0..self.instance.num_employees())
            .map(|e| self.shift_on_requests_for(schedule, e))
            .sum()
    }

    pub fn shift_on_requests_for(&self, schedule: &Schedule, employee: usize) -> i64 {
        let mut score = 0;
        for req in self.instance.on_requests_of(employee) {
            if schedule.get(employee, req.day) == req.shift {
                score += req.weight;
            }
        }
        score
    }

    pub fn shift_off_requests(&self, schedule: &Schedule) -> i64 {
        (0..self.instance.num_employees())
            .map(|e| self.shift_off_requests_for(schedule, e))
            .sum()
    }

    pub fn shift_off_requests_for(&self, schedule: &Schedule, employee: usize) -> i64 {
        let mut score = 0;
        for req in self.instance.off_requests_of(employee) {
            if schedule.get(employee, req.day) == req.shift {
                score -= req.weight;
            }
        }
        score
    }

    pub fn coverage(&self, schedule: &Schedule) -> i64 {
        let mut score = 0;
        for cover in self.instance.cover_requirements() {
            let actual = schedule.coverage(cover.day, cover.shift);
            score += coverage_contribution(
                actual,
                cover.requirement,
                cover.weight_under,
                cover.weight_over,
            );
        }
        score
    }

    /// Soft-score change when the cell on `day` moves from `old_shift` to
    /// `new_shift`: only the two affected (day, shift) coverage counters can
    /// shift, each by one.
    pub fn coverage_delta(
        &self,
        schedule: &Schedule,
        day: usize,
        old_shift: usize,
        new_shift: usize,
    ) -> i64 {
        if old_shift == new_shift {
            return 0;
        }
        let mut delta = 0;
        if old_shift != DAY_OFF
            && let Some(cover) = self.instance.cover_at(day, old_shift)
        {
            let actual = schedule.coverage(day, old_shift);
            delta += coverage_contribution(
                actual.saturating_sub(1),
                cover.requirement,
                cover.weight_under,
                cover.weight_over,
            ) - coverage_contribution(
                actual,
                cover.requirement,
                cover.weight_under,
                cover.weight_over,
            );
        }
        if new_shift != DAY_OFF
            && let Some(cover) = self.instance.cover_at(day, new_shift)
        {
            let actual = schedule.coverage(day, new_shift);
            delta += coverage_contribution(
                actual + 1,
                cover.requirement,
                cover.weight_under,
                cover.weight_over,
            ) - coverage_contribution(
                actual,
                cover.requirement,
                cover.weight_under,
                cover.weight_over,
            );
        }
        delta
    }

    /// Requests only; coverage has no per-employee projection.
    pub fn evaluate_employee(&self, schedule: &Schedule, employee: usize) -> i64 {
        self.shift_on_requests_for(schedule, employee)
            + self.shift_off_requests_for(schedule, employee)
    }

    pub fn evaluate_all(&self, schedule: &Schedule) -> i64 {
        self.shift_on_requests(schedule) + self.shift_off_requests(schedule) + self.coverage(schedule)
    }
}

#[inline]
fn coverage_contribution(actual: u32, required: u32, weight_under: i64, weight_over: i64) -> i64 {
    if actual > required {
        -((actual - required) as i64) * weight_over.abs()
    } else if actual < required {
        -((required - actual) as i64) * weight_under.abs()
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nurse_roster_model::prelude::{InstanceBuilder, ShiftType, Staff};

    fn instance() -> Instance {
        let mut b = InstanceBuilder::new();
        b.horizon(7)
            .add_shift(ShiftType::new("D", 480))
            .add_shift(ShiftType::new("N", 480))
            .add_staff(Staff::new("A"))
            .add_staff(Staff::new("B"))
            .add_staff(Staff::new("C"))
            .add_shift_on_request("A", 2, "D", 3)
            .add_shift_on_request("B", 2, "D", 5)
            .add_shift_off_request("A", 4, "N", 7)
            .add_cover(0, "D", 2, 10, 5);
        b.build().unwrap()
    }

    fn schedule(inst: &Instance) -> Schedule {
        Schedule::new(inst.num_employees(), inst.horizon(), inst.num_shift_types())
    }

    #[test]
    fn test_on_requests_reward_only_exact_matches() {
        let inst = instance();
        let soft = SoftConstraints::new(&inst);
        let mut s = schedule(&inst);
        assert_eq!(soft.shift_on_requests(&s), 0);

        s.set(0, 2, 1); // A gets the wanted day shift
        assert_eq!(soft.shift_on_requests_for(&s, 0), 3);
        s.set(1, 2, 2); // B works, but the wrong shift
        assert_eq!(soft.shift_on_requests_for(&s, 1), 0);
        assert_eq!(soft.shift_on_requests(&s), 3);
    }

    #[test]
    fn test_off_requests_penalise_matches() {
        let inst = instance();
        let soft = SoftConstraints::new(&inst);
        let mut s = schedule(&inst);
        s.set(0, 4, 2); // A assigned the unwanted night
        assert_eq!(soft.shift_off_requests_for(&s, 0), -7);
        s.set(0, 4, 1); // different shift: no penalty
        assert_eq!(soft.shift_off_requests_for(&s, 0), 0);
    }

    #[test]
    fn test_coverage_under_and_over() {
        let inst = instance();
        let soft = SoftConstraints::new(&inst);
        let mut s = schedule(&inst);
        // Nobody covers (0, D), requirement 2 -> -2 * 10.
        assert_eq!(soft.coverage(&s), -20);

        s.set(0, 0, 1);
        assert_eq!(soft.coverage(&s), -10);
        s.set(1, 0, 1);
        assert_eq!(soft.coverage(&s), 0);
        s.set(2, 0, 1);
        assert_eq!(soft.coverage(&s), -5);
    }

    #[test]
    fn test_coverage_delta_matches_full_reevaluation() {
        let inst = instance();
        let soft = SoftConstraints::new(&inst);
        let mut s = schedule(&inst);
        s.set(0, 0, 1);

        // Adding a second assignment on (0, D) with coverage 1 is worth +10.
        let delta = soft.coverage_delta(&s, 0, DAY_OFF, 1);
        assert_eq!(delta, 10);

        let before = soft.coverage(&s);
        s.set(1, 0, 1);
        let after = soft.coverage(&s);
        assert_eq!(after - before, delta);

        // Removing one back down is the mirror image.
        let delta_down = soft.coverage_delta(&s, 0, 1, DAY_OFF);
        assert_eq!(delta_down, -10);

        // Swapping between two uncovered shifts changes nothing.
        assert_eq!(soft.coverage_delta(&s, 3, DAY_OFF, 2), 0);
        assert_eq!(soft.coverage_delta(&s, 0, 1, 1), 0);
    }

    #[test]
    fn test_per_employee_excludes_coverage() {
        let inst = instance();
        let soft = SoftConstraints::new(&inst);
        let mut s = schedule(&inst);
        s.set(0, 2, 1);
        let per_employee: i64 = (0..inst.num_employees())
            .map(|e| soft.evaluate_employee(&s, e))
            .sum();
        assert_eq!(per_employee, 3);
        assert_eq!(soft.evaluate_all(&s), per_employee + soft.coverage(&s));
    }
}
