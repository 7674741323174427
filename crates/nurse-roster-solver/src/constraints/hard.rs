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

//! Hard-constraint families.
//!
//! Every family returns a non-positive penalty (0 = satisfied) and offers a
//! per-employee entry point whose sum over all employees equals the batch
//! result. A roster is feasible iff the aggregate penalty is 0.
//!
//! The penalty scale (10 / 50 / 60 / 100 / 1000) defines a total order on
//! infeasibility severity: pre-assigned leave dominates, rotation and
//! weekend caps outrank run-length violations, working time and type caps
//! are cheap.

use nurse_roster_model::common::DAY_OFF;
use nurse_roster_model::prelude::{Instance, Schedule};

const MAX_SHIFTS_PENALTY: i64 = 10;
const WORKING_TIME_PENALTY: i64 = 10;
const MAX_CONSECUTIVE_PENALTY: i64 = 10;
const MIN_CONSECUTIVE_PENALTY: i64 = 50;
const MIN_DAYS_OFF_PENALTY: i64 = 60;
const MAX_WEEKENDS_PENALTY: i64 = 100;
const PRE_ASSIGNED_PENALTY: i64 = 1000;
const ROTATION_PENALTY: i64 = 100;

/// One weight-vector slot per hard-constraint family. `OneShiftPerDay` is
/// structural (one value per matrix cell) and always evaluates to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintFamily {
    OneShiftPerDay,
    MaxShiftsPerType,
    WorkingTime,
    MaxConsecutiveShifts,
    MinConsecutiveShifts,
    MinConsecutiveDaysOff,
    MaxWeekends,
    PreAssignedDaysOff,
    ShiftRotation,
}

impl ConstraintFamily {
    pub const ALL: [ConstraintFamily; 9] = [
        ConstraintFamily::OneShiftPerDay,
        ConstraintFamily::MaxShiftsPerType,
        ConstraintFamily::WorkingTime,
        ConstraintFamily::MaxConsecutiveShifts,
        ConstraintFamily::MinConsecutiveShifts,
        ConstraintFamily::MinConsecutiveDaysOff,
        ConstraintFamily::MaxWeekends,
        ConstraintFamily::PreAssignedDaysOff,
        ConstraintFamily::ShiftRotation,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            ConstraintFamily::OneShiftPerDay => "OneShiftPerDay",
            ConstraintFamily::MaxShiftsPerType => "MaxShiftsPerType",
            ConstraintFamily::WorkingTime => "WorkingTime",
            ConstraintFamily::MaxConsecutiveShifts => "MaxConsecutiveShifts",
            ConstraintFamily::MinConsecutiveShifts => "MinConsecutiveShifts",
            ConstraintFamily::MinConsecutiveDaysOff => "MinConsecutiveDaysOff",
            ConstraintFamily::MaxWeekends => "MaxWeekends",
            ConstraintFamily::PreAssignedDaysOff => "PreAssignedDaysOff",
            ConstraintFamily::ShiftRotation => "ShiftRotation",
        }
    }
}

impl std::fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HardConstraints<'a> {
    instance: &'a Instance,
}

impl<'a> HardConstraints<'a> {
    #[inline]
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    #[inline]
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Structural: the matrix holds exactly one value per (employee, day).
    #[inline]
    pub fn one_shift_per_day(&self, _schedule: &Schedule) -> i64 {
        0
    }

    pub fn max_shifts_per_type(&self, schedule: &Schedule) -> i64 {
        (0..self.instance.num_employees())
            .map(|e| self.max_shifts_per_type_for(schedule, e))
            .sum()
    }

    pub fn max_shifts_per_type_for(&self, schedule: &Schedule, employee: usize) -> i64 {
        let mut penalty = 0;
        for shift in 1..=self.instance.num_shift_types() {
            if let Some(cap) = self.instance.shift_cap(employee, shift) {
                let count = schedule.shift_count(employee, shift);
                if count > cap {
                    penalty -= MAX_SHIFTS_PENALTY * (count - cap) as i64;
                }
            }
        }
        penalty
    }

    pub fn working_time(&self, schedule: &Schedule) -> i64 {
        (0..self.instance.num_employees())
            .map(|e| self.working_time_for(schedule, e))
            .sum()
    }

    pub fn working_time_for(&self, schedule: &Schedule, employee: usize) -> i64 {
        let staff = self.instance.staff_at(employee);
        let total = schedule.total_minutes(employee, self.instance.minutes_table());
        let mut penalty = 0;
        if total > staff.max_total_minutes() as u64 {
            penalty -= WORKING_TIME_PENALTY;
        }
        if total < staff.min_total_minutes() as u64 {
            penalty -= WORKING_TIME_PENALTY;
        }
        penalty
    }

    pub fn max_consecutive_shifts(&self, schedule: &Schedule) -> i64 {
        (0..self.instance.num_employees())
            .map(|e| self.max_consecutive_shifts_for(schedule, e))
            .sum()
    }

    pub fn max_consecutive_shifts_for(&self, schedule: &Schedule, employee: usize) -> i64 {
        let max = self.instance.staff_at(employee).max_consecutive_shifts();
        let mut penalty = 0;
        let mut run = 0u32;
        for day in 0..schedule.horizon() {
            if schedule.get(employee, day) != DAY_OFF {
                run += 1;
                if run > max {
                    penalty -= MAX_CONSECUTIVE_PENALTY;
                }
            } else {
                run = 0;
            }
        }
        penalty
    }

    pub fn min_consecutive_shifts(&self, schedule: &Schedule) -> i64 {
        (0..self.instance.num_employees())
            .map(|e| self.min_consecutive_shifts_for(schedule, e))
            .sum()
    }

    pub fn min_consecutive_shifts_for(&self, schedule: &Schedule, employee: usize) -> i64 {
        let min = self.instance.staff_at(employee).min_consecutive_shifts();
        let mut penalty = 0;
        let mut run = 0u32;
        for day in 0..schedule.horizon() {
            if schedule.get(employee, day) != DAY_OFF {
                run += 1;
            } else {
                if run > 0 && run < min {
                    penalty -= MIN_CONSECUTIVE_PENALTY;
                }
                run = 0;
            }
        }
        if run > 0 && run < min {
            penalty -= MIN_CONSECUTIVE_PENALTY;
        }
        penalty
    }

    pub fn min_consecutive_days_off(&self, schedule: &Schedule) -> i64 {
        (0..self.instance.num_employees())
            .map(|e| self.min_consecutive_days_off_for(schedule, e))
            .sum()
    }

    pub fn min_consecutive_days_off_for(&self, schedule: &Schedule, employee: usize) -> i64 {
        let min = self.instance.staff_at(employee).min_consecutive_days_off();
        let mut penalty = 0;
        let mut run = 0u32;
        for day in 0..schedule.horizon() {
            if schedule.get(employee, day) == DAY_OFF {
                run += 1;
            } else {
                if run > 0 && run < min {
                    penalty -= MIN_DAYS_OFF_PENALTY;
                }
                run = 0;
            }
        }
        if run > 0 && run < min {
            penalty -= MIN_DAYS_OFF_PENALTY;
        }
        penalty
    }

    pub fn max_weekends(&self, schedule: &Schedule) -> i64 {
        (0..self.instance.num_employees())
            .map(|e| self.max_weekends_for(schedule, e))
            .sum()
    }

    /// Penalises the whole worked-weekend count, not just the excess: a
    /// breach gets costlier the more weekends the employee already works.
    pub fn max_weekends_for(&self, schedule: &Schedule, employee: usize) -> i64 {
        let max = self.instance.staff_at(employee).max_weekends();
        let worked = schedule.worked_weekends(employee);
        if worked > max {
            -MAX_WEEKENDS_PENALTY * worked as i64
        } else {
            0
        }
    }

    pub fn pre_assigned_days_off(&self, schedule: &Schedule) -> i64 {
        (0..self.instance.num_employees())
            .map(|e| self.pre_assigned_days_off_for(schedule, e))
            .sum()
    }

    pub fn pre_assigned_days_off_for(&self, schedule: &Schedule, employee: usize) -> i64 {
        let mut penalty = 0;
        for &day in self.instance.days_off(employee) {
            if schedule.get(employee, day) != DAY_OFF {
                penalty -= PRE_ASSIGNED_PENALTY;
            }
        }
        penalty
    }

    pub fn shift_rotation(&self, schedule: &Schedule) -> i64 {
        (0..self.instance.num_employees())
            .map(|e| self.shift_rotation_for(schedule, e))
            .sum()
    }

    pub fn shift_rotation_for(&self, schedule: &Schedule, employee: usize) -> i64 {
        let mut penalty = 0;
        let horizon = schedule.horizon();
        for day in 0..horizon.saturating_sub(1) {
            let current = schedule.get(employee, day);
            let next = schedule.get(employee, day + 1);
            if self.instance.is_forbidden_succession(current, next) {
                penalty -= ROTATION_PENALTY;
            }
        }
        penalty
    }

    #[inline]
    pub fn family(&self, family: ConstraintFamily, schedule: &Schedule) -> i64 {
        (0..self.instance.num_employees())
            .map(|e| self.family_for(family, schedule, e))
            .sum()
    }

    pub fn family_for(
        &self,
        family: ConstraintFamily,
        schedule: &Schedule,
        employee: usize,
    ) -> i64 {
        match family {
            ConstraintFamily::OneShiftPerDay => 0,
            ConstraintFamily::MaxShiftsPerType => self.max_shifts_per_type_for(schedule, employee),
            ConstraintFamily::WorkingTime => self.working_time_for(schedule, employee),
            ConstraintFamily::MaxConsecutiveShifts => {
                self.max_consecutive_shifts_for(schedule, employee)
            }
            ConstraintFamily::MinConsecutiveShifts => {
                self.min_consecutive_shifts_for(schedule, employee)
            }
            ConstraintFamily::MinConsecutiveDaysOff => {
                self.min_consecutive_days_off_for(schedule, employee)
            }
            ConstraintFamily::MaxWeekends => self.max_weekends_for(schedule, employee),
            ConstraintFamily::PreAssignedDaysOff => {
                self.pre_assigned_days_off_for(schedule, employee)
            }
            ConstraintFamily::ShiftRotation => self.shift_rotation_for(schedule, employee),
        }
    }

    /// Per-family penalties for one employee, indexed by
    /// [`ConstraintFamily::index`].
    pub fn employee_family_scores(
        &self,
        schedule: &Schedule,
        employee: usize,
    ) -> [i64; ConstraintFamily::COUNT] {
        let mut scores = [0i64; ConstraintFamily::COUNT];
        for family in ConstraintFamily::ALL {
            scores[family.index()] = self.family_for(family, schedule, employee);
        }
        scores
    }

    /// Per-family penalties over the whole roster.
    pub fn family_scores(&self, schedule: &Schedule) -> [i64; ConstraintFamily::COUNT] {
        let mut scores = [0i64; ConstraintFamily::COUNT];
        for employee in 0..self.instance.num_employees() {
            let emp = self.employee_family_scores(schedule, employee);
            for (total, part) in scores.iter_mut().zip(emp) {
                *total += part;
            }
        }
        scores
    }

    pub fn evaluate_employee(&self, schedule: &Schedule, employee: usize) -> i64 {
        self.employee_family_scores(schedule, employee).iter().sum()
    }

    pub fn evaluate_all(&self, schedule: &Schedule) -> i64 {
        (0..self.instance.num_employees())
            .map(|e| self.evaluate_employee(schedule, e))
            .sum()
    }

    #[inline]
    pub fn is_feasible(&self, schedule: &Schedule) -> bool {
        self.evaluate_all(schedule) == 0
    }

    /// Every cell of every employee that has at least one hard violation.
    /// Repair heuristics and guided restarts draw their targets from here.
    pub fn violating_assignments(&self, schedule: &Schedule) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for employee in 0..self.instance.num_employees() {
            if self.evaluate_employee(schedule, employee) < 0 {
                for day in 0..schedule.horizon() {
                    out.push((employee, day));
                }
            }
        }
        out
    }
}
