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

//! Incremental move evaluation over a mirrored roster.
//!
//! The evaluator owns its own copy of the schedule plus cached hard and
//! soft scores, and quotes the exact score change of a move before it is
//! committed. Hard families are per-employee, so single-cell moves only
//! re-evaluate the touched rows; coverage is day-scoped and handled by an
//! O(1) delta. Block moves are rare and fall back to full re-evaluation.
//!
//! Invariant: after any sequence of `apply` and `reset` calls, the cached
//! scores equal a from-scratch evaluation of the mirror. Debug builds
//! audit this every [`AUDIT_PERIOD`] applies.

use crate::constraints::evaluator::ConstraintEvaluator;
use crate::constraints::hard::ConstraintFamily;
use crate::search::moves::Move;
use crate::state::score::{Score, ScoreDelta};
use nurse_roster_model::common::DAY_OFF;
use nurse_roster_model::prelude::Schedule;

const AUDIT_PERIOD: usize = 512;

/// The quoted effect of a move: the raw score delta and the
/// weighted-hard delta used for acceptance in the infeasible region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveQuote {
    pub delta: ScoreDelta,
    pub weighted_hard: f64,
}

impl MoveQuote {
    #[inline]
    pub const fn zero() -> Self {
        Self {
            delta: ScoreDelta::zero(),
            weighted_hard: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IncrementalEvaluator<'a> {
    evaluator: ConstraintEvaluator<'a>,
    mirror: Schedule,
    current_hard: i64,
    current_soft: i64,
    current_weighted_hard: f64,
    applies_since_audit: usize,
}

impl<'a> IncrementalEvaluator<'a> {
    pub fn new(evaluator: ConstraintEvaluator<'a>, schedule: Schedule) -> Self {
        let current_hard = evaluator.hard_score(&schedule);
        let current_soft = evaluator.soft_score(&schedule);
        let current_weighted_hard = evaluator.weighted_hard_score(&schedule);
        Self {
            evaluator,
            mirror: schedule,
            current_hard,
            current_soft,
            current_weighted_hard,
            applies_since_audit: 0,
        }
    }

    #[inline]
    pub fn schedule(&self) -> &Schedule {
        &self.mirror
    }

    #[inline]
    pub fn evaluator(&self) -> &ConstraintEvaluator<'a> {
        &self.evaluator
    }

    #[inline]
    pub fn hard_score(&self) -> i64 {
        self.current_hard
    }

    #[inline]
    pub fn soft_score(&self) -> i64 {
        self.current_soft
    }

    #[inline]
    pub fn score(&self) -> Score {
        Score::new(self.current_hard, self.current_soft)
    }

    #[inline]
    pub fn weighted_hard_score(&self) -> f64 {
        self.current_weighted_hard
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.current_hard == 0
    }

    /// One adaptive-weight step against the mirror; the cached weighted
    /// score is recomputed under the new weights.
    pub fn update_weights(&mut self) {
        self.evaluator.update_weights(&self.mirror);
        self.current_weighted_hard = self.evaluator.weighted_hard_score(&self.mirror);
    }

    pub fn reset_weights(&mut self) {
        self.evaluator.reset_weights();
        self.current_weighted_hard = self.evaluator.weighted_hard_score(&self.mirror);
    }

    /// Replaces the mirror and recomputes all cached scores from scratch.
    /// Required after any external mutation of the roster (perturbation,
    /// restart, path relinking).
    pub fn reset(&mut self, schedule: Schedule) {
        self.mirror = schedule;
        self.recompute();
    }

    /// Quotes a move without changing the mirror.
    pub fn quote(&mut self, mv: &Move) -> MoveQuote {
        self.run(mv, false)
    }

    /// Commits a move to the mirror and folds its delta into the cached
    /// scores.
    pub fn apply(&mut self, mv: &Move) -> ScoreDelta {
        let quote = self.run(mv, true);
        self.current_hard += quote.delta.hard;
        self.current_soft += quote.delta.soft;
        self.current_weighted_hard += quote.weighted_hard;
        self.audit();
        quote.delta
    }

    fn run(&mut self, mv: &Move, commit: bool) -> MoveQuote {
        match *mv {
            Move::Change {
                employee,
                day,
                new_shift,
            }
            | Move::FixShiftRotation {
                employee,
                day,
                new_shift,
            } => self.run_change(employee, day, new_shift, commit),
            Move::Swap {
                employee1,
                day1,
                employee2,
                day2,
            } => self.run_swap(employee1, day1, employee2, day2, commit),
            Move::BlockSwap {
                employee1,
                employee2,
                start_day,
                block_size,
            } => self.run_block_swap(employee1, employee2, start_day, block_size, commit),
            Move::RuinAndRecreate { employee } => self.run_ruin(employee, commit),
        }
    }

    fn run_change(
        &mut self,
        employee: usize,
        day: usize,
        new_shift: usize,
        commit: bool,
    ) -> MoveQuote {
        let old_shift = self.mirror.get(employee, day);
        if old_shift == new_shift
            || !self.evaluator.instance().is_valid_employee(employee)
            || !self.evaluator.instance().is_valid_day(day)
            || new_shift > self.mirror.num_shifts()
        {
            return MoveQuote::zero();
        }

        let hard = *self.evaluator.hard();
        let soft = *self.evaluator.soft();

        let old_families = hard.employee_family_scores(&self.mirror, employee);
        let old_soft = soft.evaluate_employee(&self.mirror, employee);
        let coverage = soft.coverage_delta(&self.mirror, day, old_shift, new_shift);

        self.mirror.set(employee, day, new_shift);
        let new_families = hard.employee_family_scores(&self.mirror, employee);
        let new_soft = soft.evaluate_employee(&self.mirror, employee);
        if !commit {
            self.mirror.set(employee, day, old_shift);
        }

        self.quote_from_families(&old_families, &new_families, new_soft - old_soft + coverage)
    }

    fn run_swap(
        &mut self,
        employee1: usize,
        day1: usize,
        employee2: usize,
        day2: usize,
        commit: bool,
    ) -> MoveQuote {
        // A cell swapped with itself is a no-op.
        if employee1 == employee2 && day1 == day2 {
            return MoveQuote::zero();
        }
        let instance = self.evaluator.instance();
        if !instance.is_valid_employee(employee1)
            || !instance.is_valid_employee(employee2)
            || !instance.is_valid_day(day1)
            || !instance.is_valid_day(day2)
        {
            return MoveQuote::zero();
        }

        let hard = *self.evaluator.hard();
        let soft = *self.evaluator.soft();
        let shift1 = self.mirror.get(employee1, day1);
        let shift2 = self.mirror.get(employee2, day2);

        let same_employee = employee1 == employee2;
        let mut old_families = hard.employee_family_scores(&self.mirror, employee1);
        let mut old_soft = soft.evaluate_employee(&self.mirror, employee1);
        if !same_employee {
            let other = hard.employee_family_scores(&self.mirror, employee2);
            for (total, part) in old_families.iter_mut().zip(other) {
                *total += part;
            }
            old_soft += soft.evaluate_employee(&self.mirror, employee2);
        }

        // Coverage deltas are taken one write at a time so a same-day swap
        // cancels exactly.
        let mut coverage = soft.coverage_delta(&self.mirror, day1, shift1, shift2);
        self.mirror.set(employee1, day1, shift2);
        coverage += soft.coverage_delta(&self.mirror, day2, shift2, shift1);
        self.mirror.set(employee2, day2, shift1);

        let mut new_families = hard.employee_family_scores(&self.mirror, employee1);
        let mut new_soft = soft.evaluate_employee(&self.mirror, employee1);
        if !same_employee {
            let other = hard.employee_family_scores(&self.mirror, employee2);
            for (total, part) in new_families.iter_mut().zip(other) {
                *total += part;
            }
            new_soft += soft.evaluate_employee(&self.mirror, employee2);
        }

        if !commit {
            self.mirror.set(employee2, day2, shift2);
            self.mirror.set(employee1, day1, shift1);
        }

        self.quote_from_families(&old_families, &new_families, new_soft - old_soft + coverage)
    }

    fn run_block_swap(
        &mut self,
        employee1: usize,
        employee2: usize,
        start_day: usize,
        block_size: usize,
        commit: bool,
    ) -> MoveQuote {
        if employee1 == employee2 || block_size == 0 {
            return MoveQuote::zero();
        }
        let instance = self.evaluator.instance();
        if !instance.is_valid_employee(employee1)
            || !instance.is_valid_employee(employee2)
            || start_day >= self.mirror.horizon()
        {
            return MoveQuote::zero();
        }

        let hard = *self.evaluator.hard();
        let soft = *self.evaluator.soft();
        let end_day = (start_day + block_size).min(self.mirror.horizon());

        let old_families = hard.family_scores(&self.mirror);
        let old_soft = soft.evaluate_all(&self.mirror);

        self.swap_block(employee1, employee2, start_day, end_day);
        let new_families = hard.family_scores(&self.mirror);
        let new_soft = soft.evaluate_all(&self.mirror);
        if !commit {
            self.swap_block(employee1, employee2, start_day, end_day);
        }

        self.quote_from_families(&old_families, &new_families, new_soft - old_soft)
    }

    fn run_ruin(&mut self, employee: usize, commit: bool) -> MoveQuote {
        if !self.evaluator.instance().is_valid_employee(employee) {
            return MoveQuote::zero();
        }

        let hard = *self.evaluator.hard();
        let soft = *self.evaluator.soft();
        let saved_row: Vec<u16> = self.mirror.row(employee).to_vec();

        let old_families = hard.family_scores(&self.mirror);
        let old_soft = soft.evaluate_all(&self.mirror);

        self.greedy_refill(employee);
        let new_families = hard.family_scores(&self.mirror);
        let new_soft = soft.evaluate_all(&self.mirror);

        if !commit {
            for (day, &shift) in saved_row.iter().enumerate() {
                self.mirror.set(employee, day, shift as usize);
            }
        }

        self.quote_from_families(&old_families, &new_families, new_soft - old_soft)
    }

    /// Clears the row, then re-fills it day by day with the shift (day off
    /// included) that maximises the roster score as it stands.
    fn greedy_refill(&mut self, employee: usize) {
        let hard = *self.evaluator.hard();
        let soft = *self.evaluator.soft();
        let horizon = self.mirror.horizon();
        let num_shifts = self.mirror.num_shifts();

        for day in 0..horizon {
            self.mirror.set(employee, day, DAY_OFF);
        }
        for day in 0..horizon {
            let mut best_shift = DAY_OFF;
            let mut best_value = i64::MIN;
            for shift in 0..=num_shifts {
                self.mirror.set(employee, day, shift);
                let value = hard.evaluate_employee(&self.mirror, employee)
                    + soft.evaluate_employee(&self.mirror, employee)
                    + soft.coverage(&self.mirror);
                if value > best_value {
                    best_value = value;
                    best_shift = shift;
                }
            }
            self.mirror.set(employee, day, best_shift);
        }
    }

    fn swap_block(&mut self, employee1: usize, employee2: usize, start_day: usize, end_day: usize) {
        for day in start_day..end_day {
            let s1 = self.mirror.get(employee1, day);
            let s2 = self.mirror.get(employee2, day);
            self.mirror.set(employee1, day, s2);
            self.mirror.set(employee2, day, s1);
        }
    }

    fn quote_from_families(
        &self,
        old_families: &[i64; ConstraintFamily::COUNT],
        new_families: &[i64; ConstraintFamily::COUNT],
        soft_delta: i64,
    ) -> MoveQuote {
        let mut family_delta = [0i64; ConstraintFamily::COUNT];
        for (slot, (&new, &old)) in family_delta
            .iter_mut()
            .zip(new_families.iter().zip(old_families))
        {
            *slot = new - old;
        }
        let hard_delta: i64 = family_delta.iter().sum();
        MoveQuote {
            delta: ScoreDelta::new(hard_delta, soft_delta),
            weighted_hard: self.evaluator.weigh(&family_delta),
        }
    }

    fn recompute(&mut self) {
        self.current_hard = self.evaluator.hard_score(&self.mirror);
        self.current_soft = self.evaluator.soft_score(&self.mirror);
        self.current_weighted_hard = self.evaluator.weighted_hard_score(&self.mirror);
        self.applies_since_audit = 0;
    }

    fn audit(&mut self) {
        self.applies_since_audit += 1;
        if self.applies_since_audit >= AUDIT_PERIOD {
            self.applies_since_audit = 0;
            debug_assert_eq!(
                self.current_hard,
                self.evaluator.hard_score(&self.mirror),
                "cached hard score diverged from the mirror"
            );
            debug_assert_eq!(
                self.current_soft,
                self.evaluator.soft_score(&self.mirror),
                "cached soft score diverged from the mirror"
            );
        }
    }
}
