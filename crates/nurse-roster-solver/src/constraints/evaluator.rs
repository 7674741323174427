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

use crate::constraints::hard::{ConstraintFamily, HardConstraints};
use crate::constraints::soft::SoftConstraints;
use crate::state::score::Score;
use nurse_roster_model::prelude::{Instance, Schedule};

const WEIGHT_MIN: f64 = 0.1;
const WEIGHT_MAX: f64 = 10.0;
const WEIGHT_GROWTH: f64 = 1.30;
const WEIGHT_DECAY: f64 = 0.95;

/// Façade over the hard and soft families plus the adaptive per-family
/// weight vector used to rank infeasible rosters against each other.
///
/// Weights live in `[0.1, 10.0]`: a family that keeps getting violated is
/// inflated by 30% per update so the search is pulled towards repairing it;
/// satisfied families decay by 5% back towards indifference.
#[derive(Debug, Clone)]
pub struct ConstraintEvaluator<'a> {
    hard: HardConstraints<'a>,
    soft: SoftConstraints<'a>,
    weights: [f64; ConstraintFamily::COUNT],
    violation_count: [u64; ConstraintFamily::COUNT],
}

impl<'a> ConstraintEvaluator<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            hard: HardConstraints::new(instance),
            soft: SoftConstraints::new(instance),
            weights: [1.0; ConstraintFamily::COUNT],
            violation_count: [0; ConstraintFamily::COUNT],
        }
    }

    #[inline]
    pub fn instance(&self) -> &'a Instance {
        self.hard.instance()
    }

    #[inline]
    pub fn hard(&self) -> &HardConstraints<'a> {
        &self.hard
    }

    #[inline]
    pub fn soft(&self) -> &SoftConstraints<'a> {
        &self.soft
    }

    #[inline]
    pub fn hard_score(&self, schedule: &Schedule) -> i64 {
        self.hard.evaluate_all(schedule)
    }

    #[inline]
    pub fn soft_score(&self, schedule: &Schedule) -> i64 {
        self.soft.evaluate_all(schedule)
    }

    #[inline]
    pub fn score(&self, schedule: &Schedule) -> Score {
        Score::new(self.hard_score(schedule), self.soft_score(schedule))
    }

    #[inline]
    pub fn employee_hard(&self, schedule: &Schedule, employee: usize) -> i64 {
        self.hard.evaluate_employee(schedule, employee)
    }

    #[inline]
    pub fn employee_soft(&self, schedule: &Schedule, employee: usize) -> i64 {
        self.soft.evaluate_employee(schedule, employee)
    }

    #[inline]
    pub fn is_feasible(&self, schedule: &Schedule) -> bool {
        self.hard.is_feasible(schedule)
    }

    /// `Σ_f w[f] · penalty_f` over the hard families.
    pub fn weighted_hard_score(&self, schedule: &Schedule) -> f64 {
        let scores = self.hard.family_scores(schedule);
        self.weigh(&scores)
    }

    /// Applies the weight vector to an already-computed family breakdown.
    #[inline]
    pub fn weigh(&self, family_scores: &[i64; ConstraintFamily::COUNT]) -> f64 {
        family_scores
            .iter()
            .zip(&self.weights)
            .map(|(&penalty, &weight)| weight * penalty as f64)
            .sum()
    }

    #[inline]
    pub fn weight(&self, family: ConstraintFamily) -> f64 {
        self.weights[family.index()]
    }

    #[inline]
    pub fn violation_count(&self, family: ConstraintFamily) -> u64 {
        self.violation_count[family.index()]
    }

    /// One adaptation step against the current roster: inflate violated
    /// families, decay satisfied ones, clamp to `[0.1, 10.0]`.
    pub fn update_weights(&mut self, schedule: &Schedule) {
        let scores = self.hard.family_scores(schedule);
        for family in ConstraintFamily::ALL {
            let idx = family.index();
            if scores[idx] < 0 {
                self.weights[idx] = (self.weights[idx] * WEIGHT_GROWTH).min(WEIGHT_MAX);
                self.violation_count[idx] += 1;
            } else {
                self.weights[idx] = (self.weights[idx] * WEIGHT_DECAY).max(WEIGHT_MIN);
            }
        }
    }

    /// Restores every weight to 1.0 and zeroes the violation counters.
    /// Invoked on every diversification and restart.
    pub fn reset_weights(&mut self) {
        self.weights = [1.0; ConstraintFamily::COUNT];
        self.violation_count = [0; ConstraintFamily::COUNT];
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
            // Minimum of 960 minutes makes the empty roster violate
            // WorkingTime and nothing else.
            .add_staff(Staff::new("A").with_total_minutes(960, 4800));
        b.build().unwrap()
    }

    #[test]
    fn test_weighted_score_starts_unweighted() {
        let inst = instance();
        let ev = ConstraintEvaluator::new(&inst);
        let s = Schedule::new(1, 7, 1);
        assert_eq!(ev.hard_score(&s), -10);
        assert_eq!(ev.weighted_hard_score(&s), -10.0);
        for family in ConstraintFamily::ALL {
            assert_eq!(ev.weight(family), 1.0);
        }
    }

    #[test]
    fn test_update_inflates_violated_and_decays_satisfied() {
        let inst = instance();
        let mut ev = ConstraintEvaluator::new(&inst);
        let s = Schedule::new(1, 7, 1);

        ev.update_weights(&s);
        assert!((ev.weight(ConstraintFamily::WorkingTime) - 1.30).abs() < 1e-12);
        for family in ConstraintFamily::ALL {
            if family != ConstraintFamily::WorkingTime {
                assert!((ev.weight(family) - 0.95).abs() < 1e-12, "family {family}");
            }
        }
        assert_eq!(ev.violation_count(ConstraintFamily::WorkingTime), 1);
        assert_eq!(ev.violation_count(ConstraintFamily::ShiftRotation), 0);

        // Five consecutive updates on the same violating roster: 1.30^5.
        for _ in 0..4 {
            ev.update_weights(&s);
        }
        let expected = 1.30f64.powi(5);
        assert!((ev.weight(ConstraintFamily::WorkingTime) - expected).abs() < 1e-9);
        assert_eq!(ev.violation_count(ConstraintFamily::WorkingTime), 5);
    }

    #[test]
    fn test_weights_stay_clamped() {
        let inst = instance();
        let mut ev = ConstraintEvaluator::new(&inst);
        let s = Schedule::new(1, 7, 1);
        for _ in 0..200 {
            ev.update_weights(&s);
        }
        for family in ConstraintFamily::ALL {
            let w = ev.weight(family);
            assert!((0.1..=10.0).contains(&w), "weight {w} out of bounds");
        }
        assert_eq!(ev.weight(ConstraintFamily::WorkingTime), 10.0);
        assert_eq!(ev.weight(ConstraintFamily::ShiftRotation), 0.1);
    }

    #[test]
    fn test_reset_restores_unit_weights() {
        let inst = instance();
        let mut ev = ConstraintEvaluator::new(&inst);
        let s = Schedule::new(1, 7, 1);
        for _ in 0..3 {
            ev.update_weights(&s);
        }
        ev.reset_weights();
        for family in ConstraintFamily::ALL {
            assert_eq!(ev.weight(family), 1.0);
            assert_eq!(ev.violation_count(family), 0);
        }
    }

    #[test]
    fn test_weighted_score_tracks_weights() {
        let inst = instance();
        let mut ev = ConstraintEvaluator::new(&inst);
        let s = Schedule::new(1, 7, 1);
        ev.update_weights(&s);
        // Only WorkingTime is non-zero (-10), so the weighted score is
        // exactly its inflated weight times the penalty.
        let expected = 1.30 * -10.0;
        assert!((ev.weighted_hard_score(&s) - expected).abs() < 1e-9);
    }
}
